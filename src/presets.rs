//! Scénarios prédéfinis, chiffrés sur l'horaire 2023-08-07 → 2024-03-24.
use crate::model::{
    EmployeeBreakdown, Event, FteScenarios, Scenario, ScenarioError, ScenarioSet, ShiftGroup,
    SHIFTS_PER_FTE_WEEK,
};

/// Changements d'horaire par occurrence, sauf exception.
const STANDARD_CHANGE_RATE: f64 = 1.5;
/// Créneaux perdus par occurrence, sauf exception.
const STANDARD_LOSS_RATE: f64 = 1.0;
/// Durée de référence d'un créneau (heures) pour normaliser les quarts longs.
const STANDARD_SHIFT_HOURS: f64 = 7.75;

fn standard(name: &str) -> Event {
    Event::new(name, STANDARD_CHANGE_RATE, STANDARD_LOSS_RATE)
}

/// Scénario sans les deux équipes de médecine interne.
pub fn no_im_teams(cycle_weeks: u32) -> Result<Scenario, ScenarioError> {
    let fte = FteScenarios {
        official: EmployeeBreakdown::new(35.7, 2.4, 1.4),
        actual: EmployeeBreakdown::new(36.5748, 3.2551, 1.5102),
    };
    let staff = EmployeeBreakdown::new(37.0, 4.0, 4.0);

    // créneaux possibles sur le cycle ; base des taux dérivés d'un volume annuel
    let cycle_shifts = fte.actual.total * f64::from(cycle_weeks) * SHIFTS_PER_FTE_WEEK;
    let per_shift = |volume: f64| if cycle_shifts > 0.0 { volume / cycle_shifts } else { 0.0 };

    // 80 % des congés réservés d'avance, le reste au moins 4 semaines avant
    let vacation_rate = 0.0681;
    let vacation = standard("Vacation Days").with_rates(
        0.0,
        0.0,
        vacation_rate * 0.2,
        vacation_rate * 0.8,
    );

    let bereavement = standard("Bereavement Leave Days").with_rates(0.0058, 0.0, 0.0, 0.0);
    let sick = standard("Sick Days").with_rates(0.0366, 0.0, 0.0, 0.0);

    let medical_rate = 0.0035;
    let medical = standard("Medical Leaves").with_rates(
        medical_rate * 0.4,
        medical_rate * 0.2,
        medical_rate * 0.1,
        medical_rate * 0.3,
    );

    // 3 jours par employé régulier, tous pris avec moins de 4 semaines de préavis
    let max_personal = staff.regular as u64 * 3;
    let personal_rate = per_shift(max_personal as f64);
    let personal_leave = standard("Personal Leave Days")
        .with_rates(personal_rate * 0.5, personal_rate * 0.5, 0.0, 0.0)
        .with_cycle_max(max_personal);

    let project_rate = 0.0163;
    let project = standard("Project Days").with_rates(
        project_rate * 0.1,
        project_rate * 0.2,
        project_rate * 0.3,
        project_rate * 0.5,
    );

    // 2 jours de formation par personne
    let education_rate = 0.0147;
    let education_max = staff.total as u64 * 2;
    let education = standard("Education Days")
        .with_rates(0.0, 0.0, education_rate * 0.3, education_rate * 0.7)
        .with_cycle_max(education_max);

    let orientation_per_hire = 15.0 + 13.0 + 5.0 + 10.0 + 1.0;
    let new_hire_rate = per_shift(orientation_per_hire * 6.0);
    let new_hire = Event::new("New Hire Changes", 1.0, STANDARD_LOSS_RATE).with_rates(
        0.0,
        new_hire_rate * 0.1,
        new_hire_rate * 0.6,
        new_hire_rate * 0.3,
    );

    // ~20 créneaux perdus entre le préavis et l'arrivée du remplaçant
    let departure_rate = per_shift(20.0 * 4.0);
    let departures = standard("Departures").with_rates(0.0, 0.0, departure_rate, 0.0);

    let internal_swap_rate = per_shift(8.0 * 6.0);
    let internal_swap = Event::new("Internal Swap Changes", 1.0, STANDARD_LOSS_RATE).with_rates(
        0.0,
        internal_swap_rate * 0.1,
        internal_swap_rate * 0.9,
        0.0,
    );

    let reorientation_rate = per_shift(13.0 * 2.0);
    let reorientation = Event::new("Returning to Work Reorientation", 1.0, STANDARD_LOSS_RATE)
        .with_rates(0.0, 0.0, reorientation_rate, 0.0);

    // les stagiaires ne font pas partie de la capacité : aucune perte
    let learner_rate = per_shift(15.0 * 4.0);
    let learner_swap = Event::new("Learner Rotation Swap Changes", STANDARD_CHANGE_RATE, 0.0)
        .with_rates(0.0, 0.0, learner_rate * 0.5, learner_rate * 0.5);

    let shifts = vec![
        ShiftGroup::new("Dispensary", (2.0 * 7.0) + (3.0 * 5.0) + (2.0 * 2.0) + 7.0, 1),
        ShiftGroup::new("HPT", 5.0, 1),
        ShiftGroup::new(
            "ED",
            (2.0 * 5.0 * 9.4 + 2.0 * 11.7) / STANDARD_SHIFT_HOURS,
            2,
        ),
        ShiftGroup::new(
            "ICU",
            (2.0 * 5.0 * 9.4 + 2.0 * 9.4) / STANDARD_SHIFT_HOURS,
            2,
        ),
        ShiftGroup::new("Ambulatory", 20.2424, 2),
        ShiftGroup::new("ID & ASP", 5.0 * 3.0, 2),
        ShiftGroup::new("Acute Care", 5.0 * 9.0, 3),
    ];

    Scenario::new(
        "No IM Teams",
        fte,
        staff,
        vec![
            vacation,
            bereavement,
            sick,
            medical,
            personal_leave,
            project,
            education,
            new_hire,
            departures,
            internal_swap,
            reorientation,
            learner_swap,
        ],
        shifts,
    )
}

/// Tous les scénarios prédéfinis.
pub fn all(cycle_weeks: u32) -> Result<ScenarioSet, ScenarioError> {
    Ok(ScenarioSet {
        scenarios: vec![no_im_teams(cycle_weeks)?],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_im_teams_is_well_formed() {
        let s = no_im_teams(52).unwrap();
        assert_eq!(s.events().len(), 12);
        assert_eq!(s.shifts().len(), 7);
        assert!((s.shift_capacity() - 206.7005).abs() < 1e-9);
        let first: Vec<_> = s.shifts().iter().take(2).map(|g| g.name.as_str()).collect();
        assert_eq!(first, ["Dispensary", "HPT"]);
        assert_eq!(s.shifts().last().unwrap().name, "Acute Care");
        assert_eq!(s.find_event("Personal Leave Days").unwrap().cycle_max, Some(111));
        assert_eq!(s.find_event("Education Days").unwrap().cycle_max, Some(90));
    }

    #[test]
    fn zero_week_cycle_still_builds() {
        let s = no_im_teams(0).unwrap();
        assert_eq!(s.find_event("Departures").unwrap().rate_total(), 0.0);
    }
}
