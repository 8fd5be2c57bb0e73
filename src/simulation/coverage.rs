use super::types::ShiftOutcome;
use crate::model::ShiftGroup;

/// Répartit la capacité d'une semaine entre les groupes, dans l'ordre donné.
///
/// Un groupe est couvert en entier ou pas du tout : dès qu'un groupe ne peut
/// plus être couvert, son manque (`number - restant`) est ajouté à
/// `uncovered` et la capacité tombe à zéro pour les groupes suivants.
/// Retourne la capacité restante après le dernier groupe.
pub fn allocate_week(shifts: &[ShiftGroup], available: f64, uncovered: &mut [f64]) -> f64 {
    let mut remaining = available.max(0.0);
    for (shift, missing) in shifts.iter().zip(uncovered.iter_mut()) {
        if remaining >= shift.number {
            remaining -= shift.number;
        } else {
            *missing += shift.number - remaining;
            remaining = 0.0;
        }
    }
    remaining
}

/// Cumul de la couverture sur un cycle.
pub(super) struct CoverageLedger<'a> {
    shifts: &'a [ShiftGroup],
    uncovered: Vec<f64>,
    excess: f64,
}

impl<'a> CoverageLedger<'a> {
    pub(super) fn new(shifts: &'a [ShiftGroup]) -> Self {
        Self {
            shifts,
            uncovered: vec![0.0; shifts.len()],
            excess: 0.0,
        }
    }

    pub(super) fn record_week(&mut self, available: f64) {
        let left = allocate_week(self.shifts, available, &mut self.uncovered);
        if left > 0.0 {
            self.excess += left;
        }
    }

    pub(super) fn finish(self) -> (Vec<ShiftOutcome>, f64) {
        let outcomes = self
            .shifts
            .iter()
            .zip(self.uncovered)
            .map(|(shift, uncovered)| ShiftOutcome {
                name: shift.name.clone(),
                uncovered,
            })
            .collect();
        (outcomes, self.excess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<ShiftGroup> {
        vec![
            ShiftGroup::new("Dispensary", 10.0, 1),
            ShiftGroup::new("ED", 6.0, 2),
            ShiftGroup::new("Acute Care", 4.0, 3),
        ]
    }

    #[test]
    fn full_coverage_leaves_excess() {
        let shifts = groups();
        let mut uncovered = vec![0.0; 3];
        let left = allocate_week(&shifts, 25.0, &mut uncovered);
        assert_eq!(left, 5.0);
        assert_eq!(uncovered, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn shortfall_uses_remaining_before_exhaustion() {
        let shifts = groups();
        let mut uncovered = vec![0.0; 3];
        let left = allocate_week(&shifts, 13.0, &mut uncovered);
        assert_eq!(left, 0.0);
        // ED manque 6 - 3 ; Acute Care n'a plus rien.
        assert_eq!(uncovered, [0.0, 3.0, 4.0]);
    }

    #[test]
    fn negative_capacity_is_clamped() {
        let shifts = groups();
        let mut uncovered = vec![0.0; 3];
        let left = allocate_week(&shifts, -7.5, &mut uncovered);
        assert_eq!(left, 0.0);
        assert_eq!(uncovered, [10.0, 6.0, 4.0]);
    }

    #[test]
    fn ledger_accumulates_over_weeks() {
        let shifts = groups();
        let mut ledger = CoverageLedger::new(&shifts);
        ledger.record_week(22.0);
        ledger.record_week(18.0);
        let (outcomes, excess) = ledger.finish();
        assert_eq!(excess, 2.0);
        assert_eq!(outcomes[2].name, "Acute Care");
        assert_eq!(outcomes[2].uncovered, 2.0);
        assert_eq!(outcomes[0].uncovered, 0.0);
    }
}
