//! Epoch reward performance multiplier.

use concord_registry::OperatorMetrics;

/// Compute the performance multiplier for an operator, in centi-units
/// (100 = 1.00), clamped to [50, 150].
///
/// - participation rate `p = successful_reveals / proposals_in_epoch`
/// - `p < 0.5` floors the multiplier at 0.5
/// - otherwise `m = 0.5 + (p - 0.5) / 0.5`, minus 0.05 per missed reveal
/// - a clean record (`no fraud, p >= 0.95`) earns a 0.1 bonus
/// - rounded to 0.01 so the final reward is exact integer math
///
/// An epoch with no proposals yields the neutral multiplier.
pub fn performance_multiplier_centi(metrics: &OperatorMetrics, proposals_in_epoch: u64) -> u64 {
    if proposals_in_epoch == 0 {
        return 100;
    }
    let p = metrics.successful_reveals as f64 / proposals_in_epoch as f64;

    let mut m = if p < 0.5 {
        0.5
    } else {
        let mut graded = 0.5 + (p - 0.5) / 0.5;
        graded -= 0.05 * metrics.missed_reveals as f64;
        if metrics.fraud_proofs == 0 && p >= 0.95 {
            graded += 0.1;
        }
        graded
    };
    m = m.clamp(0.5, 1.5);
    (m * 100.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(successful: u64, missed: u64, fraud: u64) -> OperatorMetrics {
        OperatorMetrics {
            total_participations: successful + missed,
            successful_reveals: successful,
            missed_reveals: missed,
            fraud_proofs: fraud,
            last_active_epoch: 0,
        }
    }

    #[test]
    fn perfect_participation_caps_at_150() {
        // p = 1.0 gives 1.5, bonus would exceed the cap.
        assert_eq!(performance_multiplier_centi(&metrics(10, 0, 0), 10), 150);
    }

    #[test]
    fn below_half_participation_floors() {
        assert_eq!(performance_multiplier_centi(&metrics(4, 6, 0), 10), 50);
        assert_eq!(performance_multiplier_centi(&metrics(0, 10, 0), 10), 50);
    }

    #[test]
    fn midline_grades_linearly() {
        // p = 0.75 -> 0.5 + 0.5 = 1.0, no missed-reveal deduction counted
        // here because reveals were successful 15 of 20.
        assert_eq!(performance_multiplier_centi(&metrics(15, 0, 0), 20), 100);
    }

    #[test]
    fn missed_reveals_deduct() {
        // p = 0.8 -> 1.1, minus 2 * 0.05 = 1.0.
        assert_eq!(performance_multiplier_centi(&metrics(8, 2, 0), 10), 100);
    }

    #[test]
    fn clean_record_bonus_applies_below_cap() {
        // p = 0.95 -> 1.4, plus 0.1 bonus = 1.5.
        assert_eq!(performance_multiplier_centi(&metrics(19, 1, 0), 20), 145);
        // 19/20 = 0.95 -> 1.4; one missed reveal deducts 0.05 -> 1.35;
        // bonus 0.1 -> 1.45.
        assert_eq!(performance_multiplier_centi(&metrics(95, 0, 0), 100), 150);
    }

    #[test]
    fn fraud_forfeits_bonus() {
        // p = 1.0 -> 1.5 with no bonus either way; use p = 0.95.
        assert_eq!(performance_multiplier_centi(&metrics(19, 0, 1), 20), 140);
    }

    #[test]
    fn no_proposals_is_neutral() {
        assert_eq!(performance_multiplier_centi(&metrics(0, 0, 0), 0), 100);
    }
}
