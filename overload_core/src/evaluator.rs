//! Per-session performance evaluation.
//!
//! Reduces the sets one exercise received in one session to the summary the
//! progression decider works from. Only sets with both reps and weight logged
//! take part; a session without any such set produces no evaluation.

use crate::increment::weights_match;
use crate::{ExercisePrescription, SetRecord};
use serde::Serialize;

/// Summary of one session's sets for one exercise
///
/// Working sets are the valid sets performed at the session's highest weight.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PerformanceEvaluation {
    pub highest_weight: f64,
    pub working_set_count: u32,
    pub total_set_count: u32,
    pub rep_high_hits: u32,
    pub rep_low_hits: u32,
    pub working_reps: u64,
    pub all_reps: u64,
    pub working_volume: f64,
    pub all_volume: f64,
}

impl PerformanceEvaluation {
    /// Every working set reached `threshold` sets at the top of the rep range
    pub fn meets_success(&self, threshold: u32) -> bool {
        self.working_set_count >= threshold && self.rep_high_hits >= threshold
    }

    /// Enough working sets reached the bottom of the rep range
    pub fn meets_moderate(&self, threshold: u32) -> bool {
        self.working_set_count >= threshold && self.rep_low_hits >= threshold
    }
}

/// Evaluate one session's sets against a prescription
///
/// Returns `None` when no set has both reps and weight logged.
pub fn evaluate(
    prescription: &ExercisePrescription,
    sets: &[SetRecord],
) -> Option<PerformanceEvaluation> {
    let valid: Vec<(u32, f64)> = sets.iter().filter_map(SetRecord::values).collect();

    if valid.is_empty() {
        return None;
    }

    let highest_weight = valid
        .iter()
        .map(|(_, weight)| *weight)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut evaluation = PerformanceEvaluation {
        highest_weight,
        working_set_count: 0,
        total_set_count: valid.len() as u32,
        rep_high_hits: 0,
        rep_low_hits: 0,
        working_reps: 0,
        all_reps: 0,
        working_volume: 0.0,
        all_volume: 0.0,
    };

    for &(reps, weight) in &valid {
        let volume = f64::from(reps) * weight;
        evaluation.all_reps += u64::from(reps);
        evaluation.all_volume += volume;

        if !weights_match(weight, highest_weight) {
            continue;
        }

        evaluation.working_set_count += 1;
        evaluation.working_reps += u64::from(reps);
        evaluation.working_volume += volume;
        if reps >= prescription.rep_high {
            evaluation.rep_high_hits += 1;
        }
        if reps >= prescription.rep_low {
            evaluation.rep_low_hits += 1;
        }
    }

    Some(evaluation)
}
