//! Progression logic for choosing the next target weight.
//!
//! This module implements the progressive overload rules:
//! - Successful: every working set hit the top of the rep range → full
//!   tier increment, scaled up by the success streak
//! - Close: most working sets reached the bottom of the range with enough
//!   total reps → half increment
//! - Plateau: the same weight for the whole history window with near-close
//!   performance → half increment
//! - Otherwise the weight holds
//!
//! Both the session-start path and the week preview call [`decide`], so the
//! rule table lives only here and in [`crate::increment`].

use crate::evaluator::{evaluate, PerformanceEvaluation};
use crate::increment::{
    half_increment, progression_increment, round_to_step, round_to_two_decimals, weights_match,
    LOAD_STEP,
};
use crate::{ExercisePrescription, SessionPerformance};
use serde::Serialize;

/// Maximum number of historical sessions the decider looks at
pub const HISTORY_WINDOW: usize = 3;

/// Cap on the success-streak multiplier
pub const MAX_STREAK_MULTIPLIER: f64 = 2.5;

const MODERATE_SET_FRACTION: f64 = 0.75;
const CLOSE_WORKING_REP_RATIO: f64 = 0.9;
const CLOSE_ALL_REP_RATIO: f64 = 1.0;
const PLATEAU_WORKING_REP_RATIO: f64 = 0.85;

/// How the decider arrived at its answer
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// No completed sessions; the prescribed weight passes through
    NoHistory,
    /// Every session in the window lacked a usable set
    NoEvaluation,
    /// Neither the prescription nor history gave a positive weight
    NoBasis,
    /// No set count could be determined; the base weight holds
    NoSetTarget,
    Successful { streak: u32, multiplier: f64 },
    Close,
    Plateau,
    Hold,
}

/// The next target weight plus the reasoning behind it
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProgressionDecision {
    pub target_weight: Option<f64>,
    pub base_weight: Option<f64>,
    pub increment: f64,
    pub outcome: Outcome,
}

impl ProgressionDecision {
    fn passthrough(prescription: &ExercisePrescription, outcome: Outcome) -> Self {
        Self {
            target_weight: prescription.target_weight,
            base_weight: None,
            increment: 0.0,
            outcome,
        }
    }
}

/// Next target weight for an exercise
///
/// `history` holds completed sessions, most recent first. Entries past the
/// window are ignored. `None` means there is no basis for a number and the
/// prescription had no target either.
pub fn decide(
    prescription: &ExercisePrescription,
    history: &[SessionPerformance],
) -> Option<f64> {
    decide_detailed(prescription, history).target_weight
}

/// Same as [`decide`], keeping the classification for display and logging
pub fn decide_detailed(
    prescription: &ExercisePrescription,
    history: &[SessionPerformance],
) -> ProgressionDecision {
    let window: Vec<&SessionPerformance> = history
        .iter()
        .filter(|session| session.is_completed())
        .take(HISTORY_WINDOW)
        .collect();

    if window.len() < history.len().min(HISTORY_WINDOW) {
        tracing::warn!("Ignoring non-completed sessions passed as progression history");
    }

    if window.is_empty() {
        tracing::debug!("No history, keeping prescribed weight");
        return ProgressionDecision::passthrough(prescription, Outcome::NoHistory);
    }

    let evaluations: Vec<Option<PerformanceEvaluation>> = window
        .iter()
        .map(|session| evaluate(prescription, &session.sets))
        .collect();

    let Some(last) = evaluations.iter().flatten().next() else {
        tracing::debug!("No session in the window has a logged set");
        return ProgressionDecision::passthrough(prescription, Outcome::NoEvaluation);
    };

    let base_weight = base_weight(prescription, last, &evaluations);
    if base_weight <= 0.0 {
        tracing::debug!("No positive base weight available");
        return ProgressionDecision::passthrough(prescription, Outcome::NoBasis);
    }

    let increment = progression_increment(base_weight);

    let target_sets = if prescription.set_count > 0 {
        prescription.set_count
    } else {
        last.total_set_count
    };
    if target_sets == 0 {
        return ProgressionDecision {
            target_weight: Some(round_to_two_decimals(base_weight)),
            base_weight: Some(base_weight),
            increment,
            outcome: Outcome::NoSetTarget,
        };
    }

    let (outcome, next_weight) =
        classify(prescription, target_sets, last, &evaluations, base_weight, increment);

    let target_weight = round_to_two_decimals(round_to_step(next_weight, LOAD_STEP));

    tracing::debug!(
        "Progression: base {} → {} ({:?}, increment {})",
        base_weight,
        target_weight,
        outcome,
        increment
    );

    ProgressionDecision {
        target_weight: Some(target_weight),
        base_weight: Some(base_weight),
        increment,
        outcome,
    }
}

/// Weight the next prescription builds on
///
/// Starts at the prescribed target, rises to the last session's top weight,
/// and falls back to the first positive weight in history.
fn base_weight(
    prescription: &ExercisePrescription,
    last: &PerformanceEvaluation,
    evaluations: &[Option<PerformanceEvaluation>],
) -> f64 {
    let mut base = prescription.target_weight.unwrap_or(0.0);

    if last.highest_weight > base {
        base = last.highest_weight;
    }

    if base == 0.0 {
        if let Some(first) = evaluations
            .iter()
            .flatten()
            .map(|e| e.highest_weight)
            .find(|w| *w > 0.0)
        {
            base = first;
        }
    }

    base
}

/// Multiplier applied to the increment for a run of successful sessions
pub fn streak_multiplier(streak: u32) -> f64 {
    let bonus = f64::from(streak.saturating_sub(1)) * 0.5;
    (1.0 + bonus).min(MAX_STREAK_MULTIPLIER)
}

/// Consecutive successful sessions, most recent first, stopping at any gap
fn success_streak(evaluations: &[Option<PerformanceEvaluation>], threshold: u32) -> u32 {
    evaluations
        .iter()
        .take_while(|e| e.as_ref().is_some_and(|e| e.meets_success(threshold)))
        .count() as u32
}

fn ratio(numerator: u64, goal: f64) -> f64 {
    if goal > 0.0 {
        numerator as f64 / goal
    } else {
        0.0
    }
}

fn classify(
    prescription: &ExercisePrescription,
    target_sets: u32,
    last: &PerformanceEvaluation,
    evaluations: &[Option<PerformanceEvaluation>],
    base_weight: f64,
    increment: f64,
) -> (Outcome, f64) {
    let success_threshold = target_sets;
    let moderate_threshold =
        ((f64::from(target_sets) * MODERATE_SET_FRACTION).ceil() as u32).max(1);
    let high_volume_goal = f64::from(target_sets) * f64::from(prescription.rep_high);
    let moderate_volume_goal = f64::from(target_sets) * f64::from(prescription.rep_low);

    let working_rep_ratio = ratio(last.working_reps, high_volume_goal);
    let all_rep_ratio = ratio(last.all_reps, moderate_volume_goal);

    if last.meets_success(success_threshold) {
        let streak = success_streak(evaluations, success_threshold);
        let multiplier = streak_multiplier(streak);
        return (
            Outcome::Successful { streak, multiplier },
            base_weight + increment * multiplier,
        );
    }

    let moderate = last.meets_moderate(moderate_threshold);

    if moderate
        && (working_rep_ratio >= CLOSE_WORKING_REP_RATIO || all_rep_ratio >= CLOSE_ALL_REP_RATIO)
    {
        return (Outcome::Close, base_weight + half_increment(increment));
    }

    // An absent evaluation anywhere in the window voids the plateau
    let plateau = evaluations
        .iter()
        .all(|e| e.as_ref().is_some_and(|e| weights_match(e.highest_weight, base_weight)));

    if plateau && moderate && working_rep_ratio >= PLATEAU_WORKING_REP_RATIO {
        return (Outcome::Plateau, base_weight + half_increment(increment));
    }

    (Outcome::Hold, base_weight)
}
