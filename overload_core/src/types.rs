//! Core domain types for the Overload training log.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise prescriptions and logged sets (the engine's inputs)
//! - Session status and per-session performance snapshots
//! - Persisted training sessions and their exercises

use crate::input;
use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Engine Inputs
// ============================================================================

/// Planned parameters for one occurrence of an exercise
///
/// A `set_count` of zero means the plan carries no set count; the decider then
/// falls back to the number of sets actually logged.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExercisePrescription {
    pub set_count: u32,
    pub rep_low: u32,
    pub rep_high: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
}

impl ExercisePrescription {
    pub fn new(set_count: u32, rep_low: u32, rep_high: u32, target_weight: Option<f64>) -> Self {
        Self {
            set_count,
            rep_low,
            rep_high,
            target_weight,
        }
    }

    /// Same prescription with a different target weight
    pub fn with_target_weight(&self, target_weight: Option<f64>) -> Self {
        Self {
            target_weight,
            ..self.clone()
        }
    }
}

/// One set's logged outcome
///
/// Reps and weight are independently optional: a set row exists from the
/// moment a session is started, and is only filled in once logged. Malformed
/// values in stored data are read back as absent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetRecord {
    pub set_number: u32,
    #[serde(default, deserialize_with = "input::deserialize_reps")]
    pub actual_reps: Option<u32>,
    #[serde(default, deserialize_with = "input::deserialize_weight")]
    pub actual_weight: Option<f64>,
}

impl SetRecord {
    /// A set row that has not been logged yet
    pub fn empty(set_number: u32) -> Self {
        Self {
            set_number,
            actual_reps: None,
            actual_weight: None,
        }
    }

    /// A fully logged set
    pub fn logged(set_number: u32, reps: u32, weight: f64) -> Self {
        Self {
            set_number,
            actual_reps: Some(reps),
            actual_weight: input::normalize_weight(weight),
        }
    }

    /// Build a set from free-form user input
    ///
    /// Unparseable, negative or non-finite values become absent, exactly as
    /// if the field had not been logged.
    pub fn from_raw(set_number: u32, reps: Option<&str>, weight: Option<&str>) -> Self {
        Self {
            set_number,
            actual_reps: reps.and_then(input::parse_reps),
            actual_weight: weight.and_then(input::parse_weight),
        }
    }

    /// Reps and weight when both are present and usable
    pub fn values(&self) -> Option<(u32, f64)> {
        let reps = self.actual_reps?;
        let weight = self.actual_weight.and_then(input::normalize_weight)?;
        Some((reps, weight))
    }

    pub fn is_valid(&self) -> bool {
        self.values().is_some()
    }

    pub fn clear(&mut self) {
        self.actual_reps = None;
        self.actual_weight = None;
    }
}

/// Lifecycle status of a training session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Skipped,
}

/// The sets one exercise received in one historical session
#[derive(Clone, Debug, PartialEq)]
pub struct SessionPerformance {
    pub status: SessionStatus,
    pub sets: Vec<SetRecord>,
}

impl SessionPerformance {
    /// A completed session with the given sets
    pub fn completed(sets: Vec<SetRecord>) -> Self {
        Self {
            status: SessionStatus::Completed,
            sets,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }
}

// ============================================================================
// Persisted Sessions
// ============================================================================

/// One exercise inside a training session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionExercise {
    pub exercise_id: String,
    pub name: String,
    pub order_index: u32,
    pub prescription: ExercisePrescription,
    #[serde(default)]
    pub skipped: bool,
    #[serde(default)]
    pub sets: Vec<SetRecord>,
}

impl SessionExercise {
    pub fn set_mut(&mut self, set_number: u32) -> Option<&mut SetRecord> {
        self.sets.iter_mut().find(|s| s.set_number == set_number)
    }

    /// Mark the exercise skipped and wipe anything logged against it
    pub fn skip(&mut self) {
        self.skipped = true;
        for set in &mut self.sets {
            set.clear();
        }
    }
}

/// A training session as recorded in the session log
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrainingSession {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: SessionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub exercises: Vec<SessionExercise>,
}

impl TrainingSession {
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn exercise(&self, exercise_id: &str) -> Option<&SessionExercise> {
        self.exercises.iter().find(|e| e.exercise_id == exercise_id)
    }

    pub fn exercise_mut(&mut self, exercise_id: &str) -> Option<&mut SessionExercise> {
        self.exercises
            .iter_mut()
            .find(|e| e.exercise_id == exercise_id)
    }

    /// The performance this session recorded for an exercise, if it trained it
    pub fn performance_for(&self, exercise_id: &str) -> Option<SessionPerformance> {
        self.exercise(exercise_id).map(|e| SessionPerformance {
            status: self.status,
            sets: e.sets.clone(),
        })
    }
}
