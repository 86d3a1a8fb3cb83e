//! Weekly training plan.
//!
//! The plan maps weekdays to the exercises trained on them, each with its
//! prescription. It is loaded from `plan.toml` in the data directory; without
//! one, a four-day upper/lower split is used.

use crate::{Error, ExercisePrescription, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One exercise slot in a plan day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlanExercise {
    pub exercise_id: String,
    pub name: String,
    #[serde(flatten)]
    pub prescription: ExercisePrescription,
}

/// A training day in the weekly plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlanDay {
    pub weekday: Weekday,
    pub title: String,
    #[serde(default)]
    pub exercises: Vec<PlanExercise>,
}

/// The athlete's weekly plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct WeeklyPlan {
    #[serde(default)]
    pub days: Vec<PlanDay>,
}

impl WeeklyPlan {
    /// Load the plan at `path`, or the default split if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            tracing::info!("No plan file found at {:?}, using default split", path);
            Ok(default_split())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let plan: WeeklyPlan = toml::from_str(&contents)?;
        plan.validate()?;
        tracing::info!("Loaded plan with {} training days from {:?}", plan.days.len(), path);
        Ok(plan)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Plan(format!("Failed to serialize plan: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check that every prescription is usable
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for day in &self.days {
            if !seen.insert(day.weekday) {
                return Err(Error::Plan(format!("{} appears more than once", day.weekday)));
            }

            for exercise in &day.exercises {
                let p = &exercise.prescription;
                let problem = if p.set_count == 0 {
                    Some("set_count must be positive".to_string())
                } else if p.rep_low == 0 || p.rep_high == 0 {
                    Some("rep targets must be positive".to_string())
                } else if p.rep_low > p.rep_high {
                    Some(format!("rep_low {} exceeds rep_high {}", p.rep_low, p.rep_high))
                } else if p.target_weight.is_some_and(|w| !w.is_finite() || w < 0.0) {
                    Some("target_weight must be a non-negative number".to_string())
                } else {
                    None
                };

                if let Some(problem) = problem {
                    return Err(Error::Plan(format!(
                        "{} on {}: {}",
                        exercise.exercise_id, day.weekday, problem
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn day(&self, weekday: Weekday) -> Option<&PlanDay> {
        self.days.iter().find(|d| d.weekday == weekday)
    }
}

fn exercise(id: &str, name: &str, sets: u32, low: u32, high: u32, weight: f64) -> PlanExercise {
    PlanExercise {
        exercise_id: id.into(),
        name: name.into(),
        prescription: ExercisePrescription::new(sets, low, high, Some(weight)),
    }
}

fn upper_day(weekday: Weekday, title: &str) -> PlanDay {
    PlanDay {
        weekday,
        title: title.into(),
        exercises: vec![
            exercise("barbell_bench_press", "Barbell Bench Press", 4, 8, 12, 135.0),
            exercise("incline_db_press", "Incline DB Press", 3, 8, 12, 50.0),
            exercise("bent_over_row", "Bent-Over Row", 4, 8, 12, 135.0),
            exercise("lat_pulldown", "Lat Pulldown", 3, 10, 12, 120.0),
            exercise("dumbbell_lateral_raise", "Dumbbell Lateral Raise", 3, 12, 15, 25.0),
            exercise("cable_triceps_pushdown", "Cable Triceps Pushdown", 3, 10, 12, 80.0),
            exercise("ez_bar_curl", "EZ-Bar Curl", 3, 10, 12, 70.0),
        ],
    }
}

fn lower_day(weekday: Weekday, title: &str) -> PlanDay {
    PlanDay {
        weekday,
        title: title.into(),
        exercises: vec![
            exercise("barbell_back_squat", "Barbell Back Squat", 4, 8, 12, 185.0),
            exercise("romanian_deadlift", "Romanian Deadlift", 3, 8, 12, 155.0),
            exercise("leg_press", "Leg Press", 3, 10, 12, 270.0),
            exercise("leg_curl", "Leg Curl", 3, 10, 15, 90.0),
            exercise("standing_calf_raise", "Standing Calf Raise", 4, 12, 15, 135.0),
        ],
    }
}

/// Four-day upper/lower split
pub fn default_split() -> WeeklyPlan {
    WeeklyPlan {
        days: vec![
            upper_day(Weekday::Mon, "Upper A"),
            lower_day(Weekday::Tue, "Lower A"),
            upper_day(Weekday::Thu, "Upper B"),
            lower_day(Weekday::Fri, "Lower B"),
        ],
    }
}
