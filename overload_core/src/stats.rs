//! Training statistics over completed sessions.
//!
//! Only logged sets of completed sessions count, and never sets of an
//! exercise that was skipped. Date bounds are inclusive.

use crate::increment::round_to_two_decimals;
use crate::{SessionStatus, TrainingSession};
use chrono::{Duration, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

/// Days covered when no start date is given
pub const DEFAULT_WINDOW_DAYS: i64 = 84;

/// Exercises that get an estimated 1RM series
pub const SERIES_EXERCISE_LIMIT: usize = 3;

/// Total volume (weight × reps) of one ISO week
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeeklyVolume {
    pub week_start: NaiveDate,
    pub total_volume: f64,
}

/// Best estimated one-rep max of one exercise
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExerciseOneRm {
    pub exercise_id: String,
    pub exercise_name: String,
    pub best_one_rm: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OneRmPoint {
    pub date: NaiveDate,
    pub estimated_one_rm: f64,
}

/// Estimated one-rep max per session date for one exercise
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OneRmSeries {
    pub exercise_id: String,
    pub exercise_name: String,
    pub points: Vec<OneRmPoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatsSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub weekly_volume: Vec<WeeklyVolume>,
    pub one_rm_by_exercise: Vec<ExerciseOneRm>,
    pub one_rm_series: Vec<OneRmSeries>,
}

/// Epley estimate: `weight × (1 + reps / 30)`
pub fn epley_one_rm(weight: f64, reps: u32) -> f64 {
    weight * (1.0 + f64::from(reps) / 30.0)
}

/// Default range: the last [`DEFAULT_WINDOW_DAYS`] days up to `today`
pub fn default_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(DEFAULT_WINDOW_DAYS), today)
}

struct CountedSet<'a> {
    date: NaiveDate,
    exercise_id: &'a str,
    exercise_name: &'a str,
    reps: u32,
    weight: f64,
}

fn counted_sets<'a>(
    sessions: &'a [TrainingSession],
    from: NaiveDate,
    to: NaiveDate,
) -> impl Iterator<Item = CountedSet<'a>> + 'a {
    sessions
        .iter()
        .filter(move |s| s.status == SessionStatus::Completed && s.date >= from && s.date <= to)
        .flat_map(|session| {
            session
                .exercises
                .iter()
                .filter(|e| !e.skipped)
                .flat_map(move |exercise| {
                    exercise.sets.iter().filter_map(move |set| {
                        let (reps, weight) = set.values()?;
                        Some(CountedSet {
                            date: session.date,
                            exercise_id: &exercise.exercise_id,
                            exercise_name: &exercise.name,
                            reps,
                            weight,
                        })
                    })
                })
        })
}

/// Volume per ISO week (weeks start on Monday), oldest week first
///
/// Weeks without any counted set are left out.
pub fn weekly_volume(sessions: &[TrainingSession], from: NaiveDate, to: NaiveDate) -> Vec<WeeklyVolume> {
    let mut weeks: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for set in counted_sets(sessions, from, to) {
        let week_start = set.date.week(Weekday::Mon).first_day();
        *weeks.entry(week_start).or_insert(0.0) += set.weight * f64::from(set.reps);
    }

    weeks
        .into_iter()
        .map(|(week_start, total_volume)| WeeklyVolume {
            week_start,
            total_volume,
        })
        .collect()
}

/// Best Epley estimate per exercise, highest first
pub fn best_one_rm(sessions: &[TrainingSession], from: NaiveDate, to: NaiveDate) -> Vec<ExerciseOneRm> {
    let mut best: BTreeMap<&str, ExerciseOneRm> = BTreeMap::new();
    for set in counted_sets(sessions, from, to) {
        let estimate = epley_one_rm(set.weight, set.reps);
        let entry = best.entry(set.exercise_id).or_insert_with(|| ExerciseOneRm {
            exercise_id: set.exercise_id.to_string(),
            exercise_name: set.exercise_name.to_string(),
            best_one_rm: estimate,
        });
        if estimate > entry.best_one_rm {
            entry.best_one_rm = estimate;
        }
    }

    let mut result: Vec<ExerciseOneRm> = best
        .into_values()
        .map(|mut e| {
            e.best_one_rm = round_to_two_decimals(e.best_one_rm);
            e
        })
        .collect();
    result.sort_by(|a, b| b.best_one_rm.total_cmp(&a.best_one_rm));
    result
}

/// Per-date 1RM series for the `limit` exercises with the most logged sets
pub fn one_rm_series(
    sessions: &[TrainingSession],
    from: NaiveDate,
    to: NaiveDate,
    limit: usize,
) -> Vec<OneRmSeries> {
    let mut by_exercise: BTreeMap<&str, (&str, usize, BTreeMap<NaiveDate, f64>)> = BTreeMap::new();
    for set in counted_sets(sessions, from, to) {
        let (_, count, points) = by_exercise
            .entry(set.exercise_id)
            .or_insert_with(|| (set.exercise_name, 0, BTreeMap::new()));
        *count += 1;
        let estimate = epley_one_rm(set.weight, set.reps);
        let best = points.entry(set.date).or_insert(estimate);
        if estimate > *best {
            *best = estimate;
        }
    }

    let mut ranked: Vec<_> = by_exercise.into_iter().collect();
    // Stable sort keeps exercise id order among equal counts
    ranked.sort_by(|a, b| b.1 .1.cmp(&a.1 .1));

    ranked
        .into_iter()
        .take(limit)
        .map(|(exercise_id, (exercise_name, _, points))| OneRmSeries {
            exercise_id: exercise_id.to_string(),
            exercise_name: exercise_name.to_string(),
            points: points
                .into_iter()
                .map(|(date, estimate)| OneRmPoint {
                    date,
                    estimated_one_rm: round_to_two_decimals(estimate),
                })
                .collect(),
        })
        .collect()
}

/// Everything the `stats` command reports for a date range
pub fn summarize(sessions: &[TrainingSession], from: NaiveDate, to: NaiveDate) -> StatsSummary {
    let summary = StatsSummary {
        from,
        to,
        weekly_volume: weekly_volume(sessions, from, to),
        one_rm_by_exercise: best_one_rm(sessions, from, to),
        one_rm_series: one_rm_series(sessions, from, to, SERIES_EXERCISE_LIMIT),
    };
    tracing::debug!(
        "Stats {}..={}: {} weeks, {} exercises",
        from,
        to,
        summary.weekly_volume.len(),
        summary.one_rm_by_exercise.len()
    );
    summary
}
