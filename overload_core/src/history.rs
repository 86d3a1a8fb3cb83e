//! Progression history lookup.
//!
//! The decider needs the most recent completed sessions that trained one
//! exercise, newest first. [`HistoryProvider`] is the seam between the engine
//! and whatever stores sessions.

use crate::progression::HISTORY_WINDOW;
use crate::{Result, SessionLog, SessionPerformance, SessionStatus, TrainingSession};
use std::cmp::Ordering;

/// Source of completed-session history for the decider
pub trait HistoryProvider {
    /// Up to `limit` completed sessions for the exercise, most recent first
    ///
    /// `limit` is clamped to the decider's window.
    fn recent_completed(&self, exercise_id: &str, limit: usize) -> Result<Vec<SessionPerformance>>;
}

impl HistoryProvider for [TrainingSession] {
    fn recent_completed(&self, exercise_id: &str, limit: usize) -> Result<Vec<SessionPerformance>> {
        Ok(recent_completed_in(self, exercise_id, limit))
    }
}

impl HistoryProvider for SessionLog {
    fn recent_completed(&self, exercise_id: &str, limit: usize) -> Result<Vec<SessionPerformance>> {
        let sessions = self.load()?;
        Ok(recent_completed_in(&sessions, exercise_id, limit))
    }
}

/// Newest session first; same-day sessions by start time
fn newest_first(a: &TrainingSession, b: &TrainingSession) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.started_at.cmp(&a.started_at))
}

/// Select the history window for one exercise from a snapshot of sessions
///
/// Skipped exercises inside completed sessions stay in the window: their sets
/// carry no values, so the decider sees them as gaps.
pub fn recent_completed_in(
    sessions: &[TrainingSession],
    exercise_id: &str,
    limit: usize,
) -> Vec<SessionPerformance> {
    let mut matching: Vec<&TrainingSession> = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Completed)
        .filter(|s| s.exercise(exercise_id).is_some())
        .collect();

    matching.sort_by(|a, b| newest_first(a, b));

    let history: Vec<SessionPerformance> = matching
        .into_iter()
        .take(limit.min(HISTORY_WINDOW))
        .filter_map(|s| s.performance_for(exercise_id))
        .collect();

    tracing::debug!(
        "Found {} completed sessions for {}",
        history.len(),
        exercise_id
    );

    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExercisePrescription, SessionExercise, SetRecord};
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn create_test_session(
        date: &str,
        status: SessionStatus,
        exercise_id: &str,
        weight: f64,
    ) -> TrainingSession {
        TrainingSession {
            id: Uuid::new_v4(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            status,
            started_at: None,
            completed_at: None,
            note: None,
            exercises: vec![SessionExercise {
                exercise_id: exercise_id.into(),
                name: exercise_id.into(),
                order_index: 0,
                prescription: ExercisePrescription::new(1, 8, 12, Some(weight)),
                skipped: false,
                sets: vec![SetRecord::logged(1, 10, weight)],
            }],
        }
    }

    fn top_weight(performance: &SessionPerformance) -> f64 {
        performance.sets[0].actual_weight.unwrap()
    }

    #[test]
    fn test_only_completed_sessions_for_exercise() {
        let sessions = vec![
            create_test_session("2024-03-08", SessionStatus::InProgress, "bench", 140.0),
            create_test_session("2024-03-06", SessionStatus::Completed, "squat", 185.0),
            create_test_session("2024-03-04", SessionStatus::Completed, "bench", 135.0),
            create_test_session("2024-03-01", SessionStatus::Skipped, "bench", 130.0),
        ];

        let history = sessions.recent_completed("bench", 3).unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(top_weight(&history[0]), 135.0);
    }

    #[test]
    fn test_newest_first_and_clamped() {
        let sessions = vec![
            create_test_session("2024-03-01", SessionStatus::Completed, "bench", 120.0),
            create_test_session("2024-03-11", SessionStatus::Completed, "bench", 135.0),
            create_test_session("2024-03-04", SessionStatus::Completed, "bench", 125.0),
            create_test_session("2024-03-08", SessionStatus::Completed, "bench", 130.0),
        ];

        let history = recent_completed_in(&sessions, "bench", 10);

        let weights: Vec<f64> = history.iter().map(top_weight).collect();
        assert_eq!(weights, vec![135.0, 130.0, 125.0]);
    }

    #[test]
    fn test_same_day_ordered_by_start_time() {
        let mut morning = create_test_session("2024-03-04", SessionStatus::Completed, "bench", 130.0);
        morning.started_at = Some(Utc.with_ymd_and_hms(2024, 3, 4, 7, 0, 0).unwrap());
        let mut evening = create_test_session("2024-03-04", SessionStatus::Completed, "bench", 135.0);
        evening.started_at = Some(Utc.with_ymd_and_hms(2024, 3, 4, 19, 0, 0).unwrap());

        let history = recent_completed_in(&[morning, evening], "bench", 1);

        assert_eq!(top_weight(&history[0]), 135.0);
    }

    #[test]
    fn test_skipped_exercise_is_a_gap() {
        let mut session = create_test_session("2024-03-04", SessionStatus::Completed, "bench", 135.0);
        session.exercises[0].skip();

        let history = recent_completed_in(&[session], "bench", 3);

        assert_eq!(history.len(), 1);
        assert!(history[0].sets.iter().all(|s| !s.is_valid()));
    }

    #[test]
    fn test_session_log_provider() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(temp_dir.path().join("sessions.jsonl"));
        log.transaction(|txn| {
            txn.write(create_test_session("2024-03-04", SessionStatus::Completed, "bench", 135.0))
        })
        .unwrap();

        let history = log.recent_completed("bench", 3).unwrap();
        assert_eq!(history.len(), 1);
        assert!(log.recent_completed("squat", 3).unwrap().is_empty());
    }
}
