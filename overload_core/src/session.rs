//! Session lifecycle: logging sets, skipping, completing.
//!
//! Each operation is one session-log transaction that reads the current
//! session, changes it and appends the new snapshot.

use crate::{Error, Result, SessionLog, SessionStatus, SetRecord, TrainingSession};
use chrono::Utc;
use uuid::Uuid;

/// Load a session, apply `f`, and write it back
fn update_session<F>(log: &SessionLog, session_id: Uuid, f: F) -> Result<TrainingSession>
where
    F: FnOnce(&mut TrainingSession) -> Result<()>,
{
    log.transaction(|txn| {
        let mut session = txn
            .find(session_id)
            .cloned()
            .ok_or_else(|| Error::Session(format!("Unknown session {}", session_id)))?;
        f(&mut session)?;
        txn.write(session.clone())?;
        Ok(session)
    })
}

/// Record reps and weight for one set
///
/// `None` clears a value. Logging into a skipped exercise un-skips it.
pub fn log_set(
    log: &SessionLog,
    session_id: Uuid,
    exercise_id: &str,
    set_number: u32,
    reps: Option<u32>,
    weight: Option<f64>,
) -> Result<TrainingSession> {
    update_session(log, session_id, |session| {
        let exercise = session.exercise_mut(exercise_id).ok_or_else(|| {
            Error::Session(format!("Session {} has no exercise {}", session_id, exercise_id))
        })?;
        let set = exercise.set_mut(set_number).ok_or_else(|| {
            Error::Session(format!("{} has no set {}", exercise_id, set_number))
        })?;

        *set = SetRecord {
            set_number,
            actual_reps: reps,
            actual_weight: weight.and_then(crate::input::normalize_weight),
        };
        exercise.skipped = false;

        tracing::info!(
            "Logged {} set {}: {:?} x {:?}",
            exercise_id,
            set_number,
            weight,
            reps
        );
        Ok(())
    })
}

/// Skip one exercise, clearing anything logged for it
pub fn skip_exercise(log: &SessionLog, session_id: Uuid, exercise_id: &str) -> Result<TrainingSession> {
    update_session(log, session_id, |session| {
        let exercise = session.exercise_mut(exercise_id).ok_or_else(|| {
            Error::Session(format!("Session {} has no exercise {}", session_id, exercise_id))
        })?;
        exercise.skip();
        tracing::info!("Skipped {} in session {}", exercise_id, session_id);
        Ok(())
    })
}

/// Mark a session completed; only completed sessions feed progression
pub fn complete_session(
    log: &SessionLog,
    session_id: Uuid,
    note: Option<String>,
) -> Result<TrainingSession> {
    update_session(log, session_id, |session| {
        session.status = SessionStatus::Completed;
        session.completed_at = Some(Utc::now());
        session.note = note;
        tracing::info!("Completed session {}", session_id);
        Ok(())
    })
}

/// Skip the whole day
pub fn skip_session(log: &SessionLog, session_id: Uuid) -> Result<TrainingSession> {
    update_session(log, session_id, |session| {
        session.status = SessionStatus::Skipped;
        session.completed_at = None;
        for exercise in &mut session.exercises {
            exercise.skip();
        }
        tracing::info!("Skipped session {}", session_id);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::start_session;
    use crate::plan::default_split;
    use chrono::NaiveDate;

    fn started(log: &SessionLog) -> TrainingSession {
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        start_session(log, &default_split(), monday, 3).unwrap()
    }

    #[test]
    fn test_log_set_updates_one_row() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(temp_dir.path().join("sessions.jsonl"));
        let session = started(&log);

        let updated = log_set(
            &log,
            session.id,
            "barbell_bench_press",
            2,
            Some(10),
            Some(135.0),
        )
        .unwrap();

        let bench = updated.exercise("barbell_bench_press").unwrap();
        assert_eq!(bench.sets[1].values(), Some((10, 135.0)));
        assert!(!bench.sets[0].is_valid());

        let reloaded = log.find(session.id).unwrap().unwrap();
        assert_eq!(reloaded, updated);
    }

    #[test]
    fn test_log_set_rejects_unknown_targets() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(temp_dir.path().join("sessions.jsonl"));
        let session = started(&log);

        let unknown_session = log_set(&log, Uuid::new_v4(), "barbell_bench_press", 1, None, None);
        assert!(matches!(unknown_session, Err(Error::Session(_))));

        let unknown_exercise = log_set(&log, session.id, "curl_machine", 1, None, None);
        assert!(matches!(unknown_exercise, Err(Error::Session(_))));

        let unknown_set = log_set(&log, session.id, "barbell_bench_press", 9, Some(5), Some(1.0));
        assert!(matches!(unknown_set, Err(Error::Session(_))));
    }

    #[test]
    fn test_negative_weight_is_not_logged() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(temp_dir.path().join("sessions.jsonl"));
        let session = started(&log);

        // Monday has no leg press in the default split
        let err = log_set(&log, session.id, "leg_press", 1, Some(10), Some(20.0)).unwrap_err();
        assert!(matches!(err, Error::Session(_)));

        let updated = log_set(&log, session.id, "ez_bar_curl", 1, Some(10), Some(-20.0)).unwrap();
        let curl = updated.exercise("ez_bar_curl").unwrap();
        assert_eq!(curl.sets[0].actual_weight, None);
    }

    #[test]
    fn test_skip_exercise_clears_sets() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(temp_dir.path().join("sessions.jsonl"));
        let session = started(&log);

        log_set(&log, session.id, "ez_bar_curl", 1, Some(12), Some(70.0)).unwrap();
        let updated = skip_exercise(&log, session.id, "ez_bar_curl").unwrap();

        let curl = updated.exercise("ez_bar_curl").unwrap();
        assert!(curl.skipped);
        assert!(curl.sets.iter().all(|s| !s.is_valid()));
    }

    #[test]
    fn test_complete_session() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(temp_dir.path().join("sessions.jsonl"));
        let session = started(&log);

        let done = complete_session(&log, session.id, Some("felt strong".into())).unwrap();

        assert_eq!(done.status, SessionStatus::Completed);
        assert!(done.completed_at.is_some());
        assert_eq!(done.note.as_deref(), Some("felt strong"));
    }

    #[test]
    fn test_skip_session_clears_everything() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(temp_dir.path().join("sessions.jsonl"));
        let session = started(&log);

        log_set(&log, session.id, "barbell_bench_press", 1, Some(12), Some(135.0)).unwrap();
        let skipped = skip_session(&log, session.id).unwrap();

        assert_eq!(skipped.status, SessionStatus::Skipped);
        assert!(skipped.completed_at.is_none());
        assert!(skipped.exercises.iter().all(|e| e.skipped));
        assert!(skipped
            .exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .all(|s| !s.is_valid()));
    }
}
