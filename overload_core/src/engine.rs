//! Prescription engine for upcoming sessions.
//!
//! Two callers need next target weights:
//! - Starting a session writes them into the new session, so the history
//!   read and the write happen in one session-log transaction
//! - The week preview only displays them and reads history without locking
//!
//! Both go through [`crate::progression::decide_detailed`].

use crate::history::{recent_completed_in, HistoryProvider};
use crate::plan::{PlanExercise, WeeklyPlan};
use crate::progression::{decide_detailed, Outcome};
use crate::{
    ExercisePrescription, Result, SessionExercise, SessionLog, SessionStatus, SetRecord,
    TrainingSession,
};
use chrono::{Datelike, NaiveDate, Utc, Weekday};
use serde::Serialize;
use uuid::Uuid;

/// An exercise with the weight the engine would prescribe next
#[derive(Clone, Debug, Serialize)]
pub struct PrescribedExercise {
    pub exercise_id: String,
    pub name: String,
    pub prescription: ExercisePrescription,
    pub outcome: Outcome,
}

/// One day of the projected week
#[derive(Clone, Debug, Serialize)]
pub struct DayPreview {
    pub weekday: Weekday,
    pub title: String,
    pub exercises: Vec<PrescribedExercise>,
}

impl DayPreview {
    pub fn is_rest(&self) -> bool {
        self.exercises.is_empty()
    }
}

/// Apply the decider to one plan slot
pub fn prescribe_exercise<H>(
    plan_exercise: &PlanExercise,
    history: &H,
    window: usize,
) -> Result<PrescribedExercise>
where
    H: HistoryProvider + ?Sized,
{
    let recent = history.recent_completed(&plan_exercise.exercise_id, window)?;
    let decision = decide_detailed(&plan_exercise.prescription, &recent);

    Ok(PrescribedExercise {
        exercise_id: plan_exercise.exercise_id.clone(),
        name: plan_exercise.name.clone(),
        prescription: plan_exercise
            .prescription
            .with_target_weight(decision.target_weight),
        outcome: decision.outcome,
    })
}

/// Project the whole week, Monday first, without persisting anything
///
/// Days without training are titled "Rest".
pub fn preview_week<H>(plan: &WeeklyPlan, history: &H, window: usize) -> Result<Vec<DayPreview>>
where
    H: HistoryProvider + ?Sized,
{
    let mut week = Vec::with_capacity(7);
    let mut weekday = Weekday::Mon;

    for _ in 0..7 {
        let preview = match plan.day(weekday) {
            Some(day) => DayPreview {
                weekday,
                title: day.title.clone(),
                exercises: day
                    .exercises
                    .iter()
                    .map(|e| prescribe_exercise(e, history, window))
                    .collect::<Result<Vec<_>>>()?,
            },
            None => DayPreview {
                weekday,
                title: "Rest".into(),
                exercises: vec![],
            },
        };
        week.push(preview);
        weekday = weekday.succ();
    }

    Ok(week)
}

/// Start the session for `date`, or return the one already started
///
/// Each planned exercise gets its target weight from the decider and one
/// empty set row per prescribed set. The history snapshot and the write share
/// one session-log transaction, so sets logged concurrently cannot land
/// between them.
pub fn start_session(
    log: &SessionLog,
    plan: &WeeklyPlan,
    date: NaiveDate,
    window: usize,
) -> Result<TrainingSession> {
    log.transaction(|txn| {
        if let Some(existing) = txn.find_by_date(date) {
            tracing::info!("Session for {} already exists ({})", date, existing.id);
            return Ok(existing.clone());
        }

        let weekday = date.weekday();
        let planned = plan.day(weekday).map(|d| d.exercises.as_slice()).unwrap_or(&[]);
        if planned.is_empty() {
            tracing::info!("No exercises planned for {}, starting an empty session", weekday);
        }

        let mut exercises = Vec::with_capacity(planned.len());
        for (order_index, plan_exercise) in planned.iter().enumerate() {
            let recent =
                recent_completed_in(txn.sessions(), &plan_exercise.exercise_id, window);
            let decision = decide_detailed(&plan_exercise.prescription, &recent);

            tracing::info!(
                "{}: target {:?} ({:?})",
                plan_exercise.name,
                decision.target_weight,
                decision.outcome
            );

            let prescription = plan_exercise
                .prescription
                .with_target_weight(decision.target_weight);
            let sets = (1..=prescription.set_count).map(SetRecord::empty).collect();

            exercises.push(SessionExercise {
                exercise_id: plan_exercise.exercise_id.clone(),
                name: plan_exercise.name.clone(),
                order_index: order_index as u32,
                prescription,
                skipped: false,
                sets,
            });
        }

        let session = TrainingSession {
            id: Uuid::new_v4(),
            date,
            status: SessionStatus::InProgress,
            started_at: Some(Utc::now()),
            completed_at: None,
            note: None,
            exercises,
        };

        txn.write(session.clone())?;
        tracing::info!("Started session {} for {}", session.id, date);
        Ok(session)
    })
}
