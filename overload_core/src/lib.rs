#![forbid(unsafe_code)]

//! Core domain model and business logic for the Overload training log.
//!
//! This crate provides:
//! - Domain types (prescriptions, sets, sessions)
//! - Performance evaluation and the progressive overload decider
//! - Weekly plan and week preview
//! - Persistence (session log, CSV export)
//! - Session lifecycle operations
//! - Training statistics (weekly volume, estimated 1RM)

pub mod types;
pub mod error;
pub mod input;
pub mod config;
pub mod logging;
pub mod increment;
pub mod evaluator;
pub mod progression;
pub mod session_log;
pub mod history;
pub mod plan;
pub mod engine;
pub mod session;
pub mod export;
pub mod stats;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use evaluator::{evaluate, PerformanceEvaluation};
pub use progression::{decide, decide_detailed, Outcome, ProgressionDecision};
pub use session_log::SessionLog;
pub use history::HistoryProvider;
pub use plan::WeeklyPlan;
pub use engine::{preview_week, start_session, DayPreview, PrescribedExercise};
pub use session::{complete_session, log_set, skip_exercise, skip_session};
pub use export::export_sets_csv;
pub use stats::{best_one_rm, summarize, weekly_volume, StatsSummary};
