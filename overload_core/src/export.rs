//! CSV export of logged sets.
//!
//! Writes one row per logged set of every completed session, for use in
//! spreadsheets and charting tools.

use crate::{Result, SessionStatus, TrainingSession};
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    session_id: String,
    date: String,
    exercise_id: &'a str,
    exercise_name: &'a str,
    set_number: u32,
    reps: u32,
    weight: f64,
    volume: f64,
}

/// Append the logged sets of completed sessions to a CSV file
///
/// Headers are written only when the file is new or empty. The file is
/// synced to disk before returning the number of rows written.
pub fn export_sets_csv(sessions: &[TrainingSession], csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    let mut count = 0;
    for session in sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Completed)
    {
        for exercise in &session.exercises {
            for set in &exercise.sets {
                let Some((reps, weight)) = set.values() else {
                    continue;
                };
                writer.serialize(CsvRow {
                    session_id: session.id.to_string(),
                    date: session.date.to_string(),
                    exercise_id: &exercise.exercise_id,
                    exercise_name: &exercise.name,
                    set_number: set.set_number,
                    reps,
                    weight,
                    volume: f64::from(reps) * weight,
                })?;
                count += 1;
            }
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} sets to {:?}", count, csv_path);
    Ok(count)
}
