//! Append-only session log with file locking.
//!
//! Every change to a training session appends a full snapshot of it as one
//! JSON line; when reading, the last line for an id wins. Appends hold an
//! exclusive lock on the log, reads a shared one. Read-then-write sequences
//! go through [`SessionLog::transaction`], which serializes writers on a
//! sidecar lock file for the whole sequence.

use crate::{Error, Result, TrainingSession};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// JSONL-backed store of training sessions
#[derive(Clone, Debug)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    /// Create a session log for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn append(&self, session: &TrainingSession) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(session)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.sync_data()?;
        file.unlock()?;

        tracing::debug!("Appended session {} to log", session.id);
        Ok(())
    }

    /// Current state of every session, newest date first
    ///
    /// A missing log is an empty history. Lines that fail to parse are
    /// skipped with a warning.
    pub fn load(&self) -> Result<Vec<TrainingSession>> {
        let records = read_records(&self.path)?;

        let mut index: HashMap<Uuid, usize> = HashMap::new();
        let mut sessions: Vec<TrainingSession> = Vec::new();
        for session in records {
            match index.get(&session.id) {
                Some(&i) => sessions[i] = session,
                None => {
                    index.insert(session.id, sessions.len());
                    sessions.push(session);
                }
            }
        }

        sessions.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.started_at.cmp(&a.started_at))
        });

        Ok(sessions)
    }

    pub fn find(&self, id: Uuid) -> Result<Option<TrainingSession>> {
        Ok(self.load()?.into_iter().find(|s| s.id == id))
    }

    /// Run `f` against a consistent snapshot while holding the writer lock
    ///
    /// No other transaction can read or write between the snapshot taken
    /// here and the writes `f` makes.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T>,
    {
        self.ensure_parent_dir()?;
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;

        let result = self.load().and_then(|sessions| {
            let mut txn = Transaction {
                log: self,
                sessions,
            };
            f(&mut txn)
        });

        lock.unlock()?;
        result
    }

    /// Rewrite the log with one line per session
    ///
    /// Writes to a temp file in the same directory, syncs it, then renames it
    /// over the log. Returns the number of sessions kept.
    pub fn compact(&self) -> Result<usize> {
        self.transaction(|txn| {
            let log = txn.log;
            let parent = log.path.parent().ok_or_else(|| {
                Error::Other(format!("session log {:?} has no parent", log.path))
            })?;

            let temp = NamedTempFile::new_in(parent)?;
            temp.as_file().lock_exclusive()?;
            {
                let mut writer = std::io::BufWriter::new(temp.as_file());
                // Oldest first so that appends keep their natural order
                for session in txn.sessions.iter().rev() {
                    writer.write_all(serde_json::to_string(session)?.as_bytes())?;
                    writer.write_all(b"\n")?;
                }
                writer.flush()?;
            }
            temp.as_file().sync_all()?;
            temp.as_file().unlock()?;

            temp.persist(&log.path).map_err(|e| Error::Io(e.error))?;

            tracing::info!("Compacted session log to {} sessions", txn.sessions.len());
            Ok(txn.sessions.len())
        })
    }
}

/// Snapshot of the log held under the writer lock
pub struct Transaction<'a> {
    log: &'a SessionLog,
    sessions: Vec<TrainingSession>,
}

impl Transaction<'_> {
    pub fn sessions(&self) -> &[TrainingSession] {
        &self.sessions
    }

    pub fn find(&self, id: Uuid) -> Option<&TrainingSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn find_by_date(&self, date: chrono::NaiveDate) -> Option<&TrainingSession> {
        self.sessions.iter().find(|s| s.date == date)
    }

    /// Persist a session and make it visible to the rest of the transaction
    pub fn write(&mut self, session: TrainingSession) -> Result<()> {
        self.log.append(&session)?;
        match self.sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => *existing = session,
            None => self.sessions.insert(0, session),
        }
        Ok(())
    }
}

/// Read every record in the log in file order
fn read_records(path: &Path) -> Result<Vec<TrainingSession>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut sessions = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<TrainingSession>(&line) {
            Ok(session) => sessions.push(session),
            Err(e) => {
                tracing::warn!("Failed to parse session at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} session records from log", sessions.len());
    Ok(sessions)
}
