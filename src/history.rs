// Append-only CSV log of finished sessions.

use crate::app_dirs::AppDirs;
use crate::error::Result;
use crate::session::Session;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub date: DateTime<Local>,
    pub time_limit_secs: u64,
    pub elapsed_secs: f64,
    pub wpm: u32,
    pub accuracy: u32,
    pub raw_chars: u64,
    pub errors: u64,
    pub consistency: f64,
}

impl HistoryRecord {
    /// Record for a finished session; `None` while it is still going
    pub fn from_session(session: &Session) -> Option<Self> {
        let results = session.final_results()?;
        Some(Self {
            date: Local::now(),
            time_limit_secs: session.time_limit_secs(),
            elapsed_secs: results.elapsed_secs,
            wpm: results.wpm,
            accuracy: results.accuracy,
            raw_chars: results.raw_chars,
            errors: results.errors,
            consistency: results.consistency,
        })
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{}  {:>3} wpm  {:>3}% acc  {:>4} raw  {:>3} err  {:>3}s",
            self.date.format("%Y-%m-%d %H:%M"),
            self.wpm,
            self.accuracy,
            self.raw_chars,
            self.errors,
            self.time_limit_secs,
        )
    }
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new() -> Option<Self> {
        AppDirs::history_path().map(Self::with_path)
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &HistoryRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // If the log doesn't exist yet, we need to emit a header
        let needs_header = fs::metadata(&self.path).map_or(true, |m| m.len() == 0);

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    /// Every record in the log, oldest first
    pub fn load(&self) -> Result<Vec<HistoryRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<HistoryRecord>, csv::Error>>()?;
        Ok(records)
    }

    /// The last `n` records, oldest first
    pub fn recent(&self, n: usize) -> Result<Vec<HistoryRecord>> {
        let mut records = self.load()?;
        let skip = records.len().saturating_sub(n);
        Ok(records.split_off(skip))
    }
}
