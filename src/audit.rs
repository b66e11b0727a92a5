//! Append-only audit log
//!
//! One CSV file per run, named with the run's start timestamp, one row per
//! completed account. The orchestrator only sees the [`Recorder`] trait so
//! tests can capture records in memory.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::error::Result;
use crate::types::AccountRecord;

/// Sink for completed account records
pub trait Recorder {
    fn record(&mut self, record: &AccountRecord) -> Result<()>;
}

/// CSV audit log for one run
pub struct AuditLog {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl AuditLog {
    /// Create the log file (and its directory, if needed) and write the
    /// header row.
    pub fn create(dir: &Path, started: DateTime<Local>) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let name = format!("log_file {}.csv", started.format("%m-%d-%y %H.%M.%S"));
        let path = dir.join(name);

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(["user", "whmcs_href", "notif_status"])?;
        writer.flush()?;

        Ok(Self { writer, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Recorder for AuditLog {
    fn record(&mut self, record: &AccountRecord) -> Result<()> {
        self.writer.write_record([
            record.name.as_str(),
            record.whmcs_href.as_str(),
            record.notif_status_field().as_str(),
        ])?;
        // flush per row so a killed run keeps everything written so far
        self.writer.flush()?;
        debug!(account = %record.name, "audit row written");
        Ok(())
    }
}

/// In-memory recorder for tests
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryRecorder {
    pub records: Vec<AccountRecord>,
}

#[cfg(test)]
impl Recorder for MemoryRecorder {
    fn record(&mut self, record: &AccountRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
