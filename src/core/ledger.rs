//! Session ledger: ordered in-memory log plus one append-only CSV backup per station.

use crate::errors::{AppError, AppResult};
use crate::models::scan_event::ScanEvent;
use crate::models::station::Station;
use chrono::NaiveDate;
use csv::WriterBuilder;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

pub const BACKUP_HEADER: [&str; 5] = ["Driver ID", "Scan Time", "Scan Date", "Station", "Saved At"];

type CountKey = (String, NaiveDate, Station);

/// Append-only record of the scans seen in this session.
///
/// The ledger starts empty every session and is never rebuilt from the
/// backup files or the remote store.
pub struct ScanLedger {
    events: Vec<ScanEvent>,
    counts: HashMap<CountKey, usize>,
    backup_dir: PathBuf,
}

impl ScanLedger {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            events: Vec::new(),
            counts: HashMap::new(),
            backup_dir: backup_dir.into(),
        }
    }

    /// Append `event` to memory, then to the station backup file.
    ///
    /// The two writes are not transactional: when the file append fails the
    /// in-memory entry stays and `LocalPersistence` is returned.
    pub fn record(&mut self, event: ScanEvent) -> AppResult<()> {
        let key = (
            event.driver_id().to_string(),
            event.scan_date(),
            event.station().clone(),
        );
        *self.counts.entry(key).or_insert(0) += 1;

        let path = self.backup_path(event.station());
        let row = event.backup_record();
        let station = event.station().code().to_string();
        self.events.push(event);

        append_backup_row(&path, &row).map_err(|e| AppError::LocalPersistence {
            station,
            source: Box::new(e),
        })
    }

    pub fn events(&self) -> &[ScanEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Last `n` events, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &ScanEvent> {
        self.events.iter().rev().take(n)
    }

    pub fn backup_path(&self, station: &Station) -> PathBuf {
        self.backup_dir.join(station.backup_file_name())
    }

    /// Running count kept alongside the log.
    pub(crate) fn indexed_count(&self, driver_id: &str, date: NaiveDate, station: &Station) -> usize {
        self.counts
            .get(&(driver_id.to_string(), date, station.clone()))
            .copied()
            .unwrap_or(0)
    }
}

/// Write one row, creating the file with its header when it is missing or empty.
fn append_backup_row(path: &Path, row: &[String; 5]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let needs_header = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(_) => true,
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);

    if needs_header {
        wtr.write_record(BACKUP_HEADER)?;
    }
    wtr.write_record(row)?;
    wtr.flush()?;

    Ok(())
}
