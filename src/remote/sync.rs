//! Mirror one scan event into its station's remote tab.
//!
//! Row placement reads the first column and writes below the last filled
//! cell. Two writers on the same tab can pick the same row and overwrite
//! each other: the algorithm assumes one active writer per tab. A hardened
//! store would hand out rows from its own sequence or use an atomic append.

use super::RemoteTarget;
use super::range::CellRange;
use crate::errors::{AppError, AppResult};
use crate::models::scan_event::{STAMP_FORMAT, ScanEvent};
use crate::models::station::Station;
use chrono::Local;

pub const REMOTE_HEADER: [&str; 5] = [
    "Driver ID",
    "Scan Time",
    "Scan Date",
    "Station",
    "Uploaded At",
];

/// Row 1 holds the header.
const FIRST_DATA_ROW: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Written at this 1-based row.
    Synced { row: usize },
    /// The station has no usable remote tab.
    Skipped { station: Station },
}

pub struct RemoteSync;

impl RemoteSync {
    /// Push `event` to `target`.
    ///
    /// A missing target is not an error. Any failure talking to the store is
    /// returned as `AppError::RemoteSync`; the caller keeps going.
    pub fn sync<T>(event: &ScanEvent, target: Option<&mut T>) -> AppResult<SyncOutcome>
    where
        T: RemoteTarget + ?Sized,
    {
        let Some(target) = target else {
            return Ok(SyncOutcome::Skipped {
                station: event.station().clone(),
            });
        };

        Self::push(event, target)
            .map(|row| SyncOutcome::Synced { row })
            .map_err(|e| match e {
                AppError::RemoteSync(_) => e,
                other => AppError::RemoteSync(other.to_string()),
            })
    }

    /// Non-empty first-column values plus one, never above the header row.
    pub fn next_row(first_column: &[String]) -> usize {
        let filled = first_column
            .iter()
            .filter(|v| !v.trim().is_empty())
            .count();
        (filled + 1).max(FIRST_DATA_ROW)
    }

    fn push<T>(event: &ScanEvent, target: &mut T) -> AppResult<usize>
    where
        T: RemoteTarget + ?Sized,
    {
        let existing = target.get_all_values()?;
        if existing.is_empty() {
            let header: Vec<String> = REMOTE_HEADER.iter().map(|h| h.to_string()).collect();
            target.append_row(&header)?;
        }

        let first_column = target.col_values(1)?;
        let row = Self::next_row(&first_column);

        let values = vec![vec![
            event.driver_id().to_string(),
            event.time_str(),
            event.date_str(),
            event.station().code().to_string(),
            Local::now().format(STAMP_FORMAT).to_string(),
        ]];

        target.update(&CellRange::row_span(row, 1, REMOTE_HEADER.len()), &values)?;
        Ok(row)
    }
}
