//! Scan orchestration: validate → log → count → sync → report.
//!
//! Each request runs to completion on the calling thread. Nothing is retried
//! and nothing runs in the background; a slow remote call blocks the scan.

use super::counter::OccurrenceCounter;
use super::ledger::ScanLedger;
use crate::errors::{AppError, AppResult};
use crate::models::alert::Alert;
use crate::models::scan_event::ScanEvent;
use crate::models::station::{Station, StationSet};
use crate::remote::connection::{ConnectionState, RemoteConnection};
use crate::remote::sync::{RemoteSync, SyncOutcome};
use chrono::{Local, NaiveDateTime};

/// Session state. One instance per running session, owned by the coordinator.
pub struct AppState {
    pub stations: StationSet,
    pub ledger: ScanLedger,
    pub remote: RemoteConnection,
    pub break_threshold: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Synced { row: usize },
    Skipped,
    Failed(String),
}

#[derive(Debug)]
pub struct ScanReport {
    pub event: ScanEvent,
    pub count: usize,
    pub alert: Alert,
    pub sync: SyncStatus,
    /// Set when the CSV backup failed; the scan still counts.
    pub backup_warning: Option<AppError>,
    pub status: String,
}

pub struct ScanCoordinator {
    state: AppState,
}

impl ScanCoordinator {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn ledger(&self) -> &ScanLedger {
        &self.state.ledger
    }

    pub fn connect(&mut self) -> &ConnectionState {
        let AppState {
            stations, remote, ..
        } = &mut self.state;
        remote.connect(stations)
    }

    pub fn reconnect(&mut self) -> &ConnectionState {
        let AppState {
            stations, remote, ..
        } = &mut self.state;
        remote.reconnect(stations)
    }

    /// Resolve raw station input against the configured set.
    pub fn resolve_station(&self, code: &str) -> AppResult<Station> {
        self.state
            .stations
            .resolve(code)
            .cloned()
            .ok_or_else(|| AppError::InvalidStation(code.trim().to_string()))
    }

    pub fn scan(&mut self, driver_id: &str, station: &str) -> AppResult<ScanReport> {
        self.scan_at(driver_id, station, Local::now().naive_local())
    }

    /// Process one scan request observed at `at`.
    ///
    /// Only validation errors are returned as `Err`; backup and remote
    /// failures end up in the report.
    pub fn scan_at(
        &mut self,
        driver_id: &str,
        station: &str,
        at: NaiveDateTime,
    ) -> AppResult<ScanReport> {
        //
        // 1. Validate (no side effects on failure)
        //
        let driver_id = driver_id.trim();
        if driver_id.is_empty() {
            return Err(AppError::Validation("Please enter a Driver ID".to_string()));
        }
        let station = self.resolve_station(station)?;

        //
        // 2. Log: memory first, then CSV backup
        //
        let event = ScanEvent::new(driver_id, station.clone(), at);
        let backup_warning = self.state.ledger.record(event.clone()).err();

        //
        // 3. Count and derive the alert
        //
        let count =
            OccurrenceCounter::count(&self.state.ledger, driver_id, event.scan_date(), &station);
        let alert =
            OccurrenceCounter::alert(driver_id, &station, count, self.state.break_threshold);

        //
        // 4. Mirror to the remote tab; only the status text depends on it
        //
        let target = self.state.remote.target_mut(&station);
        let (sync, status) = match RemoteSync::sync(&event, target) {
            Ok(SyncOutcome::Synced { row }) => (
                SyncStatus::Synced { row },
                format!("Uploaded to {station} sheet tab: {driver_id}"),
            ),
            Ok(SyncOutcome::Skipped { station }) => (
                SyncStatus::Skipped,
                AppError::RemoteUnavailable(station.to_string()).to_string(),
            ),
            Err(e) => (
                SyncStatus::Failed(e.to_string()),
                format!("Remote sync failed: {e}"),
            ),
        };

        //
        // 5. Report
        //
        Ok(ScanReport {
            event,
            count,
            alert,
            sync,
            backup_warning,
            status,
        })
    }
}
