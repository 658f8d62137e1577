use super::station::Station;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One driver-id observation at one station.
/// Built once by the coordinator for a valid request and never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    driver_id: String,
    scan_time: NaiveTime,       // HH:MM:SS
    scan_date: NaiveDate,       // YYYY-MM-DD
    station: Station,
    recorded_at: NaiveDateTime, // when the event was persisted
}

impl ScanEvent {
    /// `driver_id` must already be trimmed and non-empty.
    /// Sub-second precision is dropped so the in-memory event matches its CSV row.
    pub fn new(driver_id: &str, station: Station, scanned_at: NaiveDateTime) -> Self {
        let scan_time = scanned_at
            .time()
            .with_nanosecond(0)
            .unwrap_or_else(|| scanned_at.time());
        let now = Local::now().naive_local();

        Self {
            driver_id: driver_id.to_string(),
            scan_time,
            scan_date: scanned_at.date(),
            station,
            recorded_at: now.with_nanosecond(0).unwrap_or(now),
        }
    }

    pub fn driver_id(&self) -> &str {
        &self.driver_id
    }

    pub fn scan_time(&self) -> NaiveTime {
        self.scan_time
    }

    pub fn scan_date(&self) -> NaiveDate {
        self.scan_date
    }

    pub fn station(&self) -> &Station {
        &self.station
    }

    pub fn recorded_at(&self) -> NaiveDateTime {
        self.recorded_at
    }

    pub fn time_str(&self) -> String {
        self.scan_time.format(TIME_FORMAT).to_string()
    }

    pub fn date_str(&self) -> String {
        self.scan_date.format(DATE_FORMAT).to_string()
    }

    pub fn recorded_at_str(&self) -> String {
        self.recorded_at.format(STAMP_FORMAT).to_string()
    }

    /// Row as written to the local backup file.
    pub fn backup_record(&self) -> [String; 5] {
        [
            self.driver_id.clone(),
            self.time_str(),
            self.date_str(),
            self.station.code().to_string(),
            self.recorded_at_str(),
        ]
    }
}
