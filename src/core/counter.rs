//! Same-day, same-station occurrence counting and the break-reminder rule.

use super::ledger::ScanLedger;
use crate::models::alert::{Alert, AlertColor, AlertState};
use crate::models::station::Station;
use chrono::NaiveDate;

pub const DEFAULT_BREAK_THRESHOLD: usize = 5;

pub struct OccurrenceCounter;

impl OccurrenceCounter {
    /// Number of ledger events for this driver, date and station,
    /// including the one just recorded.
    pub fn count(ledger: &ScanLedger, driver_id: &str, date: NaiveDate, station: &Station) -> usize {
        ledger.indexed_count(driver_id, date, station)
    }

    /// Reference implementation: linear scan over the whole ledger.
    /// Always agrees with `count`.
    pub fn count_by_scan(
        ledger: &ScanLedger,
        driver_id: &str,
        date: NaiveDate,
        station: &Station,
    ) -> usize {
        ledger
            .events()
            .iter()
            .filter(|e| e.driver_id() == driver_id && e.scan_date() == date && e.station() == station)
            .count()
    }

    /// `count > threshold` → break due; the boundary value itself is still normal.
    pub fn alert(driver_id: &str, station: &Station, count: usize, threshold: usize) -> Alert {
        if count > threshold {
            Alert {
                state: AlertState::BreakDue,
                message: format!(
                    "Driver {} scanned {} times at {} - Take break after this delivery",
                    driver_id, count, station
                ),
                color: AlertColor::Yellow,
            }
        } else {
            Alert {
                state: AlertState::Normal,
                message: format!(
                    "Driver {} scanned {} times today at {}",
                    driver_id, count, station
                ),
                color: AlertColor::LightGreen,
            }
        }
    }
}
