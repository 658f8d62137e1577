mod common;
use common::{MemoryProvider, MemoryTab, TabMode, at, coordinator, line_count, temp_dir};
use dascan::core::coordinator::SyncStatus;
use dascan::errors::AppError;
use dascan::models::alert::AlertState;
use dascan::remote::RemoteTarget;
use std::fs;

#[test]
fn test_six_scans_trigger_break_reminder() {
    let dir = temp_dir("coord_six_scans");
    let provider = MemoryProvider::default();
    let mut c = coordinator(&dir, &provider);

    let mut last = None;
    for n in 1..=6 {
        let report = c
            .scan_at("D123", "DUD2", at("2025-10-10", &format!("0{n}:00:00")))
            .expect("scan");
        assert_eq!(report.count, n);
        assert_eq!(report.sync, SyncStatus::Synced { row: n + 1 });
        if n <= 5 {
            assert_eq!(report.alert.state, AlertState::Normal);
        }
        last = Some(report);
    }

    let report = last.expect("six reports");
    assert_eq!(report.alert.state, AlertState::BreakDue);
    assert!(
        report
            .alert
            .message
            .contains("scanned 6 times at DUD2 - Take break after this delivery")
    );
    assert_eq!(report.status, "Uploaded to DUD2 sheet tab: D123");
    assert!(report.backup_warning.is_none());

    assert_eq!(line_count(&dir.join("DUD2_scans.csv")), 7);

    let mut tab = MemoryTab::with_grid("DUD2", provider.grid("DUD2"));
    assert_eq!(tab.get_all_values().expect("values").len(), 7);
}

#[test]
fn test_blank_driver_id_has_no_side_effects() {
    let dir = temp_dir("coord_blank_id");
    let provider = MemoryProvider::default();
    let mut c = coordinator(&dir, &provider);
    let calls_before = provider.grid("DUD2").borrow().calls;

    for input in ["", "   ", "\t"] {
        let err = c.scan(input, "DUD2").expect_err("blank id rejected");
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "Please enter a Driver ID");
    }

    assert!(c.ledger().is_empty());
    assert!(!dir.join("DUD2_scans.csv").exists());
    assert_eq!(provider.grid("DUD2").borrow().calls, calls_before);
}

#[test]
fn test_driver_id_is_trimmed_and_station_resolved() {
    let dir = temp_dir("coord_trim");
    let provider = MemoryProvider::default();
    let mut c = coordinator(&dir, &provider);

    let report = c.scan("  D7  ", "dud3").expect("scan");
    assert_eq!(report.event.driver_id(), "D7");
    assert_eq!(report.event.station().code(), "DUD3");

    let err = c.scan("D7", "XXXX").expect_err("unknown station");
    assert!(matches!(err, AppError::InvalidStation(_)));
    assert_eq!(c.ledger().len(), 1);
}

#[test]
fn test_failing_remote_keeps_local_counts() {
    let dir = temp_dir("coord_failing_remote");
    let provider = MemoryProvider::default();
    provider.set_mode("DUD2", TabMode::Failing);
    let mut c = coordinator(&dir, &provider);

    for n in 1..=6 {
        let report = c
            .scan_at("D123", "DUD2", at("2025-10-11", &format!("1{n}:00:00")))
            .expect("scan still succeeds");
        assert_eq!(report.count, n);
        assert!(matches!(report.sync, SyncStatus::Failed(_)));
        assert!(report.status.starts_with("Remote sync failed:"));
        let expected = if n > 5 {
            AlertState::BreakDue
        } else {
            AlertState::Normal
        };
        assert_eq!(report.alert.state, expected);
    }

    assert_eq!(*provider.failing_calls.borrow(), 6);
    assert_eq!(line_count(&dir.join("DUD2_scans.csv")), 7);
}

#[test]
fn test_station_without_target_is_skipped() {
    let dir = temp_dir("coord_skipped");
    let provider = MemoryProvider::default();
    provider.set_mode("DUD5", TabMode::Broken);
    let mut c = coordinator(&dir, &provider);

    let report = c.scan("D55", "DUD5").expect("scan");
    assert_eq!(report.sync, SyncStatus::Skipped);
    assert_eq!(report.status, "No remote sheet tab available for DUD5");
    assert_eq!(report.count, 1);
    assert_eq!(c.ledger().len(), 1);
    assert!(dir.join("DUD5_scans.csv").exists());
}

#[test]
fn test_failed_connection_records_locally_then_reconnects() {
    let dir = temp_dir("coord_reconnect");
    let provider = MemoryProvider::default();
    *provider.fail_open.borrow_mut() = true;
    let mut c = coordinator(&dir, &provider);

    let report = c.scan("D1", "DUD2").expect("scan");
    assert_eq!(report.sync, SyncStatus::Skipped);

    *provider.fail_open.borrow_mut() = false;
    c.reconnect();
    let report = c.scan("D1", "DUD2").expect("scan");
    assert_eq!(report.sync, SyncStatus::Synced { row: 2 });
    assert_eq!(report.count, 2);
}

#[test]
fn test_backup_failure_is_a_warning_only() {
    let dir = temp_dir("coord_backup_failure");
    let blocker = dir.join("blocked");
    fs::write(&blocker, "x").expect("blocker");

    let provider = MemoryProvider::default();
    let mut c = coordinator(&blocker, &provider);

    let first = c.scan("D2", "DAD2").expect("scan");
    assert!(matches!(
        first.backup_warning,
        Some(AppError::LocalPersistence { .. })
    ));
    let second = c.scan("D2", "DAD2").expect("scan");
    assert_eq!(second.count, 2);
    assert_eq!(second.sync, SyncStatus::Synced { row: 3 });
    assert_eq!(c.ledger().len(), 2);
}
