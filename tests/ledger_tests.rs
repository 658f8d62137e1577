mod common;
use common::{at, line_count, temp_dir};
use dascan::core::counter::OccurrenceCounter;
use dascan::core::ledger::{BACKUP_HEADER, ScanLedger};
use dascan::errors::AppError;
use dascan::models::scan_event::ScanEvent;
use dascan::models::station::Station;
use std::fs;

fn station(code: &str) -> Station {
    Station::from_code(code).expect("station")
}

#[test]
fn test_backup_header_written_once() {
    let dir = temp_dir("ledger_header_once");
    let mut ledger = ScanLedger::new(&dir);
    let dud2 = station("DUD2");

    for i in 0..4 {
        let ev = ScanEvent::new("D1", dud2.clone(), at("2025-10-01", &format!("08:0{i}:00")));
        ledger.record(ev).expect("record");
    }

    let path = ledger.backup_path(&dud2);
    assert!(path.ends_with("DUD2_scans.csv"));

    let content = fs::read_to_string(&path).expect("read backup");
    let header = BACKUP_HEADER.join(",");
    assert_eq!(content.lines().filter(|l| *l == header).count(), 1);
    assert_eq!(content.lines().next(), Some(header.as_str()));
    assert_eq!(line_count(&path), 5);
}

#[test]
fn test_backup_row_fields() {
    let dir = temp_dir("ledger_row_fields");
    let mut ledger = ScanLedger::new(&dir);
    let ev = ScanEvent::new("D42", station("dad8"), at("2025-10-02", "14:05:09"));
    let saved_at = ev.recorded_at_str();
    ledger.record(ev).expect("record");

    let content = fs::read_to_string(dir.join("DAD8_scans.csv")).expect("read backup");
    let row = content.lines().nth(1).expect("data row");
    assert_eq!(row, format!("D42,14:05:09,2025-10-02,DAD8,{saved_at}"));
}

#[test]
fn test_header_not_rewritten_for_existing_file() {
    let dir = temp_dir("ledger_existing_file");
    let path = dir.join("DUD3_scans.csv");
    fs::write(
        &path,
        "Driver ID,Scan Time,Scan Date,Station,Saved At\nOLD,07:00:00,2025-09-30,DUD3,2025-09-30 07:00:00\n",
    )
    .expect("seed");

    // a new session starts empty: the file is not read back
    let mut ledger = ScanLedger::new(&dir);
    assert!(ledger.is_empty());

    ledger
        .record(ScanEvent::new("OLD", station("DUD3"), at("2025-09-30", "09:00:00")))
        .expect("record");

    assert_eq!(line_count(&path), 3);
    assert_eq!(
        OccurrenceCounter::count(&ledger, "OLD", at("2025-09-30", "09:00:00").date(), &station("DUD3")),
        1
    );
}

#[test]
fn test_header_written_for_empty_file() {
    let dir = temp_dir("ledger_empty_file");
    let path = dir.join("DUD2_scans.csv");
    fs::write(&path, "").expect("seed empty file");

    let mut ledger = ScanLedger::new(&dir);
    for t in ["08:00:00", "08:01:00"] {
        ledger
            .record(ScanEvent::new("E1", station("DUD2"), at("2025-10-05", t)))
            .expect("record");
    }

    let content = fs::read_to_string(&path).expect("read backup");
    let header = BACKUP_HEADER.join(",");
    assert_eq!(content.lines().next(), Some(header.as_str()));
    assert_eq!(content.lines().filter(|l| *l == header).count(), 1);
    assert_eq!(content.lines().filter(|l| l.starts_with("E1,")).count(), 2);
    assert_eq!(line_count(&path), 3);
}

#[test]
fn test_failed_backup_keeps_memory_entry() {
    let dir = temp_dir("ledger_failed_backup");
    // backup_dir is a regular file → directory creation fails
    let blocker = dir.join("not_a_dir");
    fs::write(&blocker, "x").expect("blocker");

    let mut ledger = ScanLedger::new(&blocker);
    let err = ledger
        .record(ScanEvent::new("D9", station("DUD5"), at("2025-10-03", "10:00:00")))
        .expect_err("backup must fail");

    match err {
        AppError::LocalPersistence { station, .. } => assert_eq!(station, "DUD5"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.events()[0].driver_id(), "D9");
}

#[test]
fn test_insertion_order_and_recent() {
    let dir = temp_dir("ledger_order");
    let mut ledger = ScanLedger::new(&dir);

    for (i, id) in ["A", "B", "C", "D"].iter().enumerate() {
        ledger
            .record(ScanEvent::new(id, station("DUD2"), at("2025-10-04", &format!("09:0{i}:00"))))
            .expect("record");
    }

    let order: Vec<&str> = ledger.events().iter().map(|e| e.driver_id()).collect();
    assert_eq!(order, ["A", "B", "C", "D"]);

    let recent: Vec<&str> = ledger.recent(2).map(|e| e.driver_id()).collect();
    assert_eq!(recent, ["D", "C"]);
}
