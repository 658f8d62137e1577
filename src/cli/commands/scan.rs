//! `scan` command: one scan session over a fresh ledger.

use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::coordinator::{AppState, ScanCoordinator, ScanReport, SyncStatus};
use crate::core::ledger::ScanLedger;
use crate::db::log::ttlog_or_warn;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::station::Station;
use crate::remote::{DisabledProvider, RemoteProvider};
use crate::remote::connection::{ConnectionState, RemoteConnection};
use crate::ui::messages::{error, header, info, success, warning};
use crate::utils::colors::paint_alert;
use crate::utils::table::{Column, Table};
use rusqlite::Connection;
use std::io::{self, BufRead, Write};

const RECENT_SCANS: usize = 10;

/// What to do after a line of input.
enum Flow {
    Continue,
    Quit,
}

struct Session {
    coordinator: ScanCoordinator,
    station: Station,
    audit: Option<DbPool>,
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Scan {
        station,
        offline,
        ids,
    } = cmd
    {
        //
        // 1️⃣ Build session state
        //
        let provider: Box<dyn RemoteProvider> = if *offline {
            Box::new(DisabledProvider)
        } else {
            cfg.remote_provider()
        };
        let state = AppState {
            stations: cfg.station_set(),
            ledger: ScanLedger::new(cfg.backup_dir_path()),
            remote: RemoteConnection::new(provider),
            break_threshold: cfg.break_threshold,
        };
        let coordinator = ScanCoordinator::new(state);

        let code = station.as_deref().unwrap_or(&cfg.default_station);
        let station = coordinator.resolve_station(code)?;

        let audit = match DbPool::new(&cfg.log_database_path()) {
            Ok(pool) => Some(pool),
            Err(e) => {
                warning(format!("Internal log unavailable: {}", e));
                None
            }
        };

        let mut session = Session {
            coordinator,
            station,
            audit,
        };

        //
        // 2️⃣ Connect to the remote store
        //
        session.connect(false);
        header(format!("Scanning at {}", session.station));

        //
        // 3️⃣ Scan: arguments, or stdin line by line
        //
        if !ids.is_empty() {
            for id in ids {
                session.scan(id);
            }
        } else {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut buf = Vec::new();
            prompt(&session.station);
            loop {
                buf.clear();
                match input.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(e) => {
                        error(format!("Input error: {}", e));
                        break;
                    }
                }

                match std::str::from_utf8(&buf) {
                    Ok(line) => {
                        if let Flow::Quit = session.handle_line(line) {
                            break;
                        }
                    }
                    Err(_) => {
                        let raw = String::from_utf8_lossy(&buf);
                        error(format!("Unreadable input skipped: {}", raw.trim()));
                        session.log("input_skipped", session.station.code(), &raw);
                    }
                }
                prompt(&session.station);
            }
            println!();
        }

        info(format!(
            "Session ended: {} scan(s) recorded",
            session.coordinator.ledger().len()
        ));
    }

    Ok(())
}

fn prompt(station: &Station) {
    print!("Driver ID [{}]> ", station);
    io::stdout().flush().ok();
}

impl Session {
    fn audit_conn(&self) -> Option<&Connection> {
        self.audit.as_ref().map(|p| &p.conn)
    }

    fn log(&self, operation: &str, target: &str, message: &str) {
        if let Some(conn) = self.audit_conn() {
            ttlog_or_warn(conn, operation, target, message);
        }
    }

    fn connect(&mut self, reconnect: bool) {
        let state = if reconnect {
            self.coordinator.reconnect().clone()
        } else {
            self.coordinator.connect().clone()
        };

        let remote = &self.coordinator.state().remote;
        for notice in remote.notices() {
            info(notice);
        }
        match state {
            _ if !remote.is_enabled() => info(remote.status_text()),
            ConnectionState::Connected => success(remote.status_text()),
            _ => warning(remote.status_text()),
        }

        if reconnect {
            let status = remote.status_text();
            self.log("reconnect", &remote.provider_name(), &status);
        }
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        let input = line.trim();
        let Some(command) = input.strip_prefix(':') else {
            self.scan(input);
            return Flow::Continue;
        };

        let mut parts = command.split_whitespace();
        match parts.next().unwrap_or("") {
            "q" | "quit" | "exit" => return Flow::Quit,
            "station" => match parts.next() {
                Some(code) => match self.coordinator.resolve_station(code) {
                    Ok(s) => {
                        self.station = s;
                        success(format!("Station switched to {}", self.station));
                    }
                    Err(e) => error(e),
                },
                None => error("Usage: :station CODE"),
            },
            "reconnect" => self.connect(true),
            "recent" => self.print_recent(),
            "status" => {
                let remote = &self.coordinator.state().remote;
                info(format!("Station: {}", self.station));
                info(remote.status_text());
                info(format!(
                    "Scans this session: {}",
                    self.coordinator.ledger().len()
                ));
            }
            other => error(format!(
                "Unknown command ':{other}' (use :station, :reconnect, :recent, :status, :quit)"
            )),
        }
        Flow::Continue
    }

    fn scan(&mut self, driver_id: &str) {
        let station = self.station.code().to_string();
        match self.coordinator.scan(driver_id, &station) {
            Ok(report) => self.print_report(&report),
            Err(e @ AppError::Validation(_)) => error(e),
            Err(e) => error(format!("Scan failed: {}", e)),
        }
    }

    fn print_report(&self, report: &ScanReport) {
        let event = &report.event;
        let station = event.station().code();

        info(format!(
            "Scanned locally: {} @ {}",
            event.driver_id(),
            station
        ));
        self.log(
            "scan",
            station,
            &format!("{} scanned (count {})", event.driver_id(), report.count),
        );

        if let Some(e) = &report.backup_warning {
            warning(e);
            self.log("backup_failed", station, &e.to_string());
        }

        match &report.sync {
            SyncStatus::Synced { row } => {
                success(&report.status);
                self.log("sync", station, &format!("{} at row {}", event.driver_id(), row));
            }
            SyncStatus::Skipped => {
                info(&report.status);
                self.log("sync_skipped", station, &report.status);
            }
            SyncStatus::Failed(msg) => {
                error(&report.status);
                self.log("sync_failed", station, msg);
            }
        }

        println!("{}", paint_alert(report.alert.color, &report.alert.message));
    }

    fn print_recent(&self) {
        let ledger = self.coordinator.ledger();
        if ledger.is_empty() {
            info("No scans yet in this session.");
            return;
        }

        let mut table = Table::new(vec![
            Column::new("Driver ID"),
            Column::new("Time"),
            Column::new("Date"),
            Column::new("Station"),
        ]);
        for e in ledger.recent(RECENT_SCANS) {
            table.add_row(vec![
                e.driver_id().to_string(),
                e.time_str(),
                e.date_str(),
                e.station().to_string(),
            ]);
        }
        header("Recent Scans");
        print!("{}", table.render());
    }
}
