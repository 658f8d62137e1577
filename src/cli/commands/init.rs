use crate::cli::parser::Cli;
use crate::config::{Config, RemoteBackend};
use crate::db::log::ttlog_or_warn;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::remote::connection::{ConnectionState, RemoteConnection};
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::PathBuf;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and configuration file
///  - the station backup directory
///  - the audit-log database (with migrations)
///  - the remote workbook, with one tab per station
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let path = cli
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(Config::config_file);

    println!("⚙️  Initializing dascan…");

    //
    // 1️⃣ CONFIGURATION
    //
    if cli.test {
        info("Test mode: configuration file not written");
    } else {
        cfg.save(&path)?;
        success(format!("Config file : {}", path.display()));
    }

    //
    // 2️⃣ BACKUP DIRECTORY
    //
    let backup_dir = cfg.backup_dir_path();
    fs::create_dir_all(&backup_dir)?;
    success(format!("Backup dir  : {}", backup_dir.display()));

    //
    // 3️⃣ AUDIT LOG DATABASE
    //
    let pool = DbPool::new(&cfg.log_database_path())?;
    success(format!("Audit log   : {}", cfg.log_database_path().display()));

    //
    // 4️⃣ REMOTE WORKBOOK
    //
    let stations = cfg.station_set();
    if cfg.remote.backend == RemoteBackend::Disabled {
        info("Remote mirroring disabled: workbook not created");
    } else {
        let mut remote = RemoteConnection::new(cfg.remote_provider());
        remote.connect(&stations);
        for notice in remote.notices() {
            info(notice);
        }
        match remote.state() {
            ConnectionState::Connected => {
                success(format!("Workbook    : {}", cfg.workbook_path().display()))
            }
            _ => warning(remote.status_text()),
        }
    }

    //
    // 5️⃣ INTERNAL LOG (non blocking)
    //
    ttlog_or_warn(
        &pool.conn,
        "init",
        &path.to_string_lossy(),
        &format!("Initialized with {} station(s)", stations.len()),
    );

    println!("🎉 dascan initialization completed!");
    Ok(())
}
