use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::db::log::ttlog_or_warn;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::path::expand_tilde;

/// Archive the station backup CSVs.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup { file, force } = cmd {
        let dest = expand_tilde(file);
        let summary =
            BackupLogic::archive(&cfg.backup_dir_path(), &cfg.station_set(), &dest, *force)?;

        for f in &summary.files {
            println!("  📄 {}", f.display());
        }
        success(format!(
            "Backup created: {} ({} file(s))",
            summary.archive.display(),
            summary.files.len()
        ));

        if let Ok(pool) = DbPool::new(&cfg.log_database_path()) {
            ttlog_or_warn(
                &pool.conn,
                "backup",
                &summary.archive.to_string_lossy(),
                &format!("{} station file(s) archived", summary.files.len()),
            );
        }
    }

    Ok(())
}
