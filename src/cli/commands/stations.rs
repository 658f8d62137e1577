use crate::config::Config;
use crate::errors::AppResult;
use crate::utils::table::{Column, Table};

/// List configured stations with their tab titles and backup files.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let stations = cfg.station_set();
    let backup_dir = cfg.backup_dir_path();

    let mut table = Table::new(vec![
        Column::new("Station"),
        Column::new("Tab"),
        Column::new("Backup file"),
    ]);

    for entry in stations.entries() {
        let file = backup_dir.join(entry.code.backup_file_name());
        let marker = if file.is_file() { "" } else { " (not created)" };
        table.add_row(vec![
            entry.code.to_string(),
            entry.tab.clone(),
            format!("{}{}", file.display(), marker),
        ]);
    }

    print!("{}", table.render());
    Ok(())
}
