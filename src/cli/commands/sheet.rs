use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::utils::table::{Column, Table};
use serde_json::{Map, Value};

/// Print the remote tab of a station as a table or as JSON.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sheet { station, json } = cmd {
        let stations = cfg.station_set();
        let code = stations
            .resolve(station)
            .ok_or_else(|| AppError::InvalidStation(station.clone()))?;
        let tab = stations.tab_for(code).unwrap_or(code.code()).to_string();

        // read-only: never create the workbook file here
        let provider = cfg.remote_provider();
        if provider.is_enabled() && !cfg.workbook_path().exists() {
            return Err(AppError::RemoteUnavailable(code.to_string()));
        }

        let mut workbook = provider.open()?;
        let mut target = workbook
            .worksheet(&tab)?
            .ok_or_else(|| AppError::RemoteUnavailable(code.to_string()))?;
        let rows = target.get_all_values()?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&rows_as_objects(&rows))?);
            return Ok(());
        }

        let Some((header, data)) = rows.split_first() else {
            println!("Tab '{}' is empty.", tab);
            return Ok(());
        };

        let mut table = Table::new(header.iter().map(|h| Column::new(h)).collect());
        for row in data {
            table.add_row(row.clone());
        }
        println!("📊 Tab '{}' ({} data row(s))\n", tab, data.len());
        print!("{}", table.render());
    }

    Ok(())
}

/// First row is the header; every other row becomes an object keyed by it.
fn rows_as_objects(rows: &[Vec<String>]) -> Vec<Value> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };

    data.iter()
        .map(|row| {
            let mut obj = Map::new();
            for (i, key) in header.iter().enumerate() {
                let cell = row.get(i).cloned().unwrap_or_default();
                obj.insert(key.clone(), Value::String(cell));
            }
            Value::Object(obj)
        })
        .collect()
}
