//! Configuration file checks: report keys missing from (or unknown to) the
//! YAML file, and rewrite it with defaults filled in.

use super::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

pub const KNOWN_KEYS: [&str; 6] = [
    "backup_dir",
    "log_database",
    "break_threshold",
    "default_station",
    "stations",
    "remote",
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ConfigCheck {
    pub missing: Vec<String>,
    pub unknown: Vec<String>,
}

impl ConfigCheck {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unknown.is_empty()
    }
}

/// Compare the top-level keys of the YAML file against the known set.
pub fn check_config_file(path: &Path) -> AppResult<ConfigCheck> {
    let content = fs::read_to_string(path)?;
    let yaml: Value = serde_yaml::from_str(&content)?;

    let Some(map) = yaml.as_mapping() else {
        return Err(AppError::Config(format!(
            "{} is not a YAML mapping",
            path.display()
        )));
    };

    let present: Vec<String> = map
        .keys()
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect();

    Ok(ConfigCheck {
        missing: KNOWN_KEYS
            .iter()
            .filter(|k| !present.iter().any(|p| p.as_str() == **k))
            .map(|k| k.to_string())
            .collect(),
        unknown: present
            .into_iter()
            .filter(|p| !KNOWN_KEYS.contains(&p.as_str()))
            .collect(),
    })
}

/// Rewrite the config file so every known key is present.
/// Returns false when nothing had to change.
pub fn migrate_config_file(path: &Path) -> AppResult<bool> {
    let check = check_config_file(path)?;
    if check.missing.is_empty() {
        info("Configuration file already up to date.");
        return Ok(false);
    }

    let cfg = Config::load(Some(path))?;
    cfg.save(path)?;

    success(format!(
        "Configuration migrated: added {}",
        check.missing.join(", ")
    ));
    Ok(true)
}
