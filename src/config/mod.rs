use crate::errors::{AppError, AppResult};
use crate::models::station::{Station, StationEntry, StationSet, default_stations};
use crate::remote::workbook::WorkbookProvider;
use crate::remote::{DisabledProvider, RemoteProvider};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub mod migrate; // use submodule at src/config/migrate.rs

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteBackend {
    #[default]
    Workbook,
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub backend: RemoteBackend,
    #[serde(default = "default_workbook")]
    pub workbook: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            backend: RemoteBackend::Workbook,
            workbook: default_workbook(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,
    #[serde(default = "default_log_database")]
    pub log_database: String,
    #[serde(default = "default_break_threshold")]
    pub break_threshold: usize,
    #[serde(default = "default_station")]
    pub default_station: String,
    #[serde(default = "default_stations")]
    pub stations: Vec<StationEntry>,
    #[serde(default)]
    pub remote: RemoteConfig,
}

fn default_backup_dir() -> String {
    Config::config_dir()
        .join("backups")
        .to_string_lossy()
        .to_string()
}
fn default_log_database() -> String {
    Config::config_dir()
        .join("dascan.sqlite")
        .to_string_lossy()
        .to_string()
}
fn default_workbook() -> String {
    Config::config_dir()
        .join("workbook.sqlite")
        .to_string_lossy()
        .to_string()
}
fn default_break_threshold() -> usize {
    crate::core::counter::DEFAULT_BREAK_THRESHOLD
}
fn default_station() -> String {
    "DUD2".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backup_dir: default_backup_dir(),
            log_database: default_log_database(),
            break_threshold: default_break_threshold(),
            default_station: default_station(),
            stations: default_stations(),
            remote: RemoteConfig::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("dascan")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".dascan")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("dascan.conf")
    }

    /// Load configuration from `path` (or the standard file), or return
    /// defaults if the file does not exist.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_file);

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write the configuration as YAML, creating the parent directory.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    fn validate(&self) -> AppResult<()> {
        if self.stations.is_empty() {
            return Err(AppError::Config("no stations configured".to_string()));
        }
        if self.break_threshold == 0 {
            return Err(AppError::Config(
                "break_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Configured stations with codes normalised to uppercase.
    /// A blank tab title falls back to the station code.
    pub fn station_set(&self) -> StationSet {
        let entries = self
            .stations
            .iter()
            .filter_map(|e| {
                let code = Station::from_code(e.code.code())?;
                let tab = if e.tab.trim().is_empty() {
                    code.code().to_string()
                } else {
                    e.tab.trim().to_string()
                };
                Some(StationEntry { code, tab })
            })
            .collect();
        StationSet::new(entries)
    }

    pub fn backup_dir_path(&self) -> PathBuf {
        expand_tilde(&self.backup_dir)
    }

    pub fn log_database_path(&self) -> PathBuf {
        expand_tilde(&self.log_database)
    }

    pub fn workbook_path(&self) -> PathBuf {
        expand_tilde(&self.remote.workbook)
    }

    /// Remote provider selected by `remote.backend`.
    pub fn remote_provider(&self) -> Box<dyn RemoteProvider> {
        match self.remote.backend {
            RemoteBackend::Workbook => Box::new(WorkbookProvider::new(self.workbook_path())),
            RemoteBackend::Disabled => Box::new(DisabledProvider),
        }
    }
}
