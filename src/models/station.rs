use serde::{Deserialize, Serialize};
use std::fmt;

/// Station code as it appears on labels, backup file names and sheet tabs
/// (e.g. `DUD2`). Codes are stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Station(String);

impl Station {
    /// Build a station from user input (lowercase or uppercase).
    /// Returns None for blank input.
    pub fn from_code(code: &str) -> Option<Self> {
        let c = code.trim();
        if c.is_empty() {
            None
        } else {
            Some(Station(c.to_uppercase()))
        }
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// Name of the local backup file for this station.
    pub fn backup_file_name(&self) -> String {
        format!("{}_scans.csv", self.0)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One configured station: its code and the title of its remote tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationEntry {
    pub code: Station,
    pub tab: String,
}

/// The fixed set of stations a deployment knows about.
/// Order follows the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationSet {
    entries: Vec<StationEntry>,
}

impl StationSet {
    pub fn new(entries: Vec<StationEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[StationEntry] {
        &self.entries
    }

    pub fn codes(&self) -> impl Iterator<Item = &Station> {
        self.entries.iter().map(|e| &e.code)
    }

    /// Resolve raw user input to a known station.
    pub fn resolve(&self, code: &str) -> Option<&Station> {
        let wanted = Station::from_code(code)?;
        self.codes().find(|s| **s == wanted)
    }

    pub fn tab_for(&self, station: &Station) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| &e.code == station)
            .map(|e| e.tab.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reference deployment: five stations, tab title equal to the code.
pub fn default_stations() -> Vec<StationEntry> {
    ["DUD2", "DUD3", "DAD2", "DAD8", "DUD5"]
        .iter()
        .map(|c| StationEntry {
            code: Station(c.to_string()),
            tab: c.to_string(),
        })
        .collect()
}
