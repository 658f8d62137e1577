//! Connection lifecycle for the remote store.
//!
//! `Disconnected → Connecting → Connected | Failed`, with `reconnect` to run
//! the cycle again at any time.

use super::{NEW_TAB_COLS, NEW_TAB_ROWS, RemoteProvider, RemoteTarget};
use crate::models::station::{Station, StationSet};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed(String),
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

pub struct RemoteConnection {
    provider: Box<dyn RemoteProvider>,
    state: ConnectionState,
    targets: HashMap<Station, Box<dyn RemoteTarget>>,
    notices: Vec<String>,
}

impl RemoteConnection {
    pub fn new(provider: Box<dyn RemoteProvider>) -> Self {
        Self {
            provider,
            state: ConnectionState::Disconnected,
            targets: HashMap::new(),
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Messages produced by the last connection attempt (tabs created, tabs that failed).
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn provider_name(&self) -> String {
        self.provider.describe()
    }

    /// Remote mirroring is switched on for this session.
    pub fn is_enabled(&self) -> bool {
        self.provider.is_enabled()
    }

    /// Open the workbook and resolve one tab per station.
    ///
    /// A station whose tab cannot be opened or created is left without a
    /// target; the other stations still connect.
    pub fn connect(&mut self, stations: &StationSet) -> &ConnectionState {
        self.targets.clear();
        self.notices.clear();

        // local-only session: stay disconnected, nothing to open
        if !self.is_enabled() {
            self.state = ConnectionState::Disconnected;
            return &self.state;
        }

        self.state = ConnectionState::Connecting;

        let mut workbook = match self.provider.open() {
            Ok(wb) => wb,
            Err(e) => {
                self.state = ConnectionState::Failed(e.to_string());
                return &self.state;
            }
        };

        for entry in stations.entries() {
            match workbook.worksheet(&entry.tab) {
                Ok(Some(tab)) => {
                    self.targets.insert(entry.code.clone(), tab);
                }
                Ok(None) => {
                    self.notices
                        .push(format!("Tab '{}' not found. Creating new tab...", entry.tab));
                    match workbook.add_worksheet(&entry.tab, NEW_TAB_ROWS, NEW_TAB_COLS) {
                        Ok(tab) => {
                            self.targets.insert(entry.code.clone(), tab);
                        }
                        Err(e) => self
                            .notices
                            .push(format!("Failed to create tab for {}: {}", entry.code, e)),
                    }
                }
                Err(e) => self
                    .notices
                    .push(format!("Failed to open tab for {}: {}", entry.code, e)),
            }
        }

        self.state = ConnectionState::Connected;
        &self.state
    }

    /// Drop every handle and connect again.
    pub fn reconnect(&mut self, stations: &StationSet) -> &ConnectionState {
        self.targets.clear();
        self.state = ConnectionState::Disconnected;
        self.connect(stations)
    }

    pub fn has_target(&self, station: &Station) -> bool {
        self.targets.contains_key(station)
    }

    pub fn target_mut(&mut self, station: &Station) -> Option<&mut (dyn RemoteTarget + 'static)> {
        self.targets.get_mut(station).map(|t| &mut **t)
    }

    pub fn status_text(&self) -> String {
        if !self.is_enabled() {
            return "Remote mirroring disabled: scans are kept locally only".to_string();
        }
        match &self.state {
            ConnectionState::Connected => "Connected to remote workbook ✅".to_string(),
            ConnectionState::Failed(reason) => {
                format!("Remote workbook connection failed ❌: {reason}")
            }
            ConnectionState::Connecting => "Connecting...".to_string(),
            ConnectionState::Disconnected => "Not connected".to_string(),
        }
    }
}
