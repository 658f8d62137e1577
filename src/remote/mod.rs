//! Remote, spreadsheet-shaped store: one tab per station.
//!
//! The core only talks to the traits defined here. `workbook` provides the
//! bundled SQLite backend; any other store plugs in through `RemoteProvider`.

pub mod connection;
pub mod range;
pub mod sync;
pub mod workbook;

use crate::errors::{AppError, AppResult};
use range::CellRange;

/// Grid size used when a missing station tab is created on demand.
pub const NEW_TAB_ROWS: usize = 1000;
pub const NEW_TAB_COLS: usize = 10;

/// Handle on one remote tab.
pub trait RemoteTarget {
    fn title(&self) -> &str;

    /// Every non-empty row, with trailing empty rows and cells trimmed.
    fn get_all_values(&mut self) -> AppResult<Vec<Vec<String>>>;

    /// Values of column `col` (1-based) up to its last non-empty cell.
    /// Blank cells in between come back as `""`.
    fn col_values(&mut self, col: usize) -> AppResult<Vec<String>>;

    /// Write `values` in the row after the last non-empty one.
    fn append_row(&mut self, values: &[String]) -> AppResult<()>;

    /// Overwrite the cells of `range` with `values`, row by row.
    fn update(&mut self, range: &CellRange, values: &[Vec<String>]) -> AppResult<()>;
}

/// An opened remote workbook.
pub trait Workbook {
    /// Look up a tab by title; `Ok(None)` when it does not exist.
    fn worksheet(&mut self, title: &str) -> AppResult<Option<Box<dyn RemoteTarget>>>;

    fn add_worksheet(
        &mut self,
        title: &str,
        rows: usize,
        cols: usize,
    ) -> AppResult<Box<dyn RemoteTarget>>;
}

/// Opens the remote workbook. Credentials and transport live behind it.
pub trait RemoteProvider {
    fn describe(&self) -> String;
    fn open(&self) -> AppResult<Box<dyn Workbook>>;

    /// `false` when there is no remote store to connect to at all.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Provider used when the configuration turns remote mirroring off.
/// Every station then records locally only.
pub struct DisabledProvider;

impl RemoteProvider for DisabledProvider {
    fn describe(&self) -> String {
        "disabled".to_string()
    }

    fn open(&self) -> AppResult<Box<dyn Workbook>> {
        Err(AppError::Config(
            "remote mirroring is disabled in the configuration".to_string(),
        ))
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
