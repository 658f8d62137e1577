#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use dascan::core::coordinator::{AppState, ScanCoordinator};
use dascan::core::ledger::ScanLedger;
use dascan::errors::{AppError, AppResult};
use dascan::models::station::{StationSet, default_stations};
use dascan::remote::connection::RemoteConnection;
use dascan::remote::range::CellRange;
use dascan::remote::{RemoteProvider, RemoteTarget, Workbook};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

/// Binary under test with HOME pointed at `home`, so no real config is read.
pub fn dascan(home: &PathBuf) -> Command {
    let mut cmd = cargo_bin_cmd!("dascan");
    cmd.env("HOME", home);
    cmd
}

/// Create a unique, empty directory inside the system temp dir
pub fn temp_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("dascan_{}", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

pub fn at(date: &str, time: &str) -> NaiveDateTime {
    let d = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("date");
    NaiveDateTime::parse_from_str(&format!("{} {}", d, time), "%Y-%m-%d %H:%M:%S").expect("time")
}

pub fn stations() -> StationSet {
    StationSet::new(default_stations())
}

pub fn line_count(path: &PathBuf) -> usize {
    fs::read_to_string(path).expect("read backup").lines().count()
}

// ---------------------------------------------------------------------------
// In-memory remote store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct Grid {
    pub cells: BTreeMap<(usize, usize), String>,
    pub calls: usize,
    pub updates: Vec<String>,
}

pub type SharedGrid = Rc<RefCell<Grid>>;

pub struct MemoryTab {
    pub title: String,
    pub grid: SharedGrid,
}

impl MemoryTab {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            grid: Rc::new(RefCell::new(Grid::default())),
        }
    }

    pub fn with_grid(title: &str, grid: SharedGrid) -> Self {
        Self {
            title: title.to_string(),
            grid,
        }
    }

    /// Pre-fill column A rows 1..=n (row 1 = header).
    pub fn prefill(&self, values: &[&str]) {
        let mut g = self.grid.borrow_mut();
        for (i, v) in values.iter().enumerate() {
            if !v.is_empty() {
                g.cells.insert((i + 1, 1), v.to_string());
            }
        }
    }

    pub fn row(&self, row: usize) -> Vec<String> {
        let g = self.grid.borrow();
        (1..=5)
            .map(|c| g.cells.get(&(row, c)).cloned().unwrap_or_default())
            .collect()
    }
}

impl RemoteTarget for MemoryTab {
    fn title(&self) -> &str {
        &self.title
    }

    fn get_all_values(&mut self) -> AppResult<Vec<Vec<String>>> {
        let mut g = self.grid.borrow_mut();
        g.calls += 1;
        let max_row = g.cells.keys().map(|(r, _)| *r).max().unwrap_or(0);
        let max_col = g.cells.keys().map(|(_, c)| *c).max().unwrap_or(0);
        Ok((1..=max_row)
            .map(|r| {
                (1..=max_col)
                    .map(|c| g.cells.get(&(r, c)).cloned().unwrap_or_default())
                    .collect()
            })
            .collect())
    }

    fn col_values(&mut self, col: usize) -> AppResult<Vec<String>> {
        let mut g = self.grid.borrow_mut();
        g.calls += 1;
        let last = g
            .cells
            .keys()
            .filter(|(_, c)| *c == col)
            .map(|(r, _)| *r)
            .max()
            .unwrap_or(0);
        Ok((1..=last)
            .map(|r| g.cells.get(&(r, col)).cloned().unwrap_or_default())
            .collect())
    }

    fn append_row(&mut self, values: &[String]) -> AppResult<()> {
        let mut g = self.grid.borrow_mut();
        g.calls += 1;
        let next = g.cells.keys().map(|(r, _)| *r).max().unwrap_or(0) + 1;
        for (i, v) in values.iter().enumerate() {
            g.cells.insert((next, i + 1), v.clone());
        }
        Ok(())
    }

    fn update(&mut self, range: &CellRange, values: &[Vec<String>]) -> AppResult<()> {
        let mut g = self.grid.borrow_mut();
        g.calls += 1;
        g.updates.push(range.to_string());
        for (i, row) in values.iter().enumerate() {
            for (j, v) in row.iter().enumerate() {
                g.cells
                    .insert((range.first_row + i, range.first_col + j), v.clone());
            }
        }
        Ok(())
    }
}

/// Target whose every call fails, counting the attempts.
pub struct FailingTab {
    pub calls: Rc<RefCell<usize>>,
}

impl FailingTab {
    fn fail<T>(&self) -> AppResult<T> {
        *self.calls.borrow_mut() += 1;
        Err(AppError::Other("quota exceeded".to_string()))
    }
}

impl RemoteTarget for FailingTab {
    fn title(&self) -> &str {
        "failing"
    }
    fn get_all_values(&mut self) -> AppResult<Vec<Vec<String>>> {
        self.fail()
    }
    fn col_values(&mut self, _col: usize) -> AppResult<Vec<String>> {
        self.fail()
    }
    fn append_row(&mut self, _values: &[String]) -> AppResult<()> {
        self.fail()
    }
    fn update(&mut self, _range: &CellRange, _values: &[Vec<String>]) -> AppResult<()> {
        self.fail()
    }
}

/// How the fake workbook treats a tab title.
#[derive(Clone)]
pub enum TabMode {
    Memory,
    Failing,
    /// Opening and creating the tab both fail.
    Broken,
}

/// Provider over shared in-memory grids.
#[derive(Clone, Default)]
pub struct MemoryProvider {
    pub grids: Rc<RefCell<HashMap<String, SharedGrid>>>,
    pub modes: Rc<RefCell<HashMap<String, TabMode>>>,
    pub fail_open: Rc<RefCell<bool>>,
    pub failing_calls: Rc<RefCell<usize>>,
    pub created: Rc<RefCell<Vec<String>>>,
}

impl MemoryProvider {
    pub fn grid(&self, title: &str) -> SharedGrid {
        self.grids
            .borrow_mut()
            .entry(title.to_string())
            .or_default()
            .clone()
    }

    pub fn set_mode(&self, title: &str, mode: TabMode) {
        self.modes.borrow_mut().insert(title.to_string(), mode);
    }

    fn mode(&self, title: &str) -> TabMode {
        self.modes
            .borrow()
            .get(title)
            .cloned()
            .unwrap_or(TabMode::Memory)
    }
}

struct MemoryWorkbook {
    provider: MemoryProvider,
}

impl Workbook for MemoryWorkbook {
    fn worksheet(&mut self, title: &str) -> AppResult<Option<Box<dyn RemoteTarget>>> {
        match self.provider.mode(title) {
            TabMode::Broken => Err(AppError::Other(format!("permission denied on {title}"))),
            TabMode::Failing => Ok(Some(Box::new(FailingTab {
                calls: self.provider.failing_calls.clone(),
            }))),
            TabMode::Memory => {
                if self.provider.grids.borrow().contains_key(title) {
                    Ok(Some(Box::new(MemoryTab::with_grid(
                        title,
                        self.provider.grid(title),
                    ))))
                } else {
                    Ok(None)
                }
            }
        }
    }

    fn add_worksheet(
        &mut self,
        title: &str,
        _rows: usize,
        _cols: usize,
    ) -> AppResult<Box<dyn RemoteTarget>> {
        self.provider.created.borrow_mut().push(title.to_string());
        Ok(Box::new(MemoryTab::with_grid(title, self.provider.grid(title))))
    }
}

impl RemoteProvider for MemoryProvider {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn open(&self) -> AppResult<Box<dyn Workbook>> {
        if *self.fail_open.borrow() {
            return Err(AppError::Other("invalid credentials".to_string()));
        }
        Ok(Box::new(MemoryWorkbook {
            provider: self.clone(),
        }))
    }
}

/// Coordinator over `backup_dir`, connected to `provider`.
pub fn coordinator(backup_dir: &PathBuf, provider: &MemoryProvider) -> ScanCoordinator {
    let state = AppState {
        stations: stations(),
        ledger: ScanLedger::new(backup_dir),
        remote: RemoteConnection::new(Box::new(provider.clone())),
        break_threshold: 5,
    };
    let mut c = ScanCoordinator::new(state);
    c.connect();
    c
}
