//! Bundled remote backend: a spreadsheet emulation stored in SQLite.
//!
//! Each tab has a fixed grid (rows × cols); cells are kept sparse, only
//! non-empty values are stored. Writing outside the grid fails the same way
//! a real sheet rejects an out-of-bounds range.

use super::range::CellRange;
use super::{RemoteProvider, RemoteTarget, Workbook};
use crate::errors::{AppError, AppResult};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tabs (
            title       TEXT PRIMARY KEY,
            row_count   INTEGER NOT NULL,
            col_count   INTEGER NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS cells (
            tab    TEXT NOT NULL REFERENCES tabs(title),
            row    INTEGER NOT NULL,
            col    INTEGER NOT NULL,
            value  TEXT NOT NULL,
            PRIMARY KEY (tab, row, col)
        );
        "#,
    )
}

/// Provider for a workbook file on disk.
pub struct WorkbookProvider {
    path: PathBuf,
}

impl WorkbookProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RemoteProvider for WorkbookProvider {
    fn describe(&self) -> String {
        format!("workbook {}", self.path.display())
    }

    fn open(&self) -> AppResult<Box<dyn Workbook>> {
        Ok(Box::new(SqliteWorkbook::open(&self.path)?))
    }
}

pub struct SqliteWorkbook {
    path: PathBuf,
    conn: Connection,
}

impl SqliteWorkbook {
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    pub fn tab_titles(&self) -> AppResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT title FROM tabs ORDER BY created_at ASC, title ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn load_tab(&self, title: &str) -> AppResult<Option<SqliteTab>> {
        let dims: Option<(i64, i64)> = self
            .conn
            .query_row(
                "SELECT row_count, col_count FROM tabs WHERE title = ?1",
                params![title],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match dims {
            Some((rows, cols)) => Ok(Some(SqliteTab::open(
                &self.path,
                title,
                rows as usize,
                cols as usize,
            )?)),
            None => Ok(None),
        }
    }
}

impl Workbook for SqliteWorkbook {
    fn worksheet(&mut self, title: &str) -> AppResult<Option<Box<dyn RemoteTarget>>> {
        Ok(self
            .load_tab(title)?
            .map(|t| Box::new(t) as Box<dyn RemoteTarget>))
    }

    fn add_worksheet(
        &mut self,
        title: &str,
        rows: usize,
        cols: usize,
    ) -> AppResult<Box<dyn RemoteTarget>> {
        if title.trim().is_empty() || rows == 0 || cols == 0 {
            return Err(AppError::Other(format!(
                "cannot create tab '{title}' with {rows}x{cols} cells"
            )));
        }

        self.conn.execute(
            "INSERT INTO tabs (title, row_count, col_count, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![title, rows as i64, cols as i64, Local::now().to_rfc3339()],
        )?;

        Ok(Box::new(SqliteTab::open(&self.path, title, rows, cols)?))
    }
}

/// One tab of a `SqliteWorkbook`, with its own connection.
pub struct SqliteTab {
    conn: Connection,
    title: String,
    rows: usize,
    cols: usize,
}

impl SqliteTab {
    fn open(path: &Path, title: &str, rows: usize, cols: usize) -> AppResult<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
            title: title.to_string(),
            rows,
            cols,
        })
    }

    /// Non-empty cells keyed by (row, col).
    fn cells(&self) -> AppResult<BTreeMap<(usize, usize), String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT row, col, value FROM cells WHERE tab = ?1")?;
        let rows = stmt.query_map(params![self.title], |row| {
            let r: i64 = row.get(0)?;
            let c: i64 = row.get(1)?;
            let v: String = row.get(2)?;
            Ok(((r as usize, c as usize), v))
        })?;

        let mut out = BTreeMap::new();
        for r in rows {
            let (k, v) = r?;
            out.insert(k, v);
        }
        Ok(out)
    }

    fn check_bounds(&self, range: &CellRange) -> AppResult<()> {
        if range.last_row > self.rows || range.last_col > self.cols {
            return Err(AppError::InvalidRange(format!(
                "{} exceeds grid limits of tab '{}' ({} rows x {} cols)",
                range, self.title, self.rows, self.cols
            )));
        }
        Ok(())
    }

    fn write_cells(&mut self, range: &CellRange, values: &[Vec<String>]) -> AppResult<()> {
        self.check_bounds(range)?;

        if values.len() > range.rows() || values.iter().any(|r| r.len() > range.cols()) {
            return Err(AppError::InvalidRange(format!(
                "{} values do not fit range {}",
                values.len(),
                range
            )));
        }

        let tx = self.conn.transaction()?;
        {
            let mut upsert = tx.prepare_cached(
                "INSERT INTO cells (tab, row, col, value) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(tab, row, col) DO UPDATE SET value = excluded.value",
            )?;
            let mut clear =
                tx.prepare_cached("DELETE FROM cells WHERE tab = ?1 AND row = ?2 AND col = ?3")?;

            for (i, row_values) in values.iter().enumerate() {
                let row = (range.first_row + i) as i64;
                for (j, value) in row_values.iter().enumerate() {
                    let col = (range.first_col + j) as i64;
                    if value.is_empty() {
                        clear.execute(params![self.title, row, col])?;
                    } else {
                        upsert.execute(params![self.title, row, col, value])?;
                    }
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl RemoteTarget for SqliteTab {
    fn title(&self) -> &str {
        &self.title
    }

    fn get_all_values(&mut self) -> AppResult<Vec<Vec<String>>> {
        let cells = self.cells()?;
        let Some(max_row) = cells.keys().map(|(r, _)| *r).max() else {
            return Ok(Vec::new());
        };
        let max_col = cells.keys().map(|(_, c)| *c).max().unwrap_or(0);

        let grid = (1..=max_row)
            .map(|r| {
                (1..=max_col)
                    .map(|c| cells.get(&(r, c)).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Ok(grid)
    }

    fn col_values(&mut self, col: usize) -> AppResult<Vec<String>> {
        let cells = self.cells()?;
        let last = cells
            .keys()
            .filter(|(_, c)| *c == col)
            .map(|(r, _)| *r)
            .max()
            .unwrap_or(0);

        Ok((1..=last)
            .map(|r| cells.get(&(r, col)).cloned().unwrap_or_default())
            .collect())
    }

    fn append_row(&mut self, values: &[String]) -> AppResult<()> {
        if values.is_empty() {
            return Ok(());
        }
        let last = self.cells()?.keys().map(|(r, _)| *r).max().unwrap_or(0);
        let range = CellRange::row_span(last + 1, 1, values.len());
        self.write_cells(&range, &[values.to_vec()])
    }

    fn update(&mut self, range: &CellRange, values: &[Vec<String>]) -> AppResult<()> {
        self.write_cells(range, values)
    }
}
