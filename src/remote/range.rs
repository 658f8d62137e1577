//! A1-notation cell ranges (`A2:E2`).

use crate::errors::{AppError, AppResult};
use std::fmt;

/// Rectangular, 1-based, inclusive cell range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub first_row: usize,
    pub first_col: usize,
    pub last_row: usize,
    pub last_col: usize,
}

impl CellRange {
    /// Columns `first_col..=last_col` of a single row.
    pub fn row_span(row: usize, first_col: usize, last_col: usize) -> Self {
        Self {
            first_row: row,
            first_col,
            last_row: row,
            last_col,
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        let (start, end) = s.split_once(':').unwrap_or((s, s));
        let (first_col, first_row) = parse_cell(start)?;
        let (last_col, last_row) = parse_cell(end)?;

        if last_row < first_row || last_col < first_col {
            return Err(AppError::InvalidRange(s.to_string()));
        }

        Ok(Self {
            first_row,
            first_col,
            last_row,
            last_col,
        })
    }

    pub fn rows(&self) -> usize {
        self.last_row - self.first_row + 1
    }

    pub fn cols(&self) -> usize {
        self.last_col - self.first_col + 1
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            column_letters(self.first_col),
            self.first_row,
            column_letters(self.last_col),
            self.last_row
        )
    }
}

/// 1 → A, 26 → Z, 27 → AA.
pub fn column_letters(mut col: usize) -> String {
    let mut out = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        out.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn parse_cell(cell: &str) -> AppResult<(usize, usize)> {
    let cell = cell.trim();
    let split = cell
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| AppError::InvalidRange(cell.to_string()))?;
    let (letters, digits) = cell.split_at(split);

    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::InvalidRange(cell.to_string()));
    }

    let col = letters
        .to_ascii_uppercase()
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + (b - b'A' + 1) as usize);
    let row: usize = digits
        .parse()
        .map_err(|_| AppError::InvalidRange(cell.to_string()))?;

    if row == 0 {
        return Err(AppError::InvalidRange(cell.to_string()));
    }

    Ok((col, row))
}
