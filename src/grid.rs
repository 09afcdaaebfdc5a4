//! In-memory grid of raw export cells.
//!
//! An export has no usable header row: batch names, frame rates and event
//! markers sit at positions that vary per file. The grid therefore keeps every
//! cell, typed only as far as "empty / number / text", and all structure is
//! found later by content (see [`index`]).

pub mod index;
pub mod reader;

pub use index::{CellPosition, all_matches, first_match};
pub use reader::{DEFAULT_MAX_COLUMNS, read_grid, read_grid_from};

/// Shared empty cell handed out for positions past the end of a row.
pub static EMPTY_CELL: Cell = Cell::Empty;

/// A single raw cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Classify raw field text. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else if let Ok(value) = trimmed.parse::<f64>() {
            Self::Number(value)
        } else {
            Self::Text(trimmed.to_owned())
        }
    }

    /// Non-empty text content, if this cell is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Empty | Self::Number(_) => None,
        }
    }

    /// Float coercion used at extraction time: empty reads as NaN, text fails.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Empty => Some(f64::NAN),
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Integral numeric value (frame numbers, output rates).
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            Self::Number(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Some(*v as i64),
            _ => None,
        }
    }

    /// Whether the cell holds the given literal.
    pub fn matches(&self, literal: &str) -> bool {
        match self {
            Self::Text(s) => s == literal,
            Self::Number(v) => literal.trim().parse::<f64>().is_ok_and(|l| l == *v),
            Self::Empty => false,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Read-only access to a 2-D table of cells.
///
/// Rows may be ragged; a position past the end of a row is an empty cell.
pub trait CellGrid {
    fn row_count(&self) -> usize;

    fn row(&self, row: usize) -> Option<&[Cell]>;

    fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.row(row).and_then(|cells| cells.get(column))
    }

    /// Like [`CellGrid::cell`] but treats missing positions as empty.
    fn cell_or_empty(&self, row: usize, column: usize) -> &Cell {
        self.cell(row, column).unwrap_or(&EMPTY_CELL)
    }
}

/// Row-major grid loaded from one export file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Build a grid from raw field text, mainly for fixtures and tests.
    pub fn from_text<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|s| Cell::parse(s.as_ref())).collect())
            .collect();
        Self { rows }
    }

    /// Widest row length.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl CellGrid for Grid {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_parse() {
        assert_eq!(Cell::parse(""), Cell::Empty);
        assert_eq!(Cell::parse("   "), Cell::Empty);
        assert_eq!(Cell::parse(" 1.5 "), Cell::Number(1.5));
        assert_eq!(Cell::parse("100"), Cell::Number(100.0));
        assert_eq!(
            Cell::parse(" Foot Strike "),
            Cell::Text("Foot Strike".to_owned())
        );
        assert!(matches!(Cell::parse("nan"), Cell::Number(v) if v.is_nan()));
    }

    #[test]
    fn test_cell_coercion() {
        assert!(Cell::Empty.to_f64().is_some_and(f64::is_nan));
        assert_eq!(Cell::Number(2.5).to_f64(), Some(2.5));
        assert_eq!(Cell::Text("deg".to_owned()).to_f64(), None);

        assert_eq!(Cell::Number(100.0).to_integer(), Some(100));
        assert_eq!(Cell::Number(1.5).to_integer(), None);
        assert_eq!(Cell::Empty.to_integer(), None);
        assert_eq!(Cell::Number(-1e30).to_integer(), None);
        assert_eq!(Cell::Number(f64::INFINITY).to_integer(), None);
    }

    #[test]
    fn test_cell_matches() {
        assert!(Cell::Text("Joints".to_owned()).matches("Joints"));
        assert!(!Cell::Text("Joints".to_owned()).matches("joints"));
        assert!(Cell::Number(100.0).matches("100"));
        assert!(!Cell::Empty.matches(""));
    }

    #[test]
    fn test_ragged_rows_read_as_empty() {
        let grid = Grid::from_text([vec!["a", "b", "c"], vec!["d"]]);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.cell(1, 2), None);
        assert_eq!(grid.cell_or_empty(1, 2), &Cell::Empty);
        assert_eq!(grid.cell_or_empty(7, 0), &Cell::Empty);
    }
}
