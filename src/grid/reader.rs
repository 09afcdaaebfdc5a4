//! Loading an export file into a [`Grid`].

use super::{Cell, CellGrid as _, Grid};
use crate::error::{ProbeError, Result, ResultExt as _};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

/// Column window read from every row unless configured otherwise.
pub const DEFAULT_MAX_COLUMNS: usize = 500;

/// Load a comma-separated export from disk.
///
/// # Errors
///
/// Fails when the file cannot be opened or a record cannot be tokenized.
/// This is the only failure that is fatal for a whole source file.
pub fn read_grid(path: &Path, max_columns: usize) -> Result<Grid> {
    if !path.is_file() {
        return Err(ProbeError::InvalidPath(format!(
            "{} is not a readable file",
            path.display()
        )));
    }
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let grid = read_grid_from(file, max_columns)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!(
        "Loaded {} rows ({} columns wide) from {}",
        grid.row_count(),
        grid.width(),
        path.display()
    );
    Ok(grid)
}

/// Tokenize an export from any reader.
///
/// There is no header row. Rows are kept ragged, truncated to
/// `max_columns`, and entirely blank lines are not counted as rows.
///
/// # Errors
///
/// Returns [`ProbeError::Csv`] on malformed CSV input.
pub fn read_grid_from<R: Read>(reader: R, max_columns: usize) -> Result<Grid> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        if record.len() <= 1 && record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() > max_columns {
            tracing::debug!(
                "Record {} has {} fields; keeping the first {max_columns}",
                line + 1,
                record.len()
            );
        }
        rows.push(record.iter().take(max_columns).map(Cell::parse).collect());
    }

    Ok(Grid::new(rows))
}
