//! Content lookups over a [`CellGrid`].

use super::CellGrid;
use crate::error::{ProbeError, Result};
use serde::Serialize;

/// Zero-based (row, column) position of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CellPosition {
    pub row: usize,
    pub column: usize,
}

/// Every position holding `value`, in row-major order.
pub fn all_matches<G>(grid: &G, value: &str) -> Vec<CellPosition>
where
    G: CellGrid + ?Sized,
{
    (0..grid.row_count())
        .filter_map(|row| grid.row(row).map(|cells| (row, cells)))
        .flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.matches(value))
                .map(move |(column, _)| CellPosition { row, column })
        })
        .collect()
}

/// First position holding `value` in row-major order.
///
/// # Errors
///
/// Returns [`ProbeError::AnchorNotFound`] when the value appears nowhere.
pub fn first_match<G>(grid: &G, value: &str) -> Result<CellPosition>
where
    G: CellGrid + ?Sized,
{
    (0..grid.row_count())
        .find_map(|row| {
            grid.row(row)?
                .iter()
                .position(|cell| cell.matches(value))
                .map(|column| CellPosition { row, column })
        })
        .ok_or_else(|| ProbeError::AnchorNotFound {
            anchor: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn sample() -> Grid {
        Grid::from_text([
            vec!["Events", "", ""],
            vec!["Sub01", "Left", "Foot Strike", "0.5"],
            vec!["Foot Strike", "1.0"],
            vec!["", "", "Foot Strike", "1.5"],
        ])
    }

    #[test]
    fn test_all_matches_row_major() {
        let hits = all_matches(&sample(), "Foot Strike");
        assert_eq!(
            hits,
            vec![
                CellPosition { row: 1, column: 2 },
                CellPosition { row: 2, column: 0 },
                CellPosition { row: 3, column: 2 },
            ]
        );
    }

    #[test]
    fn test_first_match() {
        let pos = first_match(&sample(), "Foot Strike").unwrap();
        assert_eq!(pos, CellPosition { row: 1, column: 2 });
    }

    #[test]
    fn test_first_match_missing() {
        let err = first_match(&sample(), "Model Outputs").unwrap_err();
        assert!(matches!(err, ProbeError::AnchorNotFound { ref anchor } if anchor == "Model Outputs"));
        assert!(all_matches(&sample(), "Model Outputs").is_empty());
    }
}
