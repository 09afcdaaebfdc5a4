//! Header block of a named batch.
//!
//! A batch starts with a cell holding its name. Relative to that anchor:
//!
//! ```text
//! anchor      Model Outputs
//! anchor + 1  100                          <- output rate (frames/s)
//! anchor + 2  ,,Sub01:LAnkleAngles,,,...   <- parameter names
//! anchor + 3  Frame,Sub Frame,X,Y,Z,...    <- sub-parameter names
//! anchor + 4  ,,deg,deg,deg,...            <- units (unused)
//! anchor + 5  1,0,12.3,...                 <- first data row, frame number in column 0
//! ```

use crate::error::{ProbeError, Result};
use crate::grid::{Cell, CellGrid, first_match};

/// Rows from the batch name cell down to the first data row.
pub const DATA_ROW_OFFSET: usize = 5;

const RATE_ROW_ABOVE: usize = 4;
const PARAM_ROW_ABOVE: usize = 3;
const SUB_PARAM_ROW_ABOVE: usize = 2;

/// Row/column layout of one batch, derived once from the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchLayout {
    pub name: String,
    /// First data row.
    pub row_start: usize,
    /// Frame number stored at `row_start`.
    pub frame_start: i64,
    /// Frames per second.
    pub output_rate: i64,
    pub param_names: Vec<Cell>,
    pub sub_param_names: Vec<Cell>,
}

impl BatchLayout {
    /// Locate the header block of `batch`.
    ///
    /// # Errors
    ///
    /// [`ProbeError::AnchorNotFound`] when the batch name appears nowhere,
    /// [`ProbeError::InvalidLayout`] when the frame or rate cell is not a
    /// usable integer.
    pub fn locate<G>(grid: &G, batch: &str) -> Result<Self>
    where
        G: CellGrid + ?Sized,
    {
        let anchor = first_match(grid, batch)?;
        let row_start = anchor.row + DATA_ROW_OFFSET;

        let frame_cell = grid.cell_or_empty(row_start, 0);
        let frame_start = frame_cell.to_integer().ok_or_else(|| {
            ProbeError::InvalidLayout(format!(
                "'{batch}' has no frame number at row {row_start} (found '{frame_cell}')"
            ))
        })?;

        let rate_row = row_start - RATE_ROW_ABOVE;
        let rate_cell = grid.cell_or_empty(rate_row, 0);
        let output_rate = rate_cell
            .to_integer()
            .filter(|rate| *rate > 0)
            .ok_or_else(|| {
                ProbeError::InvalidLayout(format!(
                    "'{batch}' has no positive output rate at row {rate_row} (found '{rate_cell}')"
                ))
            })?;

        let header_row = |above: usize| {
            grid.row(row_start - above)
                .map(<[Cell]>::to_vec)
                .unwrap_or_default()
        };

        let layout = Self {
            name: batch.to_owned(),
            row_start,
            frame_start,
            output_rate,
            param_names: header_row(PARAM_ROW_ABOVE),
            sub_param_names: header_row(SUB_PARAM_ROW_ABOVE),
        };
        tracing::debug!(
            "Batch '{batch}' located: data from row {row_start}, frame {frame_start} @ {output_rate} fps"
        );
        Ok(layout)
    }

    /// Row holding the frame nearest to `time`.
    ///
    /// # Errors
    ///
    /// [`ProbeError::InvalidTimeRow`] when `time` is not finite, precedes
    /// the batch's first frame, or lands outside the addressable rows.
    pub fn try_time_to_row(&self, time: f64) -> Result<usize> {
        let invalid = || ProbeError::InvalidTimeRow {
            time,
            row_start: self.row_start,
        };
        if !time.is_finite() {
            return Err(invalid());
        }

        let frame = (time * self.output_rate as f64).round();
        if !frame.is_finite() || frame.abs() >= i64::MAX as f64 {
            return Err(invalid());
        }

        let row_start = i64::try_from(self.row_start).map_err(|_| invalid())?;
        let row = (frame as i64)
            .checked_sub(self.frame_start)
            .and_then(|offset| offset.checked_add(row_start))
            .ok_or_else(invalid)?;
        if row < row_start {
            return Err(invalid());
        }
        usize::try_from(row).map_err(|_| invalid())
    }

    /// Like [`BatchLayout::try_time_to_row`], reporting the failure and
    /// returning `None` so the caller can skip.
    pub fn time_to_row(&self, time: f64) -> Option<usize> {
        match self.try_time_to_row(time) {
            Ok(row) => Some(row),
            Err(e) => {
                tracing::warn!("Batch '{}': {e}", self.name);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    /// Anchor at row 5 so the first data row is row 10.
    fn model_outputs(frame_start: i64, frames: usize) -> Grid {
        let mut rows: Vec<Vec<String>> = (0..5).map(|i| vec![format!("filler {i}")]).collect();
        rows.push(vec!["Model Outputs".to_owned()]);
        rows.push(vec!["100".to_owned()]);
        rows.push(vec![String::new(), String::new(), "Sub01:LAnkleAngles".to_owned()]);
        rows.push(vec!["Frame".to_owned(), "Sub Frame".to_owned(), "X".to_owned()]);
        rows.push(vec![String::new(), String::new(), "deg".to_owned()]);
        for i in 0..frames {
            let frame = frame_start + i as i64;
            rows.push(vec![frame.to_string(), "0".to_owned(), format!("{}", frame * 2)]);
        }
        Grid::from_text(rows)
    }

    #[test]
    fn test_locate() {
        let layout = BatchLayout::locate(&model_outputs(1, 20), "Model Outputs").unwrap();
        assert_eq!(layout.row_start, 10);
        assert_eq!(layout.frame_start, 1);
        assert_eq!(layout.output_rate, 100);
        assert_eq!(
            layout.param_names.get(2),
            Some(&Cell::Text("Sub01:LAnkleAngles".to_owned()))
        );
        assert_eq!(layout.sub_param_names.get(2), Some(&Cell::Text("X".to_owned())));
    }

    #[test]
    fn test_missing_batch() {
        let err = BatchLayout::locate(&model_outputs(1, 5), "Joints").unwrap_err();
        assert!(matches!(err, ProbeError::AnchorNotFound { .. }));
    }

    #[test]
    fn test_missing_frame_number() {
        let grid = Grid::from_text([vec!["Joints"], vec!["100"], vec![""], vec![""]]);
        let err = BatchLayout::locate(&grid, "Joints").unwrap_err();
        assert!(matches!(err, ProbeError::InvalidLayout(_)));
    }

    #[test]
    fn test_time_to_row() {
        let layout = BatchLayout::locate(&model_outputs(0, 120), "Model Outputs").unwrap();
        assert_eq!(layout.try_time_to_row(0.0).unwrap(), 10);
        assert_eq!(layout.try_time_to_row(1.0).unwrap(), 110);
        assert_eq!(layout.try_time_to_row(1.23).unwrap(), 133);
    }

    #[test]
    fn test_time_to_row_with_frame_offset() {
        let layout = BatchLayout::locate(&model_outputs(1, 20), "Model Outputs").unwrap();
        assert_eq!(layout.try_time_to_row(0.01).unwrap(), 10);
        assert_eq!(layout.try_time_to_row(0.1).unwrap(), 19);
    }

    #[test]
    fn test_time_before_first_frame() {
        let layout = BatchLayout::locate(&model_outputs(5, 20), "Model Outputs").unwrap();
        let err = layout.try_time_to_row(0.01).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidTimeRow { row_start: 10, .. }));
        assert_eq!(layout.time_to_row(0.01), None);
        assert_eq!(layout.time_to_row(f64::NAN), None);
    }

    #[test]
    fn test_extreme_time_is_invalid_row() {
        let layout = BatchLayout::locate(&model_outputs(0, 5), "Model Outputs").unwrap();
        for time in [1e300, -1e300, 1e17, f64::MAX] {
            let err = layout.try_time_to_row(time).unwrap_err();
            assert!(matches!(err, ProbeError::InvalidTimeRow { .. }), "{time}: {err}");
        }
    }

    #[test]
    fn test_extreme_frame_start_is_invalid_row() {
        let mut layout = BatchLayout::locate(&model_outputs(0, 5), "Model Outputs").unwrap();
        layout.frame_start = i64::MIN;
        assert!(matches!(
            layout.try_time_to_row(0.0),
            Err(ProbeError::InvalidTimeRow { .. })
        ));
        layout.frame_start = i64::MAX;
        assert!(layout.try_time_to_row(0.0).is_err());
    }

    #[test]
    fn test_out_of_range_frame_cell_rejected() {
        let mut rows: Vec<Vec<String>> = vec![
            vec!["Model Outputs".to_owned()],
            vec!["100".to_owned()],
            vec![String::new()],
            vec![String::new()],
            vec![String::new()],
        ];
        rows.push(vec!["-1e30".to_owned(), "0".to_owned(), "1".to_owned()]);
        let err = BatchLayout::locate(&Grid::from_text(rows), "Model Outputs").unwrap_err();
        assert!(matches!(err, ProbeError::InvalidLayout(_)));
    }

    #[test]
    fn test_time_to_row_monotonic() {
        let layout = BatchLayout::locate(&model_outputs(0, 5), "Model Outputs").unwrap();
        let rows: Vec<usize> = (0..500)
            .map(|i| layout.try_time_to_row(f64::from(i) * 0.0037).unwrap())
            .collect();
        assert!(rows.windows(2).all(|w| w[0] <= w[1]));
    }
}
