//! Gait extraction from a loaded grid.
//!
//! ```text
//! grid ──> events::extract_gait_events ──> timestamps ─┐
//!   │                                                   │
//!   └──> layout::BatchLayout::locate ──> series::plan_columns
//!                                                │
//!                            extract_batch <─────┘
//!                                 │  slice rows per gait, coerce, process
//!                                 v
//!                            BatchSeries
//! ```

pub mod events;
pub mod layout;
pub mod series;


pub use events::{FOOT_STRIKE, GaitEvent, extract_gait_events};
pub use layout::BatchLayout;
pub use series::{ChannelColumn, ParameterColumns, parameter_name, plan_columns};

use crate::config::NonNumericPolicy;
use crate::dataset::{BatchSeries, Channel, GaitParameters, ParameterSeries};
use crate::error::{ProbeError, Result};
use crate::grid::CellGrid;
use crate::process::SeriesProcessor;
use std::ops::RangeInclusive;

/// Extract every parameter of `batch` for every gait in `timestamps`.
///
/// Each sub-parameter column is sliced from the start row to the end row
/// (inclusive) of each gait, coerced to floats and passed through
/// `processor`. A gait whose times fall before the batch data gets empty
/// series.
///
/// # Errors
///
/// - [`ProbeError::AnchorNotFound`] / [`ProbeError::InvalidLayout`] when the
///   batch header cannot be located.
/// - [`ProbeError::NonNumericCell`] for the first text cell inside any slice,
///   unless `policy` is [`NonNumericPolicy::SkipCell`].
pub fn extract_batch<G, P>(
    grid: &G,
    batch: &str,
    timestamps: &[GaitEvent],
    processor: &P,
    policy: NonNumericPolicy,
) -> Result<BatchSeries>
where
    G: CellGrid + ?Sized,
    P: SeriesProcessor + ?Sized,
{
    let layout = BatchLayout::locate(grid, batch)?;
    let plan = plan_columns(&layout);

    let mut gaits = Vec::with_capacity(timestamps.len());
    for (index, gait) in timestamps.iter().enumerate() {
        let rows = gait_rows(&layout, gait);
        if rows.is_none() {
            tracing::warn!("Gait {index} of batch '{batch}' is left empty");
        }

        let mut parameters = Vec::with_capacity(plan.len());
        for columns in &plan {
            let mut parameter = ParameterSeries::new(columns.name.clone());
            for channel in &columns.channels {
                let values = match &rows {
                    Some(rows) => {
                        processor.process(read_column(grid, rows.clone(), channel.column, policy)?)
                    }
                    None => Vec::new(),
                };
                parameter.channels.push(Channel {
                    name: channel.name.clone(),
                    values,
                });
            }
            parameters.push(parameter);
        }
        gaits.push(GaitParameters::new(parameters));
    }

    Ok(BatchSeries {
        name: batch.to_owned(),
        gaits,
    })
}

fn gait_rows(layout: &BatchLayout, gait: &GaitEvent) -> Option<RangeInclusive<usize>> {
    let start = layout.time_to_row(gait.start)?;
    let end = layout.time_to_row(gait.end)?;
    Some(start..=end)
}

/// Coerce one column over `rows`; rows past the end of the grid are ignored.
fn read_column<G>(
    grid: &G,
    rows: RangeInclusive<usize>,
    column: usize,
    policy: NonNumericPolicy,
) -> Result<Vec<f64>>
where
    G: CellGrid + ?Sized,
{
    let row_count = grid.row_count();
    let mut values = Vec::new();

    for row in rows.take_while(|row| *row < row_count) {
        let cell = grid.cell_or_empty(row, column);
        match (cell.to_f64(), policy) {
            (Some(value), _) => values.push(value),
            (None, NonNumericPolicy::AbortBatch) => {
                return Err(ProbeError::NonNumericCell {
                    row,
                    column,
                    value: cell.to_string(),
                });
            }
            (None, NonNumericPolicy::SkipCell) => {
                let skipped = ProbeError::MalformedSeriesInput {
                    row,
                    column,
                    value: cell.to_string(),
                };
                tracing::warn!("{skipped}");
            }
        }
    }

    Ok(values)
}
