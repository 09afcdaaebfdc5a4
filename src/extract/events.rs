//! Gait-cycle boundaries from event markers.
//!
//! Every consecutive pair of markers (1st + 2nd, 3rd + 4th, ...) bounds one
//! gait cycle, regardless of what other events sit between them. The time is
//! the cell immediately right of each marker.

use crate::grid::{CellGrid, CellPosition, all_matches};
use serde::{Deserialize, Serialize};

/// Marker text of the event that opens and closes a gait cycle.
pub const FOOT_STRIKE: &str = "Foot Strike";

/// Start and end time of one gait cycle, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaitEvent {
    pub start: f64,
    pub end: f64,
}

impl GaitEvent {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Pair up all `marker` cells of the grid into gait cycles, in file order.
///
/// Fewer than two markers yields no gaits. An odd trailing marker is dropped.
/// Pairs with unreadable or non-increasing times are reported and skipped.
pub fn extract_gait_events<G>(grid: &G, marker: &str) -> Vec<GaitEvent>
where
    G: CellGrid + ?Sized,
{
    let markers = all_matches(grid, marker);
    if markers.len() < 2 {
        tracing::warn!(
            "Found {} '{marker}' event(s); at least 2 are needed to form a gait",
            markers.len()
        );
        return Vec::new();
    }
    if markers.len() % 2 == 1 {
        tracing::debug!(
            "Odd number of '{marker}' events ({}); trailing event at row {} dropped",
            markers.len(),
            markers.last().map_or(0, |p| p.row)
        );
    }

    markers
        .chunks_exact(2)
        .enumerate()
        .filter_map(|(index, pair)| {
            let [start, end] = pair else {
                return None;
            };
            let event = GaitEvent {
                start: event_time(grid, *start)?,
                end: event_time(grid, *end)?,
            };
            if event.start < event.end {
                Some(event)
            } else {
                tracing::warn!(
                    "Gait pair {index} ends before it starts ({} >= {}); skipped",
                    event.start,
                    event.end
                );
                None
            }
        })
        .collect()
}

fn event_time<G>(grid: &G, marker: CellPosition) -> Option<f64>
where
    G: CellGrid + ?Sized,
{
    let cell = grid.cell_or_empty(marker.row, marker.column + 1);
    match cell.to_f64() {
        Some(time) if time.is_finite() => Some(time),
        _ => {
            tracing::warn!(
                "Event at row {} has no usable time (found '{cell}'); pair skipped",
                marker.row
            );
            None
        }
    }
}
