//! Column planning for a batch.
//!
//! The parameter row names a parameter once, above its first column; the
//! sub-parameter row names every column. Planning turns those two rows into
//! an explicit list of parameters with the columns that belong to each,
//! before any data is read.

use super::layout::BatchLayout;
use crate::grid::Cell;

/// Columns 0 and 1 hold the frame and sub-frame numbers.
pub const FIRST_PARAMETER_COLUMN: usize = 2;

/// Separates the device/subject prefix from the parameter name.
pub const NAME_DELIMITER: char = ':';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelColumn {
    pub name: String,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterColumns {
    pub name: String,
    pub channels: Vec<ChannelColumn>,
}

/// Parameter name of a header cell such as `Sub01:LAnkleAngles`.
///
/// The second `:`-separated segment is used; a header without a delimiter
/// is used whole.
pub fn parameter_name(header: &str) -> &str {
    header.split(NAME_DELIMITER).nth(1).unwrap_or(header).trim()
}

/// Walk the header rows left to right and group sub-parameter columns
/// under the parameter most recently named.
///
/// A parameter whose header appears again is reset in place, keeping its
/// original position. A parameter with no sub-parameter columns is kept
/// with an empty channel list.
pub fn plan_columns(layout: &BatchLayout) -> Vec<ParameterColumns> {
    let width = layout.param_names.len().max(layout.sub_param_names.len());
    let mut plan: Vec<ParameterColumns> = Vec::new();
    let mut current: Option<usize> = None;

    for column in FIRST_PARAMETER_COLUMN..width {
        if let Some(header) = layout.param_names.get(column).and_then(Cell::as_text) {
            let name = parameter_name(header);
            let index = match plan.iter().position(|p| p.name == name) {
                Some(existing) => {
                    if let Some(parameter) = plan.get_mut(existing) {
                        parameter.channels.clear();
                    }
                    existing
                }
                None => {
                    plan.push(ParameterColumns {
                        name: name.to_owned(),
                        channels: Vec::new(),
                    });
                    plan.len() - 1
                }
            };
            current = Some(index);
        }

        if let Some(sub_name) = layout.sub_param_names.get(column).and_then(Cell::as_text) {
            match current.and_then(|i| plan.get_mut(i)) {
                Some(parameter) => parameter.channels.push(ChannelColumn {
                    name: sub_name.to_owned(),
                    column,
                }),
                None => tracing::warn!(
                    "Batch '{}': column {column} ('{sub_name}') has no parameter header; skipped",
                    layout.name
                ),
            }
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(params: &[&str], subs: &[&str]) -> BatchLayout {
        BatchLayout {
            name: "Model Outputs".to_owned(),
            row_start: 10,
            frame_start: 1,
            output_rate: 100,
            param_names: params.iter().map(|s| Cell::parse(s)).collect(),
            sub_param_names: subs.iter().map(|s| Cell::parse(s)).collect(),
        }
    }

    fn names(plan: &[ParameterColumns]) -> Vec<(&str, Vec<(&str, usize)>)> {
        plan.iter()
            .map(|p| {
                (
                    p.name.as_str(),
                    p.channels.iter().map(|c| (c.name.as_str(), c.column)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_parameter_name() {
        assert_eq!(parameter_name("Sub01:LAnkleAngles"), "LAnkleAngles");
        assert_eq!(parameter_name("Device1:LAnkleAngles"), "LAnkleAngles");
        assert_eq!(parameter_name("a:b:c"), "b");
        assert_eq!(parameter_name("CentreOfMass"), "CentreOfMass");
    }

    #[test]
    fn test_plan_groups_columns() {
        let plan = plan_columns(&layout(
            &["", "", "Sub01:LAnkleAngles", "", "", "Sub01:RKneeMoment", "", ""],
            &["Frame", "Sub Frame", "X", "Y", "Z", "X", "Y", "Z"],
        ));
        assert_eq!(
            names(&plan),
            vec![
                ("LAnkleAngles", vec![("X", 2), ("Y", 3), ("Z", 4)]),
                ("RKneeMoment", vec![("X", 5), ("Y", 6), ("Z", 7)]),
            ]
        );
    }

    #[test]
    fn test_frame_columns_ignored() {
        let plan = plan_columns(&layout(&["Sub01:Ignored", "Sub01:Ignored"], &["Frame", "Sub Frame"]));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_parameter_without_channels() {
        let plan = plan_columns(&layout(&["", "", "Sub01:Empty", "Sub01:Full"], &["", "", "", "X"]));
        assert_eq!(
            names(&plan),
            vec![("Empty", vec![]), ("Full", vec![("X", 3)])]
        );
    }

    #[test]
    fn test_orphan_channel_skipped() {
        let plan = plan_columns(&layout(&["", "", "", "Sub01:A"], &["", "", "X", "Y"]));
        assert_eq!(names(&plan), vec![("A", vec![("Y", 3)])]);
    }

    #[test]
    fn test_repeated_header_resets_in_place() {
        let plan = plan_columns(&layout(
            &["", "", "S:A", "S:B", "S:A"],
            &["", "", "X", "X", "Z"],
        ));
        assert_eq!(names(&plan), vec![("A", vec![("Z", 4)]), ("B", vec![("X", 3)])]);
    }

    #[test]
    fn test_numeric_header_cells_ignored() {
        let plan = plan_columns(&layout(&["", "", "S:A", "7"], &["", "", "X", "1"]));
        assert_eq!(names(&plan), vec![("A", vec![("X", 2)])]);
    }
}
