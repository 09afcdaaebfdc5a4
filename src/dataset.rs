//! The assembled per-file result: gait timestamps plus, for every extracted
//! batch, `gait -> parameter -> sub-parameter -> series`.
//!
//! Parameters and sub-parameters keep the column order of the export, which is
//! what downstream sheet writers lay out. JSON serialization renders the
//! nested levels as ordered objects:
//!
//! ```json
//! { "LAnkleAngles": { "X": [1.0, 2.0], "Y": [0.5, 1.0] } }
//! ```

use crate::config::ProbeConfig;
use crate::error::Result;
use crate::extract::{GaitEvent, extract_batch, extract_gait_events};
use crate::grid::{CellGrid, read_grid};
use serde::ser::{SerializeMap as _, Serializer};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One sub-parameter column sliced to one gait.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Channel {
    pub name: String,
    pub values: Vec<f64>,
}

/// A parameter and its sub-parameter series, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSeries {
    pub name: String,
    pub channels: Vec<Channel>,
}

impl ParameterSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channels: Vec::new(),
        }
    }

    pub fn channel(&self, name: &str) -> Option<&[f64]> {
        self.channels
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.name.as_str())
    }
}

impl Serialize for ParameterSeries {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.channels.len()))?;
        for channel in &self.channels {
            map.serialize_entry(&channel.name, &channel.values)?;
        }
        map.end()
    }
}

/// All parameters of one batch for one gait cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GaitParameters {
    parameters: Vec<ParameterSeries>,
}

impl GaitParameters {
    pub fn new(parameters: Vec<ParameterSeries>) -> Self {
        Self { parameters }
    }

    pub fn get(&self, parameter: &str) -> Option<&ParameterSeries> {
        self.parameters.iter().find(|p| p.name == parameter)
    }

    pub fn series(&self, parameter: &str, sub_parameter: &str) -> Option<&[f64]> {
        self.get(parameter)?.channel(sub_parameter)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParameterSeries> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl<'a> IntoIterator for &'a GaitParameters {
    type Item = &'a ParameterSeries;
    type IntoIter = std::slice::Iter<'a, ParameterSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for GaitParameters {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.parameters.len()))?;
        for parameter in &self.parameters {
            map.serialize_entry(&parameter.name, parameter)?;
        }
        map.end()
    }
}

/// One batch ("Joints", "Model Outputs", ...) across all gaits.
///
/// `gaits` is indexed like the dataset's timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSeries {
    pub name: String,
    pub gaits: Vec<GaitParameters>,
}

impl BatchSeries {
    pub fn gait(&self, index: usize) -> Option<&GaitParameters> {
        self.gaits.get(index)
    }

    pub fn series(&self, gait: usize, parameter: &str, sub_parameter: &str) -> Option<&[f64]> {
        self.gait(gait)?.series(parameter, sub_parameter)
    }

    /// Parameter names in column order, across all gaits.
    pub fn parameter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for parameter in self.gaits.iter().flat_map(GaitParameters::iter) {
            if !names.contains(&parameter.name.as_str()) {
                names.push(&parameter.name);
            }
        }
        names
    }

    /// One parameter's series for every gait, in gait order.
    ///
    /// Gaits lacking the parameter yield `None` and are reported; `label`
    /// identifies the recording in that report.
    pub fn collect_parameter(&self, label: &str, parameter: &str) -> Vec<Option<&ParameterSeries>> {
        self.gaits
            .iter()
            .enumerate()
            .map(|(index, gait)| {
                let found = gait.get(parameter);
                if found.is_none() {
                    tracing::warn!(
                        "{label} - {} - {parameter} not found (Gait {index})",
                        self.name
                    );
                }
                found
            })
            .collect()
    }
}

impl Serialize for BatchSeries {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(&self.gaits)
    }
}

/// A batch that was requested but reported and left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub batch: String,
    pub reason: String,
}

/// Everything extracted from one export file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaitDataset {
    pub source: PathBuf,
    /// Recording label: the file name up to its first `.`.
    pub condition: String,
    pub timestamps: Vec<GaitEvent>,
    #[serde(serialize_with = "serialize_batches")]
    pub batches: Vec<BatchSeries>,
    pub failures: Vec<BatchFailure>,
}

fn serialize_batches<S>(batches: &[BatchSeries], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(batches.len()))?;
    for batch in batches {
        map.serialize_entry(&batch.name, batch)?;
    }
    map.end()
}

impl GaitDataset {
    /// Load and extract one export file.
    ///
    /// # Errors
    ///
    /// Only an unreadable grid is an error. Batch-level problems are logged
    /// and recorded in [`GaitDataset::failures`].
    pub fn load(path: &Path, config: &ProbeConfig) -> Result<Self> {
        let span = tracing::info_span!("load", path = %path.display());
        let _guard = span.enter();

        let grid = read_grid(path, config.max_columns)?;
        let dataset = Self::from_grid(&grid, path, config);
        tracing::info!(
            "{} loaded: {} gaits, {}/{} batches",
            dataset.condition,
            dataset.gait_count(),
            dataset.batches.len(),
            config.batches.len()
        );
        Ok(dataset)
    }

    /// Extract from an already loaded grid. Never fails; see [`GaitDataset::load`].
    pub fn from_grid<G>(grid: &G, source: impl Into<PathBuf>, config: &ProbeConfig) -> Self
    where
        G: CellGrid + ?Sized,
    {
        let source = source.into();
        let condition = condition_label(&source);
        let timestamps = extract_gait_events(grid, &config.event_marker);

        let mut batches = Vec::new();
        let mut failures = Vec::new();
        for name in &config.batches {
            match extract_batch(grid, name, &timestamps, &config.processor, config.non_numeric) {
                Ok(batch) => batches.push(batch),
                Err(e) => {
                    tracing::warn!(
                        "Batch '{name}' of {} skipped, please check data completeness: {e}",
                        source.display()
                    );
                    failures.push(BatchFailure {
                        batch: name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Self {
            source,
            condition,
            timestamps,
            batches,
            failures,
        }
    }

    pub fn gait_count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn batch(&self, name: &str) -> Option<&BatchSeries> {
        self.batches.iter().find(|b| b.name == name)
    }
}

/// File name up to its first `.`, e.g. `walk fast 1.csv` -> `walk fast 1`.
pub fn condition_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_owned))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, channels: Vec<(&str, Vec<f64>)>) -> ParameterSeries {
        ParameterSeries {
            name: name.to_owned(),
            channels: channels
                .into_iter()
                .map(|(sub, values)| Channel {
                    name: sub.to_owned(),
                    values,
                })
                .collect(),
        }
    }

    #[test]
    fn test_condition_label() {
        assert_eq!(condition_label(Path::new("data/S01/walk fast 1.csv")), "walk fast 1");
        assert_eq!(condition_label(Path::new("trial.v2.csv")), "trial");
        assert_eq!(condition_label(Path::new("")), "");
    }

    #[test]
    fn test_series_lookup() {
        let batch = BatchSeries {
            name: "Model Outputs".to_owned(),
            gaits: vec![GaitParameters::new(vec![param(
                "LAnkleAngles",
                vec![("X", vec![1.0, 2.0])],
            )])],
        };
        assert_eq!(batch.series(0, "LAnkleAngles", "X"), Some(&[1.0, 2.0][..]));
        assert_eq!(batch.series(0, "LAnkleAngles", "Y"), None);
        assert_eq!(batch.series(1, "LAnkleAngles", "X"), None);
    }

    #[test]
    fn test_parameter_names_in_column_order() {
        let batch = BatchSeries {
            name: "Model Outputs".to_owned(),
            gaits: vec![
                GaitParameters::new(vec![
                    param("RKneeMoment", vec![]),
                    param("LAnkleAngles", vec![]),
                ]),
                GaitParameters::new(vec![
                    param("RKneeMoment", vec![]),
                    param("CentreOfMass", vec![]),
                ]),
            ],
        };
        assert_eq!(
            batch.parameter_names(),
            vec!["RKneeMoment", "LAnkleAngles", "CentreOfMass"]
        );
    }

    #[test]
    fn test_collect_parameter_tolerates_missing() {
        let batch = BatchSeries {
            name: "Joints".to_owned(),
            gaits: vec![
                GaitParameters::new(vec![param("Root_LowerBack", vec![("RX", vec![0.5])])]),
                GaitParameters::default(),
            ],
        };
        let collected = batch.collect_parameter("walk 1", "Root_LowerBack");
        assert_eq!(collected.len(), 2);
        assert!(collected[0].is_some());
        assert!(collected[1].is_none());
    }

    #[test]
    fn test_json_keeps_column_order() {
        let batch = BatchSeries {
            name: "Model Outputs".to_owned(),
            gaits: vec![GaitParameters::new(vec![
                param("RKneeMoment", vec![("Z", vec![1.0]), ("X", vec![f64::NAN])]),
                param("LAnkleAngles", vec![("X", vec![2.0])]),
            ])],
        };
        let json = serde_json::to_string(&batch).unwrap();
        assert_eq!(
            json,
            r#"[{"RKneeMoment":{"Z":[1.0],"X":[null]},"LAnkleAngles":{"X":[2.0]}}]"#
        );
    }
}
