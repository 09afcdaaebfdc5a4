//! Post-processing applied to every extracted series.
//!
//! Extraction is parameterized by a [`SeriesProcessor`]. Two are provided:
//! [`Identity`] keeps the coerced samples untouched, [`Interpolator`] drops
//! non-finite samples and resamples the rest to a fixed length with
//! piecewise-linear interpolation.

use serde::{Deserialize, Serialize};

/// Default resampled length.
pub const DEFAULT_POINT_NUM: usize = 100;

/// Default minimum number of valid samples required before resampling.
pub const DEFAULT_THRESHOLD_NUM: usize = 50;

/// Turns one raw series into its processed form.
pub trait SeriesProcessor {
    fn process(&self, series: Vec<f64>) -> Vec<f64>;
}

/// Pass-through processor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl SeriesProcessor for Identity {
    fn process(&self, series: Vec<f64>) -> Vec<f64> {
        series
    }
}

/// NaN removal followed by fixed-length linear resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpolator {
    /// Output length of a resampled series.
    pub point_num: usize,
    /// Series with fewer valid samples than this are returned unresampled.
    pub threshold_num: usize,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self {
            point_num: DEFAULT_POINT_NUM,
            threshold_num: DEFAULT_THRESHOLD_NUM,
        }
    }
}

impl Interpolator {
    pub fn new(point_num: usize, threshold_num: usize) -> Self {
        Self {
            point_num,
            threshold_num,
        }
    }
}

impl SeriesProcessor for Interpolator {
    fn process(&self, series: Vec<f64>) -> Vec<f64> {
        let cleaned: Vec<f64> = series.into_iter().filter(|v| v.is_finite()).collect();

        // Too short or too sparse: passed through at its own length.
        if cleaned.len() < self.threshold_num || cleaned.len() < 2 {
            return cleaned;
        }

        resample_linear(&cleaned, self.point_num)
    }
}

/// Evaluate the linear interpolant of `samples` (taken at positions
/// `0..len`) at `point_num` evenly spaced positions spanning `[0, len - 1]`.
///
/// Both endpoints are reproduced exactly when `point_num >= 2`.
pub fn resample_linear(samples: &[f64], point_num: usize) -> Vec<f64> {
    let Some((&first, _)) = samples.split_first() else {
        return Vec::new();
    };
    if point_num == 0 {
        return Vec::new();
    }
    let last_index = samples.len() - 1;
    if point_num == 1 || last_index == 0 {
        return vec![first; point_num];
    }

    let span = last_index as f64;
    let step = span / (point_num - 1) as f64;

    (0..point_num)
        .map(|i| {
            let x = if i == point_num - 1 {
                span
            } else {
                i as f64 * step
            };
            let lower = (x.floor() as usize).min(last_index);
            let frac = x - lower as f64;
            let a = samples.get(lower).copied().unwrap_or(first);
            match samples.get(lower + 1) {
                Some(&b) if frac > 0.0 => a + (b - a) * frac,
                _ => a,
            }
        })
        .collect()
}

/// Processor selection as it appears in configuration files.
///
/// ```json
/// { "kind": "interpolate", "point_num": 100, "threshold_num": 50 }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcessorConfig {
    #[default]
    Identity,
    Interpolate {
        point_num: usize,
        threshold_num: usize,
    },
}

impl ProcessorConfig {
    pub fn interpolate(point_num: usize, threshold_num: usize) -> Self {
        Self::Interpolate {
            point_num,
            threshold_num,
        }
    }
}

impl SeriesProcessor for ProcessorConfig {
    fn process(&self, series: Vec<f64>) -> Vec<f64> {
        match *self {
            Self::Identity => Identity.process(series),
            Self::Interpolate {
                point_num,
                threshold_num,
            } => Interpolator::new(point_num, threshold_num).process(series),
        }
    }
}
