//! # vicon-probe - Gait Cycle Extraction for Vicon Exports
//!
//! Reads the CSV exports written by Vicon Nexus and cuts every requested
//! data batch (`Joints`, `Model Outputs`, ...) into one slice per gait
//! cycle, as delimited by consecutive `Foot Strike` events.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vicon_probe::config::ProbeConfig;
//! use vicon_probe::dataset::GaitDataset;
//! use vicon_probe::process::ProcessorConfig;
//!
//! # fn example() -> vicon_probe::error::Result<()> {
//! let mut config = ProbeConfig::default();
//! config.processor = ProcessorConfig::interpolate(100, 50);
//!
//! let dataset = GaitDataset::load("walk 1.csv".as_ref(), &config)?;
//! if let Some(batch) = dataset.batch("Model Outputs") {
//!     for (i, gait) in batch.gaits.iter().enumerate() {
//!         let knee = gait.series("RKneeAngles", "X").unwrap_or_default();
//!         println!("gait {i}: {} samples", knee.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`grid`]: the file as a table of untyped cells, plus cell search
//! - [`extract`]: gait events, batch header layout, per-gait column slicing
//! - [`process`]: per-series post-processing (identity or resampling)
//! - [`dataset`]: the assembled per-file result
//! - [`config`]: JSON configuration
//! - [`error`]: error type and context helpers
//! - [`logging`]: tracing subscriber setup

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod grid;
pub mod logging;
pub mod process;
