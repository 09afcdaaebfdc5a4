//! Example: Resample Gait Cycles
//!
//! This example demonstrates how to:
//! 1. Load a Vicon export with the default configuration
//! 2. Compare raw and time-normalised gait series
//! 3. Inspect batches that could not be extracted
//!
//! Run with: cargo run --example resample_walk -- "testdata/walk 1.csv"

use std::path::PathBuf;
use vicon_probe::config::ProbeConfig;
use vicon_probe::dataset::GaitDataset;
use vicon_probe::process::ProcessorConfig;

fn main() -> anyhow::Result<()> {
    vicon_probe::logging::init("warn", None)?;

    let path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("testdata/walk 1.csv"), PathBuf::from);

    println!("=== vicon-probe resampling example ===\n");

    // 1. Raw slices
    let raw = GaitDataset::load(&path, &ProbeConfig::default())?;
    println!("1. {}: {} gait(s)", raw.condition, raw.gait_count());
    for gait in &raw.timestamps {
        println!("   {:.2}s -> {:.2}s", gait.start, gait.end);
    }

    // 2. Time-normalised to 5 points
    let mut config = ProbeConfig::default();
    config.processor = ProcessorConfig::interpolate(5, 4);
    let resampled = GaitDataset::load(&path, &config)?;

    println!("\n2. Raw vs resampled series");
    for batch in &raw.batches {
        for parameter in batch.parameter_names() {
            for (i, gait) in batch.gaits.iter().enumerate() {
                let Some(series) = gait.get(parameter) else {
                    continue;
                };
                for channel in series.channel_names() {
                    let before = series.channel(channel).unwrap_or_default();
                    let after = resampled
                        .batch(&batch.name)
                        .and_then(|b| b.series(i, parameter, channel))
                        .unwrap_or_default();
                    println!(
                        "   {}/{parameter}/{channel} gait {i}: {} -> {} samples {after:?}",
                        batch.name,
                        before.len(),
                        after.len()
                    );
                }
            }
        }
    }

    // 3. Failures
    println!("\n3. Batches left out");
    for failure in &raw.failures {
        println!("   {}: {}", failure.batch, failure.reason);
    }

    Ok(())
}
