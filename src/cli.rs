use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use vicon_probe::config::{NonNumericPolicy, ProbeConfig};
use vicon_probe::dataset::GaitDataset;
use vicon_probe::extract::{BatchLayout, extract_gait_events, plan_columns};
use vicon_probe::grid::read_grid;
use vicon_probe::process::{DEFAULT_POINT_NUM, DEFAULT_THRESHOLD_NUM, ProcessorConfig};

#[derive(Parser)]
#[command(
    name = "vicon-probe",
    about = "Extract per-gait parameter series from Vicon CSV exports"
)]
pub struct Cli {
    /// More console output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write rotating log files to this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract gait series from one or more exports and write them as JSON
    Extract {
        /// Export files (CSV)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Batch to extract; repeat for several. Defaults to the config's batches.
        #[arg(short, long = "batch")]
        batches: Vec<String>,

        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Resample every series to this many points
        #[arg(long, conflicts_with = "raw")]
        points: Option<usize>,

        /// Series shorter than this are left unresampled
        #[arg(long, conflicts_with = "raw")]
        threshold: Option<usize>,

        /// Keep series exactly as sliced from the file
        #[arg(long)]
        raw: bool,

        /// Skip non-numeric cells instead of dropping the whole batch
        #[arg(long)]
        lenient: bool,

        /// Output file. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the gait cycles found in each export
    Gaits {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Event marker bounding each gait. Defaults to the config's marker.
        #[arg(long)]
        marker: Option<String>,

        #[command(flatten)]
        grid: GridArgs,
    },
    /// Show where a batch sits in an export and which parameters it holds
    Layout {
        file: PathBuf,

        #[arg(short, long, default_value = "Model Outputs")]
        batch: String,

        #[command(flatten)]
        grid: GridArgs,
    },
    /// Write the default configuration as JSON
    InitConfig {
        /// Output file. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// How exports are read, shared by the inspection commands.
#[derive(Args)]
pub struct GridArgs {
    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Columns read from each row. Defaults to the config's value.
    #[arg(long)]
    max_columns: Option<usize>,
}

impl GridArgs {
    fn resolve(&self) -> Result<ProbeConfig> {
        let mut config = match &self.config {
            Some(path) => ProbeConfig::from_file(path)?,
            None => ProbeConfig::default(),
        };
        if let Some(max_columns) = self.max_columns {
            config.max_columns = max_columns;
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Extract {
            files,
            batches,
            config,
            points,
            threshold,
            raw,
            lenient,
            output,
        } => {
            let config = build_config(config.as_deref(), batches, points, threshold, raw, lenient)?;
            handle_extract(&files, &config, output.as_deref())
        }
        Commands::Gaits {
            files,
            marker,
            grid,
        } => {
            let mut config = grid.resolve()?;
            if let Some(marker) = marker {
                config.event_marker = marker;
            }
            handle_gaits(&files, &config)
        }
        Commands::Layout { file, batch, grid } => handle_layout(&file, &batch, &grid.resolve()?),
        Commands::InitConfig { output } => {
            let config = ProbeConfig::default();
            match output {
                Some(path) => {
                    config.to_file(&path)?;
                    tracing::info!("Configuration written to {}", path.display());
                }
                None => println!("{}", config.to_json()?),
            }
            Ok(())
        }
    }
}

/// Config file (or defaults) with command-line overrides applied on top.
fn build_config(
    path: Option<&Path>,
    batches: Vec<String>,
    points: Option<usize>,
    threshold: Option<usize>,
    raw: bool,
    lenient: bool,
) -> Result<ProbeConfig> {
    let mut config = match path {
        Some(path) => ProbeConfig::from_file(path)?,
        None => ProbeConfig::default(),
    };

    if !batches.is_empty() {
        config.batches = batches;
    }
    if raw {
        config.processor = ProcessorConfig::Identity;
    } else if points.is_some() || threshold.is_some() {
        let (base_points, base_threshold) = match config.processor {
            ProcessorConfig::Interpolate {
                point_num,
                threshold_num,
            } => (point_num, threshold_num),
            ProcessorConfig::Identity => (DEFAULT_POINT_NUM, DEFAULT_THRESHOLD_NUM),
        };
        config.processor = ProcessorConfig::interpolate(
            points.unwrap_or(base_points),
            threshold.unwrap_or(base_threshold),
        );
    }
    if lenient {
        config.non_numeric = NonNumericPolicy::SkipCell;
    }

    config.validate()?;
    Ok(config)
}

fn handle_extract(files: &[PathBuf], config: &ProbeConfig, output: Option<&Path>) -> Result<()> {
    let mut datasets = Vec::with_capacity(files.len());
    for file in files {
        match GaitDataset::load(file, config) {
            Ok(dataset) => datasets.push(dataset),
            Err(e) => tracing::warn!("{} skipped: {e}", file.display()),
        }
    }
    if datasets.is_empty() {
        anyhow::bail!("None of the {} input file(s) could be read", files.len());
    }

    let json = serde_json::to_string_pretty(&datasets).context("Failed to serialize datasets")?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("{} dataset(s) written to {}", datasets.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn handle_gaits(files: &[PathBuf], config: &ProbeConfig) -> Result<()> {
    for file in files {
        let grid = read_grid(file, config.max_columns)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let gaits = extract_gait_events(&grid, &config.event_marker);

        println!("{}: {} gait(s)", file.display(), gaits.len());
        for (i, gait) in gaits.iter().enumerate() {
            println!(
                "  {i:>3}  {:>8.3}s -> {:>8.3}s  ({:.3}s)",
                gait.start,
                gait.end,
                gait.duration()
            );
        }
    }
    Ok(())
}

fn handle_layout(file: &Path, batch: &str, config: &ProbeConfig) -> Result<()> {
    let grid = read_grid(file, config.max_columns)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let layout = BatchLayout::locate(&grid, batch)?;

    println!("Batch:       {}", layout.name);
    println!("First row:   {}", layout.row_start);
    println!("First frame: {}", layout.frame_start);
    println!("Rate:        {} fps", layout.output_rate);
    for parameter in plan_columns(&layout) {
        let channels: Vec<String> = parameter
            .channels
            .iter()
            .map(|c| format!("{}@{}", c.name, c.column))
            .collect();
        println!("  {:<24} {}", parameter.name, channels.join(" "));
    }
    Ok(())
}
