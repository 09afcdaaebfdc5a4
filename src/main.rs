//! # vicon-probe command line entry point
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Install tracing subscriber (stderr, optional rolling file)
//!   └─> Execute the subcommand
//! ```
//!
//! ```bash
//! vicon-probe extract "walk 1.csv" "walk 2.csv" --points 100 -o gaits.json
//! vicon-probe gaits "walk 1.csv"
//! vicon-probe layout "walk 1.csv" -b Joints
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // CLI output goes to stdout

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    vicon_probe::logging::init(cli.log_level(), cli.log_dir.as_deref())?;

    cli::run_command(cli.command)
}
