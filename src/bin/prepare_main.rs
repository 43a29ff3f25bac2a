//! `biomech-prepare` binary: discover subjects, materialize windows and
//! report what was built.
//!
//! # Usage
//!
//! ```bash
//! biomech-prepare ./data/train --window-size 50
//! biomech-prepare --config biomech.toml --subjects 0,2 --skip-skeletons
//! ```

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use biomech_windows::config::{ConfigLoader, HarmonizationPolicy};
use biomech_windows::dataset::{PrepareStats, WindowedDataset};
use biomech_windows::source::JsonRecordingSource;

/// Command-line arguments for the preparation binary.
#[derive(Parser, Debug)]
#[command(
    name = "biomech-prepare",
    version,
    about = "Build subject-aligned training windows from biomechanics recordings",
    long_about = None
)]
struct Args {
    /// Recording directory or single recording; overrides `dataset.data_path`.
    data_path: Option<PathBuf>,

    /// TOML configuration file. Defaults to biomech.toml and biomech.local.toml.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Frames per window.
    #[arg(short, long)]
    window_size: Option<usize>,

    /// Comma-separated subject indices to prepare (default: all).
    #[arg(long, value_delimiter = ',')]
    subjects: Option<Vec<usize>>,

    /// Merge contact bodies across all subjects instead of the first one.
    #[arg(long, default_value_t = false)]
    union_contact_bodies: bool,

    /// Do not load skeletons.
    #[arg(long, default_value_t = false)]
    skip_skeletons: bool,

    /// Keep only the first two subjects.
    #[arg(long, default_value_t = false)]
    short: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
struct Summary<'a> {
    subjects: usize,
    num_dofs: usize,
    num_joints: usize,
    contact_bodies: &'a [String],
    window_size: usize,
    stats: &'a PrepareStats,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level_filter = args
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(log_level_filter)
        .with_target(false)
        .init();

    info!("{} v{}", biomech_windows::NAME, biomech_windows::VERSION);

    let loader = match args.config {
        Some(path) => {
            let loader = ConfigLoader::with_paths(vec![path.clone()]);
            loader.validate_config_file(&path)?;
            loader
        }
        None => ConfigLoader::new(),
    };
    let mut config = loader.load()?;

    if let Some(path) = args.data_path {
        config.dataset.data_path = path;
    }
    if let Some(window_size) = args.window_size {
        config.dataset.window_size = window_size;
    }
    if args.union_contact_bodies {
        config.harmonization.policy = HarmonizationPolicy::Union;
    }
    if args.skip_skeletons {
        config.dataset.skip_loading_skeletons = true;
    }
    if args.short {
        config.dataset.testing_with_short_dataset = true;
    }
    info!("Configuration: {:?}", config.get_summary());

    let mut dataset = WindowedDataset::new(JsonRecordingSource::new(), config)?;
    let stats = dataset.prepare_data_for_subset(args.subjects.as_deref())?.clone();

    let summary = Summary {
        subjects: dataset.num_subjects(),
        num_dofs: dataset.num_dofs(),
        num_joints: dataset.num_joints(),
        contact_bodies: dataset.registry().names(),
        window_size: dataset.config().dataset.window_size,
        stats: &stats,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
