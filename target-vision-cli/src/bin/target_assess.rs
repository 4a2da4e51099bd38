//! Command line quality check and preprocessing for paper target photos.
//!
//! Subcommands:
//! - `assess`: score one or more photos and report accept/reject
//! - `preprocess`: run the full pipeline on one photo and write the grids

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use target_vision::pipeline::preprocess;
use target_vision::ImageSize;
use target_vision_cli::cli_config::{
    all_accepted, assess_config, preprocess_config, should_preprocess, ConfigOverrides,
};
use target_vision_cli::report::{
    assess_file, assess_grid, load_grid, write_preprocessed, ImageReport,
};

#[derive(Parser, Debug)]
#[command(name = "target_assess")]
#[command(about = "Quality gate and preprocessing for photographed paper targets")]
#[command(version)]
struct Args {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score photos and report which ones are good enough to process
    Assess {
        /// Photos to assess
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Pipeline configuration JSON (thresholds and segmenter tuning)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print one JSON object per photo instead of a text line
        #[arg(long)]
        json: bool,
    },

    /// Equalize a photo and write edge and background maps
    Preprocess {
        /// Photo to preprocess
        image: PathBuf,

        /// Disk radius for background estimation, in pixels
        #[arg(short, long)]
        radius: Option<usize>,

        /// Pipeline configuration JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for enhanced.png, edges.png, background.png and assessment.json
        #[arg(short, long, default_value = "preprocessed")]
        out_dir: PathBuf,

        /// Preprocess even when the quality gate rejects the photo
        #[arg(long)]
        force: bool,

        /// CLAHE clip limit
        #[arg(long)]
        clip_limit: Option<f64>,

        /// CLAHE tile size in pixels
        #[arg(long)]
        tile_size: Option<usize>,

        /// Divisor applied to Sobel magnitudes
        #[arg(long)]
        edge_scale: Option<f64>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_assess(images: &[PathBuf], config: Option<&Path>, json: bool) -> Result<ExitCode> {
    let config = assess_config(config)?;

    info!("Assessing {} photo(s)", images.len());
    let results: Vec<Result<ImageReport>> = images
        .par_iter()
        .map(|path| assess_file(path, &config))
        .collect();

    for (path, result) in images.iter().zip(&results) {
        match result {
            Ok(report) if json => println!("{}", serde_json::to_string(report)?),
            Ok(report) => println!("{report}"),
            Err(err) => error!("{}: {:#}", path.display(), err),
        }
    }

    Ok(if all_accepted(&results) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_preprocess(
    image: &Path,
    config: Option<&Path>,
    overrides: &ConfigOverrides,
    out_dir: &Path,
    force: bool,
) -> Result<ExitCode> {
    let config = preprocess_config(config, overrides)?;

    let grid = load_grid(image)?;
    let report = assess_grid(image, &grid, &config);
    println!("{report}");

    if !should_preprocess(&report.verdict, force) {
        warn!("Photo rejected by the quality gate; use --force to preprocess anyway");
        return Ok(ExitCode::FAILURE);
    }
    if !report.verdict.is_accepted() {
        warn!("Photo rejected by the quality gate; preprocessing anyway (--force)");
    }

    let preprocessed = preprocess(&grid.view(), &config);
    write_preprocessed(out_dir, &preprocessed, &report)?;

    info!(
        "Wrote {} grids (opening radius {}) to {}",
        ImageSize::of_grid(&grid.view()),
        config.opening_radius,
        out_dir.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Assess {
            images,
            config,
            json,
        } => cmd_assess(&images, config.as_deref(), json),
        Command::Preprocess {
            image,
            radius,
            config,
            out_dir,
            force,
            clip_limit,
            tile_size,
            edge_scale,
        } => {
            let overrides = ConfigOverrides {
                radius,
                clip_limit,
                tile_size,
                edge_scale,
            };
            cmd_preprocess(&image, config.as_deref(), &overrides, &out_dir, force)
        }
    }
}
