#![deny(clippy::all)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![deny(clippy::style)]
#![deny(clippy::print_stdout)]
#![deny(clippy::cast_lossless)]

use std::{fs, path::PathBuf};

use clap::Parser;
use color_eyre::Report;
use log::{debug, info, warn};
use pixelmap::{Axis, ModelConfig};
use strum::IntoEnumIterator;

/// Builds an installation model from a description file and reports its geometry.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Model description (JSON). Created empty if it does not exist.
    #[clap(short, long, default_value = "model.json")]
    config: PathBuf,

    /// Write the model summary as JSON to this file.
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Log every point position at debug level.
    #[clap(long)]
    points: bool,
}

fn main() -> Result<(), Report> {
    setup_logging()?;

    let args = Args::parse();

    if !args.config.exists() {
        warn!(
            "No model description at {}, writing an empty one",
            args.config.display()
        );
        fs::write(
            &args.config,
            serde_json::to_string_pretty(&ModelConfig::default())?,
        )?;
    }

    let config = ModelConfig::from_file(&args.config)?;
    let model = config.build()?;

    info!(
        "Model has {} points across {} fixtures",
        model.size(),
        model.fixtures().len()
    );
    info!("Center {}", model.centroid());
    for axis in Axis::iter() {
        let bounds = model.bounds(axis);
        info!(
            "{}: min {} max {} range {}",
            axis, bounds.min, bounds.max, bounds.range
        );
    }

    if args.points {
        for (index, point) in model.points().iter().enumerate() {
            debug!("{} {}", index, point);
        }
    }

    if let Some(output) = args.output {
        fs::write(&output, serde_json::to_string_pretty(&model.summary())?)?;
        info!("Wrote summary to {}", output.display());
    }

    Ok(())
}

fn setup_logging() -> Result<(), Report> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "1");
    }
    color_eyre::install()?;

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "pixelmap=info");
    }
    env_logger::init();

    Ok(())
}
