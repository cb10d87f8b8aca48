#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for converting and measuring utility survey geometry.
//!
//! ```text
//! load_map_cli layers <ETGIS_Data.json> [--layer fences|underground|overhead]
//! load_map_cli bounds <ETGIS_Data.json>
//! load_map_cli miles <route.geojson | -> [--json]
//! ```
//!
//! `--config <path>` (or `LOAD_MAP_CONFIG`) points at a TOML override of
//! the embedded defaults. Set `RUST_LOG=debug` to see skipped geometry.

use std::io::Read as _;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use load_map_gis::{
    build_dataset_layers, calculate_total_miles_with, compute_bounds,
    config::{default_config, load_config},
    dataset::load_dataset,
};
use load_map_gis_models::GisConfig;

#[derive(Parser)]
#[command(
    name = "load_map_cli",
    about = "Convert utility survey geometry to GeoJSON and measure routes"
)]
struct Cli {
    /// TOML config override
    #[arg(long, global = true, env = "LOAD_MAP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a dataset's display layers as GeoJSON, one collection per line
    Layers {
        /// Path to the raw GIS export
        dataset: PathBuf,
        /// Only print this layer
        #[arg(long, value_enum)]
        layer: Option<Layer>,
    },
    /// Print the map extent of a dataset as JSON
    Bounds {
        /// Path to the raw GIS export
        dataset: PathBuf,
    },
    /// Measure the total route length of a GeoJSON document
    Miles {
        /// GeoJSON file, or `-` for stdin
        input: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Layer {
    Fences,
    Underground,
    Overhead,
}

fn resolve_config(path: Option<&Path>) -> Result<GisConfig, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => load_config(path)?,
        None => default_config(),
    })
}

fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(input)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Layers { dataset, layer } => {
            let dataset = load_dataset(&dataset)?;
            let layers = build_dataset_layers(&dataset, &config.layers);

            match layer {
                Some(Layer::Fences) => println!("{}", layers.fences),
                Some(Layer::Underground) => println!("{}", layers.underground),
                Some(Layer::Overhead) => println!("{}", layers.overhead),
                None => {
                    println!("{}", layers.fences);
                    println!("{}", layers.underground);
                    println!("{}", layers.overhead);
                }
            }
        }
        Commands::Bounds { dataset } => {
            let dataset = load_dataset(&dataset)?;

            if let Some(bounds) = compute_bounds(&dataset) {
                println!("{}", serde_json::to_string(&bounds)?);
            } else {
                eprintln!("Dataset has no geometry and no request criteria");
                std::process::exit(1);
            }
        }
        Commands::Miles { input, json } => {
            let text = read_input(&input)?;
            let length = calculate_total_miles_with(&text, &config.measure);
            log::info!("Measured {} point(s) from {input}", length.points);

            if json {
                println!("{}", serde_json::to_string(&length)?);
            } else {
                println!(
                    "{:.3} miles across {} point(s)",
                    length.miles, length.points
                );
            }
        }
    }

    Ok(())
}
