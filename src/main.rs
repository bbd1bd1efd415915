//! Command-line entry point for the PAGE region visualizer.
//!
//! Thin plumbing around the library pipeline: argument parsing, logging
//! setup, and mode selection (single page vs. whole corpus).

use clap::Parser;
use page_viz::core::config::{DEFAULT_FONT_SIZE, PageVizConfig};
use page_viz::pipeline::{run_batch, run_single};
use page_viz::utils::init_tracing;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Process PAGE XML files and generate region visualizations and
/// statistics.
#[derive(Debug, Parser)]
#[command(name = "page-viz", version, about)]
struct Cli {
    /// Base name of the file to process (single-file mode).
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    base_name: Option<String>,

    /// Process all XML files in the XML directory.
    #[arg(long)]
    all: bool,

    /// Font size for region labels.
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    font_size: u32,

    /// Path to a TrueType font for region labels.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Generate the statistics tables in single-file mode.
    #[arg(long, conflicts_with = "all")]
    stats: bool,

    /// Do not create overlay images (batch mode).
    #[arg(long, requires = "all")]
    no_overlays: bool,

    /// Do not create the statistics tables (batch mode).
    #[arg(long, requires = "all")]
    no_stats: bool,

    /// Directory containing the raster page images.
    #[arg(long, default_value = "images")]
    images_dir: PathBuf,

    /// Directory containing the PAGE XML documents.
    #[arg(long, default_value = "xml")]
    xml_dir: PathBuf,

    /// Directory receiving overlays and statistics tables.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// JSON configuration file; replaces the directory, font, and color
    /// settings above.
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["images_dir", "xml_dir", "output_dir", "font_size", "font"]
    )]
    config: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> page_viz::core::VizResult<(PageVizConfig, Option<String>, bool)> {
        let mut config = match &self.config {
            Some(path) => PageVizConfig::from_json_file(path)?,
            None => PageVizConfig {
                images_dir: self.images_dir,
                xml_dir: self.xml_dir,
                output_dir: self.output_dir,
                font_size: self.font_size,
                font_path: self.font,
                ..PageVizConfig::default()
            },
        };
        config.overlays = !self.no_overlays;
        config.stats = !self.no_stats;
        Ok((config, self.base_name, self.stats))
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let batch = cli.all;
    let (config, base_name, single_stats) = match cli.into_config() {
        Ok(parts) => parts,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if batch {
        match run_batch(&config) {
            Ok(summary) if summary.processed == 0 => {
                error!("no XML files found");
                ExitCode::FAILURE
            }
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{e}");
                ExitCode::FAILURE
            }
        }
    } else {
        // Clap guarantees a base name when --all is absent.
        let base_name = base_name.unwrap_or_default();
        match run_single(&config, &base_name, single_stats) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("processing failed: {e}");
                ExitCode::FAILURE
            }
        }
    }
}
