//! Batch orchestration over a corpus of (image, document) pairs.
//!
//! Pairs are embarrassingly parallel: each page's pipeline shares no
//! mutable state with its siblings, so a rayon worker pool executes them
//! concurrently. Workers hand their per-file contributions to the
//! coordinating thread over a channel; the coordinator performs the only
//! shared-state mutation, folding contributions into the single
//! [`CorpusStatistics`] in the order results arrive. Export row order
//! therefore reflects completion order and is not deterministic across
//! concurrent runs.
//!
//! No error in one page halts its siblings. The statistics tables are
//! written once, after all workers join.

use crate::core::config::PageVizConfig;
use crate::core::errors::{VizError, VizResult};
use crate::export;
use crate::pipeline::page::{PageOutcome, PageTask, process_page};
use crate::pipeline::stats::CorpusStatistics;
use crate::utils::visualization::RenderSpec;
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tracing::{error, info, warn};

/// Image extensions probed when pairing a document with its scan, in
/// preference order.
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "tif", "tiff"];

/// Outcome counts for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Number of document files dispatched.
    pub processed: usize,
    /// Number of pages that completed their pipeline.
    pub succeeded: usize,
    /// Number of pages skipped or failed.
    pub failed: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {} of {} files successfully ({} failed)",
            self.succeeded, self.processed, self.failed
        )
    }
}

/// Finds the raster image matching a document base name, probing the
/// known extensions.
pub fn find_page_image(images_dir: &Path, base_name: &str) -> Option<PathBuf> {
    IMAGE_EXTENSIONS.iter().find_map(|ext| {
        let candidate = images_dir.join(format!("{base_name}.{ext}"));
        candidate.exists().then_some(candidate)
    })
}

/// Lists the PAGE documents of a corpus in name order.
fn list_documents(xml_dir: &Path) -> VizResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(xml_dir)
        .map_err(|e| VizError::io(format!("reading xml directory '{}'", xml_dir.display()), e))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Runs the full corpus: every document in the XML directory paired with
/// its image, processed on a worker pool, statistics folded by the
/// coordinator and flushed at the end.
///
/// # Errors
///
/// Only structural failures are returned: an invalid configuration, an
/// unreadable XML directory, an uncreatable output directory, or a
/// failure writing the final tables. Per-page errors are logged, counted
/// in the summary, and never abort the run.
pub fn run_batch(config: &PageVizConfig) -> VizResult<BatchSummary> {
    config.validate()?;
    config.ensure_output_dir()?;

    let documents = list_documents(&config.xml_dir)?;
    if documents.is_empty() {
        warn!("no XML files found in '{}'", config.xml_dir.display());
        return Ok(BatchSummary::default());
    }
    info!("processing {} files...", documents.len());

    let spec = RenderSpec::from_config(config);
    let mut summary = BatchSummary {
        processed: documents.len(),
        ..BatchSummary::default()
    };
    let mut corpus = CorpusStatistics::new();

    let (tx, rx) = mpsc::channel::<(String, VizResult<PageOutcome>)>();
    rayon::scope(|scope| {
        scope.spawn(|_| {
            documents.par_iter().for_each_with(tx, |tx, xml_path| {
                let base_name = xml_path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let result = process_document(xml_path, &base_name, config, &spec);
                // The coordinator only disappears on a structural failure;
                // a worker result with nowhere to go can be dropped.
                let _ = tx.send((base_name, result));
            });
        });

        // Fold contributions in arrival order. The channel closes once
        // every worker has finished.
        for (base_name, result) in &rx {
            match result {
                Ok(outcome) => {
                    summary.succeeded += 1;
                    corpus.absorb(outcome.stats, outcome.sequence);
                }
                Err(e) => {
                    summary.failed += 1;
                    error!("error processing {base_name}: {e}");
                }
            }
        }
    });

    info!("{summary}");

    if config.stats && corpus.file_count() > 0 {
        export::write_tables(&corpus, &config.output_dir)?;
    }

    Ok(summary)
}

/// Processes one document of the batch: pairs it with its image and runs
/// the page pipeline.
fn process_document(
    xml_path: &Path,
    base_name: &str,
    config: &PageVizConfig,
    spec: &RenderSpec,
) -> VizResult<PageOutcome> {
    let image_path = find_page_image(&config.images_dir, base_name).ok_or_else(|| {
        VizError::missing_image(config.images_dir.join(format!("{base_name}.jpg")))
    })?;
    let task = PageTask {
        base_name,
        image_path: &image_path,
        xml_path,
        output_dir: &config.output_dir,
        write_overlay: config.overlays,
    };
    process_page(&task, spec)
}

/// Runs a single page by base name, the non-batch entry point.
///
/// The overlay is always rendered; the statistics tables are written only
/// when `write_stats` is set.
pub fn run_single(config: &PageVizConfig, base_name: &str, write_stats: bool) -> VizResult<()> {
    config.validate()?;
    config.ensure_output_dir()?;

    let xml_path = config.xml_dir.join(format!("{base_name}.xml"));
    let image_path = find_page_image(&config.images_dir, base_name)
        .ok_or_else(|| VizError::missing_image(config.images_dir.join(format!("{base_name}.jpg"))))?;

    let spec = RenderSpec::from_config(config);
    let task = PageTask {
        base_name,
        image_path: &image_path,
        xml_path: &xml_path,
        output_dir: &config.output_dir,
        write_overlay: true,
    };
    let outcome = process_page(&task, &spec)?;

    if write_stats {
        let mut corpus = CorpusStatistics::new();
        corpus.absorb(outcome.stats, outcome.sequence);
        export::write_tables(&corpus, &config.output_dir)?;
    }
    info!("processing complete");
    Ok(())
}
