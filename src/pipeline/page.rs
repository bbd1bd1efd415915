//! Single-page processing: parse, render, collect statistics.
//!
//! One page's pipeline is fully synchronous: load the image, parse the
//! PAGE document, render the overlay (unless disabled), and collect the
//! page's statistics contribution. Regions are discarded when the page
//! completes; only the derived contribution survives.

use crate::core::errors::{VizError, VizResult};
use crate::pipeline::stats::{FileStats, SequenceRecord};
use crate::utils::visualization::{RenderSpec, render_overlay};
use crate::utils::{load_image, overlay_path, save_image};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Inputs for processing one (image, document) pair.
#[derive(Debug, Clone)]
pub struct PageTask<'a> {
    /// Base name shared by the image and the document, used in reports.
    pub base_name: &'a str,
    /// Path to the raster page image.
    pub image_path: &'a Path,
    /// Path to the PAGE XML document.
    pub xml_path: &'a Path,
    /// Directory receiving the overlay image.
    pub output_dir: &'a Path,
    /// Whether the overlay image is rendered and written.
    pub write_overlay: bool,
}

/// The per-page result handed back to the coordinator.
#[derive(Debug, Clone)]
pub struct PageOutcome {
    /// The page's counts contribution.
    pub stats: FileStats,
    /// The page's reading-order contribution.
    pub sequence: SequenceRecord,
    /// Where the overlay image was written, if rendering was enabled.
    pub overlay_path: Option<PathBuf>,
}

/// Processes one (image, document) pair.
///
/// # Errors
///
/// Returns [`VizError::MissingImage`] / [`VizError::MissingDocument`] when
/// either side of the pair is absent, [`VizError::MalformedDocument`] when
/// the document cannot be parsed at all, and image I/O errors when the
/// image cannot be read or the overlay cannot be written. Per-region
/// damage never fails the page.
pub fn process_page(task: &PageTask<'_>, spec: &RenderSpec) -> VizResult<PageOutcome> {
    if !task.xml_path.exists() {
        return Err(VizError::missing_document(task.xml_path));
    }
    if !task.image_path.exists() {
        return Err(VizError::missing_image(task.image_path));
    }

    let content = std::fs::read_to_string(task.xml_path).map_err(|e| {
        VizError::io(format!("reading '{}'", task.xml_path.display()), e)
    })?;
    let layout = crate::parser::parse_document(&content, task.base_name)?;

    let overlay_dest = if task.write_overlay {
        let image = load_image(task.image_path)?;
        let overlay = render_overlay(&image, &layout, spec);
        let dest = overlay_path(task.output_dir, task.image_path);
        save_image(&overlay, &dest)?;
        info!("saved overlay image: {}", dest.display());
        Some(dest)
    } else {
        debug!("overlay creation skipped for {}", task.base_name);
        None
    };

    let outcome = PageOutcome {
        stats: FileStats::collect(task.base_name, &layout),
        sequence: SequenceRecord::collect(task.base_name, &layout),
        overlay_path: overlay_dest,
    };
    Ok(outcome)
}
