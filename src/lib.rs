//! # page-viz
//!
//! A library and command-line tool that turns PAGE XML layout annotations
//! and their scanned page images into visual overlays and tabular
//! statistics, for quick visual QA of automatically or manually generated
//! layout annotations.
//!
//! ## Components
//!
//! - **Parsing**: PAGE documents become an ordered [`DocumentLayout`] of
//!   typed regions with reading-order ranks and raw geometry
//! - **Geometry**: raw points resolve into polygon or rectangle shapes,
//!   with graceful degradation for damaged regions
//! - **Rendering**: shapes, colors, and labels drawn onto a copy of the
//!   page image
//! - **Statistics**: per-file counts and reading-order sequences folded
//!   into corpus-wide tables
//! - **Export**: tab-separated `region_counts` and `region_sequences`
//!   reports
//!
//! ## Modules
//!
//! * [`core`] - Error handling and run configuration
//! * [`domain`] - Region, shape, and layout types
//! * [`parser`] - PAGE XML reading
//! * [`pipeline`] - Per-page processing, batch orchestration, statistics
//! * [`export`] - Tabular report writers
//! * [`utils`] - Image helpers, overlay rendering, logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use page_viz::prelude::*;
//!
//! # fn main() -> VizResult<()> {
//! let image = load_image(std::path::Path::new("images/page_001.jpg"))?;
//! let xml = std::fs::read_to_string("xml/page_001.xml").unwrap();
//! let layout = parse_document(&xml, "page_001.xml")?;
//!
//! let spec = RenderSpec::with_system_font(48);
//! let overlay = render_overlay(&image, &layout, &spec);
//! overlay.save("output/page_001_overlay.jpg").unwrap();
//!
//! let mut corpus = CorpusStatistics::new();
//! corpus.fold_document("page_001", &layout);
//! export::write_counts_table(&corpus, std::io::stdout())?;
//! # Ok(())
//! # }
//! ```
//!
//! [`DocumentLayout`]: domain::DocumentLayout

pub mod core;
pub mod domain;
pub mod export;
pub mod parser;
pub mod pipeline;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use page_viz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{PageVizConfig, VizError, VizResult};
    pub use crate::domain::{DocumentLayout, Point, Region, RegionShape};
    pub use crate::export;
    pub use crate::parser::parse_document;
    pub use crate::pipeline::{BatchSummary, CorpusStatistics, run_batch, run_single};
    pub use crate::utils::{RenderSpec, load_image, render_overlay};
}
