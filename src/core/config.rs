//! Configuration for visualization runs.
//!
//! This module provides the serde-backed configuration structure shared by
//! the library pipeline and the command-line binary, along with explicit
//! validation. Directory layout and defaults mirror the conventional
//! `images/` + `xml/` + `output/` arrangement of PAGE corpora.

use crate::core::errors::{VizError, VizResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default font size for region labels, in pixels.
pub const DEFAULT_FONT_SIZE: u32 = 60;

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_xml_dir() -> PathBuf {
    PathBuf::from("xml")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

fn default_true() -> bool {
    true
}

/// Configuration for a visualization run.
///
/// Deserializable from JSON so that color tables and directory layouts can
/// be supplied from a file, and buildable in code for library use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageVizConfig {
    /// Directory containing the raster page images.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Directory containing the PAGE XML documents.
    #[serde(default = "default_xml_dir")]
    pub xml_dir: PathBuf,

    /// Directory that receives overlay images and statistics tables.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Font size for region labels. Applies to the whole image; there is
    /// no shrink-to-fit.
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Optional path to a TrueType font. When absent or unloadable, system
    /// fonts are probed and label drawing degrades gracefully.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,

    /// Whether overlay images are written.
    #[serde(default = "default_true")]
    pub overlays: bool,

    /// Whether the statistics tables are written at the end of the run.
    #[serde(default = "default_true")]
    pub stats: bool,

    /// Optional overrides for the region-type color table, as RGB triples
    /// keyed by region type. Types not listed keep their built-in color.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub colors: HashMap<String, [u8; 3]>,
}

impl Default for PageVizConfig {
    fn default() -> Self {
        Self {
            images_dir: default_images_dir(),
            xml_dir: default_xml_dir(),
            output_dir: default_output_dir(),
            font_size: DEFAULT_FONT_SIZE,
            font_path: None,
            overlays: true,
            stats: true,
            colors: HashMap::new(),
        }
    }
}

impl PageVizConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields take their defaults, so a file only needs the
    /// values it wants to change.
    pub fn from_json_file(path: &Path) -> VizResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VizError::io(format!("reading config '{}'", path.display()), e))?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            VizError::invalid_config(format!("config '{}': {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is usable, or `VizError::InvalidConfig`
    /// describing the first problem found.
    pub fn validate(&self) -> VizResult<()> {
        if self.font_size == 0 {
            return Err(VizError::invalid_config("font size must be greater than 0"));
        }
        if self.images_dir.as_os_str().is_empty() {
            return Err(VizError::invalid_config("images directory must not be empty"));
        }
        if self.xml_dir.as_os_str().is_empty() {
            return Err(VizError::invalid_config("xml directory must not be empty"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(VizError::invalid_config("output directory must not be empty"));
        }
        Ok(())
    }

    /// Creates the output directory if it does not exist.
    ///
    /// This is the one structural requirement of a run: failure here is
    /// fatal to the whole batch.
    pub fn ensure_output_dir(&self) -> VizResult<()> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            VizError::io(
                format!("creating output directory '{}'", self.output_dir.display()),
                e,
            )
        })
    }
}
