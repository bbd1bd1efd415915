//! Error types for the visualization pipeline.
//!
//! This module provides the error taxonomy used throughout the crate,
//! together with helper constructors for creating well-structured errors
//! with appropriate context.
//!
//! The propagation policy is deliberately lenient: no error in processing
//! one page is allowed to abort a batch run. Only structural failures
//! (an unwritable output directory) are fatal. Per-region problems are
//! surfaced as warnings attributable to a specific file and never raised
//! past the page boundary.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while processing PAGE documents and images.
#[derive(Error, Debug)]
pub enum VizError {
    /// The layout document could not be parsed as structured markup at all.
    ///
    /// The whole file is skipped; remaining files are unaffected.
    #[error("malformed PAGE document '{path}': {reason}")]
    MalformedDocument { path: PathBuf, reason: String },

    /// A single region lacks usable coordinate data.
    ///
    /// This is warning-level: the region is still counted in statistics
    /// but skipped during rendering.
    #[error("region '{region_id}' has no usable geometry: {reason}")]
    RegionGeometry { region_id: String, reason: String },

    /// No matching raster image exists for a layout document.
    #[error("image file not found: {path}")]
    MissingImage { path: PathBuf },

    /// No matching layout document exists for a raster image.
    #[error("PAGE document not found: {path}")]
    MissingDocument { path: PathBuf },

    /// An auxiliary resource (e.g. a font) could not be loaded.
    ///
    /// Never fatal: callers substitute a fallback and continue.
    #[error("resource unavailable: {resource}")]
    ResourceUnavailable { resource: String },

    /// An image could not be loaded from disk.
    #[error("failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// An image could not be written to disk.
    #[error("failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// An I/O operation failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Convenient result alias for visualization operations.
pub type VizResult<T> = Result<T, VizError>;

impl VizError {
    /// Creates a `MalformedDocument` error for the given path.
    pub fn malformed_document(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a warning-level `RegionGeometry` error.
    pub fn region_geometry(region_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RegionGeometry {
            region_id: region_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `MissingImage` error for the given path.
    pub fn missing_image(path: impl Into<PathBuf>) -> Self {
        Self::MissingImage { path: path.into() }
    }

    /// Creates a `MissingDocument` error for the given path.
    pub fn missing_document(path: impl Into<PathBuf>) -> Self {
        Self::MissingDocument { path: path.into() }
    }

    /// Creates a `ResourceUnavailable` error with a description of the resource.
    pub fn resource_unavailable(resource: impl Into<String>) -> Self {
        Self::ResourceUnavailable {
            resource: resource.into(),
        }
    }

    /// Creates an `ImageLoad` error for the given path.
    pub fn image_load(path: &Path, source: image::ImageError) -> Self {
        Self::ImageLoad {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates an `ImageSave` error for the given path.
    pub fn image_save(path: &Path, source: image::ImageError) -> Self {
        Self::ImageSave {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Wraps an I/O error with free-form context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates an `InvalidConfig` error with the given message.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_geometry_display() {
        let err = VizError::region_geometry("r12", "only 1 point");
        assert_eq!(
            err.to_string(),
            "region 'r12' has no usable geometry: only 1 point"
        );
    }

    #[test]
    fn test_malformed_document_names_the_file() {
        let err = VizError::malformed_document("xml/page_001.xml", "no root element found");
        assert!(err.to_string().contains("page_001.xml"));
    }
}
