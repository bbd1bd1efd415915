//! Utility functions for the visualization pipeline.
//!
//! This module provides image loading helpers, the overlay renderer, and
//! logging setup.

pub mod image;
pub mod visualization;

pub use image::{load_image, overlay_path, save_image};
pub use visualization::{RenderSpec, render_overlay};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
