//! Overlay rendering for PAGE layout annotations.
//!
//! This module draws region shapes, colors, and text labels onto a copy of
//! the source page image. It supports polygon outlines with vertex
//! markers, rectangle fallbacks, and per-type colors with a reserved
//! fallback for unmapped types.
//!
//! # Features
//!
//! - Copy-on-render: the source image is never modified
//! - Per-type colors with a fallback for unknown region types
//! - Labels showing region type and reading-order position, e.g.
//!   `header (1/8)`
//! - Configurable fonts loaded from a path or probed from system
//!   locations, degrading gracefully when none is available
//!
//! # Examples
//!
//! ```rust,no_run
//! use page_viz::utils::visualization::{RenderSpec, render_overlay};
//! # fn main() -> page_viz::core::VizResult<()> {
//! let image = image::open("images/page_001.jpg").unwrap().to_rgb8();
//! let xml = std::fs::read_to_string("xml/page_001.xml").unwrap();
//! let layout = page_viz::parser::parse_document(&xml, "page_001.xml")?;
//! let spec = RenderSpec::with_system_font(48);
//! let overlay = render_overlay(&image, &layout, &spec);
//! overlay.save("output/page_001_overlay.jpg").unwrap();
//! # Ok(())
//! # }
//! ```

use crate::core::config::{DEFAULT_FONT_SIZE, PageVizConfig};
use crate::core::errors::{VizError, VizResult};
use crate::domain::{DocumentLayout, Point, Region, RegionShape};

use ab_glyph::FontVec;
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::rect::Rect;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Radius of the circle drawn at each polygon vertex.
const VERTEX_MARKER_RADIUS: i32 = 5;

/// Offsets used to draw the dark halo behind label text.
const LABEL_HALO_OFFSETS: [(i32, i32); 8] = [
    (-2, -2),
    (-2, 0),
    (-2, 2),
    (0, -2),
    (0, 2),
    (2, -2),
    (2, 0),
    (2, 2),
];

/// Built-in color table for the common PAGE layout types, matching the
/// conventional CSS color names used for them.
fn default_color_table() -> HashMap<String, Rgb<u8>> {
    HashMap::from([
        ("header".to_string(), Rgb([255, 0, 0])),
        ("paragraph".to_string(), Rgb([0, 0, 255])),
        ("catch-word".to_string(), Rgb([0, 128, 0])),
        ("page-number".to_string(), Rgb([255, 255, 0])),
        ("marginalia".to_string(), Rgb([128, 0, 128])),
        ("signature-mark".to_string(), Rgb([255, 165, 0])),
    ])
}

/// Reserved fallback color (pink) for region types without a mapping.
const FALLBACK_COLOR: Rgb<u8> = Rgb([255, 192, 203]);

/// Rendering configuration for one run.
///
/// Holds the region-type color table, the label font, and outline
/// styling. Built fresh per invocation, never persisted.
pub struct RenderSpec {
    /// Mapping from region type to outline/label color.
    pub color_table: HashMap<String, Rgb<u8>>,
    /// Color used for region types missing from the table.
    pub fallback_color: Rgb<u8>,
    /// The font used for labels. If `None`, label drawing is skipped.
    pub font: Option<FontVec>,
    /// Label font size in pixels. One value for the whole image; there is
    /// no shrink-to-fit, overlapping labels are accepted.
    pub font_size: u32,
    /// Thickness of shape outlines in pixels.
    pub outline_thickness: u32,
}

impl Default for RenderSpec {
    fn default() -> Self {
        Self {
            color_table: default_color_table(),
            fallback_color: FALLBACK_COLOR,
            font: None,
            font_size: DEFAULT_FONT_SIZE,
            outline_thickness: 3,
        }
    }
}

impl RenderSpec {
    /// Creates a RenderSpec with a font loaded from the specified path.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::ResourceUnavailable`] if the font file cannot
    /// be read or parsed.
    pub fn with_font_path(font_path: &Path, font_size: u32) -> VizResult<Self> {
        let font_data = std::fs::read(font_path).map_err(|e| {
            VizError::resource_unavailable(format!("font '{}': {e}", font_path.display()))
        })?;
        let font = FontVec::try_from_vec(font_data).map_err(|_| {
            VizError::resource_unavailable(format!(
                "font '{}': not a parsable font file",
                font_path.display()
            ))
        })?;

        Ok(Self {
            font: Some(font),
            font_size,
            ..Self::default()
        })
    }

    /// Creates a RenderSpec with a system font.
    ///
    /// Probes common system font locations. When none can be loaded the
    /// spec still renders shapes; labels are skipped with a warning.
    pub fn with_system_font(font_size: u32) -> Self {
        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
            "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];

        for path in &font_paths {
            if let Ok(font_data) = std::fs::read(path)
                && let Ok(font) = FontVec::try_from_vec(font_data)
            {
                info!("loaded system font: {path}");
                return Self {
                    font: Some(font),
                    font_size,
                    ..Self::default()
                };
            }
        }

        warn!(
            "{}",
            VizError::resource_unavailable("no system font found, region labels will be skipped")
        );
        Self {
            font_size,
            ..Self::default()
        }
    }

    /// Builds a RenderSpec from a run configuration.
    ///
    /// A configured font path that fails to load falls back to the system
    /// font probe rather than failing the run.
    pub fn from_config(config: &PageVizConfig) -> Self {
        let mut spec = match &config.font_path {
            Some(path) => Self::with_font_path(path, config.font_size).unwrap_or_else(|e| {
                warn!("{e}; falling back to system font");
                Self::with_system_font(config.font_size)
            }),
            None => Self::with_system_font(config.font_size),
        };
        for (region_type, rgb) in &config.colors {
            spec.color_table.insert(region_type.clone(), Rgb(*rgb));
        }
        spec
    }

    /// Looks up the color for a region type, falling back to the reserved
    /// color for unmapped types.
    pub fn color_for(&self, region_type: &str) -> Rgb<u8> {
        self.color_table
            .get(region_type)
            .copied()
            .unwrap_or(self.fallback_color)
    }
}

/// Renders the layout overlay onto a copy of the source image.
///
/// Regions are drawn in reading order with their type color; the label
/// next to each region's anchor point shows its type, its 1-based
/// reading-order position, and the document's total region count.
/// Regions without usable geometry are skipped with a warning but do not
/// fail the render.
pub fn render_overlay(
    image: &RgbImage,
    layout: &DocumentLayout,
    spec: &RenderSpec,
) -> RgbImage {
    let mut overlay = image.clone();
    let total = layout.total_regions();

    // Reading-sequence order also determines the label position of
    // unordered regions: they are numbered after all ordered ones.
    for (position, region) in layout.reading_sequence().into_iter().enumerate() {
        draw_region(&mut overlay, region, position + 1, total, spec);
    }

    overlay
}

/// Draws one region's shape and label.
fn draw_region(
    img: &mut RgbImage,
    region: &Region,
    position: usize,
    total: usize,
    spec: &RenderSpec,
) {
    let color = spec.color_for(&region.region_type);
    let shape = region.shape();

    match &shape {
        RegionShape::Polygon(points) => {
            draw_polygon_outline(img, points, color, spec.outline_thickness);
        }
        RegionShape::Rectangle { min, max } => {
            draw_rectangle_outline(img, *min, *max, color, spec.outline_thickness);
        }
        RegionShape::Absent => {
            warn!(
                "{}",
                VizError::region_geometry(&region.id, "skipped during rendering")
            );
            return;
        }
    }

    if let Some(anchor) = shape.anchor() {
        let label = format!("{} ({position}/{total})", region.region_type);
        draw_region_label(img, anchor, &label, color, spec);
    }
}

/// Draws a closed polygon outline with vertex markers.
///
/// Points are used exactly as parsed. Edges are stroked with the
/// configured thickness; `imageproc` clips drawing to the image bounds.
fn draw_polygon_outline(img: &mut RgbImage, points: &[Point], color: Rgb<u8>, thickness: u32) {
    for i in 0..points.len() {
        let start = points[i];
        let end = points[(i + 1) % points.len()];
        draw_thick_line(img, start, end, color, thickness);
    }
    for point in points {
        draw_filled_circle_mut(img, (point.x, point.y), VERTEX_MARKER_RADIUS, color);
    }
}

/// Draws a hollow axis-aligned rectangle with the configured thickness.
fn draw_rectangle_outline(
    img: &mut RgbImage,
    min: Point,
    max: Point,
    color: Rgb<u8>,
    thickness: u32,
) {
    let width = (max.x - min.x).max(1) as u32;
    let height = (max.y - min.y).max(1) as u32;
    for t in 0..thickness as i32 {
        let rect = Rect::at(min.x - t, min.y - t)
            .of_size(width + (2 * t) as u32, height + (2 * t) as u32);
        draw_hollow_rect_mut(img, rect, color);
    }
}

/// Strokes a line segment with the given thickness by drawing offset
/// parallels.
fn draw_thick_line(img: &mut RgbImage, start: Point, end: Point, color: Rgb<u8>, thickness: u32) {
    let half = thickness as i32 / 2;
    for offset in -half..=half {
        // Offset along the minor axis so near-horizontal and
        // near-vertical edges both thicken visibly.
        let (dx, dy) = if (end.x - start.x).abs() >= (end.y - start.y).abs() {
            (0, offset)
        } else {
            (offset, 0)
        };
        draw_line_segment_mut(
            img,
            ((start.x + dx) as f32, (start.y + dy) as f32),
            ((end.x + dx) as f32, (end.y + dy) as f32),
            color,
        );
    }
}

/// Draws a label with a dark halo, choosing black or white text by the
/// region color's brightness.
fn draw_region_label(
    img: &mut RgbImage,
    anchor: Point,
    label: &str,
    color: Rgb<u8>,
    spec: &RenderSpec,
) {
    let Some(ref font) = spec.font else {
        debug!("no font loaded, skipping label '{label}'");
        return;
    };

    let x = anchor.x.max(0);
    let y = anchor.y.max(0);
    let scale = spec.font_size as f32;

    for (dx, dy) in LABEL_HALO_OFFSETS {
        draw_text_mut(img, Rgb([0, 0, 0]), x + dx, y + dy, scale, font, label);
    }

    let Rgb([r, g, b]) = color;
    let brightness = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
    let text_color = if brightness > 128 {
        Rgb([0, 0, 0])
    } else {
        Rgb([255, 255, 255])
    };
    draw_text_mut(img, text_color, x, y, scale, font, label);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Region;

    fn white_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    }

    fn region(region_type: &str, reading_order: Option<u32>, points: Vec<Point>) -> Region {
        Region {
            id: format!("{region_type}-test"),
            region_type: region_type.to_string(),
            reading_order,
            points,
        }
    }

    #[test]
    fn test_render_copies_and_preserves_dimensions() {
        let source = white_image(60, 40);
        let layout = DocumentLayout::new(vec![region(
            "header",
            Some(0),
            vec![Point::new(5, 5), Point::new(50, 5), Point::new(50, 30), Point::new(5, 30)],
        )]);
        let overlay = render_overlay(&source, &layout, &RenderSpec::default());

        assert_eq!(overlay.dimensions(), source.dimensions());
        // Copy-on-render: the source is untouched.
        assert_eq!(*source.get_pixel(20, 5), Rgb([255, 255, 255]));
        // The polygon outline was stroked in the header color.
        assert_eq!(*overlay.get_pixel(20, 5), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_two_point_region_draws_rectangle_outline() {
        let source = white_image(60, 60);
        let layout = DocumentLayout::new(vec![region(
            "paragraph",
            Some(0),
            vec![Point::new(40, 40), Point::new(10, 10)],
        )]);
        let overlay = render_overlay(&source, &layout, &RenderSpec::default());
        // Top edge of the axis-aligned rectangle between the two corners.
        assert_eq!(*overlay.get_pixel(25, 10), Rgb([0, 0, 255]));
        // Interior stays untouched (stroked, not filled).
        assert_eq!(*overlay.get_pixel(25, 25), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_absent_geometry_is_skipped_without_drawing() {
        let source = white_image(30, 30);
        let layout = DocumentLayout::new(vec![region("marginalia", None, vec![Point::new(3, 3)])]);
        let overlay = render_overlay(&source, &layout, &RenderSpec::default());
        assert_eq!(overlay.as_raw(), source.as_raw());
    }

    #[test]
    fn test_out_of_bounds_geometry_does_not_panic() {
        let source = white_image(20, 20);
        let layout = DocumentLayout::new(vec![region(
            "page-number",
            Some(0),
            vec![Point::new(-10, -10), Point::new(60, -10), Point::new(60, 60)],
        )]);
        let overlay = render_overlay(&source, &layout, &RenderSpec::default());
        assert_eq!(overlay.dimensions(), (20, 20));
    }

    #[test]
    fn test_color_lookup_falls_back_for_unmapped_types() {
        let spec = RenderSpec::default();
        assert_eq!(spec.color_for("header"), Rgb([255, 0, 0]));
        assert_eq!(spec.color_for("astronomical-table"), FALLBACK_COLOR);
    }

    #[test]
    fn test_config_color_overrides_apply() {
        let config = PageVizConfig {
            colors: HashMap::from([("header".to_string(), [1u8, 2, 3])]),
            ..PageVizConfig::default()
        };
        let spec = RenderSpec::from_config(&config);
        assert_eq!(spec.color_for("header"), Rgb([1, 2, 3]));
        assert_eq!(spec.font_size, config.font_size);
    }
}
