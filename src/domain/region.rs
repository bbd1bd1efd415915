//! Region types and drawable-shape resolution.
//!
//! A [`Region`] is one labeled area of a page as described by a PAGE
//! document: a type tag, an optional reading-order rank, and raw
//! coordinate data. The raw points resolve into a [`RegionShape`] for
//! drawing; regions whose points are degenerate resolve to
//! [`RegionShape::Absent`] and are skipped by the renderer while still
//! being counted by the statistics aggregator.

use serde::{Deserialize, Serialize};

/// A 2D point with integer pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: i32,
    /// Y-coordinate of the point.
    pub y: i32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The drawable shape resolved from a region's raw coordinate data.
///
/// Renderer and aggregator branch on this explicitly, so the "polygon or
/// rectangle or nothing" outcome is a tagged variant rather than a
/// nullable point list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionShape {
    /// A closed polygon with at least 3 vertices, used exactly as given
    /// (no convex-hull correction, no self-intersection repair).
    Polygon(Vec<Point>),
    /// An axis-aligned rectangle derived from two corner points.
    Rectangle {
        /// Top-left corner (minimum x and y).
        min: Point,
        /// Bottom-right corner (maximum x and y).
        max: Point,
    },
    /// No usable geometry; the region cannot be drawn.
    Absent,
}

impl RegionShape {
    /// Resolves a raw point list into a drawable shape.
    ///
    /// Three or more points form a polygon. Exactly two points are taken
    /// as opposite corners of an axis-aligned rectangle. Anything less
    /// yields [`RegionShape::Absent`].
    pub fn resolve(points: &[Point]) -> Self {
        match points.len() {
            0 | 1 => Self::Absent,
            2 => {
                let (a, b) = (points[0], points[1]);
                Self::Rectangle {
                    min: Point::new(a.x.min(b.x), a.y.min(b.y)),
                    max: Point::new(a.x.max(b.x), a.y.max(b.y)),
                }
            }
            _ => Self::Polygon(points.to_vec()),
        }
    }

    /// Returns the four corners of the shape's bounding rectangle in
    /// clockwise order starting from the top-left, or `None` for
    /// [`RegionShape::Absent`].
    pub fn corners(&self) -> Option<[Point; 4]> {
        let (min, max) = self.bounding_box()?;
        Some([
            Point::new(min.x, min.y),
            Point::new(max.x, min.y),
            Point::new(max.x, max.y),
            Point::new(min.x, max.y),
        ])
    }

    /// Returns the minimal axis-aligned bounding box as (min, max)
    /// corners, or `None` for [`RegionShape::Absent`].
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        match self {
            Self::Polygon(points) => {
                let first = points.first()?;
                let (mut min, mut max) = (*first, *first);
                for p in points {
                    min.x = min.x.min(p.x);
                    min.y = min.y.min(p.y);
                    max.x = max.x.max(p.x);
                    max.y = max.y.max(p.y);
                }
                Some((min, max))
            }
            Self::Rectangle { min, max } => Some((*min, *max)),
            Self::Absent => None,
        }
    }

    /// The anchor point used for label placement: the first polygon
    /// vertex, or the rectangle's top-left corner.
    pub fn anchor(&self) -> Option<Point> {
        match self {
            Self::Polygon(points) => points.first().copied(),
            Self::Rectangle { min, .. } => Some(*min),
            Self::Absent => None,
        }
    }

    /// Returns true if the region has no drawable geometry.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// One labeled region of a page.
///
/// Created by the parser per document and immutable thereafter. The type
/// tag is an open string: known PAGE layout names (header, paragraph,
/// catch-word, page-number, marginalia, signature-mark) get dedicated
/// colors during rendering, unknown names are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Unique identifier within the document. Synthesized from the
    /// positional index when the source element carries none.
    pub id: String,
    /// Open-ended type tag classifying the region.
    pub region_type: String,
    /// Rank in the document's reading sequence; `None` means unordered.
    pub reading_order: Option<u32>,
    /// Raw coordinate data in parse order. May be empty for regions whose
    /// coordinate string was missing or unparsable.
    pub points: Vec<Point>,
}

impl Region {
    /// Resolves this region's raw points into a drawable shape.
    pub fn shape(&self) -> RegionShape {
        RegionShape::resolve(&self.points)
    }
}
