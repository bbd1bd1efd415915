//! Per-document layout model and reading-order semantics.

use crate::domain::region::Region;

/// The normalized in-memory model of one PAGE document.
///
/// Regions are stored in parse order; reading order is a derived view,
/// never the storage order.
#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    /// Regions in document (parse) order.
    pub regions: Vec<Region>,
}

impl DocumentLayout {
    /// Creates a layout from regions in parse order.
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Total number of regions in the document.
    pub fn total_regions(&self) -> usize {
        self.regions.len()
    }

    /// Regions sorted into reading order.
    ///
    /// Regions with an explicit reading-order index come first, ranked by
    /// index with ties broken by parse order. Regions without an index are
    /// placed after all ordered ones, in parse order.
    pub fn reading_sequence(&self) -> Vec<&Region> {
        let mut sequence: Vec<&Region> = self.regions.iter().collect();
        // Stable sort: unordered regions compare equal among themselves and
        // greater than any ordered region, so parse order survives as the
        // tie-break.
        sequence.sort_by_key(|r| (r.reading_order.is_none(), r.reading_order.unwrap_or(0)));
        sequence
    }
}
