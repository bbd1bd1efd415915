//! Corpus-wide statistics accumulation.
//!
//! This module defines the per-file statistics contributions collected by
//! workers and the [`CorpusStatistics`] fold that merges them. The fold is
//! an explicit object passed in and out, never ambient global state, so a
//! single coordinator can safely absorb contributions from concurrent
//! workers in whatever order they arrive.

use crate::domain::DocumentLayout;
use std::collections::HashMap;

/// Per-file region counts: the counts-table row for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    /// Base name of the processed document.
    pub filename: String,
    /// Total number of regions in the document.
    pub total_regions: usize,
    /// Occurrences of each region type, case-sensitive exact match.
    pub counts: HashMap<String, usize>,
}

impl FileStats {
    /// Collects the per-type counts of one document.
    pub fn collect(filename: impl Into<String>, layout: &DocumentLayout) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for region in &layout.regions {
            *counts.entry(region.region_type.clone()).or_insert(0) += 1;
        }
        Self {
            filename: filename.into(),
            total_regions: layout.total_regions(),
            counts,
        }
    }
}

/// Per-file reading-order summary: the sequences-table row for one
/// document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Base name of the processed document.
    pub filename: String,
    /// Total number of regions in the document.
    pub total_regions: usize,
    /// Type of the final region in reading order, or empty for a document
    /// with zero regions.
    pub last_region: String,
    /// Region types following reading order.
    pub sequence: Vec<String>,
}

impl SequenceRecord {
    /// Collects the reading-order summary of one document.
    pub fn collect(filename: impl Into<String>, layout: &DocumentLayout) -> Self {
        let sequence: Vec<String> = layout
            .reading_sequence()
            .iter()
            .map(|r| r.region_type.clone())
            .collect();
        Self {
            filename: filename.into(),
            total_regions: layout.total_regions(),
            last_region: sequence.last().cloned().unwrap_or_default(),
            sequence,
        }
    }
}

/// Statistics accumulated across all documents of a run.
///
/// Rows keep first-seen order. The type vocabulary keeps insertion order
/// and only ever grows; a type first observed in a late file retroactively
/// gets a zero-filled column for earlier files at export time.
#[derive(Debug, Clone, Default)]
pub struct CorpusStatistics {
    /// One counts row per processed file, in first-seen order.
    pub files: Vec<FileStats>,
    /// Every region type observed so far, in first-seen order.
    pub type_vocabulary: Vec<String>,
    /// One sequence row per processed file, in first-seen order.
    pub sequences: Vec<SequenceRecord>,
}

impl CorpusStatistics {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one document directly into the accumulator.
    pub fn fold_document(&mut self, filename: &str, layout: &DocumentLayout) {
        let stats = FileStats::collect(filename, layout);
        let sequence = SequenceRecord::collect(filename, layout);
        self.absorb(stats, sequence);
    }

    /// Merges one worker's per-file contribution.
    ///
    /// New region types enter the vocabulary in the order the sequence
    /// record observes them, keeping column order deterministic for a
    /// given arrival order of files.
    pub fn absorb(&mut self, stats: FileStats, sequence: SequenceRecord) {
        for region_type in &sequence.sequence {
            if !self.type_vocabulary.iter().any(|t| t == region_type) {
                self.type_vocabulary.push(region_type.clone());
            }
        }
        self.files.push(stats);
        self.sequences.push(sequence);
    }

    /// Number of files folded so far.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}
