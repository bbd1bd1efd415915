//! Tabular export of corpus statistics.
//!
//! Two tab-separated tables are produced from a [`CorpusStatistics`]
//! accumulator: region counts (one `count_<type>` column per vocabulary
//! entry, zero-filled) and region sequences (reading-order type lists).
//! Column sets are only finalized here, at flush time, because later files
//! can introduce new region types. Writing the same accumulator twice
//! produces byte-identical output.

use crate::core::errors::{VizError, VizResult};
use crate::pipeline::stats::CorpusStatistics;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Default file name of the counts table.
pub const COUNTS_FILE: &str = "region_counts.tsv";

/// Default file name of the sequences table.
pub const SEQUENCES_FILE: &str = "region_sequences.tsv";

/// Prefix for per-type count columns.
const COUNT_COLUMN_PREFIX: &str = "count_";

/// Separator joining region types in the `region_sequence` column.
const SEQUENCE_SEPARATOR: &str = ",";

/// Writes the region-counts table.
///
/// Columns: `filename`, `total_regions`, then one `count_<type>` column
/// per vocabulary entry in first-seen order. Files that never saw a type
/// get an explicit 0, not a blank.
pub fn write_counts_table<W: Write>(stats: &CorpusStatistics, mut writer: W) -> VizResult<()> {
    let io_err = |e| VizError::io("writing counts table", e);

    let mut header = vec!["filename".to_string(), "total_regions".to_string()];
    header.extend(
        stats
            .type_vocabulary
            .iter()
            .map(|t| format!("{COUNT_COLUMN_PREFIX}{t}")),
    );
    writeln!(writer, "{}", header.join("\t")).map_err(io_err)?;

    for file in &stats.files {
        let mut row = vec![file.filename.clone(), file.total_regions.to_string()];
        row.extend(
            stats
                .type_vocabulary
                .iter()
                .map(|t| file.counts.get(t).copied().unwrap_or(0).to_string()),
        );
        writeln!(writer, "{}", row.join("\t")).map_err(io_err)?;
    }
    Ok(())
}

/// Writes the region-sequences table.
///
/// Columns: `filename`, `total_regions`, `last_region`,
/// `region_sequence` (types joined with commas, reading order).
pub fn write_sequences_table<W: Write>(stats: &CorpusStatistics, mut writer: W) -> VizResult<()> {
    let io_err = |e| VizError::io("writing sequences table", e);

    writeln!(writer, "filename\ttotal_regions\tlast_region\tregion_sequence").map_err(io_err)?;
    for record in &stats.sequences {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            record.filename,
            record.total_regions,
            record.last_region,
            record.sequence.join(SEQUENCE_SEPARATOR)
        )
        .map_err(io_err)?;
    }
    Ok(())
}

/// Writes both tables under the given directory using the default file
/// names.
pub fn write_tables(stats: &CorpusStatistics, output_dir: &Path) -> VizResult<()> {
    let counts_path = output_dir.join(COUNTS_FILE);
    let file = std::fs::File::create(&counts_path)
        .map_err(|e| VizError::io(format!("creating '{}'", counts_path.display()), e))?;
    write_counts_table(stats, std::io::BufWriter::new(file))?;
    info!("statistics written to {}", counts_path.display());

    let sequences_path = output_dir.join(SEQUENCES_FILE);
    let file = std::fs::File::create(&sequences_path)
        .map_err(|e| VizError::io(format!("creating '{}'", sequences_path.display()), e))?;
    write_sequences_table(stats, std::io::BufWriter::new(file))?;
    info!("region sequences written to {}", sequences_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentLayout, Point, Region};

    fn region(region_type: &str, reading_order: Option<u32>) -> Region {
        Region {
            id: region_type.to_string(),
            region_type: region_type.to_string(),
            reading_order,
            points: vec![Point::new(0, 0), Point::new(10, 0), Point::new(10, 10)],
        }
    }

    fn sample_corpus() -> CorpusStatistics {
        let mut corpus = CorpusStatistics::new();
        corpus.fold_document(
            "page_001",
            &DocumentLayout::new(vec![
                region("header", Some(0)),
                region("paragraph", Some(1)),
                region("paragraph", Some(2)),
            ]),
        );
        corpus.fold_document(
            "page_002",
            &DocumentLayout::new(vec![
                region("paragraph", Some(0)),
                region("catch-word", Some(1)),
            ]),
        );
        corpus
    }

    #[test]
    fn test_counts_table_columns_in_first_seen_order_with_zero_fill() {
        let mut out = Vec::new();
        write_counts_table(&sample_corpus(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "filename\ttotal_regions\tcount_header\tcount_paragraph\tcount_catch-word"
        );
        assert_eq!(lines[1], "page_001\t3\t1\t2\t0");
        assert_eq!(lines[2], "page_002\t2\t0\t1\t1");
    }

    #[test]
    fn test_counts_row_sums_equal_total_regions() {
        let mut out = Vec::new();
        write_counts_table(&sample_corpus(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for line in text.lines().skip(1) {
            let fields: Vec<&str> = line.split('\t').collect();
            let total: usize = fields[1].parse().unwrap();
            let sum: usize = fields[2..].iter().map(|f| f.parse::<usize>().unwrap()).sum();
            assert_eq!(sum, total);
        }
    }

    #[test]
    fn test_sequences_table_rows() {
        let mut out = Vec::new();
        write_sequences_table(&sample_corpus(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "filename\ttotal_regions\tlast_region\tregion_sequence");
        assert_eq!(lines[1], "page_001\t3\tparagraph\theader,paragraph,paragraph");
        assert_eq!(lines[2], "page_002\t2\tcatch-word\tparagraph,catch-word");
    }

    #[test]
    fn test_export_is_idempotent() {
        let corpus = sample_corpus();
        let mut first = Vec::new();
        let mut second = Vec::new();
        write_counts_table(&corpus, &mut first).unwrap();
        write_counts_table(&corpus, &mut second).unwrap();
        assert_eq!(first, second);

        let mut first = Vec::new();
        let mut second = Vec::new();
        write_sequences_table(&corpus, &mut first).unwrap();
        write_sequences_table(&corpus, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_tables_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        write_tables(&sample_corpus(), dir.path()).unwrap();
        assert!(dir.path().join(COUNTS_FILE).exists());
        assert!(dir.path().join(SEQUENCES_FILE).exists());
    }
}
