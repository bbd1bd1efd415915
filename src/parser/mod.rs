//! PAGE XML parsing.
//!
//! This module reads a PAGE document's textual content and produces the
//! normalized [`DocumentLayout`] model. Parsing is namespace-insensitive
//! (element and attribute names are matched by local name), tolerant of
//! per-region damage, and never reorders regions: storage order is
//! document order, reading order is derived later.
//!
//! Region metadata lives in two places in PAGE files and both are
//! honored:
//! - the per-region `custom` attribute, carrying `type:<name>` and
//!   `readingOrder {index: N;}` entries, and
//! - the document-level `ReadingOrder`/`OrderedGroup` table of
//!   `RegionRefIndexed` elements mapping region ids to ranks.
//!
//! The `custom` attribute wins when both supply a reading-order index.

use crate::core::errors::{VizError, VizResult};
use crate::domain::{DocumentLayout, Point, Region};
use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;
use std::collections::HashMap;
use tracing::warn;

/// Matches `type:<name>` entries in a region's `custom` attribute,
/// e.g. `structure {type:catch-word;}`.
static TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"type\s*:\s*(\w+(?:-\w+)*)").expect("valid type regex"));

/// Matches `readingOrder {index: N;}` entries in a `custom` attribute.
static ORDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"readingOrder\s*\{\s*index\s*:\s*(\d+)").expect("valid order regex"));

/// A region element collected during the event scan, before metadata
/// resolution.
#[derive(Debug, Default)]
struct PendingRegion {
    id: Option<String>,
    type_attr: Option<String>,
    custom: Option<String>,
    points: Option<Vec<Point>>,
}

/// Parses a PAGE document's textual content into a [`DocumentLayout`].
///
/// `source_name` identifies the document in warning messages; it is not
/// used to read anything from disk.
///
/// # Errors
///
/// Returns [`VizError::MalformedDocument`] when the content is not
/// well-formed markup at all. A single damaged region (for example an
/// unparsable coordinate string) does not fail the document: the region
/// is kept with empty geometry and a warning is emitted.
pub fn parse_document(content: &str, source_name: &str) -> VizResult<DocumentLayout> {
    let mut reader = Reader::from_str(content);

    // Regions in start-element order; the stack carries indices into it
    // so a nested region's coordinates never leak into its parent.
    let mut pending: Vec<PendingRegion> = Vec::new();
    let mut open_regions: Vec<usize> = Vec::new();
    let mut order_table: HashMap<String, u32> = HashMap::new();
    let mut saw_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                saw_element = true;
                match e.local_name().as_ref() {
                    b"TextRegion" => {
                        pending.push(region_from_element(&e));
                        open_regions.push(pending.len() - 1);
                    }
                    b"Coords" => attach_coords(&e, &mut pending, &open_regions, source_name),
                    b"RegionRefIndexed" => record_order_entry(&e, &mut order_table),
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                saw_element = true;
                match e.local_name().as_ref() {
                    b"TextRegion" => pending.push(region_from_element(&e)),
                    b"Coords" => attach_coords(&e, &mut pending, &open_regions, source_name),
                    b"RegionRefIndexed" => record_order_entry(&e, &mut order_table),
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"TextRegion" {
                    open_regions.pop();
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(VizError::malformed_document(source_name, e.to_string())),
        }
    }

    if !saw_element {
        return Err(VizError::malformed_document(
            source_name,
            "no root element found",
        ));
    }

    if pending.is_empty() {
        warn!("{source_name}: no TextRegion elements found");
    }

    let regions = pending
        .into_iter()
        .enumerate()
        .map(|(index, raw)| finalize_region(raw, index, &order_table, source_name))
        .collect();

    Ok(DocumentLayout::new(regions))
}

/// Captures a `TextRegion` start element's attributes.
fn region_from_element(element: &BytesStart<'_>) -> PendingRegion {
    let mut region = PendingRegion::default();
    for attr in element.attributes().flatten() {
        let value = attr.unescape_value().map(|v| v.into_owned());
        let Ok(value) = value else { continue };
        match attr.key.local_name().as_ref() {
            b"id" => region.id = Some(value),
            b"type" => region.type_attr = Some(value),
            b"custom" => region.custom = Some(value),
            _ => {}
        }
    }
    region
}

/// Attaches a `Coords` element's points to the innermost open region that
/// has none yet. Coords of nested lines and words are ignored because the
/// region's own `Coords` always comes first.
fn attach_coords(
    element: &BytesStart<'_>,
    pending: &mut [PendingRegion],
    open_regions: &[usize],
    source_name: &str,
) {
    let Some(&index) = open_regions.last() else {
        return;
    };
    if pending[index].points.is_some() {
        return;
    }
    let points_attr = element
        .attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == b"points")
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()));
    let Some(points_str) = points_attr else {
        return;
    };
    pending[index].points = Some(parse_coords(&points_str, source_name));
}

/// Records one `RegionRefIndexed` entry of the document-level reading
/// order table.
fn record_order_entry(element: &BytesStart<'_>, order_table: &mut HashMap<String, u32>) {
    let mut region_ref = None;
    let mut index = None;
    for attr in element.attributes().flatten() {
        let Ok(value) = attr.unescape_value() else {
            continue;
        };
        match attr.key.local_name().as_ref() {
            b"regionRef" => region_ref = Some(value.into_owned()),
            b"index" => index = value.parse::<u32>().ok(),
            _ => {}
        }
    }
    if let (Some(id), Some(index)) = (region_ref, index) {
        order_table.insert(id, index);
    }
}

/// Parses a PAGE `points` attribute (`"x1,y1 x2,y2 ..."`) into integer
/// points. Fractional coordinates are accepted and truncated. Malformed
/// tokens are skipped with a warning rather than failing the region.
fn parse_coords(points_str: &str, source_name: &str) -> Vec<Point> {
    let mut points = Vec::new();
    for token in points_str.split_whitespace() {
        let parsed = token
            .split_once(',')
            .and_then(|(x, y)| Some((x.trim().parse::<f32>().ok()?, y.trim().parse::<f32>().ok()?)));
        match parsed {
            Some((x, y)) => points.push(Point::new(x as i32, y as i32)),
            None => warn!("{source_name}: invalid coordinate token '{token}'"),
        }
    }
    points
}

/// Resolves a pending region's metadata into the final [`Region`].
fn finalize_region(
    raw: PendingRegion,
    index: usize,
    order_table: &HashMap<String, u32>,
    source_name: &str,
) -> Region {
    let region_type = raw
        .custom
        .as_deref()
        .and_then(|custom| TYPE_RE.captures(custom))
        .map(|caps| caps[1].to_lowercase())
        .or_else(|| raw.type_attr.as_ref().map(|t| t.to_lowercase()))
        .unwrap_or_else(|| "unknown".to_string());

    let custom_order = raw
        .custom
        .as_deref()
        .and_then(|custom| ORDER_RE.captures(custom))
        .and_then(|caps| caps[1].parse::<u32>().ok());
    // The document-level table only applies to regions with a real id;
    // synthesized ids cannot be referenced.
    let table_order = raw
        .id
        .as_ref()
        .and_then(|id| order_table.get(id).copied());
    let reading_order = custom_order.or(table_order);

    let id = raw.id.unwrap_or_else(|| index.to_string());
    let points = raw.points.unwrap_or_default();
    if points.is_empty() {
        warn!(
            "{source_name}: {}",
            VizError::region_geometry(&id, "no usable coordinate points")
        );
    }

    Region {
        id,
        region_type,
        reading_order,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RegionShape;

    const NS: &str = "https://schema.primaresearch.org/PAGE/gts/pagecontent/2013-07-15";

    fn page_doc(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<PcGts xmlns="{NS}"><Page imageWidth="200" imageHeight="300">{body}</Page></PcGts>"#
        )
    }

    #[test]
    fn test_parses_regions_in_document_order() {
        let xml = page_doc(
            r#"<TextRegion id="r1" custom="structure {type:header;}">
                 <Coords points="0,0 50,0 50,20"/>
               </TextRegion>
               <TextRegion id="r2" custom="structure {type:paragraph;}">
                 <Coords points="0,30 50,30 50,90 0,90"/>
               </TextRegion>"#,
        );
        let layout = parse_document(&xml, "page_001.xml").unwrap();
        assert_eq!(layout.total_regions(), 2);
        assert_eq!(layout.regions[0].region_type, "header");
        assert_eq!(layout.regions[1].region_type, "paragraph");
        assert_eq!(layout.regions[1].points.len(), 4);
    }

    #[test]
    fn test_type_precedence_custom_then_attribute_then_unknown() {
        let xml = page_doc(
            r#"<TextRegion id="a" type="heading" custom="structure {type:catch-word;}">
                 <Coords points="0,0 5,0 5,5"/>
               </TextRegion>
               <TextRegion id="b" type="Signature-Mark">
                 <Coords points="0,0 5,0 5,5"/>
               </TextRegion>
               <TextRegion id="c">
                 <Coords points="0,0 5,0 5,5"/>
               </TextRegion>"#,
        );
        let layout = parse_document(&xml, "types.xml").unwrap();
        assert_eq!(layout.regions[0].region_type, "catch-word");
        assert_eq!(layout.regions[1].region_type, "signature-mark");
        assert_eq!(layout.regions[2].region_type, "unknown");
    }

    #[test]
    fn test_reading_order_from_custom_attribute() {
        let xml = page_doc(
            r#"<TextRegion id="r1" custom="readingOrder {index:2;} structure {type:paragraph;}">
                 <Coords points="0,0 5,0 5,5"/>
               </TextRegion>
               <TextRegion id="r2" custom="structure {type:marginalia;}">
                 <Coords points="0,0 5,0 5,5"/>
               </TextRegion>"#,
        );
        let layout = parse_document(&xml, "order.xml").unwrap();
        assert_eq!(layout.regions[0].reading_order, Some(2));
        assert_eq!(layout.regions[1].reading_order, None);
    }

    #[test]
    fn test_reading_order_from_document_table() {
        let xml = page_doc(
            r#"<ReadingOrder><OrderedGroup id="g0">
                 <RegionRefIndexed index="1" regionRef="r1"/>
                 <RegionRefIndexed index="0" regionRef="r2"/>
               </OrderedGroup></ReadingOrder>
               <TextRegion id="r1" custom="structure {type:paragraph;}">
                 <Coords points="0,0 5,0 5,5"/>
               </TextRegion>
               <TextRegion id="r2" custom="readingOrder {index:5;} structure {type:header;}">
                 <Coords points="0,0 5,0 5,5"/>
               </TextRegion>"#,
        );
        let layout = parse_document(&xml, "table.xml").unwrap();
        assert_eq!(layout.regions[0].reading_order, Some(1));
        // The custom attribute wins over the table entry.
        assert_eq!(layout.regions[1].reading_order, Some(5));
    }

    #[test]
    fn test_malformed_coordinate_token_does_not_fail_document() {
        let xml = page_doc(
            r#"<TextRegion id="good" custom="structure {type:header;}">
                 <Coords points="0,0 10,0 10,10"/>
               </TextRegion>
               <TextRegion id="bad" custom="structure {type:paragraph;}">
                 <Coords points="not-a-point garbage"/>
               </TextRegion>"#,
        );
        let layout = parse_document(&xml, "damaged.xml").unwrap();
        assert_eq!(layout.total_regions(), 2);
        assert!(layout.regions[1].points.is_empty());
        assert!(layout.regions[1].shape().is_absent());
        assert!(matches!(layout.regions[0].shape(), RegionShape::Polygon(_)));
    }

    #[test]
    fn test_missing_id_synthesized_from_position() {
        let xml = page_doc(
            r#"<TextRegion custom="structure {type:header;}">
                 <Coords points="0,0 5,0 5,5"/>
               </TextRegion>"#,
        );
        let layout = parse_document(&xml, "noid.xml").unwrap();
        assert_eq!(layout.regions[0].id, "0");
    }

    #[test]
    fn test_fractional_coordinates_truncated() {
        let xml = page_doc(
            r#"<TextRegion id="r1">
                 <Coords points="1.9,2.7 10.2,2.1 10.8,9.9"/>
               </TextRegion>"#,
        );
        let layout = parse_document(&xml, "frac.xml").unwrap();
        assert_eq!(layout.regions[0].points[0], Point::new(1, 2));
        assert_eq!(layout.regions[0].points[2], Point::new(10, 9));
    }

    #[test]
    fn test_line_coords_do_not_overwrite_region_coords() {
        let xml = page_doc(
            r#"<TextRegion id="r1">
                 <Coords points="0,0 100,0 100,50 0,50"/>
                 <TextLine id="l1"><Coords points="5,5 95,5 95,20 5,20"/></TextLine>
               </TextRegion>"#,
        );
        let layout = parse_document(&xml, "lines.xml").unwrap();
        assert_eq!(layout.regions[0].points[1], Point::new(100, 0));
    }

    #[test]
    fn test_namespace_free_document_accepted() {
        let xml = r#"<PcGts><Page><TextRegion id="r1" type="paragraph">
            <Coords points="0,0 5,0 5,5"/></TextRegion></Page></PcGts>"#;
        let layout = parse_document(xml, "plain.xml").unwrap();
        assert_eq!(layout.regions[0].region_type, "paragraph");
    }

    #[test]
    fn test_unparsable_root_is_malformed() {
        let err = parse_document("this is not markup", "junk.xml").unwrap_err();
        assert!(matches!(err, VizError::MalformedDocument { .. }));

        let err = parse_document("<PcGts><Page></PcGts>", "mismatched.xml").unwrap_err();
        assert!(matches!(err, VizError::MalformedDocument { .. }));
    }
}
