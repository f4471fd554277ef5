//! Metadata Block Reader
//!
//! The region opens with a line-oriented text segment:
//!
//! ```text
//! <header line>\n          format/version marker, discarded
//! WeekendInfo:\n           YAML document lines
//!   TrackName: test\n
//! ...\n                    sentinel
//! ```
//!
//! The reader reports both the parsed document and the byte offset where the
//! segment ends. That offset is the sum of the header line, the document
//! lines and a fixed trailing pad (4 bytes by default) accounting for the
//! producer's alignment. The sentinel line is covered by that pad rather than
//! counted on its own.

use serde::de::DeserializeOwned;
use serde_yaml_ng::Value as YamlValue;
use tracing::{debug, trace};

use super::session::WeekendInfo;
use crate::yaml_utils::{strip_control_characters, trim_line};
use crate::{LayoutConfig, MappedRegion, Result, TelemetryError};

/// Line that terminates the metadata document
pub const METADATA_SENTINEL: &[u8] = b"...";

/// Scanned metadata segment.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataBlock {
    /// Byte offset just past the segment, including the trailing pad
    pub end: usize,
    /// Raw document text between the header line and the sentinel
    pub text: String,
}

impl MetadataBlock {
    /// Parse the accumulated text.
    pub fn document(&self) -> Result<MetadataDocument> {
        MetadataDocument::parse(&self.text)
    }
}

/// Return the next newline-terminated line starting at `pos`, newline included.
fn next_line(bytes: &[u8], pos: usize) -> Option<&[u8]> {
    let rest = bytes.get(pos..)?;
    rest.iter().position(|&b| b == b'\n').map(|i| &rest[..=i])
}

/// Scan the metadata segment of raw region bytes.
pub fn scan_metadata(bytes: &[u8], pad: usize) -> Result<MetadataBlock> {
    let unterminated = || TelemetryError::MetadataUnterminated { scanned: bytes.len() };

    let header = next_line(bytes, 0).ok_or_else(unterminated)?;
    let mut pos = header.len();
    let mut text = Vec::new();

    loop {
        let line = next_line(bytes, pos).ok_or_else(unterminated)?;
        pos += line.len();

        if trim_line(line) == METADATA_SENTINEL {
            break;
        }
        text.extend_from_slice(line);
    }

    let end = header.len() + text.len() + pad;
    trace!(header_len = header.len(), text_len = text.len(), end, "Scanned metadata block");

    Ok(MetadataBlock { end, text: String::from_utf8_lossy(&text).into_owned() })
}

/// Scan the metadata segment of a region.
pub fn read_metadata(region: &MappedRegion, layout: &LayoutConfig) -> Result<MetadataBlock> {
    scan_metadata(region.as_bytes(), layout.metadata_pad)
}

/// Byte offset where the metadata segment ends, using the default pad.
pub fn read_metadata_end(region: &MappedRegion) -> Result<usize> {
    read_metadata(region, &LayoutConfig::default()).map(|block| block.end)
}

/// Parse the region's metadata segment into a document.
pub fn read_metadata_document(region: &MappedRegion) -> Result<MetadataDocument> {
    scan_metadata(region.as_bytes(), 0)?.document()
}

/// Immutable session configuration document.
///
/// The root is always a mapping. Values are addressed by dotted paths where a
/// numeric segment indexes a sequence:
///
/// ```rust
/// use paddock::MetadataDocument;
///
/// let doc = MetadataDocument::parse(
///     "WeekendInfo:\n  TrackName: test\nDriverInfo:\n  Drivers:\n  - UserName: Ann\n",
/// )
/// .unwrap();
/// assert_eq!(doc.get_str("WeekendInfo.TrackName"), Some("test"));
/// assert_eq!(doc.get_str("DriverInfo.Drivers.0.UserName"), Some("Ann"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDocument {
    root: YamlValue,
}

impl Default for MetadataDocument {
    fn default() -> Self {
        Self { root: YamlValue::Mapping(Default::default()) }
    }
}

impl MetadataDocument {
    /// Parse metadata text, cleaning producer control characters first.
    pub fn parse(text: &str) -> Result<Self> {
        let cleaned = strip_control_characters(text);
        if cleaned.trim().is_empty() {
            return Ok(Self::default());
        }

        let root: YamlValue = serde_yaml_ng::from_str(&cleaned)
            .map_err(|e| TelemetryError::MetadataParse { details: e.to_string() })?;

        match root {
            YamlValue::Mapping(_) => {
                debug!(keys = root.as_mapping().map_or(0, |m| m.len()), "Parsed metadata document");
                Ok(Self { root })
            }
            YamlValue::Null => Ok(Self::default()),
            other => Err(TelemetryError::MetadataParse {
                details: format!("document root must be a mapping, found {}", kind(&other)),
            }),
        }
    }

    /// Root mapping as a YAML value.
    pub fn root(&self) -> &YamlValue {
        &self.root
    }

    /// Whether the document has no keys.
    pub fn is_empty(&self) -> bool {
        self.root.as_mapping().is_none_or(|m| m.is_empty())
    }

    /// Top-level keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.as_mapping().into_iter().flat_map(|m| m.keys()).filter_map(|k| k.as_str())
    }

    /// Value at a dotted path.
    pub fn get(&self, path: &str) -> Option<&YamlValue> {
        path.split('.').try_fold(&self.root, |current, segment| match current {
            YamlValue::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => current.get(segment),
        })
    }

    /// String at a dotted path.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    /// Deserialize the whole document into a typed view.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_yaml_ng::from_value(self.root.clone())
            .map_err(|e| TelemetryError::MetadataParse { details: e.to_string() })
    }

    /// Typed `WeekendInfo` section.
    pub fn weekend_info(&self) -> Result<WeekendInfo> {
        let section = self.get("WeekendInfo").ok_or_else(|| TelemetryError::MetadataParse {
            details: "missing WeekendInfo section".to_string(),
        })?;
        serde_yaml_ng::from_value(section.clone())
            .map_err(|e| TelemetryError::MetadataParse { details: format!("WeekendInfo: {e}") })
    }
}

fn kind(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "a string",
        YamlValue::Sequence(_) => "a sequence",
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "IRSDK 2\n";
    const DOC: &str = "WeekendInfo:\n  TrackName: test\n";

    fn region(text: &str) -> MappedRegion {
        let mut bytes = text.as_bytes().to_vec();
        bytes.resize(bytes.len() + 64, 0);
        MappedRegion::from_bytes("metadata", bytes)
    }

    #[test]
    fn end_offset_counts_header_document_and_pad() {
        let region = region(&format!("{HEADER}{DOC}...\n"));
        let end = read_metadata_end(&region).unwrap();
        assert_eq!(end, HEADER.len() + "WeekendInfo:\n".len() + "  TrackName: test\n".len() + 4);
    }

    #[test]
    fn document_exposes_track_name() {
        let region = region(&format!("{HEADER}{DOC}...\n"));
        let doc = read_metadata_document(&region).unwrap();
        assert_eq!(doc.get_str("WeekendInfo.TrackName"), Some("test"));
        assert_eq!(doc.weekend_info().unwrap().track_name, "test");
    }

    #[test]
    fn sentinel_is_matched_after_trimming() {
        let block = scan_metadata(format!("{HEADER}{DOC}  ...\r\n").as_bytes(), 4).unwrap();
        assert_eq!(block.text, DOC);
    }

    #[test]
    fn lines_containing_dots_are_not_sentinels() {
        let text = format!("{HEADER}Notes: '...x'\n...\n");
        let block = scan_metadata(text.as_bytes(), 4).unwrap();
        assert_eq!(block.text, "Notes: '...x'\n");
    }

    #[test]
    fn missing_sentinel_is_unterminated() {
        let result = scan_metadata(format!("{HEADER}{DOC}").as_bytes(), 4);
        assert!(matches!(result, Err(TelemetryError::MetadataUnterminated { .. })));

        let result = scan_metadata(b"no newline at all", 4);
        assert!(matches!(result, Err(TelemetryError::MetadataUnterminated { scanned: 17 })));
    }

    #[test]
    fn empty_document_is_an_empty_mapping() {
        let block = scan_metadata(format!("{HEADER}...\n").as_bytes(), 4).unwrap();
        assert_eq!(block.end, HEADER.len() + 4);
        let doc = block.document().unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let result = MetadataDocument::parse("WeekendInfo:\n  TrackName: [unclosed\n");
        assert!(matches!(result, Err(TelemetryError::MetadataParse { .. })));
    }

    #[test]
    fn scalar_root_is_a_parse_error() {
        let result = MetadataDocument::parse("just a string\n");
        assert!(matches!(result, Err(TelemetryError::MetadataParse { .. })));
    }

    #[test]
    fn control_characters_do_not_break_parsing() {
        let doc = MetadataDocument::parse("DriverInfo:\n  UserName: Ann\x01 Smith\n").unwrap();
        assert_eq!(doc.get_str("DriverInfo.UserName"), Some("Ann Smith"));
    }

    #[test]
    fn keys_follow_document_order() {
        let doc = MetadataDocument::parse("B: 1\nA: 2\n").unwrap();
        assert_eq!(doc.keys().collect::<Vec<_>>(), ["B", "A"]);
        assert!(doc.get("C").is_none());
    }
}
