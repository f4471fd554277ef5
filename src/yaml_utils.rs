//! YAML utilities for producer metadata
//!
//! The producer's metadata block can carry control characters (from driver
//! names and file paths) that strict YAML parsers reject. This module cleans
//! the text without parsing it.

/// Remove control characters other than newline, carriage return and tab.
pub fn strip_control_characters(yaml: &str) -> String {
    yaml.chars()
        .filter(|ch| !matches!(ch, '\x00'..='\x08' | '\x0B'..='\x0C' | '\x0E'..='\x1F' | '\x7F'))
        .collect()
}

/// Trim ASCII whitespace from both ends of a raw line.
pub fn trim_line(line: &[u8]) -> &[u8] {
    let start = line.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(line.len());
    let end = line.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(start, |i| i + 1);
    &line[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_control_characters() {
        let input = "WeekendInfo:\n\x00\x01\x02  TrackName: test\x03";
        let result = strip_control_characters(input);
        assert_eq!(result, "WeekendInfo:\n  TrackName: test");
    }

    #[test]
    fn keeps_valid_whitespace() {
        let input = "Key:\n\r\t  Value";
        assert_eq!(strip_control_characters(input), input);
    }

    #[test]
    fn trims_ascii_whitespace() {
        assert_eq!(trim_line(b"  ...\r\n"), b"...");
        assert_eq!(trim_line(b"\n"), b"");
        assert_eq!(trim_line(b"a b"), b"a b");
    }
}
