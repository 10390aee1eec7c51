//! Core types for source mapping

use serde::{Deserialize, Serialize};

/// A location in source text (0-indexed).
///
/// Offsets are counted in characters, not bytes. Locations are totally
/// ordered by their absolute offset.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SourceLocation {
    /// Character offset from start of the document
    pub absolute: usize,
    /// Line number (0-indexed)
    pub line: usize,
    /// Character offset within the line (0-indexed)
    pub character: usize,
}

impl SourceLocation {
    /// Create a location at an explicit position.
    pub fn new(absolute: usize, line: usize, character: usize) -> Self {
        Self {
            absolute,
            line,
            character,
        }
    }

    /// The start of a document.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Advance this location past `text`, keeping all three fields
    /// consistent.
    ///
    /// A `\n`, or a `\r` not followed by `\n`, ends the current line. In a
    /// `\r\n` pair the line break takes effect at the `\n`, so the pair
    /// spans two characters of the ending line.
    pub fn advance(mut self, text: &str) -> Self {
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            self.absolute += 1;
            if ch == '\n' || (ch == '\r' && chars.peek() != Some(&'\n')) {
                self.line += 1;
                self.character = 0;
            } else {
                self.character += 1;
            }
        }
        self
    }
}

/// A source location paired with a content length.
///
/// `content_length` is `None` when the length is not yet known; the
/// mapping manager resolves it from the counterpart side at registration
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingLocation {
    /// Where the content starts
    pub location: SourceLocation,
    /// Length of the content in characters, if known
    pub content_length: Option<usize>,
}

impl MappingLocation {
    /// Create a mapping location.
    pub fn new(location: SourceLocation, content_length: Option<usize>) -> Self {
        Self {
            location,
            content_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_ordering() {
        let loc1 = SourceLocation::new(0, 0, 0);
        let loc2 = SourceLocation::new(5, 0, 5);
        let loc3 = SourceLocation::new(10, 1, 0);

        assert!(loc1 < loc2);
        assert!(loc2 < loc3);
        assert!(loc1 < loc3);
    }

    #[test]
    fn test_advance_single_line() {
        let loc = SourceLocation::zero().advance("hello");
        assert_eq!(loc, SourceLocation::new(5, 0, 5));
    }

    #[test]
    fn test_advance_newline_resets_character() {
        let loc = SourceLocation::zero().advance("ab\ncd");
        assert_eq!(loc, SourceLocation::new(5, 1, 2));
    }

    #[test]
    fn test_advance_crlf_is_one_line_break() {
        let loc = SourceLocation::zero().advance("ab\r\ncd");
        assert_eq!(loc.line, 1);
        assert_eq!(loc.character, 2);
        assert_eq!(loc.absolute, 6);
    }

    #[test]
    fn test_advance_bare_cr_is_a_line_break() {
        let loc = SourceLocation::zero().advance("ab\rcd");
        assert_eq!(loc.line, 1);
        assert_eq!(loc.character, 2);
        assert_eq!(loc.absolute, 5);
    }

    #[test]
    fn test_advance_from_nonzero_start() {
        let start = SourceLocation::new(10, 2, 3);
        let loc = start.advance("x\ny");
        assert_eq!(loc, SourceLocation::new(13, 3, 1));
    }

    #[test]
    fn test_advance_empty_is_identity() {
        let start = SourceLocation::new(7, 1, 2);
        assert_eq!(start.advance(""), start);
    }

    #[test]
    fn test_mapping_location_known_length() {
        let mapping = MappingLocation::new(SourceLocation::zero(), Some(12));
        assert_eq!(mapping.content_length, Some(12));
    }

    #[test]
    fn test_serialization_location() {
        let loc = SourceLocation::new(100, 5, 10);
        let json = serde_json::to_string(&loc).unwrap();
        let deserialized: SourceLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(loc, deserialized);
    }

    #[test]
    fn test_serialization_mapping_location() {
        let mapping = MappingLocation::new(SourceLocation::new(3, 0, 3), None);
        let json = serde_json::to_string(&mapping).unwrap();
        let deserialized: MappingLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(mapping, deserialized);
    }
}
