//! Common types shared between the error, output, and syntax modules.
//!
//! This module contains types that are used by several modules,
//! avoiding circular dependencies.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Span Type
// ============================================================================

/// Byte offsets into file content.
///
/// Spans are half-open intervals: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(
            start <= end,
            "Span start ({}) must be <= end ({})",
            start,
            end
        );
        Span { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span contains another span entirely.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check if a cursor offset falls within the span, end inclusive.
    ///
    /// A cursor sitting right after the last byte still touches the span.
    pub fn touches(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ============================================================================
// Location Type
// ============================================================================

/// Location in a source file.
///
/// - `file`: Workspace-relative path (required)
/// - `line`: 1-indexed line number (required)
/// - `col`: 1-indexed column, in characters (required)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    /// File path (workspace-relative).
    pub file: String,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub col: u32,
}

impl Location {
    /// Create a new location.
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Location {
            file: file.into(),
            line,
            col,
        }
    }

    /// Parse a location from "path:line:col" format.
    ///
    /// This parsing is robust against paths containing colons (e.g., Windows paths).
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.rsplitn(3, ':').collect();
        if parts.len() != 3 {
            return None;
        }
        let col: u32 = parts[0].parse().ok()?;
        let line: u32 = parts[1].parse().ok()?;
        let file = parts[2].to_string();
        if file.is_empty() {
            return None;
        }
        Some(Location::new(file, line, col))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod location_tests {
        use super::*;

        #[test]
        fn location_parse_valid() {
            let loc = Location::parse("src/Program.cs:42:5").unwrap();
            assert_eq!(loc.file, "src/Program.cs");
            assert_eq!(loc.line, 42);
            assert_eq!(loc.col, 5);
        }

        #[test]
        fn location_parse_windows_path() {
            // Windows paths have colons - rsplitn should handle this
            let loc = Location::parse("C:/Users/foo/src/Program.cs:10:3").unwrap();
            assert_eq!(loc.file, "C:/Users/foo/src/Program.cs");
            assert_eq!(loc.line, 10);
            assert_eq!(loc.col, 3);
        }

        #[test]
        fn location_parse_invalid() {
            assert!(Location::parse("src/Program.cs").is_none());
            assert!(Location::parse("src/Program.cs:42").is_none());
            assert!(Location::parse("src/Program.cs:abc:5").is_none());
            assert!(Location::parse(":1:1").is_none());
        }

        #[test]
        fn location_display_round_trips() {
            let loc = Location::new("a/B.cs", 3, 7);
            assert_eq!(Location::parse(&loc.to_string()), Some(loc));
        }
    }

    mod span_tests {
        use super::*;

        #[test]
        fn touches_is_end_inclusive() {
            let span = Span::new(4, 10);
            assert!(span.touches(4));
            assert!(span.touches(10));
            assert!(!span.touches(11));
            assert!(!span.touches(3));
        }

        #[test]
        fn contains_nested_span() {
            let outer = Span::new(0, 20);
            assert!(outer.contains(&Span::new(5, 9)));
            assert!(!outer.contains(&Span::new(15, 25)));
        }
    }
}
