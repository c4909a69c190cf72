//! Text position utilities for byte offset and line:column conversions.
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns are **1-indexed** (matching editor conventions)
//! - Byte offsets are **0-indexed**
//! - Columns count Unicode scalar values (chars), not bytes
//! - Line/column values of 0 are treated as 1

/// Convert a byte offset to 1-indexed line and column.
///
/// # Returns
///
/// A `(line, col)` tuple where both are 1-indexed.
/// If `offset` exceeds content length, returns position at end of content.
pub fn byte_offset_to_position(content: &str, offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 1u32;
    let mut current_offset = 0usize;

    for ch in content.chars() {
        if current_offset >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
        current_offset += ch.len_utf8();
    }

    (line, col)
}

/// Convert 1-indexed line and column to a byte offset.
///
/// A column past the end of its line clamps to the end of the line; a line
/// past the end of the content returns `None`.
pub fn position_to_byte_offset(content: &str, line: u32, col: u32) -> Option<usize> {
    let line = line.max(1);
    let col = col.max(1);

    let line_start = if line == 1 {
        0
    } else {
        content
            .match_indices('\n')
            .nth((line - 2) as usize)
            .map(|(index, _)| index + 1)?
    };

    let rest = &content[line_start..];
    let line_end = rest.find('\n').map(|p| line_start + p).unwrap_or(content.len());

    let mut current_col = 1u32;
    for (j, _) in content[line_start..line_end].char_indices() {
        if current_col == col {
            return Some(line_start + j);
        }
        current_col += 1;
    }

    Some(line_end)
}

/// Get the 1-indexed line number containing a byte offset.
pub fn line_of(content: &str, offset: usize) -> u32 {
    byte_offset_to_position(content, offset).0
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_to_position_first_line() {
        assert_eq!(byte_offset_to_position("using A;", 0), (1, 1));
        assert_eq!(byte_offset_to_position("using A;", 6), (1, 7));
    }

    #[test]
    fn offset_to_position_after_newline() {
        let content = "using A;\nusing B;\n";
        assert_eq!(byte_offset_to_position(content, 9), (2, 1));
        assert_eq!(byte_offset_to_position(content, 15), (2, 7));
    }

    #[test]
    fn offset_to_position_counts_chars() {
        // "é" is two bytes but one column
        let content = "// é\nusing X;";
        assert_eq!(byte_offset_to_position(content, 5), (1, 5));
        assert_eq!(byte_offset_to_position(content, 6), (2, 1));
    }

    #[test]
    fn position_to_offset_round_trip() {
        let content = "namespace N\n{\n    using A;\n}\n";
        let offset = position_to_byte_offset(content, 3, 11).unwrap();
        assert_eq!(&content[offset..offset + 1], "A");
        assert_eq!(byte_offset_to_position(content, offset), (3, 11));
    }

    #[test]
    fn position_to_offset_clamps_column() {
        let content = "ab\ncd";
        assert_eq!(position_to_byte_offset(content, 1, 99), Some(2));
        assert_eq!(position_to_byte_offset(content, 2, 99), Some(5));
    }

    #[test]
    fn position_to_offset_rejects_missing_line() {
        assert_eq!(position_to_byte_offset("ab\ncd", 5, 1), None);
    }

    #[test]
    fn zero_line_and_col_treated_as_one() {
        assert_eq!(position_to_byte_offset("abc", 0, 0), Some(0));
    }

    #[test]
    fn line_of_offset() {
        assert_eq!(line_of("a\nb\nc", 4), 3);
    }
}
