use crate::{ConversionError, Position, Range};
use modplan_analysis::OffsetSpan;

/// Line-to-offset and offset-to-line conversion over UTF-16 code units.
///
/// Lines are split on `'\n'` only; a `'\r'` before it stays part of the line.
///
/// # Performance
///
/// - Build time: O(N) where N is the length of the source text
/// - Memory: O(L + S) where L is the number of lines and S the number of
///   characters outside the Basic Multilingual Plane
/// - Lookup time: O(log L + log S) in both directions
///
/// # Example
///
/// ```
/// use modplan_core::{LineIndex, Position};
///
/// let source = "line 0\nline 1\nline 2";
/// let index = LineIndex::new(source);
///
/// let offset = index.position_to_offset(Position::new(1, 0)).unwrap();
/// assert_eq!(offset, 7);
///
/// let pos = index.offset_to_position(7).unwrap();
/// assert_eq!(pos, Position::new(1, 0));
/// ```
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// UTF-16 offset of the start of each line
    /// Index 0 is always 0 (start of file)
    line_starts: Vec<usize>,
    /// Offsets that fall between the two halves of a surrogate pair
    split_offsets: Vec<usize>,
    len: usize,
}

impl LineIndex {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut split_offsets = Vec::new();
        let mut offset = 0;

        for ch in text.chars() {
            let width = ch.len_utf16();
            if width == 2 {
                split_offsets.push(offset + 1);
            }
            offset += width;
            if ch == '\n' {
                line_starts.push(offset);
            }
        }

        Self {
            line_starts,
            split_offsets,
            len: offset,
        }
    }

    /// Length of the indexed text in UTF-16 code units
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the number of lines in the indexed text
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the offset of the start of a line
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Offset just past the last character of `line`, excluding its `'\n'`
    fn line_end(&self, line: usize) -> usize {
        self.line_starts
            .get(line + 1)
            .map_or(self.len, |next| next - 1)
    }

    fn splits_character(&self, offset: usize) -> bool {
        self.split_offsets.binary_search(&offset).is_ok()
    }

    /// Convert a line/character position to an offset.
    ///
    /// The character may point at the end of the line but not past it.
    pub fn position_to_offset(&self, position: Position) -> Result<usize, ConversionError> {
        let out_of_bounds = ConversionError::PositionOutOfBounds {
            line: position.line,
            character: position.character,
        };
        let line_start = self.line_start(position.line).ok_or(out_of_bounds.clone())?;
        let offset = line_start
            .checked_add(position.character)
            .ok_or(out_of_bounds.clone())?;

        if offset > self.line_end(position.line) {
            return Err(out_of_bounds);
        }
        if self.splits_character(offset) {
            return Err(ConversionError::SplitsCharacter { offset });
        }
        Ok(offset)
    }

    /// Convert an offset to a line/character position
    pub fn offset_to_position(&self, offset: usize) -> Result<Position, ConversionError> {
        if offset > self.len {
            return Err(ConversionError::OffsetOutOfBounds {
                offset,
                len: self.len,
            });
        }
        if self.splits_character(offset) {
            return Err(ConversionError::SplitsCharacter { offset });
        }

        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };

        Ok(Position::new(line, offset - self.line_starts[line]))
    }

    /// Convert an offset span to a range
    pub fn span_to_range(&self, span: OffsetSpan) -> Result<Range, ConversionError> {
        Ok(Range::new(
            self.offset_to_position(span.start)?,
            self.offset_to_position(span.end)?,
        ))
    }
}

/// Convert an offset in `text` to a position, building a throwaway index
pub fn offset_to_position(text: &str, offset: usize) -> Result<Position, ConversionError> {
    LineIndex::new(text).offset_to_position(offset)
}

/// Convert a position in `text` to an offset, building a throwaway index
pub fn position_to_offset(text: &str, position: Position) -> Result<usize, ConversionError> {
    LineIndex::new(text).position_to_offset(position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert!(index.is_empty());
        assert_eq!(index.position_to_offset(Position::new(0, 0)), Ok(0));
        assert_eq!(index.offset_to_position(0), Ok(Position::new(0, 0)));
    }

    #[test]
    fn test_multiple_lines() {
        let source = "line 0\nline 1\nline 2";
        let index = LineIndex::new(source);

        assert_eq!(index.line_count(), 3);
        assert_eq!(index.position_to_offset(Position::new(1, 0)), Ok(7));
        assert_eq!(index.position_to_offset(Position::new(2, 0)), Ok(14));
        assert_eq!(index.position_to_offset(Position::new(1, 5)), Ok(12));

        assert_eq!(index.offset_to_position(10), Ok(Position::new(1, 3)));
        assert_eq!(index.offset_to_position(14), Ok(Position::new(2, 0)));
    }

    #[test]
    fn test_offset_of_newline_is_end_of_line() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.offset_to_position(2), Ok(Position::new(0, 2)));
        assert_eq!(index.position_to_offset(Position::new(0, 2)), Ok(2));
    }

    #[test]
    fn test_trailing_newline_adds_empty_line() {
        let index = LineIndex::new("a\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.offset_to_position(2), Ok(Position::new(1, 0)));
    }

    #[test]
    fn test_out_of_bounds() {
        let index = LineIndex::new("line 0\nline 1");

        assert_eq!(
            index.position_to_offset(Position::new(10, 0)),
            Err(ConversionError::PositionOutOfBounds {
                line: 10,
                character: 0
            })
        );
        assert_eq!(
            index.position_to_offset(Position::new(0, 7)),
            Err(ConversionError::PositionOutOfBounds {
                line: 0,
                character: 7
            })
        );
        assert_eq!(
            index.offset_to_position(14),
            Err(ConversionError::OffsetOutOfBounds { offset: 14, len: 13 })
        );
    }

    #[test]
    fn test_utf16_code_units() {
        // 世 and 界 are one UTF-16 unit each despite being three bytes in UTF-8
        let index = LineIndex::new("Hello 世界\nSecond line");
        assert_eq!(index.line_start(1), Some(9));
        assert_eq!(index.offset_to_position(10), Ok(Position::new(1, 1)));
    }

    #[test]
    fn test_surrogate_pairs() {
        // 😀 occupies offsets 2..4
        let index = LineIndex::new("a 😀 b");
        assert_eq!(index.len(), 6);
        assert_eq!(index.offset_to_position(4), Ok(Position::new(0, 4)));
        assert_eq!(
            index.offset_to_position(3),
            Err(ConversionError::SplitsCharacter { offset: 3 })
        );
        assert_eq!(
            index.position_to_offset(Position::new(0, 3)),
            Err(ConversionError::SplitsCharacter { offset: 3 })
        );
    }

    #[test]
    fn test_windows_line_endings() {
        let index = LineIndex::new("line 0\r\nline 1\r\nline 2");
        assert_eq!(index.position_to_offset(Position::new(1, 0)), Ok(8));
        assert_eq!(index.position_to_offset(Position::new(0, 7)), Ok(7));
        assert_eq!(index.position_to_offset(Position::new(2, 0)), Ok(16));
    }

    #[test]
    fn test_span_to_range() {
        let index = LineIndex::new("import x from './a';\nx();\n");
        let range = index.span_to_range(OffsetSpan::new(21, 22)).unwrap();
        assert_eq!(range, Range::new(Position::new(1, 0), Position::new(1, 1)));
    }

    #[test]
    fn test_roundtrip_every_offset() {
        let source = "const a = '😀';\r\n\n  // ümlaut 世界\nexport { a };\n";
        let index = LineIndex::new(source);

        for offset in 0..=index.len() {
            match index.offset_to_position(offset) {
                Ok(position) => assert_eq!(
                    index.position_to_offset(position),
                    Ok(offset),
                    "offset {offset} -> position {position}"
                ),
                Err(err) => assert_eq!(err, ConversionError::SplitsCharacter { offset }),
            }
        }
    }

    #[test]
    fn test_free_functions() {
        assert_eq!(offset_to_position("a\nb", 2), Ok(Position::new(1, 0)));
        assert_eq!(position_to_offset("a\nb", Position::new(1, 1)), Ok(3));
    }
}
