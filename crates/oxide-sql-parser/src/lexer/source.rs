//! Immutable view over the SQL text being parsed.

use super::Span;

/// The input text of one parse call plus a line index for location reporting.
///
/// Offsets throughout the crate are byte offsets into this buffer. The line
/// index is only consulted when a caller wants human-readable positions.
#[derive(Debug, Clone)]
pub struct SourceBuffer<'a> {
    text: &'a str,
    /// Byte offset at which each line starts. Always contains `0`.
    line_starts: Vec<usize>,
}

impl<'a> SourceBuffer<'a> {
    /// Creates a buffer over `text` and indexes its line starts.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let line_starts = core::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    /// Returns the full source text.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the length of the buffer in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if the buffer is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the span covering the whole buffer.
    #[must_use]
    pub const fn full_span(&self) -> Span {
        Span::new(0, self.text.len())
    }

    /// Returns the text covered by `span`, or `None` when out of bounds.
    #[must_use]
    pub fn slice(&self, span: Span) -> Option<&'a str> {
        span.slice(self.text)
    }

    /// Returns the number of lines in the buffer.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset to a 1-based `(line, column)` pair.
    ///
    /// Columns count characters, not bytes. Offsets past the end clamp to
    /// the end of the buffer; offsets inside a multi-byte character map to
    /// that character.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self.text.get(line_start..).map_or(0, |rest| {
            rest.char_indices()
                .take_while(|(i, _)| line_start + i < offset)
                .count()
        });
        (line + 1, column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let src = SourceBuffer::new("SELECT 1");
        assert_eq!(src.line_count(), 1);
        assert_eq!(src.line_col(0), (1, 1));
        assert_eq!(src.line_col(7), (1, 8));
    }

    #[test]
    fn test_multi_line() {
        let src = SourceBuffer::new("SELECT 1;\nSELEC 2;\n");
        assert_eq!(src.line_count(), 3);
        assert_eq!(src.line_col(10), (2, 1));
        assert_eq!(src.line_col(16), (2, 7));
        assert_eq!(src.line_col(src.len()), (3, 1));
    }

    #[test]
    fn test_offset_clamped() {
        let src = SourceBuffer::new("ab");
        assert_eq!(src.line_col(100), (1, 3));
    }

    #[test]
    fn test_multibyte_columns() {
        let src = SourceBuffer::new("SELECT 'é', x");
        // 'é' is two bytes, so byte 12 is the twelfth character.
        assert_eq!(src.line_col(12), (1, 12));
    }

    #[test]
    fn test_slice() {
        let src = SourceBuffer::new("SELECT id FROM t");
        assert_eq!(src.slice(Span::new(7, 9)), Some("id"));
        assert_eq!(src.full_span(), Span::new(0, 16));
    }
}
