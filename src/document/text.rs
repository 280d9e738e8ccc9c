//! Cursor position to byte offset conversion.
//!
//! LSP positions are line/column pairs with the column counted in UTF-16
//! code units; the tag scanner works in byte offsets into the original
//! text. The index stores line start offsets only and borrows the source
//! at lookup time.

use tower_lsp::lsp_types::Position;

/// Pre-computed line starts for position lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset where each line starts.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Build a line index from source text.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|&(_, c)| c == '\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// Convert an LSP position to a byte offset into `source`.
    ///
    /// Returns `None` if the line is out of bounds. A column past the end
    /// of the line clamps to the line end, excluding the newline.
    pub fn offset_at(&self, source: &str, position: Position) -> Option<usize> {
        let line = position.line as usize;
        let line_start = *self.line_starts.get(line)?;
        let line_end = self
            .line_starts
            .get(line + 1)
            .map(|&next| next.saturating_sub(1))
            .unwrap_or(source.len());

        let mut utf16_col = 0u32;
        for (i, c) in source[line_start..line_end].char_indices() {
            if utf16_col >= position.character {
                return Some(line_start + i);
            }
            utf16_col += c.len_utf16() as u32;
        }

        Some(line_end.min(source.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line() {
        let source = "hello world";
        let idx = LineIndex::new(source);
        assert_eq!(idx.offset_at(source, Position::new(0, 0)), Some(0));
        assert_eq!(idx.offset_at(source, Position::new(0, 5)), Some(5));
        assert_eq!(idx.offset_at(source, Position::new(0, 11)), Some(11));
    }

    #[test]
    fn multi_line() {
        let source = "hello\nworld";
        let idx = LineIndex::new(source);
        assert_eq!(idx.offset_at(source, Position::new(0, 0)), Some(0));
        assert_eq!(idx.offset_at(source, Position::new(1, 0)), Some(6));
        assert_eq!(idx.offset_at(source, Position::new(1, 5)), Some(11));
    }

    #[test]
    fn column_clamps_to_line_end() {
        let source = "ab\ncd\n";
        let idx = LineIndex::new(source);
        // Column 10 on line 0 clamps before the newline.
        assert_eq!(idx.offset_at(source, Position::new(0, 10)), Some(2));
    }

    #[test]
    fn utf16_columns_map_to_byte_offsets() {
        // '😀' is 4 bytes in UTF-8 but 2 code units in UTF-16.
        let source = "a😀b";
        let idx = LineIndex::new(source);
        assert_eq!(idx.offset_at(source, Position::new(0, 0)), Some(0));
        assert_eq!(idx.offset_at(source, Position::new(0, 1)), Some(1));
        assert_eq!(idx.offset_at(source, Position::new(0, 3)), Some(5));
    }

    #[test]
    fn line_out_of_bounds() {
        let source = "hello";
        let idx = LineIndex::new(source);
        assert_eq!(idx.offset_at(source, Position::new(5, 0)), None);
    }
}
