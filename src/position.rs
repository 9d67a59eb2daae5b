use std::fmt;
use std::ops::Range;

pub type Span = Range<usize>;

/// 1-based line/column pair. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets of one source unit to line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    source: String,
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        LineIndex {
            source: source.to_string(),
            line_starts,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = self.line_starts.partition_point(|start| *start <= offset);
        let start = self.line_starts[line - 1];
        let column = self
            .source
            .get(start..offset)
            .map(|text| text.chars().count())
            .unwrap_or(offset - start);
        Position::new(line, column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_are_one_based() {
        let index = LineIndex::new("ab\ncd\n\nx");
        assert_eq!(index.position(0), Position::new(1, 1));
        assert_eq!(index.position(1), Position::new(1, 2));
        assert_eq!(index.position(3), Position::new(2, 1));
        assert_eq!(index.position(7), Position::new(4, 1));
    }

    #[test]
    fn test_columns_count_characters() {
        let index = LineIndex::new("🎀 é x");
        // '🎀' is four bytes, 'é' two
        assert_eq!(index.position(8), Position::new(1, 5));
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let index = LineIndex::new("abc");
        assert_eq!(index.position(99), Position::new(1, 4));
    }
}
