use crate::position::Position;

/// Maps between byte offsets and 1-based character positions of a source text.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(index, _)| index + 1),
        );

        Self {
            source,
            line_starts,
        }
    }

    /// Line terminator used by the text, judged by its first line.
    pub fn line_ending(&self) -> &'static str {
        match self.line_starts.get(1) {
            Some(next) if *next >= 2 && self.source.as_bytes()[next - 2] == b'\r' => "\r\n",
            _ => "\n",
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Text of a 1-based line without its line terminator.
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        let (start, end) = self.line_bounds(line)?;
        Some(&self.source[start..end])
    }

    /// Position of the character starting at `offset`. An offset on a line
    /// terminator (or at the end of the text) maps one column past the last
    /// character of its line.
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line_index = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line_index];
        let column = self.source[line_start..floor_char_boundary(self.source, offset)]
            .chars()
            .count()
            + 1;

        Position::new(line_index + 1, column)
    }

    /// Position of the last character of the non-empty byte range ending at
    /// `end` (exclusive).
    pub fn last_position_before(&self, start: usize, end: usize) -> Position {
        if end <= start {
            return self.position_at(start);
        }

        let last = self.source[..end]
            .char_indices()
            .next_back()
            .map_or(start, |(index, _)| index.max(start));
        self.position_at(last)
    }

    /// Byte offset of the character at `position`. A column one past the last
    /// character of the line resolves to the end of the line content.
    pub fn offset_of(&self, position: Position) -> Option<usize> {
        if position.column == 0 {
            return None;
        }

        let (start, end) = self.line_bounds(position.line)?;
        let line = &self.source[start..end];
        let wanted = position.column - 1;

        match line.char_indices().nth(wanted) {
            Some((index, _)) => Some(start + index),
            None if line.chars().count() == wanted => Some(end),
            None => None,
        }
    }

    /// Source text from `from` up to, not including, `to`.
    pub fn slice(&self, from: Position, to: Position) -> Option<&'a str> {
        let start = self.offset_of(from)?;
        let end = self.offset_of(to)?;
        self.source.get(start..end)
    }

    /// Whether everything on the line before `position` is whitespace.
    pub fn starts_line(&self, position: Position) -> bool {
        self.line_text(position.line).is_some_and(|text| {
            text.chars()
                .take(position.column.saturating_sub(1))
                .all(|character| matches!(character, ' ' | '\t'))
        })
    }

    pub fn is_blank_line(&self, line: usize) -> bool {
        self.line_text(line)
            .is_some_and(|text| text.chars().all(char::is_whitespace))
    }

    fn line_bounds(&self, line: usize) -> Option<(usize, usize)> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        let mut end = self
            .line_starts
            .get(line)
            .map_or(self.source.len(), |next| next - 1);
        if end > start && self.source.as_bytes()[end - 1] == b'\r' && end < self.source.len() {
            end -= 1;
        }

        Some((start, end))
    }
}

fn floor_char_boundary(source: &str, mut offset: usize) -> usize {
    while offset > 0 && !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
