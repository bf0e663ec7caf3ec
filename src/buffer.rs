use tracing::debug;

use crate::collaborators::{EditingSurface, Position};
use crate::dictation::EditOperation;

/// In-memory editing surface
///
/// Stands in for the editor widget in the CLI and in tests. Stale or
/// out-of-range positions are clamped to the nearest valid location.
#[derive(Debug, Default, Clone)]
pub struct TextBuffer {
    chars: Vec<char>,
    cursor: usize,
    focused: bool,
}

impl TextBuffer {
    /// Empty buffer with the cursor at 1:1
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text` with the cursor at the end
    pub fn with_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self {
            chars,
            cursor,
            focused: false,
        }
    }

    /// Full buffer contents
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Whether [`EditingSurface::focus`] has been called
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Char offset of a position, clamped to the buffer
    fn offset_of(&self, at: Position) -> usize {
        let line = at.line.max(1);
        let mut start = 0;
        for _ in 1..line {
            match self.chars[start..].iter().position(|&c| c == '\n') {
                Some(newline) => start += newline + 1,
                None => break,
            }
        }
        let end = self.line_end(start);
        start.saturating_add(at.column.saturating_sub(1)).min(end)
    }

    fn line_start(&self, offset: usize) -> usize {
        self.chars[..offset]
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |newline| newline + 1)
    }

    fn line_end(&self, offset: usize) -> usize {
        self.chars[offset..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(self.chars.len(), |newline| offset + newline)
    }

    fn insert(&mut self, text: &str) {
        let inserted: Vec<char> = text.chars().collect();
        let count = inserted.len();
        self.chars.splice(self.cursor..self.cursor, inserted);
        self.cursor += count;
    }

    fn delete_left(&mut self, count: usize) {
        let start = self.cursor.saturating_sub(count);
        self.chars.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Delete trailing blanks, then one run of word or punctuation chars
    fn delete_word(&mut self) {
        let is_word = |c: char| c.is_alphanumeric() || c == '_';
        let mut start = self.cursor;

        while start > 0 && matches!(self.chars[start - 1], ' ' | '\t') {
            start -= 1;
        }
        if start > 0 {
            let first = self.chars[start - 1];
            if first == '\n' {
                start -= 1;
            } else {
                let word = is_word(first);
                while start > 0 {
                    let c = self.chars[start - 1];
                    if c.is_whitespace() || is_word(c) != word {
                        break;
                    }
                    start -= 1;
                }
            }
        }

        self.chars.drain(start..self.cursor);
        self.cursor = start;
    }

    fn delete_line(&mut self) {
        let start = self.line_start(self.cursor);
        let end = self.line_end(self.cursor);
        self.chars.drain(start..end);
        self.cursor = start;
    }
}

impl EditingSurface for TextBuffer {
    fn cursor(&self) -> Position {
        let start = self.line_start(self.cursor);
        let line = self.chars[..self.cursor].iter().filter(|&&c| c == '\n').count() + 1;
        Position::new(line, self.cursor - start + 1)
    }

    fn apply_edit(&mut self, at: Position, op: &EditOperation) {
        self.cursor = self.offset_of(at);
        debug!(?at, ?op, "applying edit");

        match op {
            EditOperation::InsertText(text) => self.insert(text),
            EditOperation::DeleteLeft(count) => {
                self.delete_left(usize::try_from(*count).unwrap_or(usize::MAX));
            }
            EditOperation::DeleteWord => self.delete_word(),
            EditOperation::DeleteLine => self.delete_line(),
        }
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(buffer: &mut TextBuffer, op: EditOperation) {
        let at = buffer.cursor();
        buffer.apply_edit(at, &op);
    }

    #[test]
    fn test_insert_and_cursor() {
        let mut buffer = TextBuffer::new();
        assert_eq!(buffer.cursor(), Position::new(1, 1));

        apply(&mut buffer, EditOperation::InsertText("def f ( ) : \n".to_owned()));
        apply(&mut buffer, EditOperation::InsertText("\treturn ".to_owned()));

        assert_eq!(buffer.text(), "def f ( ) : \n\treturn ");
        assert_eq!(buffer.cursor(), Position::new(2, 9));
    }

    #[test]
    fn test_delete_left() {
        let mut buffer = TextBuffer::with_text("hello");
        apply(&mut buffer, EditOperation::DeleteLeft(2));
        assert_eq!(buffer.text(), "hel");

        apply(&mut buffer, EditOperation::DeleteLeft(10));
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn test_delete_word() {
        let mut buffer = TextBuffer::with_text("print hello ");
        apply(&mut buffer, EditOperation::DeleteWord);
        assert_eq!(buffer.text(), "print ");

        let mut buffer = TextBuffer::with_text("foo(");
        apply(&mut buffer, EditOperation::DeleteWord);
        assert_eq!(buffer.text(), "foo");
    }

    #[test]
    fn test_delete_line_keeps_other_lines() {
        let mut buffer = TextBuffer::with_text("first\nsecond line");
        apply(&mut buffer, EditOperation::DeleteLine);
        assert_eq!(buffer.text(), "first\n");
        assert_eq!(buffer.cursor(), Position::new(2, 1));
    }

    #[test]
    fn test_stale_position_is_clamped() {
        let mut buffer = TextBuffer::with_text("ab\ncd");
        buffer.apply_edit(
            Position::new(9, 40),
            &EditOperation::InsertText("!".to_owned()),
        );
        assert_eq!(buffer.text(), "ab\ncd!");

        buffer.apply_edit(
            Position::new(1, 99),
            &EditOperation::InsertText("?".to_owned()),
        );
        assert_eq!(buffer.text(), "ab?\ncd!");
    }

    #[test]
    fn test_extreme_position_is_clamped() {
        let mut buffer = TextBuffer::with_text("ab\ncd");
        buffer.apply_edit(
            Position::new(2, usize::MAX),
            &EditOperation::InsertText("!".to_owned()),
        );
        assert_eq!(buffer.text(), "ab\ncd!");

        buffer.apply_edit(
            Position::new(usize::MAX, usize::MAX),
            &EditOperation::DeleteLeft(1),
        );
        assert_eq!(buffer.text(), "ab\ncd");

        buffer.apply_edit(Position::new(0, 0), &EditOperation::InsertText("#".to_owned()));
        assert_eq!(buffer.text(), "#ab\ncd");
    }

    #[test]
    fn test_focus() {
        let mut buffer = TextBuffer::new();
        assert!(!buffer.is_focused());
        buffer.focus();
        assert!(buffer.is_focused());
    }
}
