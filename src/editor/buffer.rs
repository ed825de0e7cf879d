use ropey::Rope;

use super::history::History;

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, in chars within the line.
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A plain-text buffer backed by a rope, with cursor and undo history.
///
/// Every content-changing operation records exactly one undo unit, so a
/// whole-buffer [`replace_all`](Self::replace_all) undoes in one step.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    history: History,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
            history: History::default(),
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without its line break).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let len = self.line_len(line_idx);
        Some(self.rope.line(line_idx).slice(..len).to_string())
    }

    /// Length of a line in chars, without its line break.
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        while len > 0 && is_line_break(line.char(len - 1)) {
            len -= 1;
        }
        len
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) {
        let mut tmp = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut tmp));
    }

    /// Insert a string at the cursor position, leaving the cursor after it.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.record();
        let char_idx = self.cursor_char_idx();
        self.rope.insert(char_idx, s);
        self.set_cursor_char_idx(char_idx + s.chars().count());
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_back(&mut self) -> bool {
        let char_idx = self.cursor_char_idx();
        if char_idx == 0 {
            return false;
        }
        self.record();
        let start = if char_idx >= 2
            && self.rope.char(char_idx - 1) == '\n'
            && self.rope.char(char_idx - 2) == '\r'
        {
            char_idx - 2
        } else {
            char_idx - 1
        };
        self.rope.remove(start..char_idx);
        self.set_cursor_char_idx(start);
        true
    }

    /// Delete the character at the cursor (Delete key).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let char_idx = self.cursor_char_idx();
        let total = self.rope.len_chars();
        if char_idx >= total {
            return false;
        }
        self.record();
        let end = if self.rope.char(char_idx) == '\r'
            && char_idx + 1 < total
            && self.rope.char(char_idx + 1) == '\n'
        {
            char_idx + 2
        } else {
            char_idx + 1
        };
        self.rope.remove(char_idx..end);
        true
    }

    /// Replace the whole buffer as a single undo unit.
    ///
    /// The cursor keeps its line and column, clamped into the new content.
    pub fn replace_all(&mut self, text: &str) {
        self.record();
        self.rope = Rope::from_str(text);
        self.move_to(self.cursor.line, self.cursor.col);
    }

    /// Revert the most recent edit. Returns `true` if anything changed.
    pub fn undo(&mut self) -> bool {
        let Some((rope, cursor)) = self.history.undo(&self.rope, self.cursor) else {
            return false;
        };
        self.rope = rope;
        self.cursor = cursor;
        true
    }

    /// Re-apply the most recently undone edit. Returns `true` if anything changed.
    pub fn redo(&mut self) -> bool {
        let Some((rope, cursor)) = self.history.redo(&self.rope, self.cursor) else {
            return false;
        };
        self.rope = rope;
        self.cursor = cursor;
        true
    }

    /// Number of edits that can currently be undone.
    pub fn undo_depth(&self) -> usize {
        self.history.undo_len()
    }

    /// Move the cursor in the given direction.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_vertical(-1),
            Direction::Down => self.move_vertical(1),
        }
    }

    /// Move cursor to a specific line and column, clamped to the content.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let max_line = self.line_count().saturating_sub(1);
        self.cursor.line = line.min(max_line);
        let max_col = self.line_len(self.cursor.line);
        self.cursor.set_col(col.min(max_col));
    }

    // --- Private helpers ---

    fn record(&mut self) {
        self.history.record(&self.rope, self.cursor);
    }

    fn cursor_char_idx(&self) -> usize {
        let line_start = self.rope.line_to_char(self.cursor.line);
        line_start + self.cursor.col.min(self.line_len(self.cursor.line))
    }

    fn set_cursor_char_idx(&mut self, char_idx: usize) {
        let line = self.rope.char_to_line(char_idx);
        let col = char_idx - self.rope.line_to_char(line);
        self.cursor.line = line;
        self.cursor.set_col(col);
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.set_col(self.cursor.col - 1);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        if self.cursor.col < self.line_len(self.cursor.line) {
            self.cursor.set_col(self.cursor.col + 1);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let Some(target) = self.cursor.line.checked_add_signed(delta) else {
            return;
        };
        if target >= self.line_count() {
            return;
        }
        self.cursor.line = target;
        self.cursor.col = self.cursor.col_memory.min(self.line_len(target));
    }
}

const fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("undo_depth", &self.history.undo_len())
            .finish()
    }
}
