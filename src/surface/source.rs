use crate::editor::{Cursor, Direction, EditorBuffer, Viewport};

use super::{ExternalWrite, Surface, SurfaceAdapter, SurfaceChange, WriteOutcome};

/// Adapter over the plain-text source buffer.
///
/// User edits return a [`SurfaceChange`]; external writes keep the cursor
/// and scroll position where the user left them.
#[derive(Debug)]
pub struct SourceAdapter {
    buffer: EditorBuffer,
    viewport: Viewport,
    last_known_text: String,
}

impl SourceAdapter {
    /// Mount a source surface showing `initial`, sized `width` x `height`.
    pub fn mount(initial: &str, width: u16, height: u16) -> Self {
        let buffer = EditorBuffer::from_text(initial);
        let viewport = Viewport::new(width, height, buffer.line_count());
        tracing::debug!(bytes = initial.len(), "source surface mounted");
        Self {
            buffer,
            viewport,
            last_known_text: initial.to_string(),
        }
    }

    pub const fn buffer(&self) -> &EditorBuffer {
        &self.buffer
    }

    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub const fn cursor(&self) -> Cursor {
        self.buffer.cursor()
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    // --- User edits: each returns the change to route ---

    /// Type `text` at the cursor.
    pub fn insert(&mut self, text: &str) -> Option<SurfaceChange> {
        if text.is_empty() {
            return None;
        }
        self.buffer.insert_str(text);
        Some(self.commit())
    }

    /// Break the line at the cursor.
    pub fn newline(&mut self) -> SurfaceChange {
        self.buffer.split_line();
        self.commit()
    }

    /// Delete before the cursor.
    pub fn backspace(&mut self) -> Option<SurfaceChange> {
        self.buffer.delete_back().then(|| self.commit())
    }

    /// Delete at the cursor.
    pub fn delete(&mut self) -> Option<SurfaceChange> {
        self.buffer.delete_forward().then(|| self.commit())
    }

    pub fn undo(&mut self) -> Option<SurfaceChange> {
        self.buffer.undo().then(|| self.commit())
    }

    pub fn redo(&mut self) -> Option<SurfaceChange> {
        self.buffer.redo().then(|| self.commit())
    }

    // --- Navigation: never changes content ---

    pub fn move_cursor(&mut self, direction: Direction) {
        self.buffer.move_cursor(direction);
        self.follow_cursor();
    }

    pub fn move_to(&mut self, line: usize, col: usize) {
        self.buffer.move_to(line, col);
        self.follow_cursor();
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.viewport.scroll_down(lines);
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.viewport.scroll_up(lines);
    }

    pub const fn scroll_right(&mut self, cols: usize) {
        self.viewport.scroll_right(cols);
    }

    pub const fn scroll_left(&mut self, cols: usize) {
        self.viewport.scroll_left(cols);
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport.resize(width, height);
    }

    fn commit(&mut self) -> SurfaceChange {
        let text = self.buffer.text();
        self.viewport.set_total_lines(self.buffer.line_count());
        self.follow_cursor();
        self.last_known_text.clone_from(&text);
        SurfaceChange {
            surface: Surface::Source,
            text,
        }
    }

    fn follow_cursor(&mut self) {
        let cursor = self.buffer.cursor();
        self.viewport.ensure_visible(cursor.line, cursor.col);
    }
}

impl SurfaceAdapter for SourceAdapter {
    fn surface(&self) -> Surface {
        Surface::Source
    }

    fn last_known_text(&self) -> &str {
        &self.last_known_text
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn apply_external_text(&mut self, write: ExternalWrite<'_>) -> WriteOutcome {
        let text = write.text();
        if self.last_known_text == text {
            return WriteOutcome::Unchanged;
        }

        let cursor = self.buffer.cursor();
        let scroll = self.viewport.position();

        self.buffer.replace_all(text);
        self.buffer.move_to(cursor.line, cursor.col);
        self.viewport.set_total_lines(self.buffer.line_count());
        self.viewport.restore(scroll);

        text.clone_into(&mut self.last_known_text);
        tracing::trace!(
            line = self.buffer.cursor().line,
            col = self.buffer.cursor().col,
            top = self.viewport.offset(),
            "source surface took external write"
        );
        WriteOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_lines(n: usize) -> String {
        (1..=n)
            .map(|i| format!("line {i} with some text"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_mount_holds_initial_text() {
        let adapter = SourceAdapter::mount("# Hi", 80, 24);
        assert_eq!(adapter.text(), "# Hi");
        assert_eq!(adapter.last_known_text(), "# Hi");
        assert!(adapter.is_ready());
    }

    #[test]
    fn test_insert_reports_change() {
        let mut adapter = SourceAdapter::mount("", 80, 24);
        let change = adapter.insert("# Title").unwrap();
        assert_eq!(change.surface, Surface::Source);
        assert_eq!(change.text, "# Title");
        assert_eq!(adapter.last_known_text(), "# Title");
    }

    #[test]
    fn test_empty_insert_reports_nothing() {
        let mut adapter = SourceAdapter::mount("x", 80, 24);
        assert!(adapter.insert("").is_none());
    }

    #[test]
    fn test_backspace_at_start_reports_nothing() {
        let mut adapter = SourceAdapter::mount("x", 80, 24);
        assert!(adapter.backspace().is_none());
    }

    #[test]
    fn test_cursor_movement_reports_nothing_and_keeps_text() {
        let mut adapter = SourceAdapter::mount("ab\ncd", 80, 24);
        adapter.move_to(1, 1);
        adapter.move_cursor(Direction::Up);
        assert_eq!(adapter.cursor(), Cursor::at(0, 1));
        assert_eq!(adapter.last_known_text(), "ab\ncd");
    }

    #[test]
    fn test_external_write_replaces_content() {
        let mut adapter = SourceAdapter::mount("old", 80, 24);
        let outcome = adapter.apply_external_text(ExternalWrite::new("new text"));
        assert_eq!(outcome, WriteOutcome::Applied);
        assert_eq!(adapter.text(), "new text");
        assert_eq!(adapter.last_known_text(), "new text");
    }

    #[test]
    fn test_external_write_of_known_text_is_noop() {
        let mut adapter = SourceAdapter::mount("same\ntext", 80, 24);
        adapter.move_to(1, 2);
        let depth = adapter.buffer().undo_depth();
        let outcome = adapter.apply_external_text(ExternalWrite::new("same\ntext"));
        assert_eq!(outcome, WriteOutcome::Unchanged);
        assert_eq!(adapter.cursor(), Cursor::at(1, 2));
        assert_eq!(adapter.buffer().undo_depth(), depth);
    }

    #[test]
    fn test_external_write_clamps_cursor_into_shorter_document() {
        let mut adapter = SourceAdapter::mount(&numbered_lines(12), 80, 24);
        adapter.move_to(9, 5);
        adapter.apply_external_text(ExternalWrite::new("one\ntwo\nxy"));
        assert_eq!(adapter.cursor(), Cursor::at(2, 2));
    }

    #[test]
    fn test_external_write_keeps_cursor_when_still_valid() {
        let mut adapter = SourceAdapter::mount("hi there\nsecond", 80, 24);
        adapter.move_to(0, 3);
        adapter.apply_external_text(ExternalWrite::new("**hi** there\nsecond"));
        assert_eq!(adapter.cursor(), Cursor::at(0, 3));
    }

    #[test]
    fn test_external_write_restores_scroll_exactly() {
        let mut adapter = SourceAdapter::mount(&numbered_lines(200), 80, 20);
        adapter.scroll_down(57);
        adapter.scroll_right(4);
        let before = adapter.viewport().position();
        let mut edited = numbered_lines(200);
        edited.insert_str(0, "# Heading ");
        adapter.apply_external_text(ExternalWrite::new(&edited));
        assert_eq!(adapter.viewport().position(), before);
    }

    #[test]
    fn test_external_write_is_one_undo_step() {
        let mut adapter = SourceAdapter::mount("before", 80, 24);
        adapter.apply_external_text(ExternalWrite::new("a\nb\nc\nd"));
        assert_eq!(adapter.buffer().undo_depth(), 1);
        let change = adapter.undo().unwrap();
        assert_eq!(change.text, "before");
    }

    #[test]
    fn test_typing_scrolls_cursor_into_view() {
        let mut adapter = SourceAdapter::mount("", 80, 5);
        for _ in 0..10 {
            adapter.newline();
        }
        assert_eq!(adapter.cursor().line, 10);
        assert!(adapter.viewport().visible_range().contains(&10));
    }
}
