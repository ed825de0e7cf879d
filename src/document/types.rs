//! Core document types.

use std::path::{Path, PathBuf};

/// Where a document came from, used to resolve the save target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Display name (file name as the user sees it)
    name: String,
    /// Full path, when the document is backed by a file on disk
    path: Option<PathBuf>,
}

impl Identity {
    /// An identity known only by name (e.g. a download target).
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
        }
    }

    /// An identity backed by a file path. The name is the final path component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            name,
            path: Some(path),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// The shared markdown text of an editing session.
///
/// Both editor surfaces observe derivations of this value but never own it;
/// only the sync coordinator mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    text: String,
    dirty: bool,
    origin: Option<Identity>,
}

impl Document {
    /// Create a clean, untitled document holding `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            dirty: false,
            origin: None,
        }
    }

    /// Create a session document holding the welcome text.
    pub fn welcome() -> Self {
        Self::new(super::WELCOME_MARKDOWN)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the text differs from the last loaded or saved value.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub const fn origin(&self) -> Option<&Identity> {
        self.origin.as_ref()
    }

    /// Display name of the origin, if any.
    pub fn name(&self) -> Option<&str> {
        self.origin.as_ref().map(Identity::name)
    }

    /// Replace the text wholesale with freshly loaded content.
    pub fn load(&mut self, text: impl Into<String>, identity: Option<Identity>) {
        self.text = text.into();
        self.dirty = false;
        self.origin = identity;
    }

    /// Record an edit.
    pub fn update(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.dirty = true;
    }

    /// Clear the dirty flag after a successful save.
    pub const fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Point the document at a new save target (after save-as).
    pub fn rename(&mut self, identity: Identity) {
        self.origin = Some(identity);
    }

    /// Empty, untitled and clean.
    pub fn reset(&mut self) {
        self.text.clear();
        self.origin = None;
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_is_clean_and_untitled() {
        let doc = Document::new("# Hi");
        assert_eq!(doc.text(), "# Hi");
        assert!(!doc.is_dirty());
        assert!(doc.origin().is_none());
    }

    #[test]
    fn test_update_marks_dirty() {
        let mut doc = Document::new("a");
        doc.update("ab");
        assert_eq!(doc.text(), "ab");
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_update_with_same_text_still_marks_dirty() {
        let mut doc = Document::new("a");
        doc.update("a");
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_load_clears_dirty_and_sets_origin() {
        let mut doc = Document::new("a");
        doc.update("b");
        doc.load("loaded", Some(Identity::named("notes.md")));
        assert_eq!(doc.text(), "loaded");
        assert!(!doc.is_dirty());
        assert_eq!(doc.name(), Some("notes.md"));
    }

    #[test]
    fn test_mark_saved_keeps_text() {
        let mut doc = Document::new("a");
        doc.update("edited");
        doc.mark_saved();
        assert_eq!(doc.text(), "edited");
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut doc = Document::new("a");
        doc.load("x", Some(Identity::named("x.md")));
        doc.update("y");
        doc.reset();
        assert_eq!(doc.text(), "");
        assert!(!doc.is_dirty());
        assert!(doc.origin().is_none());
    }

    #[test]
    fn test_empty_text_is_valid() {
        let mut doc = Document::new("a");
        doc.update("");
        assert_eq!(doc.text(), "");
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_identity_from_path_uses_file_name() {
        let id = Identity::from_path("/tmp/docs/readme.md");
        assert_eq!(id.name(), "readme.md");
        assert_eq!(id.path(), Some(Path::new("/tmp/docs/readme.md")));
    }

    #[test]
    fn test_rename_keeps_dirty_state() {
        let mut doc = Document::new("a");
        doc.update("b");
        doc.rename(Identity::named("b.md"));
        assert!(doc.is_dirty());
        assert_eq!(doc.name(), Some("b.md"));
    }
}
