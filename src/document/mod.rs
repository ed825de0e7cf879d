//! The shared document model.
//!
//! A [`Document`] is the single source of truth for an editing session:
//! the markdown text, whether it has unsaved edits, and where it came from.

mod types;

pub use types::{Document, Identity};

/// Markdown file extensions accepted by open/save.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// File name suggested when saving an untitled document.
pub const DEFAULT_FILE_NAME: &str = "document.md";

/// Content shown when a session starts without a file.
pub const WELCOME_MARKDOWN: &str = r#"# Welcome to Markdual

A **dual-pane** editor for viewing and editing Markdown files.

## Features

- **View Mode**: See your Markdown rendered
- **Edit Mode**: Split pane with rich text and source editor
- **File Access**: Open and save files directly

## Getting Started

1. Switch to edit mode
2. Use the **rich text** pane on the left for structured editing
3. Use the **source** pane on the right for direct Markdown editing
4. Changes sync automatically between both panes

## Markdown Support

*Italic*, **bold**, and ~~strikethrough~~ text.

Inline `code` and code blocks:

```rust
fn hello() {
    println!("Hello, World!");
}
```

- [x] Create Markdown editor
- [x] Add split pane editing
- [ ] Take over the world

> Code is truth. Rendering is how we perceive.

| Feature | Status |
|---------|--------|
| View Mode | ✅ |
| Edit Mode | ✅ |
"#;

/// Returns true if the path has a markdown extension.
pub fn is_markdown_file(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
