use std::fmt;

use crate::config::{DEFAULT_SPLIT, clamp_split};
use crate::document::Document;
use crate::sync::Coordinator;

/// Rows reserved below the panes for the status line.
const STATUS_ROWS: u16 = 1;

/// Which screen the app shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Rendered, read-only view
    #[default]
    View,
    /// Structured and source panes side by side
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for ToastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug)]
pub struct Model {
    /// Document, mastership and both surfaces
    pub coordinator: Coordinator,
    /// Current screen
    pub mode: Mode,
    /// Width of the structured pane, in percent
    split: u8,
    /// Terminal size (width, height)
    size: (u16, u16),
    /// Whether the app should quit
    pub should_quit: bool,
    /// A quit with unsaved changes has been asked for once
    pub quit_confirmed: bool,
    /// A new document with unsaved changes has been asked for once
    pub new_confirmed: bool,
    toast: Option<Toast>,
}

impl Model {
    /// Create a model in view mode showing `document`.
    pub fn new(document: Document, size: (u16, u16)) -> Self {
        Self {
            coordinator: Coordinator::new(document),
            mode: Mode::View,
            split: DEFAULT_SPLIT,
            size,
            should_quit: false,
            quit_confirmed: false,
            new_confirmed: false,
            toast: None,
        }
    }

    pub fn document(&self) -> &Document {
        self.coordinator.document()
    }

    pub const fn split(&self) -> u8 {
        self.split
    }

    pub const fn size(&self) -> (u16, u16) {
        self.size
    }

    /// Move the pane divider, clamped to the allowed range.
    pub fn set_split(&mut self, percent: u8) {
        self.split = clamp_split(percent);
        self.resize_source();
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.resize_source();
    }

    /// Columns and rows available to the source pane.
    pub fn source_pane_size(&self) -> (u16, u16) {
        let (width, height) = self.size;
        let structured = u32::from(width) * u32::from(self.split) / 100;
        let source = u32::from(width).saturating_sub(structured);
        (
            u16::try_from(source).unwrap_or(u16::MAX).max(1),
            height.saturating_sub(STATUS_ROWS).max(1),
        )
    }

    /// Mount both surfaces over the current document.
    pub(super) fn enter_edit_mode(&mut self) {
        if self.mode == Mode::Edit {
            return;
        }
        let (width, height) = self.source_pane_size();
        self.coordinator.mount_structured();
        self.coordinator.mount_source(width, height);
        self.mode = Mode::Edit;
    }

    /// Tear both surfaces down. Nothing is focused afterwards.
    pub(super) fn exit_edit_mode(&mut self) {
        if self.mode == Mode::View {
            return;
        }
        self.coordinator.unmount_structured();
        self.coordinator.unmount_source();
        self.coordinator.release_mastership();
        self.mode = Mode::View;
    }

    fn resize_source(&mut self) {
        let (width, height) = self.source_pane_size();
        self.coordinator.with_source(|source| source.resize(width, height));
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
        });
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Remove and return the pending toast.
    pub fn take_toast(&mut self) -> Option<(String, ToastLevel)> {
        self.toast.take().map(|toast| (toast.message, toast.level))
    }

    /// One-line summary: file name, dirty marker, mode and master.
    pub fn status_line(&self) -> String {
        let document = self.document();
        let name = document.name().unwrap_or("untitled");
        let dirty = if document.is_dirty() { "*" } else { "" };
        match self.mode {
            Mode::View => format!("{name}{dirty} [view]"),
            Mode::Edit => {
                let master = self
                    .coordinator
                    .mastership()
                    .master()
                    .map_or_else(|| "none".to_string(), |s| s.to_string());
                format!(
                    "{name}{dirty} [edit | master: {master} | split {}%]",
                    self.split
                )
            }
        }
    }
}
