//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main loop reading line commands

mod effects;
mod event_loop;
mod input;
mod model;
mod update;
mod view;

pub use input::HELP;
pub use model::{Mode, Model, ToastLevel};
pub use update::{Message, update};
pub use view::render_screen;

use std::path::PathBuf;

use crate::config::DEFAULT_SPLIT;
use crate::files::{FileAccess, FsFileAccess};

/// Main application struct that owns the file collaborator and runs the loop.
pub struct App {
    file_path: Option<PathBuf>,
    start_in_edit: bool,
    split: u8,
    size: (u16, u16),
    files: Box<dyn FileAccess>,
}

impl App {
    /// Create a new application, optionally opening `file_path`.
    pub fn new(file_path: Option<PathBuf>) -> Self {
        Self {
            file_path,
            start_in_edit: false,
            split: DEFAULT_SPLIT,
            size: (120, 40),
            files: Box::new(FsFileAccess::new(".")),
        }
    }

    /// Start in edit mode instead of view mode.
    pub const fn with_edit_mode(mut self, enabled: bool) -> Self {
        self.start_in_edit = enabled;
        self
    }

    /// Set the initial pane split, in percent.
    pub const fn with_split(mut self, percent: u8) -> Self {
        self.split = percent;
        self
    }

    /// Set the screen size used to lay out the panes.
    pub const fn with_size(mut self, width: u16, height: u16) -> Self {
        self.size = (width, height);
        self
    }

    /// Replace the file collaborator.
    pub fn with_file_access(mut self, files: impl FileAccess + 'static) -> Self {
        self.files = Box::new(files);
        self
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("file_path", &self.file_path)
            .field("start_in_edit", &self.start_in_edit)
            .field("split", &self.split)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
