// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. sync::SyncError)
    clippy::module_name_repetitions
)]

//! # Markdual
//!
//! The editing core of a dual-pane markdown editor.
//!
//! One document is shown in two editable surfaces at once: a structured
//! (rich-text) surface backed by a parsed tree, and a source surface over
//! the literal markdown. Markdual keeps them consistent:
//! - Only the focused surface (the *master*) may change the document
//! - Every accepted change is pushed to the other surface silently
//! - External writes keep the source cursor and scroll where they were
//! - The structured engine starts asynchronously and is disposed on teardown
//!
//! ## Architecture
//!
//! The app shell uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state, including the [`sync::Coordinator`]
//! - **Message**: Events and actions
//! - **Update**: State transitions
//! - **View**: Text rendering of the panes
//!
//! ## Modules
//!
//! - [`document`]: The shared document model
//! - [`sync`]: Mastership coordination and change routing
//! - [`surface`]: Source and structured editor adapters
//! - [`editor`]: Rope-backed source buffer, viewport and undo history
//! - [`structured`]: Tree-backed structured editing engine
//! - [`render`]: Markdown to HTML
//! - [`files`]: Opening and saving documents
//! - [`config`]: Persisted command-line defaults
//! - [`app`]: Line-command application shell

pub mod app;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod files;
pub mod render;
pub mod structured;
pub mod surface;
pub mod sync;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{Document, Identity};
    pub use crate::error::SyncError;
    pub use crate::surface::{Surface, SurfaceAdapter};
    pub use crate::sync::{Coordinator, Mastership, Routing};
}
