//! Plain-text editing for the source surface.
//!
//! Provides a rope-backed text buffer with cursor management and undo
//! history, plus the scroll viewport that sits over it.

mod buffer;
mod history;
mod viewport;

pub use buffer::{Cursor, Direction, EditorBuffer};
pub use viewport::{ScrollPosition, Viewport};
