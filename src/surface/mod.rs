//! The two editor surfaces and what they share.
//!
//! Both adapters follow the same contract: content enters them either from
//! the user (which yields a [`SurfaceChange`] for the coordinator to route)
//! or as an [`ExternalWrite`] from the coordinator (which never yields one).

mod source;
mod structured;

use std::fmt;

pub use source::SourceAdapter;
pub use structured::{InitStatus, Setup, StructuredAdapter};

/// One of the two editing views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Rich-text view backed by a parsed tree
    Structured,
    /// Plain-text view over the literal markdown
    Source,
}

impl Surface {
    /// The surface on the other side of the split.
    pub const fn other(self) -> Self {
        match self {
            Self::Structured => Self::Source,
            Self::Source => Self::Structured,
        }
    }

    /// Parse a surface name as typed on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "structured" | "rich" | "richtext" => Some(Self::Structured),
            "source" | "code" | "markdown" => Some(Self::Source),
            _ => None,
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured => f.write_str("structured"),
            Self::Source => f.write_str("source"),
        }
    }
}

/// A user-driven content change, reported by the surface it happened in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceChange {
    pub surface: Surface,
    pub text: String,
}

/// Programmatic content pushed into a surface that is not the master.
///
/// Adapters apply these without reporting a change; constructing one is the
/// only way to reach `apply_external_text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalWrite<'a> {
    text: &'a str,
}

impl<'a> ExternalWrite<'a> {
    pub const fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub const fn text(&self) -> &'a str {
        self.text
    }
}

/// What an adapter did with an external write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Content replaced
    Applied,
    /// Surface already held this text; nothing touched
    Unchanged,
    /// Surface not ready yet; kept as the pending write (latest wins)
    Queued,
    /// Surface will never become ready; write discarded
    Dropped,
}

/// Common behavior of both editor adapters.
pub trait SurfaceAdapter {
    /// Which surface this adapter drives.
    fn surface(&self) -> Surface;

    /// Text last pushed into or pulled out of the surface.
    fn last_known_text(&self) -> &str;

    /// Whether the surface can take programmatic writes right now.
    fn is_ready(&self) -> bool;

    /// Replace the surface content without emitting a change.
    fn apply_external_text(&mut self, write: ExternalWrite<'_>) -> WriteOutcome;
}
