//! Errors raised by the editing core.
//!
//! None of these reach the user: the coordinator recovers from each one
//! locally and logs it.

use crate::surface::Surface;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("mount point `{0}` already hosts a live editor instance")]
    MountPointBusy(String),

    #[error("structured editor failed to initialize: {0}")]
    InitFailed(String),

    #[error("structured editor setup was abandoned before it finished")]
    InitAbandoned,

    #[error("no block at index {index} (document has {len})")]
    NoSuchBlock { index: usize, len: usize },

    #[error("block {index} does not hold inline text")]
    NotInline { index: usize },

    #[error("heading level {0} is out of range (0-6)")]
    HeadingLevel(u8),

    #[error("{0} surface is not mounted")]
    NotMounted(Surface),

    #[error("structured surface is not ready")]
    NotReady,

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
