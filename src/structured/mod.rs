//! Structured (rich-text) editing engine.
//!
//! The engine keeps a document as a comrak tree and re-serializes it to
//! CommonMark after every structural edit. Each engine instance is bound
//! to a [`MountPoint`]; a mount point hosts at most one live instance, and
//! dropping (or [`destroy`](StructuredEngine::destroy)ing) the engine frees
//! it for the next one.

mod tree;

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{Result, SyncError};

/// A structural edit, addressed by top-level block index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredEdit {
    /// Append plain text to the end of a paragraph or heading
    InsertText { block: usize, text: String },
    /// Wrap a block's content in strong emphasis, or unwrap it
    ToggleStrong { block: usize },
    /// Wrap a block's content in emphasis, or unwrap it
    ToggleEmphasis { block: usize },
    /// Turn a paragraph or heading into a heading of `level` (0 = paragraph)
    SetHeading { block: usize, level: u8 },
    /// Insert a new paragraph before block `at` (or at the end)
    InsertParagraph { at: usize, text: String },
    /// Remove a block
    DeleteBlock { block: usize },
}

/// Kind of a top-level block, as seen by the structured view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading(u8),
    Paragraph,
    List,
    CodeBlock,
    BlockQuote,
    Table,
    ThematicBreak,
    Html,
    Other,
}

/// The slot a structured engine renders into.
///
/// Cloning shares the slot; the live-instance count is common to all clones.
#[derive(Clone)]
pub struct MountPoint {
    name: Arc<str>,
    live: Arc<AtomicUsize>,
    setup: Arc<Mutex<()>>,
}

impl MountPoint {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            live: Arc::new(AtomicUsize::new(0)),
            setup: Arc::new(Mutex::new(())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of engine instances currently bound here (0 or 1).
    pub fn live_instances(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Serializes engine setup on this mount point.
    ///
    /// An initializer holds this until its engine is either handed over or
    /// disposed, so a remount cannot race an abandoned setup.
    pub(crate) fn setup_lock(&self) -> MutexGuard<'_, ()> {
        self.setup.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn claim(&self) -> Result<MountGuard> {
        self.live
            .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SyncError::MountPointBusy(self.name.to_string()))?;
        Ok(MountGuard {
            mount: self.clone(),
        })
    }
}

impl fmt::Debug for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountPoint")
            .field("name", &self.name)
            .field("live", &self.live_instances())
            .finish()
    }
}

/// Holds a mount point's single slot until dropped.
struct MountGuard {
    mount: MountPoint,
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        self.mount.live.fetch_sub(1, Ordering::AcqRel);
        tracing::debug!(mount = %self.mount.name, "structured engine disposed");
    }
}

/// A live structured editing instance.
pub struct StructuredEngine {
    _guard: MountGuard,
    markdown: String,
    outline: Vec<BlockKind>,
}

impl StructuredEngine {
    /// Build an engine over `initial`, bound to `mount`.
    ///
    /// # Errors
    /// Returns [`SyncError::MountPointBusy`] if another instance is still live
    /// on `mount`.
    pub fn create(mount: &MountPoint, initial: &str) -> Result<Self> {
        let guard = mount.claim()?;
        tracing::debug!(mount = %mount.name(), bytes = initial.len(), "structured engine created");
        Ok(Self {
            _guard: guard,
            markdown: initial.to_string(),
            outline: tree::outline(initial),
        })
    }

    /// The markdown the engine currently represents.
    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    /// Top-level blocks of the current tree.
    pub fn blocks(&self) -> &[BlockKind] {
        &self.outline
    }

    /// Replace the entire tree with one parsed from `markdown`.
    pub fn replace_all(&mut self, markdown: &str) {
        markdown.clone_into(&mut self.markdown);
        self.outline = tree::outline(markdown);
    }

    /// Apply a structural edit and return the re-serialized markdown.
    ///
    /// # Errors
    /// Returns an error if the edit addresses a block that does not exist or
    /// cannot take the edit. The tree is unchanged in that case.
    pub fn apply(&mut self, edit: &StructuredEdit) -> Result<&str> {
        let serialized = tree::apply(&self.markdown, edit)?;
        self.outline = tree::outline(&serialized);
        self.markdown = serialized;
        Ok(&self.markdown)
    }

    /// Tear the instance down, freeing its mount point.
    pub fn destroy(self) {
        drop(self);
    }
}

impl fmt::Debug for StructuredEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredEngine")
            .field("bytes", &self.markdown.len())
            .field("blocks", &self.outline.len())
            .finish_non_exhaustive()
    }
}
