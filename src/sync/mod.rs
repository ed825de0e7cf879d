//! Mastership coordination between the two editor surfaces.
//!
//! At any instant at most one surface is the master. Only the master's
//! changes reach the [`Document`]; each accepted change is pushed to the
//! other surface as an [`ExternalWrite`], which adapters apply silently.
//! Mastership moves only when a surface gains focus. Blur does nothing, so
//! focus passing through toolbar buttons does not drop the master.

use std::time::{Duration, Instant};

use crate::document::{Document, Identity};
use crate::error::{Result, SyncError};
use crate::structured::{MountPoint, StructuredEdit};
use crate::surface::{
    ExternalWrite, InitStatus, Setup, SourceAdapter, StructuredAdapter, Surface, SurfaceAdapter,
    SurfaceChange, WriteOutcome,
};

/// Which surface currently holds authority to push changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mastership {
    #[default]
    None,
    Structured,
    Source,
}

impl Mastership {
    /// The master surface, if any.
    pub const fn master(self) -> Option<Surface> {
        match self {
            Self::None => None,
            Self::Structured => Some(Surface::Structured),
            Self::Source => Some(Surface::Source),
        }
    }

    pub const fn is(self, surface: Surface) -> bool {
        matches!(
            (self, surface),
            (Self::Structured, Surface::Structured) | (Self::Source, Surface::Source)
        )
    }
}

impl From<Surface> for Mastership {
    fn from(surface: Surface) -> Self {
        match surface {
            Surface::Structured => Self::Structured,
            Surface::Source => Self::Source,
        }
    }
}

/// What the coordinator did with a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// Sender was not the master; the document is untouched
    Ignored,
    /// Document updated; `delivered` is the other surface's outcome, or
    /// `None` when that surface is not mounted
    Propagated { delivered: Option<WriteOutcome> },
}

/// Owns the document, the mastership state and both surface slots.
#[derive(Debug)]
pub struct Coordinator {
    document: Document,
    mastership: Mastership,
    source: Option<SourceAdapter>,
    structured: Option<StructuredAdapter>,
    mount: MountPoint,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(Document::welcome())
    }
}

impl Coordinator {
    /// Start a session around `document`. No surface is mounted yet.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            mastership: Mastership::None,
            source: None,
            structured: None,
            mount: MountPoint::new("structured"),
        }
    }

    pub const fn document(&self) -> &Document {
        &self.document
    }

    pub const fn mastership(&self) -> Mastership {
        self.mastership
    }

    pub const fn source(&self) -> Option<&SourceAdapter> {
        self.source.as_ref()
    }

    pub const fn structured(&self) -> Option<&StructuredAdapter> {
        self.structured.as_ref()
    }

    /// Mount point the structured engine binds to.
    pub const fn mount_point(&self) -> &MountPoint {
        &self.mount
    }

    // --- Mastership ---

    /// A surface gained input focus: it becomes master, whatever came before.
    pub fn on_focus_gained(&mut self, surface: Surface) {
        let previous = self.mastership;
        self.mastership = Mastership::from(surface);
        if previous != self.mastership {
            tracing::debug!(?previous, master = %surface, "mastership moved");
        }
    }

    /// A surface lost focus. Mastership stays where it is.
    pub fn on_blur(&self, surface: Surface) {
        tracing::trace!(%surface, master = ?self.mastership, "blur ignored");
    }

    /// Drop mastership, e.g. when both surfaces leave the screen.
    pub fn release_mastership(&mut self) {
        if self.mastership != Mastership::None {
            tracing::debug!(previous = ?self.mastership, "mastership released");
        }
        self.mastership = Mastership::None;
    }

    /// Route a user-driven change reported by `change.surface`.
    ///
    /// A change from a non-master surface leaves the document alone, and the
    /// sender is written back to the document text so it cannot drift.
    pub fn on_surface_changed(&mut self, change: SurfaceChange) -> Routing {
        let SurfaceChange { surface, text } = change;
        if !self.mastership.is(surface) {
            let reverted = self.push_to(surface);
            tracing::debug!(%surface, master = ?self.mastership, ?reverted, "change from non-master reverted");
            return Routing::Ignored;
        }

        self.document.update(text);
        let delivered = self.push_to(surface.other());
        tracing::debug!(from = %surface, ?delivered, bytes = self.document.text().len(), "change routed");
        Routing::Propagated { delivered }
    }

    /// Run a user edit on the source surface and route what it reports.
    ///
    /// Returns `None` when the source surface is not mounted or the edit
    /// changed nothing.
    pub fn edit_source<F>(&mut self, edit: F) -> Option<Routing>
    where
        F: FnOnce(&mut SourceAdapter) -> Option<SurfaceChange>,
    {
        let change = edit(self.source.as_mut()?)?;
        Some(self.on_surface_changed(change))
    }

    /// Apply a user edit on the structured surface and route the result.
    ///
    /// # Errors
    /// Fails if the structured surface is not mounted, not ready, or the
    /// edit does not fit its tree. The document is untouched on error.
    pub fn edit_structured(&mut self, edit: &StructuredEdit) -> Result<Routing> {
        let adapter = self
            .structured
            .as_mut()
            .ok_or(SyncError::NotMounted(Surface::Structured))?;
        let change = adapter.edit(edit)?;
        Ok(self.on_surface_changed(change))
    }

    /// Run a non-editing action (cursor movement, scrolling) on the source surface.
    pub fn with_source<R>(&mut self, f: impl FnOnce(&mut SourceAdapter) -> R) -> Option<R> {
        self.source.as_mut().map(f)
    }

    // --- Surface lifecycle ---

    /// Mount (or remount) the source surface, populated from the document.
    pub fn mount_source(&mut self, width: u16, height: u16) {
        self.source = Some(SourceAdapter::mount(self.document.text(), width, height));
    }

    pub fn unmount_source(&mut self) {
        if self.source.take().is_some() {
            tracing::debug!("source surface unmounted");
        }
    }

    /// Mount (or remount) the structured surface with the default engine.
    pub fn mount_structured(&mut self) {
        self.mount_structured_with(Box::new(crate::structured::StructuredEngine::create));
    }

    /// Mount (or remount) the structured surface with a custom engine setup.
    ///
    /// Any previous instance is torn down first.
    pub fn mount_structured_with(&mut self, setup: Setup) {
        self.unmount_structured();
        self.structured = Some(StructuredAdapter::mount_with(
            &self.mount,
            self.document.text(),
            setup,
        ));
    }

    pub fn unmount_structured(&mut self) {
        if let Some(adapter) = self.structured.take() {
            adapter.unmount();
        }
    }

    /// Drive pending structured setup. Once it completes, the surface is
    /// brought up to the current document text.
    pub fn poll(&mut self) -> Option<InitStatus> {
        let adapter = self.structured.as_mut()?;
        let was_pending = adapter.status() == InitStatus::Pending;
        let status = adapter.poll_init();
        if was_pending && status == InitStatus::Ready {
            adapter.apply_external_text(ExternalWrite::new(self.document.text()));
        }
        Some(status)
    }

    /// Poll until structured setup leaves `Pending` or `timeout` passes.
    ///
    /// Only for drivers without their own loop (the line shell, tests and
    /// benches). The sync protocol itself never waits: edits made while
    /// setup is pending are queued, and `poll` picks up readiness.
    pub fn settle(&mut self, timeout: Duration) -> Option<InitStatus> {
        let deadline = Instant::now() + timeout;
        loop {
            let status = self.poll()?;
            if status != InitStatus::Pending || Instant::now() >= deadline {
                return Some(status);
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    // --- Session operations ---

    /// Replace the document with opened content.
    ///
    /// Both surfaces receive the new text and mastership resets to none.
    pub fn open(&mut self, content: impl Into<String>, identity: Option<Identity>) {
        self.document.load(content, identity);
        self.reset_surfaces();
    }

    /// Start an empty, untitled document.
    pub fn new_document(&mut self) {
        self.document.reset();
        self.reset_surfaces();
    }

    /// Record a successful save, optionally under a new identity.
    pub fn saved(&mut self, identity: Option<Identity>) {
        if let Some(identity) = identity {
            self.document.rename(identity);
        }
        self.document.mark_saved();
    }

    fn reset_surfaces(&mut self) {
        self.mastership = Mastership::None;
        let source = self.push_to(Surface::Source);
        let structured = self.push_to(Surface::Structured);
        tracing::debug!(?source, ?structured, "document replaced; mastership reset");
    }

    fn push_to(&mut self, surface: Surface) -> Option<WriteOutcome> {
        let write = ExternalWrite::new(self.document.text());
        match surface {
            Surface::Source => self
                .source
                .as_mut()
                .map(|adapter| adapter.apply_external_text(write)),
            Surface::Structured => self
                .structured
                .as_mut()
                .map(|adapter| adapter.apply_external_text(write)),
        }
    }
}
