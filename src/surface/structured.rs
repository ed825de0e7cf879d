use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::error::{Result, SyncError};
use crate::structured::{BlockKind, MountPoint, StructuredEdit, StructuredEngine};

use super::{ExternalWrite, Surface, SurfaceAdapter, SurfaceChange, WriteOutcome};

/// Builds the engine for a freshly mounted structured surface.
///
/// Runs off the UI thread. The default is [`StructuredEngine::create`].
pub type Setup = Box<dyn FnOnce(&MountPoint, &str) -> Result<StructuredEngine> + Send>;

/// Progress of the asynchronous engine setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStatus {
    /// Setup still running
    Pending,
    /// Engine installed and accepting writes
    Ready,
    /// Setup failed; the surface stays unusable until remounted
    Failed,
}

enum State {
    Initializing(Receiver<Result<StructuredEngine>>),
    Ready(StructuredEngine),
    Failed,
}

/// Adapter over the structured (rich-text) engine.
///
/// The engine is built on a worker thread. Until it arrives, external writes
/// are held as a single pending write (latest wins) and user edits are
/// refused. Dropping the adapter raises the abort flag so a setup that
/// finishes afterwards disposes its engine instead of handing it over.
pub struct StructuredAdapter {
    mount: MountPoint,
    state: State,
    abort: Arc<AtomicBool>,
    last_known_text: String,
    pending: Option<String>,
}

impl StructuredAdapter {
    /// Mount a structured surface on `mount`, populated with `initial`.
    pub fn mount(mount: &MountPoint, initial: &str) -> Self {
        Self::mount_with(mount, initial, Box::new(StructuredEngine::create))
    }

    /// Mount with a custom engine setup.
    pub fn mount_with(mount: &MountPoint, initial: &str, setup: Setup) -> Self {
        let (tx, rx) = mpsc::channel();
        let abort = Arc::new(AtomicBool::new(false));

        let worker_abort = Arc::clone(&abort);
        let worker_mount = mount.clone();
        let text = initial.to_string();
        std::thread::spawn(move || {
            let _serial = worker_mount.setup_lock();
            if worker_abort.load(Ordering::Acquire) {
                return;
            }
            let result = setup(&worker_mount, &text);
            if worker_abort.load(Ordering::Acquire) {
                if let Ok(engine) = result {
                    tracing::debug!(mount = %worker_mount.name(), "setup finished after teardown");
                    engine.destroy();
                }
                return;
            }
            // A receiver dropped in the meantime hands the engine back here
            // (or discards it with the channel); either way it is disposed.
            let _ = tx.send(result);
        });

        tracing::debug!(mount = %mount.name(), "structured surface mounting");
        Self {
            mount: mount.clone(),
            state: State::Initializing(rx),
            abort,
            last_known_text: initial.to_string(),
            pending: None,
        }
    }

    pub const fn mount_point(&self) -> &MountPoint {
        &self.mount
    }

    /// Check whether setup has finished, installing the engine if so.
    pub fn poll_init(&mut self) -> InitStatus {
        let State::Initializing(rx) = &self.state else {
            return self.status();
        };

        match rx.try_recv() {
            Ok(Ok(engine)) => {
                self.state = State::Ready(engine);
                tracing::debug!(mount = %self.mount.name(), "structured surface ready");
                self.flush_pending();
            }
            Ok(Err(err)) => {
                tracing::warn!(mount = %self.mount.name(), "{err}");
                self.fail();
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                tracing::warn!(mount = %self.mount.name(), "{}", SyncError::InitAbandoned);
                self.fail();
            }
        }
        self.status()
    }

    pub const fn status(&self) -> InitStatus {
        match self.state {
            State::Initializing(_) => InitStatus::Pending,
            State::Ready(_) => InitStatus::Ready,
            State::Failed => InitStatus::Failed,
        }
    }

    /// Write waiting for the engine, if any.
    pub fn pending_write(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Top-level blocks, once ready.
    pub fn blocks(&self) -> Option<&[BlockKind]> {
        match &self.state {
            State::Ready(engine) => Some(engine.blocks()),
            _ => None,
        }
    }

    /// Markdown held by the engine, once ready.
    pub fn markdown(&self) -> Option<&str> {
        match &self.state {
            State::Ready(engine) => Some(engine.markdown()),
            _ => None,
        }
    }

    /// Apply a user edit and report the re-serialized text.
    ///
    /// # Errors
    /// [`SyncError::NotReady`] before the engine is installed, or the
    /// engine's error if the edit does not fit the tree.
    pub fn edit(&mut self, edit: &StructuredEdit) -> Result<SurfaceChange> {
        let State::Ready(engine) = &mut self.state else {
            return Err(SyncError::NotReady);
        };
        let text = engine.apply(edit)?.to_string();
        self.last_known_text.clone_from(&text);
        Ok(SurfaceChange {
            surface: Surface::Structured,
            text,
        })
    }

    /// Tear down, disposing the engine or abandoning its setup.
    pub fn unmount(self) {
        tracing::debug!(mount = %self.mount.name(), status = ?self.status(), "structured surface unmounting");
        drop(self);
    }

    fn fail(&mut self) {
        self.state = State::Failed;
        self.pending = None;
    }

    fn flush_pending(&mut self) {
        let Some(text) = self.pending.take() else {
            return;
        };
        if let State::Ready(engine) = &mut self.state
            && engine.markdown() != text
        {
            engine.replace_all(&text);
        }
        self.last_known_text = text;
    }
}

impl SurfaceAdapter for StructuredAdapter {
    fn surface(&self) -> Surface {
        Surface::Structured
    }

    fn last_known_text(&self) -> &str {
        &self.last_known_text
    }

    fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    fn apply_external_text(&mut self, write: ExternalWrite<'_>) -> WriteOutcome {
        let text = write.text();
        match &mut self.state {
            State::Failed => WriteOutcome::Dropped,
            State::Initializing(_) => {
                self.pending = (text != self.last_known_text).then(|| text.to_string());
                WriteOutcome::Queued
            }
            State::Ready(engine) => {
                if self.last_known_text == text {
                    return WriteOutcome::Unchanged;
                }
                engine.replace_all(text);
                text.clone_into(&mut self.last_known_text);
                WriteOutcome::Applied
            }
        }
    }
}

impl Drop for StructuredAdapter {
    fn drop(&mut self) {
        self.abort.store(true, Ordering::Release);
    }
}

impl std::fmt::Debug for StructuredAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredAdapter")
            .field("mount", &self.mount.name())
            .field("status", &self.status())
            .field("pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::Sender;
    use std::time::{Duration, Instant};

    fn settle(adapter: &mut StructuredAdapter) -> InitStatus {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let status = adapter.poll_init();
            if status != InitStatus::Pending || Instant::now() > deadline {
                return status;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        cond()
    }

    /// A setup that blocks until the returned sender fires.
    fn gated_setup() -> (Sender<()>, Setup) {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let setup: Setup = Box::new(move |mount: &MountPoint, text: &str| {
            let _ = gate_rx.recv();
            StructuredEngine::create(mount, text)
        });
        (gate_tx, setup)
    }

    #[test]
    fn test_mount_becomes_ready() {
        let mount = MountPoint::new("rich");
        let mut adapter = StructuredAdapter::mount(&mount, "# Hi\n");
        assert_eq!(settle(&mut adapter), InitStatus::Ready);
        assert!(adapter.is_ready());
        assert_eq!(adapter.markdown(), Some("# Hi\n"));
        assert_eq!(mount.live_instances(), 1);
    }

    #[test]
    fn test_write_before_ready_is_queued_then_applied() {
        let mount = MountPoint::new("rich");
        let (gate, setup) = gated_setup();
        let mut adapter = StructuredAdapter::mount_with(&mount, "initial", setup);

        assert_eq!(
            adapter.apply_external_text(ExternalWrite::new("first")),
            WriteOutcome::Queued
        );
        assert_eq!(
            adapter.apply_external_text(ExternalWrite::new("second")),
            WriteOutcome::Queued
        );
        assert_eq!(adapter.pending_write(), Some("second"));
        assert!(!adapter.is_ready());

        gate.send(()).unwrap();
        assert_eq!(settle(&mut adapter), InitStatus::Ready);
        assert_eq!(adapter.markdown(), Some("second"));
        assert_eq!(adapter.last_known_text(), "second");
        assert_eq!(adapter.pending_write(), None);
    }

    #[test]
    fn test_queued_write_back_to_initial_clears_pending() {
        let mount = MountPoint::new("rich");
        let (gate, setup) = gated_setup();
        let mut adapter = StructuredAdapter::mount_with(&mount, "initial", setup);
        adapter.apply_external_text(ExternalWrite::new("changed"));
        adapter.apply_external_text(ExternalWrite::new("initial"));
        assert_eq!(adapter.pending_write(), None);
        gate.send(()).unwrap();
        settle(&mut adapter);
        assert_eq!(adapter.markdown(), Some("initial"));
    }

    #[test]
    fn test_user_edit_before_ready_is_refused() {
        let mount = MountPoint::new("rich");
        let (_gate, setup) = gated_setup();
        let mut adapter = StructuredAdapter::mount_with(&mount, "hi", setup);
        let result = adapter.edit(&StructuredEdit::ToggleStrong { block: 0 });
        assert!(matches!(result, Err(SyncError::NotReady)));
    }

    #[test]
    fn test_edit_reports_serialized_text() {
        let mount = MountPoint::new("rich");
        let mut adapter = StructuredAdapter::mount(&mount, "hi\n");
        settle(&mut adapter);
        let change = adapter
            .edit(&StructuredEdit::ToggleStrong { block: 0 })
            .unwrap();
        assert_eq!(change.surface, Surface::Structured);
        assert_eq!(change.text.trim_end(), "**hi**");
        assert_eq!(adapter.last_known_text(), change.text);
    }

    #[test]
    fn test_external_write_of_known_text_is_noop() {
        let mount = MountPoint::new("rich");
        let mut adapter = StructuredAdapter::mount(&mount, "same\n");
        settle(&mut adapter);
        assert_eq!(
            adapter.apply_external_text(ExternalWrite::new("same\n")),
            WriteOutcome::Unchanged
        );
    }

    #[test]
    fn test_external_write_replaces_tree() {
        let mount = MountPoint::new("rich");
        let mut adapter = StructuredAdapter::mount(&mount, "para\n");
        settle(&mut adapter);
        let outcome = adapter.apply_external_text(ExternalWrite::new("# Title"));
        assert_eq!(outcome, WriteOutcome::Applied);
        assert_eq!(adapter.blocks(), Some(&[BlockKind::Heading(1)][..]));
        assert_eq!(adapter.last_known_text(), "# Title");
    }

    #[test]
    fn test_failed_setup_is_tolerated() {
        let mount = MountPoint::new("rich");
        let setup: Setup = Box::new(|_: &MountPoint, _: &str| -> Result<StructuredEngine> {
            Err(SyncError::InitFailed("no engine".to_string()))
        });
        let mut adapter = StructuredAdapter::mount_with(&mount, "x", setup);
        assert_eq!(settle(&mut adapter), InitStatus::Failed);
        assert!(!adapter.is_ready());
        assert_eq!(
            adapter.apply_external_text(ExternalWrite::new("y")),
            WriteOutcome::Dropped
        );
        assert!(matches!(
            adapter.edit(&StructuredEdit::DeleteBlock { block: 0 }),
            Err(SyncError::NotReady)
        ));
    }

    #[test]
    fn test_panicking_setup_is_tolerated() {
        let mount = MountPoint::new("rich");
        let setup: Setup = Box::new(|_: &MountPoint, _: &str| -> Result<StructuredEngine> {
            panic!("engine exploded")
        });
        let mut adapter = StructuredAdapter::mount_with(&mount, "x", setup);
        assert_eq!(settle(&mut adapter), InitStatus::Failed);
    }

    #[test]
    fn test_unmount_before_ready_disposes_late_engine() {
        let mount = MountPoint::new("rich");
        let (gate, setup) = gated_setup();
        let adapter = StructuredAdapter::mount_with(&mount, "x", setup);
        adapter.unmount();
        // The worker may have bailed out before running setup at all.
        let _ = gate.send(());
        assert!(wait_for(|| mount.live_instances() == 0));
    }

    #[test]
    fn test_unmount_after_ready_disposes_engine() {
        let mount = MountPoint::new("rich");
        let mut adapter = StructuredAdapter::mount(&mount, "x");
        settle(&mut adapter);
        assert_eq!(mount.live_instances(), 1);
        adapter.unmount();
        assert_eq!(mount.live_instances(), 0);
    }

    #[test]
    fn test_remount_waits_for_abandoned_setup() {
        let mount = MountPoint::new("rich");
        let (gate, setup) = gated_setup();
        let first = StructuredAdapter::mount_with(&mount, "old", setup);
        first.unmount();

        let mut second = StructuredAdapter::mount(&mount, "new");
        let _ = gate.send(());

        assert_eq!(settle(&mut second), InitStatus::Ready);
        assert_eq!(second.markdown(), Some("new"));
        assert_eq!(mount.live_instances(), 1);
    }
}
