//! File collaborator: reading and writing markdown documents.
//!
//! The editing core never touches the filesystem. The app shell calls a
//! [`FileAccess`] implementation and hands the results to the coordinator.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::document::{DEFAULT_FILE_NAME, Identity, is_markdown_file};

/// Content read from disk, with the identity it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opened {
    pub content: String,
    pub identity: Identity,
}

/// Open/save operations the app shell needs.
pub trait FileAccess {
    /// Read a markdown file and remember it as the save target.
    ///
    /// Returns `Ok(None)` when `path` is not a markdown file; the current
    /// document should then stay as it is.
    fn open_document(&mut self, path: &Path) -> Result<Option<Opened>>;

    /// Write to the remembered file, or fall back to
    /// [`save_document_as`](Self::save_document_as) when there is none.
    fn save_document(&mut self, content: &str, suggested_name: Option<&str>) -> Result<Identity>;

    /// Write to a new file and remember it. Without a name, the default
    /// `document.md` is used.
    fn save_document_as(&mut self, content: &str, suggested_name: Option<&str>)
    -> Result<Identity>;

    /// Forget the remembered file (used by "new").
    fn clear_handle(&mut self);

    fn has_handle(&self) -> bool;
}

/// [`FileAccess`] over the local filesystem.
///
/// Relative names given to save-as resolve against `base_dir`.
#[derive(Debug, Clone)]
pub struct FsFileAccess {
    base_dir: PathBuf,
    handle: Option<PathBuf>,
}

impl FsFileAccess {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            handle: None,
        }
    }

    pub fn handle(&self) -> Option<&Path> {
        self.handle.as_deref()
    }

    fn write(&mut self, path: PathBuf, content: &str) -> Result<Identity> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "document saved");
        let identity = Identity::from_path(&path);
        self.handle = Some(path);
        Ok(identity)
    }
}

impl FileAccess for FsFileAccess {
    fn open_document(&mut self, path: &Path) -> Result<Option<Opened>> {
        if !is_markdown_file(path) {
            tracing::debug!(path = %path.display(), "not a markdown file; open skipped");
            return Ok(None);
        }
        if !path.exists() {
            bail!("File not found: {}", path.display());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.handle = Some(path.to_path_buf());
        Ok(Some(Opened {
            content,
            identity: Identity::from_path(path),
        }))
    }

    fn save_document(&mut self, content: &str, suggested_name: Option<&str>) -> Result<Identity> {
        match self.handle.clone() {
            Some(path) => self.write(path, content),
            None => self.save_document_as(content, suggested_name),
        }
    }

    fn save_document_as(
        &mut self,
        content: &str,
        suggested_name: Option<&str>,
    ) -> Result<Identity> {
        let name = suggested_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILE_NAME);
        let path = self.base_dir.join(name);
        self.write(path, content)
    }

    fn clear_handle(&mut self) {
        self.handle = None;
    }

    fn has_handle(&self) -> bool {
        self.handle.is_some()
    }
}
