//! The host application's side of a save.
//!
//! The core never touches the in-memory document. It asks the host whether
//! the session is clean and where it lives, and tells it where to persist.

use std::collections::VecDeque;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::HostSaveError;

/// The surrounding application's open document.
pub trait HostSession {
    fn has_unsaved_changes(&self) -> bool;

    fn current_session_path(&self) -> Option<PathBuf>;

    /// Writes the current in-memory content to exactly `path`.
    ///
    /// Must report [`HostSaveError::MissingDirectory`] when the parent of
    /// `path` does not exist, so the caller can create it and retry.
    fn persist_current_session(&mut self, path: &Path) -> Result<(), HostSaveError>;
}

/// In-memory host that records every persist request.
///
/// Outcomes queued with [`MemoryHost::fail_next`] are returned in order;
/// once the queue is drained every persist succeeds.
#[derive(Debug, Default)]
pub struct MemoryHost {
    unsaved_changes: bool,
    current_path: Option<PathBuf>,
    scripted: VecDeque<HostSaveError>,
    attempts: Vec<PathBuf>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clean session already saved at `path`.
    pub fn opened_at(path: impl Into<PathBuf>) -> Self {
        Self {
            current_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_unsaved_changes(mut self, unsaved: bool) -> Self {
        self.unsaved_changes = unsaved;
        self
    }

    pub fn fail_next(&mut self, error: HostSaveError) -> &mut Self {
        self.scripted.push_back(error);
        self
    }

    pub fn mark_dirty(&mut self) {
        self.unsaved_changes = true;
    }

    /// Every path passed to `persist_current_session`, successful or not.
    pub fn attempts(&self) -> &[PathBuf] {
        &self.attempts
    }
}

impl HostSession for MemoryHost {
    fn has_unsaved_changes(&self) -> bool {
        self.unsaved_changes
    }

    fn current_session_path(&self) -> Option<PathBuf> {
        self.current_path.clone()
    }

    fn persist_current_session(&mut self, path: &Path) -> Result<(), HostSaveError> {
        self.attempts.push(path.to_path_buf());
        if let Some(error) = self.scripted.pop_front() {
            return Err(error);
        }
        self.current_path = Some(path.to_path_buf());
        self.unsaved_changes = false;
        Ok(())
    }
}

/// Host whose session content is a working file on disk.
///
/// Persisting writes the working file's bytes to the target path through
/// a temporary sibling and a rename. Like a "save as", a successful
/// persist moves the session to the new path.
#[derive(Debug, Clone)]
pub struct FileHost {
    source: PathBuf,
    current_path: Option<PathBuf>,
    unsaved_changes: bool,
}

impl FileHost {
    /// A session with unsaved content read from `source` and no saved path.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            current_path: None,
            unsaved_changes: true,
        }
    }

    /// A clean session that was last saved at `path`.
    pub fn adopt(source: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            current_path: Some(path.into()),
            unsaved_changes: false,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl HostSession for FileHost {
    fn has_unsaved_changes(&self) -> bool {
        self.unsaved_changes
    }

    fn current_session_path(&self) -> Option<PathBuf> {
        self.current_path.clone()
    }

    fn persist_current_session(&mut self, path: &Path) -> Result<(), HostSaveError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                return Err(HostSaveError::MissingDirectory(parent.to_path_buf()));
            }
        }
        // Read the whole session before touching the target: the target may
        // be the working file itself.
        let bytes = fs::read(&self.source).map_err(|err| match err.kind() {
            ErrorKind::NotFound => {
                HostSaveError::Other(format!("working file {} not found", self.source.display()))
            }
            _ => HostSaveError::Other(err.to_string()),
        })?;
        atomic_write(path, &bytes)?;
        self.current_path = Some(path.to_path_buf());
        self.unsaved_changes = false;
        Ok(())
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), HostSaveError> {
    let tmp_path = tmp_path(path);
    if let Err(err) = fs::write(&tmp_path, bytes) {
        return Err(match err.kind() {
            ErrorKind::NotFound => HostSaveError::MissingDirectory(
                path.parent().map(Path::to_path_buf).unwrap_or_default(),
            ),
            _ => HostSaveError::Other(err.to_string()),
        });
    }
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(HostSaveError::Other(err.to_string()));
    }
    Ok(())
}

/// `<name>.tmp` next to `path`. The second separator keeps it out of discovery.
fn tmp_path(path: &Path) -> PathBuf {
    let mut output = path.as_os_str().to_os_string();
    output.push(".tmp");
    PathBuf::from(output)
}

#[cfg(test)]
#[path = "tests/host_tests.rs"]
mod tests;
