//! A versioned scene save-file.
//!
//! [`SceneFile`] owns the `(directory, descriptor, version, extension)`
//! tuple, derives the canonical path from it and drives saves through a
//! [`HostSession`]. It is a plain value: rebuild it from the host whenever
//! the open session may have changed.

use std::path::{Component, Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::error::{AdoptError, FieldError, HostSaveError, IncrementError, PersistenceError};
use crate::filesystem::{latest_version, SceneFs};
use crate::host::HostSession;
use crate::naming::{
    format_scene_name, parse_scene_name, validate_descriptor, validate_extension,
    validate_version, SceneName, DEFAULT_DESCRIPTOR, DEFAULT_EXTENSION, DEFAULT_VERSION,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SceneFile {
    directory: PathBuf,
    name: SceneName,
}

impl Default for SceneFile {
    fn default() -> Self {
        Self {
            directory: PathBuf::new(),
            name: SceneName {
                descriptor: DEFAULT_DESCRIPTOR.to_string(),
                version: DEFAULT_VERSION,
                extension: DEFAULT_EXTENSION.to_string(),
            },
        }
    }
}

impl SceneFile {
    /// Explicit mode: every field supplied by the caller.
    pub fn from_fields(
        directory: impl AsRef<Path>,
        descriptor: impl Into<String>,
        version: u32,
        extension: impl Into<String>,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            directory: normalize_directory(directory.as_ref()),
            name: SceneName::new(descriptor, version, extension)?,
        })
    }

    /// Derived mode: adopt the identity of the clean session the host has open.
    pub fn from_host_session(host: &impl HostSession) -> Result<Self, AdoptError> {
        if host.has_unsaved_changes() {
            return Err(AdoptError::UnsavedChanges);
        }
        let path = host
            .current_session_path()
            .ok_or(AdoptError::NoSessionPath)?;
        Self::from_path(&path)
    }

    /// Parses a full path to an existing scene file.
    pub fn from_path(path: &Path) -> Result<Self, AdoptError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AdoptError::NoFileName(path.to_path_buf()))?;
        let name = parse_scene_name(file_name)?;
        let directory = path.parent().map(normalize_directory).unwrap_or_default();
        Ok(Self { directory, name })
    }

    /// Adopts the host session when it is clean and saved, else keeps `fallback`.
    ///
    /// A clean session whose file name does not parse is still an error.
    pub fn resolve(host: &impl HostSession, fallback: SceneFile) -> Result<Self, AdoptError> {
        match Self::from_host_session(host) {
            Ok(scene) => Ok(scene),
            Err(AdoptError::UnsavedChanges | AdoptError::NoSessionPath) => Ok(fallback),
            Err(err) => Err(err),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn set_directory(&mut self, directory: impl AsRef<Path>) {
        self.directory = normalize_directory(directory.as_ref());
    }

    pub fn descriptor(&self) -> &str {
        &self.name.descriptor
    }

    pub fn set_descriptor(&mut self, descriptor: impl Into<String>) -> Result<(), FieldError> {
        let descriptor = descriptor.into();
        validate_descriptor(&descriptor)?;
        self.name.descriptor = descriptor;
        Ok(())
    }

    pub fn version(&self) -> u32 {
        self.name.version
    }

    pub fn set_version(&mut self, version: u32) -> Result<(), FieldError> {
        validate_version(version)?;
        self.name.version = version;
        Ok(())
    }

    pub fn extension(&self) -> &str {
        &self.name.extension
    }

    pub fn set_extension(&mut self, extension: impl Into<String>) -> Result<(), FieldError> {
        let extension = extension.into();
        validate_extension(&extension)?;
        self.name.extension = extension;
        Ok(())
    }

    pub fn scene_name(&self) -> &SceneName {
        &self.name
    }

    pub fn file_name(&self) -> String {
        format_scene_name(
            &self.name.descriptor,
            self.name.version,
            &self.name.extension,
        )
    }

    pub fn full_path(&self) -> PathBuf {
        self.directory.join(self.file_name())
    }

    /// Asks the host to persist its session at [`SceneFile::full_path`].
    ///
    /// A missing directory is created and the save retried once; any other
    /// failure, or a failure of the retry, is returned as is.
    #[instrument(skip(self, host, fs), fields(file = %self.file_name()))]
    pub fn save(
        &self,
        host: &mut impl HostSession,
        fs: &impl SceneFs,
    ) -> Result<PathBuf, PersistenceError> {
        let path = self.full_path();
        match host.persist_current_session(&path) {
            Ok(()) => {}
            Err(HostSaveError::MissingDirectory(_)) => {
                warn!(
                    directory = %self.directory.display(),
                    "missing directories, creating them before retrying"
                );
                fs.create_dir_tree(&self.directory)
                    .map_err(|source| PersistenceError::CreateDirectory {
                        path: self.directory.clone(),
                        source,
                    })?;
                host.persist_current_session(&path)
                    .map_err(|source| PersistenceError::HostRejected {
                        path: path.clone(),
                        source,
                    })?;
            }
            Err(source) => {
                return Err(PersistenceError::HostRejected { path, source });
            }
        }
        info!("scene saved");
        Ok(path)
    }

    /// The version an increment would move to: one past the highest of the
    /// versions on disk and the current one.
    pub fn next_version(&self, fs: &impl SceneFs) -> Result<u32, IncrementError> {
        let on_disk = latest_version(fs, &self.directory, &self.name.descriptor)?;
        let baseline = on_disk.map_or(self.name.version, |found| found.max(self.name.version));
        baseline
            .checked_add(1)
            .ok_or(IncrementError::VersionOverflow(baseline))
    }

    /// Moves to [`SceneFile::next_version`] and saves under the new name.
    #[instrument(skip(self, host, fs), fields(descriptor = %self.name.descriptor))]
    pub fn increment_and_save(
        &mut self,
        host: &mut impl HostSession,
        fs: &impl SceneFs,
    ) -> Result<PathBuf, IncrementError> {
        let next = self.next_version(fs)?;
        info!(from = self.name.version, to = next, "incrementing scene version");
        self.name.version = next;
        Ok(self.save(host, fs)?)
    }
}

/// Lexical cleanup only; the directory may not exist yet.
fn normalize_directory(directory: &Path) -> PathBuf {
    directory
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

#[cfg(test)]
#[path = "tests/scene_file_tests.rs"]
mod tests;
