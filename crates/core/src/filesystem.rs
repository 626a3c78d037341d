//! Directory listing and creation used by discovery and save.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::DiscoveryError;
use crate::naming::parse_scene_name;

pub trait SceneFs {
    /// Names of the entries directly inside `directory`.
    fn list_entries(&self, directory: &Path) -> Result<Vec<String>, DiscoveryError>;

    /// Creates `directory` and its missing parents. Succeeds if it exists.
    fn create_dir_tree(&self, directory: &Path) -> std::io::Result<()>;
}

/// The local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl SceneFs for LocalFs {
    fn list_entries(&self, directory: &Path) -> Result<Vec<String>, DiscoveryError> {
        let listed = if directory.as_os_str().is_empty() {
            Path::new(".")
        } else {
            directory
        };
        let io_error = |source| DiscoveryError::Io {
            path: directory.to_path_buf(),
            source,
        };
        let read_dir = match fs::read_dir(listed) {
            Ok(read_dir) => read_dir,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(DiscoveryError::DirectoryNotFound(directory.to_path_buf()))
            }
            Err(err) => return Err(io_error(err)),
        };

        let mut names = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(io_error)?;
            // Non UTF-8 names can never match the naming pattern.
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn create_dir_tree(&self, directory: &Path) -> std::io::Result<()> {
        if directory.as_os_str().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(directory)
    }
}

/// Sorted versions of every entry in `directory` named after `descriptor`.
///
/// Entries that do not parse as scene names are skipped. Extensions are
/// ignored, so `foo_v002.ma` and `foo_v003.mb` share one sequence.
pub fn versions_in(
    fs: &impl SceneFs,
    directory: &Path,
    descriptor: &str,
) -> Result<Vec<u32>, DiscoveryError> {
    let mut versions: Vec<u32> = fs
        .list_entries(directory)?
        .iter()
        .filter_map(|entry| parse_scene_name(entry).ok())
        .filter(|name| name.descriptor == descriptor)
        .map(|name| name.version)
        .collect();
    versions.sort_unstable();
    versions.dedup();
    debug!(
        directory = %directory.display(),
        descriptor,
        found = versions.len(),
        "discovered scene versions"
    );
    Ok(versions)
}

/// Highest version on disk for `descriptor`, if any.
pub fn latest_version(
    fs: &impl SceneFs,
    directory: &Path,
    descriptor: &str,
) -> Result<Option<u32>, DiscoveryError> {
    Ok(versions_in(fs, directory, descriptor)?.last().copied())
}

#[cfg(test)]
#[path = "tests/filesystem_tests.rs"]
mod tests;
