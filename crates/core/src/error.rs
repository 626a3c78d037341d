use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// A file name that does not follow `<descriptor>_v<version>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SceneNameError {
    #[error("malformed scene name '{name}': {reason}")]
    #[diagnostic(
        code(scene::malformed_name),
        help("Scene files are named <descriptor>_v<version>.<extension>, e.g. char_model_v007.ma")
    )]
    Malformed { name: String, reason: &'static str },

    #[error("invalid version '{segment}' in scene name '{name}'")]
    #[diagnostic(
        code(scene::invalid_version),
        help("The version segment must be a positive integer")
    )]
    InvalidVersion { name: String, segment: String },
}

/// A field value rejected on construction or assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum FieldError {
    #[error("invalid descriptor '{value}': {reason}")]
    #[diagnostic(code(scene::invalid_descriptor))]
    Descriptor { value: String, reason: &'static str },

    #[error("invalid extension '{value}': {reason}")]
    #[diagnostic(code(scene::invalid_extension))]
    Extension { value: String, reason: &'static str },

    #[error("version must be at least 1")]
    #[diagnostic(code(scene::zero_version))]
    ZeroVersion,
}

/// Why a scene file could not adopt the identity of the open host session.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum AdoptError {
    #[error("host session has unsaved changes")]
    #[diagnostic(code(scene::unsaved_changes))]
    UnsavedChanges,

    #[error("host session has no file path")]
    #[diagnostic(code(scene::no_session_path))]
    NoSessionPath,

    #[error("host session path '{0}' has no file name")]
    #[diagnostic(code(scene::no_file_name))]
    NoFileName(PathBuf),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Name(#[from] SceneNameError),
}

/// Failure reported by the host when asked to persist its session.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum HostSaveError {
    #[error("target directory {0} does not exist")]
    #[diagnostic(code(host::missing_directory))]
    MissingDirectory(PathBuf),

    #[error("host could not save: {0}")]
    #[diagnostic(code(host::save_failed))]
    Other(String),
}

/// Terminal failure of a save, after the single permitted retry.
#[derive(Debug, Error, Diagnostic)]
pub enum PersistenceError {
    #[error("failed to create directory {path}: {source}")]
    #[diagnostic(code(scene::create_directory))]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to save {path}: {source}")]
    #[diagnostic(code(scene::persistence))]
    HostRejected {
        path: PathBuf,
        #[source]
        source: HostSaveError,
    },
}

/// Failure to list the siblings of a scene file.
#[derive(Debug, Error, Diagnostic)]
pub enum DiscoveryError {
    #[error("directory {0} does not exist")]
    #[diagnostic(
        code(scene::directory_not_found),
        help("Save once to create the directory before incrementing")
    )]
    DirectoryNotFound(PathBuf),

    #[error("failed to list {path}: {source}")]
    #[diagnostic(code(scene::list_directory))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, Diagnostic)]
pub enum IncrementError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("version {0} cannot be incremented any further")]
    #[diagnostic(code(scene::version_overflow))]
    VersionOverflow(u32),
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    #[diagnostic(code(config::io_error))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    #[diagnostic(code(config::parse_error))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Field(#[from] FieldError),
}
