//! Versioned scene save-files.
//!
//! A scene is saved as `<descriptor>_v<version>.<extension>` inside a
//! directory. [`SceneFile`] composes that name, finds the highest version on
//! disk and saves through the host application's [`HostSession`].

mod config;
mod error;
mod filesystem;
mod host;
mod naming;
mod scene_file;

pub use config::{SmartSaveConfig, CONFIG_FILE_NAME};
pub use error::{
    AdoptError, ConfigError, DiscoveryError, FieldError, HostSaveError, IncrementError,
    PersistenceError, SceneNameError,
};
pub use filesystem::{latest_version, versions_in, LocalFs, SceneFs};
pub use host::{FileHost, HostSession, MemoryHost};
pub use naming::{
    format_scene_name, parse_scene_name, validate_descriptor, validate_extension,
    validate_version, SceneName, DEFAULT_DESCRIPTOR, DEFAULT_EXTENSION, DEFAULT_VERSION,
    EXTENSION_SEPARATOR, VERSION_DELIMITER, VERSION_WIDTH,
};
pub use scene_file::SceneFile;
