//! Canonical scene file names.
//!
//! A scene file is named `<descriptor>_v<version>.<extension>` with the
//! version zero-padded to three digits, e.g. `char_model_v007.ma`. The same
//! parser backs host-session adoption and directory discovery.

use std::fmt;

use crate::error::{FieldError, SceneNameError};

/// Token separating the descriptor from the version numeral.
pub const VERSION_DELIMITER: &str = "_v";
/// Separator between the version numeral and the extension.
pub const EXTENSION_SEPARATOR: char = '.';
/// Minimum rendered width of the version numeral.
pub const VERSION_WIDTH: usize = 3;

pub const DEFAULT_DESCRIPTOR: &str = "main";
pub const DEFAULT_EXTENSION: &str = "ma";
pub const DEFAULT_VERSION: u32 = 1;

/// The three name-bearing fields of a scene file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SceneName {
    pub descriptor: String,
    pub version: u32,
    pub extension: String,
}

impl SceneName {
    /// Builds a name after validating every field.
    pub fn new(
        descriptor: impl Into<String>,
        version: u32,
        extension: impl Into<String>,
    ) -> Result<Self, FieldError> {
        let descriptor = descriptor.into();
        let extension = extension.into();
        validate_descriptor(&descriptor)?;
        validate_version(version)?;
        validate_extension(&extension)?;
        Ok(Self {
            descriptor,
            version,
            extension,
        })
    }
}

impl fmt::Display for SceneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_scene_name(
            &self.descriptor,
            self.version,
            &self.extension,
        ))
    }
}

impl std::str::FromStr for SceneName {
    type Err = SceneNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scene_name(s)
    }
}

/// Renders `<descriptor>_v<version:03>.<extension>`.
///
/// Versions of four or more digits are written in full.
pub fn format_scene_name(descriptor: &str, version: u32, extension: &str) -> String {
    format!(
        "{descriptor}{VERSION_DELIMITER}{version:0width$}{EXTENSION_SEPARATOR}{extension}",
        width = VERSION_WIDTH
    )
}

/// Parses a bare file name (no directory part) into its fields.
///
/// The name must hold exactly one `_v` and, after it, exactly one `.`.
/// The version segment must be ASCII digits with a value of at least 1, so
/// `_v000` is a [`SceneNameError::InvalidVersion`] like any non-numeral.
pub fn parse_scene_name(name: &str) -> Result<SceneName, SceneNameError> {
    let malformed = |reason| SceneNameError::Malformed {
        name: name.to_string(),
        reason,
    };

    let mut halves = name.split(VERSION_DELIMITER);
    let (descriptor, remainder) = match (halves.next(), halves.next(), halves.next()) {
        (Some(descriptor), Some(remainder), None) => (descriptor, remainder),
        (_, None, _) => return Err(malformed("missing version delimiter")),
        _ => return Err(malformed("more than one version delimiter")),
    };

    let mut parts = remainder.split(EXTENSION_SEPARATOR);
    let (segment, extension) = match (parts.next(), parts.next(), parts.next()) {
        (Some(segment), Some(extension), None) => (segment, extension),
        (_, None, _) => return Err(malformed("missing extension separator")),
        _ => return Err(malformed("more than one extension separator")),
    };

    if descriptor.is_empty() {
        return Err(malformed("empty descriptor"));
    }
    if extension.is_empty() {
        return Err(malformed("empty extension"));
    }

    let version = parse_version_segment(segment).ok_or_else(|| SceneNameError::InvalidVersion {
        name: name.to_string(),
        segment: segment.to_string(),
    })?;

    Ok(SceneName {
        descriptor: descriptor.to_string(),
        version,
        extension: extension.to_string(),
    })
}

// `u32::from_str` accepts a leading '+', which never appears in a rendered name.
fn parse_version_segment(segment: &str) -> Option<u32> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse::<u32>().ok().filter(|version| *version >= 1)
}

pub fn validate_descriptor(descriptor: &str) -> Result<(), FieldError> {
    let reject = |reason| {
        Err(FieldError::Descriptor {
            value: descriptor.to_string(),
            reason,
        })
    };
    if descriptor.is_empty() {
        return reject("must not be empty");
    }
    if descriptor.contains(VERSION_DELIMITER) {
        return reject("must not contain '_v'");
    }
    if descriptor.contains(EXTENSION_SEPARATOR) {
        return reject("must not contain '.'");
    }
    if descriptor.contains(std::path::is_separator) {
        return reject("must not contain a path separator");
    }
    Ok(())
}

pub fn validate_extension(extension: &str) -> Result<(), FieldError> {
    let reject = |reason| {
        Err(FieldError::Extension {
            value: extension.to_string(),
            reason,
        })
    };
    if extension.is_empty() {
        return reject("must not be empty");
    }
    if extension.contains(EXTENSION_SEPARATOR) {
        return reject("must not contain '.'");
    }
    if extension.contains(VERSION_DELIMITER) {
        return reject("must not contain '_v'");
    }
    if extension.contains(std::path::is_separator) {
        return reject("must not contain a path separator");
    }
    Ok(())
}

pub fn validate_version(version: u32) -> Result<(), FieldError> {
    if version == 0 {
        return Err(FieldError::ZeroVersion);
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/naming_tests.rs"]
mod tests;
