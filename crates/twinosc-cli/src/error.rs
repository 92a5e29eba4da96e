//! Error types for patch and render operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving or rendering a patch.
#[derive(Debug, Error)]
pub enum PatchError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// No factory patch with that name
    #[error("factory patch not found: {0}")]
    NotFound(String),

    /// Patch values out of range
    #[error("invalid patch: {0}")]
    Validation(#[from] ValidationError),

    /// Failed to write the rendered audio
    #[error("failed to write WAV: {0}")]
    Wav(#[from] hound::Error),
}

impl PatchError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PatchError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PatchError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PatchError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

/// A patch value the oscillator cannot use.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Parameter value out of range (NaN included).
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter, dotted for oscillator fields.
        param: String,
        /// The offending value.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// More than one problem.
    #[error("{}", format_multiple(.0))]
    Multiple(Vec<ValidationError>),
}

fn format_multiple(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_factory_produces_correct_variant() {
        let err = PatchError::read_file("/some/path", mock_io_err());
        assert!(
            matches!(err, PatchError::ReadFile { ref path, .. } if path == std::path::Path::new("/some/path"))
        );
    }

    #[test]
    fn write_file_display_includes_path() {
        let err = PatchError::write_file("/out/lead.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to write file"), "got: {msg}");
        assert!(msg.contains("/out/lead.toml"), "got: {msg}");
    }

    #[test]
    fn create_dir_keeps_io_source() {
        let err = PatchError::create_dir("/dir", mock_io_err());
        let source = err.source().expect("io error should be the source");
        assert!(source.to_string().contains("mock"));
    }

    #[test]
    fn toml_parse_converts() {
        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: PatchError = toml_err.into();
        assert!(matches!(err, PatchError::TomlParse(_)));
        assert!(err.to_string().starts_with("failed to parse TOML"));
    }

    #[test]
    fn out_of_range_display() {
        let err = ValidationError::OutOfRange {
            param: "osc1.level".to_string(),
            value: 2.0,
            min: 0.0,
            max: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "parameter 'osc1.level' value 2 out of range [0, 1]"
        );
    }

    #[test]
    fn multiple_joins_messages() {
        let a = ValidationError::OutOfRange {
            param: "drift".to_string(),
            value: -1.0,
            min: 0.0,
            max: 1.0,
        };
        let b = ValidationError::OutOfRange {
            param: "cross_mod".to_string(),
            value: 99.0,
            min: 0.0,
            max: 48.0,
        };
        let msg = ValidationError::Multiple(vec![a, b]).to_string();
        assert!(msg.contains("'drift'"));
        assert!(msg.contains("; "));
        assert!(msg.contains("'cross_mod'"));
    }

    #[test]
    fn validation_wraps_into_patch_error() {
        let err: PatchError = ValidationError::Multiple(Vec::new()).into();
        assert!(matches!(err, PatchError::Validation(_)));
        assert!(err.to_string().starts_with("invalid patch"));
    }
}
