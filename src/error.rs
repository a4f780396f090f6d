//! Error kinds for defaults loading and resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading defaults documents or resolving paths.
#[derive(Debug, Error)]
pub enum DefaultsError {
    /// A declared defaults file does not exist. Fatal for a system source;
    /// tolerated (the pair degrades to system-only) for a user source.
    #[error("defaults file does not exist: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// The parsed document is not a mapping, or lacks the required
    /// top-level key.
    #[error("defaults file format invalid: {}: {reason}", origin.display())]
    FormatInvalid { origin: PathBuf, reason: String },

    /// The document could not be parsed as YAML at all.
    #[error("failed to parse {}: {source}", origin.display())]
    Parse {
        origin: PathBuf,
        source: serde_yaml::Error,
    },

    /// A path (or a prefix of it) is absent from a mapping. Carries the
    /// cumulative traversed path, segments joined by `/`.
    #[error("'{path}' missing")]
    ContentMissing { path: String },

    /// A user override names a key the system defaults do not declare.
    #[error("override adds unknown key: '{path}'")]
    UnknownOverrideKey { path: String },

    /// A user override changes a value's structural kind (mapping vs.
    /// non-mapping), or overrides a sub-tree where the system value is
    /// a leaf.
    #[error("override type mismatch at '{path}'")]
    OverrideTypeMismatch { path: String },

    /// No component contributed a defaults schema. Distinct from a path
    /// that is merely unset in an existing schema.
    #[error("no defaults registered for '{family}'")]
    NoDefaultsRegistered { family: String },

    /// Any I/O failure other than file-not-found, passed through unchanged.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DefaultsError {
    /// True for the recoverable "try the next layer" kind.
    pub fn is_content_missing(&self) -> bool {
        matches!(self, DefaultsError::ContentMissing { .. })
    }
}
