//! Error types for skill loading and reference lookup

use std::path::PathBuf;
use thiserror::Error;

/// Skill pack errors
#[derive(Debug, Error)]
pub enum SkillError {
    /// Required manifest field missing or manifest not parsable
    #[error("Malformed manifest: {reason}")]
    MalformedManifest {
        /// What is wrong with the manifest
        reason: String,
    },

    /// Requested identifier is not in the reference index
    #[error("Unknown reference '{identifier}'")]
    UnknownReference {
        /// Requested identifier
        identifier: String,
    },

    /// Manifest lists a reference file that cannot be found
    #[error("Reference '{identifier}' declared in manifest but not found at {path:?}")]
    DanglingReference {
        /// Identifier derived from the declared filename
        identifier: String,
        /// Where the file was looked up
        path: PathBuf,
    },

    /// Failed to read a manifest or reference file
    #[error("Failed to read {path:?}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Internal pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl SkillError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedManifest {
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown(identifier: impl Into<String>) -> Self {
        Self::UnknownReference {
            identifier: identifier.into(),
        }
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, SkillError>;
