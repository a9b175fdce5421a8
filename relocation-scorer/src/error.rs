//! Errors raised while loading fitted model artefacts.

use camino::Utf8PathBuf;
use relocation_fs::RequireFileError;
use thiserror::Error;

/// Errors raised while locating, decoding or validating fitted artefacts.
#[derive(Debug, Error)]
pub enum ArtefactError {
    /// The artefact file is missing or is not a regular file.
    #[error("{kind} artefact unavailable: {source}")]
    Locate {
        /// Which artefact was requested.
        kind: &'static str,
        /// Source error from the filesystem check.
        #[source]
        source: RequireFileError,
    },
    /// Opening the artefact file failed.
    #[error("failed to open {kind} artefact at {path}")]
    Open {
        /// Which artefact was requested.
        kind: &'static str,
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from the filesystem.
        #[source]
        source: std::io::Error,
    },
    /// The artefact file did not contain the expected JSON document.
    #[error("failed to decode {kind} artefact at {path}")]
    Decode {
        /// Which artefact was requested.
        kind: &'static str,
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The decoded artefact is internally inconsistent.
    #[error("invalid {kind} artefact: {reason}")]
    Invalid {
        /// Which artefact failed validation.
        kind: &'static str,
        /// Human-readable description of the inconsistency.
        reason: String,
    },
    /// The normaliser and regressor disagree on the feature width.
    #[error("scaler produces {scaler} features but the model expects {model}")]
    WidthMismatch {
        /// Width produced by the normaliser.
        scaler: usize,
        /// Width consumed by the regressor.
        model: usize,
    },
}
