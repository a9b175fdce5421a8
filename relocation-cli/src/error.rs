//! Error types emitted by the relocation CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use relocation_core::ScoreError;
use relocation_data::DatasetError;
use relocation_scorer::ArtefactError;
use thiserror::Error;

/// Errors emitted by the relocation CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// An option holds a value outside its accepted range.
    #[error("invalid --{field}: {reason}")]
    InvalidArgument {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// Two options that select the same thing were both given.
    #[error("--{first} and --{second} cannot be combined")]
    ConflictingArguments {
        /// First flag name.
        first: &'static str,
        /// Second flag name.
        second: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Loading a CSV dataset failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// Loading the fitted model artefacts failed.
    #[error(transparent)]
    Artefacts(#[from] ArtefactError),
    /// Opening the profile file failed.
    #[error("failed to open profile at {path:?}: {source}")]
    OpenProfile {
        /// Requested path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The profile file did not hold a valid profile form.
    #[error("failed to parse profile JSON at {path:?}: {source}")]
    ParseProfile {
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The requested user row does not exist.
    #[error("user index {index} is out of range for a dataset of {len} users")]
    UserIndexOutOfRange {
        /// Requested row.
        index: usize,
        /// Number of rows available.
        len: usize,
    },
    /// Ranking failed.
    #[error("ranking failed: {0}")]
    Rank(#[source] ScoreError),
    /// Serialising the recommendations failed.
    #[error("failed to serialise recommendations: {0}")]
    SerialiseRecommendations(#[source] serde_json::Error),
    /// Writing the recommendations failed.
    #[error("failed to write recommendations: {0}")]
    WriteOutput(#[source] std::io::Error),
}
