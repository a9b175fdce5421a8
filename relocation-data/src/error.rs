//! Errors raised while reading CSV datasets.

use camino::Utf8PathBuf;
use relocation_core::CatalogError;
use thiserror::Error;

/// Errors raised while loading the country catalogue or the user dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Opening the dataset file failed.
    #[error("failed to open dataset at {path}")]
    Open {
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from the filesystem.
        #[source]
        source: std::io::Error,
    },
    /// Reading a dataset file failed part way through.
    #[error("failed to load {path}: {source}")]
    Load {
        /// Requested path.
        path: Utf8PathBuf,
        /// Error raised while parsing the contents.
        #[source]
        source: Box<DatasetError>,
    },
    /// The CSV reader rejected the input.
    #[error("malformed CSV input")]
    Csv {
        /// Source error from the `csv` crate.
        #[source]
        source: csv::Error,
    },
    /// A required column is absent from the header.
    #[error("missing required column {column}")]
    MissingColumn {
        /// Column name.
        column: &'static str,
    },
    /// A numeric cell could not be parsed.
    #[error("line {line}, column {column}: cannot parse {value:?} as a number")]
    InvalidNumber {
        /// One-based line number in the source.
        line: u64,
        /// Column name.
        column: String,
        /// Raw cell contents.
        value: String,
    },
    /// A row has no country code.
    #[error("line {line}: country_code is empty")]
    EmptyCode {
        /// One-based line number in the source.
        line: u64,
    },
    /// The rows do not form a valid catalogue.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl From<csv::Error> for DatasetError {
    fn from(source: csv::Error) -> Self {
        Self::Csv { source }
    }
}
