//! CSV loading for the relocation engine.
//!
//! Responsibilities:
//! - Read the country catalogue and the user dataset into core types.
//! - Report the columns each file actually carries so feature schemas can be
//!   resolved against them.
//!
//! Boundaries:
//! - Do not encode scoring rules (live in `relocation-scorer`).
//! - Missing values are data, not errors; only structurally invalid input
//!   fails.

#![forbid(unsafe_code)]

use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use relocation_core::CountryCatalog;
use relocation_fs::{file_is_file, open_utf8_file};

mod cells;
mod countries;
mod error;
mod users;

pub use countries::read_country_catalog;
pub use error::DatasetError;
pub use users::{UserDataset, read_user_dataset};

/// Conventional file name of the country catalogue.
pub const COUNTRY_FEATURES_FILE: &str = "country_features.csv";

/// Conventional file name of the user dataset with cluster assignments.
pub const CLUSTERED_USERS_FILE: &str = "final_model_dataset_with_clusters.csv";

/// Conventional file name of the user dataset.
pub const USERS_FILE: &str = "final_model_dataset.csv";

/// Load the country catalogue from `path`.
///
/// # Errors
/// Returns [`DatasetError::Open`] when the file cannot be opened and
/// [`DatasetError::Load`] wrapping the parse failure otherwise.
pub fn load_country_catalog(path: &Utf8Path) -> Result<CountryCatalog, DatasetError> {
    let file = open(path)?;
    read_country_catalog(BufReader::new(file)).map_err(|err| in_file(path, err))
}

/// Load the user dataset from `path`.
///
/// # Errors
/// Returns [`DatasetError::Open`] when the file cannot be opened and
/// [`DatasetError::Load`] wrapping the parse failure otherwise.
pub fn load_user_dataset(path: &Utf8Path) -> Result<UserDataset, DatasetError> {
    let file = open(path)?;
    read_user_dataset(BufReader::new(file)).map_err(|err| in_file(path, err))
}

/// Pick the user dataset inside `dir`, preferring the clustered variant.
///
/// The returned path may not exist; callers check it before loading.
#[must_use]
pub fn user_dataset_path(dir: &Utf8Path) -> Utf8PathBuf {
    let clustered = dir.join(CLUSTERED_USERS_FILE);
    if file_is_file(&clustered).unwrap_or(false) {
        clustered
    } else {
        dir.join(USERS_FILE)
    }
}

fn open(path: &Utf8Path) -> Result<cap_std::fs_utf8::File, DatasetError> {
    open_utf8_file(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn in_file(path: &Utf8Path, err: DatasetError) -> DatasetError {
    DatasetError::Load {
        path: path.to_path_buf(),
        source: Box::new(err),
    }
}
