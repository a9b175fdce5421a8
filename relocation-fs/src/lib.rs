//! Filesystem helpers for locating and opening input artefacts.
//!
//! All access goes through `cap-std` with ambient authority and `camino`
//! UTF-8 paths, so callers deal with one path type end to end.
#![forbid(unsafe_code)]

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use thiserror::Error;

/// Errors returned by [`require_file`].
#[derive(Debug, Error)]
pub enum RequireFileError {
    /// Nothing exists at the path.
    #[error("file not found: {path}")]
    Missing {
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// Something exists at the path but it is not a regular file.
    #[error("expected a file at {path}")]
    NotAFile {
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// The path could not be inspected.
    #[error("failed to inspect {path}: {source}")]
    Inspect {
        /// Path that was checked.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl RequireFileError {
    /// Path the failed check refers to.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Missing { path } | Self::NotAFile { path } | Self::Inspect { path, .. } => path,
        }
    }
}

/// Open a UTF-8 file path using ambient authority.
///
/// # Errors
/// Propagates the IO error raised while opening the file.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Resolve an ambient directory for the given path and return the directory with the file name.
///
/// # Errors
/// Returns an error when `path` has no file name or its parent cannot be opened.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether a path exists and is a regular file using capability-based IO.
///
/// # Errors
/// Propagates IO errors, including [`io::ErrorKind::NotFound`] when the path
/// or its parent directory does not exist.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Check that `path` names an existing regular file.
///
/// # Errors
/// Returns [`RequireFileError::Missing`] when nothing exists at `path`,
/// [`RequireFileError::NotAFile`] when it is a directory or other non-file,
/// and [`RequireFileError::Inspect`] for any other IO failure.
///
/// # Examples
/// ```
/// use camino::Utf8Path;
/// use relocation_fs::{RequireFileError, require_file};
///
/// let err = require_file(Utf8Path::new("no-such-dir/scaler.json")).unwrap_err();
/// assert!(matches!(err, RequireFileError::Missing { .. }));
/// ```
pub fn require_file(path: &Utf8Path) -> Result<(), RequireFileError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(RequireFileError::NotAFile {
            path: path.to_path_buf(),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(RequireFileError::Missing {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(RequireFileError::Inspect {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::io::Read;
    use tempfile::TempDir;

    #[fixture]
    fn workdir() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path")
    }

    #[rstest]
    fn require_file_accepts_regular_files(workdir: TempDir) {
        let path = utf8(&workdir).join("model.json");
        std::fs::write(&path, "{}").expect("write file");
        require_file(&path).expect("file should be accepted");

        let mut contents = String::new();
        open_utf8_file(&path)
            .expect("open file")
            .read_to_string(&mut contents)
            .expect("read file");
        assert_eq!(contents, "{}");
    }

    #[rstest]
    fn require_file_rejects_directories(workdir: TempDir) {
        let path = utf8(&workdir);
        let err = require_file(&path).expect_err("directory should be rejected");
        assert!(matches!(err, RequireFileError::NotAFile { .. }));
        assert_eq!(err.path(), path);
    }

    #[rstest]
    fn require_file_reports_missing_files(workdir: TempDir) {
        let path = utf8(&workdir).join("absent.csv");
        let err = require_file(&path).expect_err("missing file should be rejected");
        assert!(matches!(err, RequireFileError::Missing { .. }));
    }

    #[rstest]
    fn require_file_reports_missing_parent_directories(workdir: TempDir) {
        let path = utf8(&workdir).join("nested").join("absent.csv");
        let err = require_file(&path).expect_err("missing parent should be rejected");
        assert!(matches!(err, RequireFileError::Missing { .. }));
    }
}
