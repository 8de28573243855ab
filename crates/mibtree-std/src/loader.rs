//! Filesystem loading of MIB sources.
//!
//! A directory is read as one corpus: every regular file in it, sorted by
//! file name. Files that cannot be read as UTF-8 text are skipped with a
//! warning.

use mibtree_core::SourceFile;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors from loading sources.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The directory could not be listed.
    #[error("failed to read directory {}: {source}", .path.display())]
    ReadDir {
        /// The directory.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// A single file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

/// Read every regular file of a directory, in file-name order.
///
/// Unreadable files (IO error, invalid UTF-8) are logged and skipped.
///
/// # Errors
///
/// Returns [`LoadError::ReadDir`] if the directory cannot be listed.
pub fn read_source_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<SourceFile>, LoadError> {
    let dir = dir.as_ref();
    let read_dir_error = |source| LoadError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        match entry.file_type() {
            Ok(kind) if kind.is_file() => paths.push(entry.path()),
            Ok(_) => log::debug!("skipping non-file {}", entry.path().display()),
            Err(e) => log::warn!("skipping {}: {e}", entry.path().display()),
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        match read_source_file(&path) {
            Ok(source) => sources.push(source),
            Err(e) => log::warn!("{e}; skipping"),
        }
    }

    log::info!("loaded {} source file(s) from {}", sources.len(), dir.display());
    Ok(sources)
}

/// Read one source file. The source is named after the file name.
///
/// # Errors
///
/// Returns [`LoadError::ReadFile`] on IO errors and invalid UTF-8.
pub fn read_source_file<P: AsRef<Path>>(path: P) -> Result<SourceFile, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok(SourceFile::new(name, &text))
}
