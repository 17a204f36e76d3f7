//! Path-based file access for notebooks and exported documents.
//!
//! Paths are opened as given, so symlinks and `..` components resolve the
//! way the shell resolves them.

use std::fs::{self, File};
use std::io::Write;

use camino::Utf8Path;

use crate::error::NotebookError;

/// Reads the whole file at `path` as UTF-8.
pub(crate) fn read_to_string(path: &Utf8Path) -> Result<String, NotebookError> {
    fs::read_to_string(path).map_err(|error| NotebookError::io("read notebook", path, &error))
}

/// Replaces the content of the file at `path` with `bytes`.
pub(crate) fn write_all(path: &Utf8Path, bytes: &[u8]) -> Result<(), NotebookError> {
    let mut file = create_file_with_parents(path)?;
    file.write_all(bytes)
        .map_err(|error| NotebookError::io("write", path, &error))?;
    file.flush()
        .map_err(|error| NotebookError::io("flush", path, &error))
}

/// Creates (or truncates) the file at `path`, creating missing parent
/// directories first.
pub(crate) fn create_file_with_parents(path: &Utf8Path) -> Result<File, NotebookError> {
    if path.file_name().is_none() {
        return Err(NotebookError::Io {
            message: format!("invalid path '{path}': no file name"),
        });
    }

    if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty())
        && !parent.is_dir()
    {
        fs::create_dir_all(parent)
            .map_err(|error| NotebookError::io("create directory", parent, &error))?;
    }

    File::create(path).map_err(|error| NotebookError::io("create output file", path, &error))
}
