//! Notebook export functionality.
//!
//! Each [`ExportFormat`] variant has one writer; [`write_format`] dispatches
//! on the variant and [`write_to_path`] wraps it with output-file handling.
//!
//! # Supported Formats
//!
//! - **Markdown**: markdown cells verbatim, code cells and their outputs as
//!   fenced blocks, images inlined as data URIs

pub(crate) mod markdown;
mod model;
#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_helpers;

use std::io::{BufWriter, Write};

use camino::Utf8Path;
use tracing::info;

use crate::error::NotebookError;
use crate::files;
use crate::notebook::Notebook;

pub use markdown::write_markdown;
pub use model::{ExportFormat, ExportOutcome};

/// Writes the notebook in the specified format to the writer.
///
/// # Errors
///
/// Returns [`NotebookError::Io`] if writing to the output fails.
pub fn write_format<W: Write>(
    writer: &mut W,
    notebook: &Notebook,
    format: ExportFormat,
) -> Result<(), NotebookError> {
    match format {
        ExportFormat::Markdown => write_markdown(writer, notebook),
    }
}

/// Writes the notebook in the specified format to the file at `destination`.
///
/// # Errors
///
/// Returns [`NotebookError::Io`] if the file cannot be created, written, or
/// flushed.
pub fn write_to_path(
    notebook: &Notebook,
    destination: &Utf8Path,
    format: ExportFormat,
) -> Result<(), NotebookError> {
    let file = files::create_file_with_parents(destination)?;
    let mut writer = BufWriter::new(file);
    write_format(&mut writer, notebook, format)?;
    writer
        .flush()
        .map_err(|error| NotebookError::io("flush output file", destination, &error))?;

    info!(
        source = %notebook.path(),
        destination = %destination,
        %format,
        "exported notebook"
    );
    Ok(())
}
