//! Console messages for CLI runs.

use std::io::{self, Write};

use ipynb_api::{ExportOutcome, NotebookError};

/// Writes the success line for a completed export.
///
/// # Errors
///
/// Returns [`NotebookError::Io`] if the writer fails.
pub fn write_success<W: Write>(writer: &mut W, outcome: &ExportOutcome) -> Result<(), NotebookError> {
    writeln!(
        writer,
        "The notebook '{}' was exported to {} '{}'",
        outcome.source, outcome.format, outcome.destination
    )
    .map_err(|error| io_error(&error))
}

/// Writes a failure message.
///
/// # Errors
///
/// Returns [`NotebookError::Io`] if the writer fails.
pub fn write_error<W: Write>(writer: &mut W, error: &NotebookError) -> Result<(), NotebookError> {
    writeln!(writer, "{error}").map_err(|write_error| io_error(&write_error))
}

/// Converts an I/O error to a [`NotebookError::Io`].
fn io_error(error: &io::Error) -> NotebookError {
    NotebookError::Io {
        message: error.to_string(),
    }
}
