//! Error types exposed by the notebook and export layers.

use thiserror::Error;

/// Errors surfaced while validating input, reading notebooks, or writing
/// exported documents.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotebookError {
    /// The input path does not exist or is not a `.ipynb` file.
    #[error(
        "The path '{path}' wasn't found or doesn't exist, or this is not a .ipynb file"
    )]
    InvalidInput {
        /// The path supplied by the caller.
        path: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// The notebook JSON could not be decoded.
    #[error("failed to parse notebook: {message}")]
    Parse {
        /// Decoder error detail, including line and column when available.
        message: String,
    },

    /// The notebook declares an nbformat major version other than 4.
    #[error("unsupported notebook version: {major}.{minor}")]
    UnsupportedVersion {
        /// Declared `nbformat` value.
        major: u64,
        /// Declared `nbformat_minor` value.
        minor: u64,
    },

    /// The requested export format is not supported.
    #[error("unsupported export format '{format}': the only valid option is 'markdown'")]
    UnsupportedFormat {
        /// The rejected format name.
        format: String,
    },

    /// Runtime configuration could not be applied.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

impl NotebookError {
    /// Builds an [`NotebookError::Io`] whose message names the operation and
    /// the path it touched.
    pub(crate) fn io(action: &str, path: impl std::fmt::Display, error: &std::io::Error) -> Self {
        Self::Io {
            message: format!("failed to {action} '{path}': {error}"),
        }
    }
}
