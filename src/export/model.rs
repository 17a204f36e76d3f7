//! Export format selection and outcome records.

use std::fmt;
use std::str::FromStr;

use camino::Utf8PathBuf;
use clap::ValueEnum;

use crate::error::NotebookError;

/// Supported export formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum ExportFormat {
    /// Markdown with fenced code blocks and inline images.
    #[default]
    Markdown,
}

impl ExportFormat {
    /// Returns the file extension used for default output names.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = NotebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(NotebookError::UnsupportedFormat {
                format: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
        }
    }
}

/// Record of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// Notebook that was exported.
    pub source: Utf8PathBuf,
    /// File the export was written to.
    pub destination: Utf8PathBuf,
    /// Format of the written file.
    pub format: ExportFormat,
}
