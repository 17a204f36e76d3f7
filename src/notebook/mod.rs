//! Jupyter notebook documents.
//!
//! A [`Notebook`] pairs an nbformat v4 document with the path it was read
//! from. It can be reloaded from or saved back to that path, and exported in
//! any [`ExportFormat`].
//!
//! ```no_run
//! use ipynb_api::Notebook;
//!
//! let notebook = Notebook::open("analysis.ipynb")?;
//! for cell in notebook.cells() {
//!     println!("{}: {}", cell.cell_type(), cell.source_as_string());
//! }
//! notebook.export_to_markdown("analysis.md")?;
//! # Ok::<(), ipynb_api::NotebookError>(())
//! ```

mod metadata;
pub(crate) mod model;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::NotebookError;
use crate::export::{self, ExportFormat};
use crate::files;

pub use metadata::NotebookMetadata;
pub use model::{Cell, CellType, MimeBundle, MultilineString, Output, OutputType};

use model::{NotebookDocument, VersionProbe};

/// The only nbformat major version this crate reads.
pub const SUPPORTED_NBFORMAT: u64 = 4;

/// A Jupyter notebook loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    path: Utf8PathBuf,
    document: NotebookDocument,
}

impl Notebook {
    /// Reads and parses the notebook at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::Io`] when the file cannot be read, and the
    /// errors of [`Notebook::parse`] when its content is not a supported
    /// notebook.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self, NotebookError> {
        let source = path.as_ref();
        let content = files::read_to_string(source)?;
        Self::parse(source, &content)
    }

    /// Parses notebook JSON, associating the result with `path`.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::UnsupportedVersion`] when `nbformat` is not 4
    /// and [`NotebookError::Parse`] when the JSON is malformed or does not
    /// describe an nbformat v4 document.
    pub fn parse(path: impl Into<Utf8PathBuf>, content: &str) -> Result<Self, NotebookError> {
        let document = parse_document(content)?;
        let notebook = Self {
            path: path.into(),
            document,
        };
        debug!(
            path = %notebook.path,
            cells = notebook.document.cells.len(),
            nbformat = notebook.document.nbformat,
            nbformat_minor = notebook.document.nbformat_minor,
            "parsed notebook"
        );
        Ok(notebook)
    }

    /// Re-reads the notebook from its path, replacing the in-memory document.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Notebook::open`]; the in-memory document
    /// is left untouched on failure.
    pub fn load(&mut self) -> Result<(), NotebookError> {
        let content = files::read_to_string(&self.path)?;
        self.document = parse_document(&content)?;
        Ok(())
    }

    /// Writes the notebook back to its path.
    ///
    /// The JSON is indented by one space and ends with a newline, matching
    /// the layout Jupyter writes.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::Parse`] if the document cannot be serialised
    /// and [`NotebookError::Io`] if the file cannot be written.
    pub fn save(&self) -> Result<(), NotebookError> {
        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b" "));
        self.document
            .serialize(&mut serializer)
            .map_err(|error| NotebookError::Parse {
                message: format!("failed to serialise notebook '{}': {error}", self.path),
            })?;
        buffer.push(b'\n');

        files::write_all(&self.path, &buffer)?;
        debug!(path = %self.path, bytes = buffer.len(), "saved notebook");
        Ok(())
    }

    /// Returns the path the notebook was read from.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the nbformat major version.
    #[must_use]
    pub const fn nbformat(&self) -> u64 {
        self.document.nbformat
    }

    /// Returns the nbformat minor version.
    #[must_use]
    pub const fn nbformat_minor(&self) -> u64 {
        self.document.nbformat_minor
    }

    /// Returns the typed view of the notebook metadata.
    #[must_use]
    pub fn metadata(&self) -> NotebookMetadata {
        NotebookMetadata::from_map(&self.document.metadata)
    }

    /// Returns the notebook metadata exactly as stored.
    #[must_use]
    pub const fn raw_metadata(&self) -> &Map<String, Value> {
        &self.document.metadata
    }

    /// Returns the cells in document order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.document.cells
    }

    /// Returns the kernel language used to tag code blocks, if recorded.
    #[must_use]
    pub fn language(&self) -> Option<String> {
        self.metadata().language_name
    }

    /// Renders the whole notebook as Markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        export::markdown::render_notebook(self)
    }

    /// Exports the notebook to `output` in `format`.
    ///
    /// Missing parent directories of `output` are created and an existing
    /// file is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::Io`] when the output cannot be created,
    /// written, or flushed.
    pub fn export(
        &self,
        output: impl AsRef<Utf8Path>,
        format: ExportFormat,
    ) -> Result<(), NotebookError> {
        export::write_to_path(self, output.as_ref(), format)
    }

    /// Exports the notebook to `output` as Markdown.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Notebook::export`].
    pub fn export_to_markdown(&self, output: impl AsRef<Utf8Path>) -> Result<(), NotebookError> {
        self.export(output, ExportFormat::Markdown)
    }
}

fn parse_document(content: &str) -> Result<NotebookDocument, NotebookError> {
    let probe: VersionProbe = serde_json::from_str(content).map_err(|error| parse_error(&error))?;
    if probe.nbformat != SUPPORTED_NBFORMAT {
        return Err(NotebookError::UnsupportedVersion {
            major: probe.nbformat,
            minor: probe.nbformat_minor,
        });
    }

    serde_json::from_str(content).map_err(|error| parse_error(&error))
}

fn parse_error(error: &serde_json::Error) -> NotebookError {
    NotebookError::Parse {
        message: error.to_string(),
    }
}
