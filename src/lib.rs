//! Jupyter notebook reading and Markdown export.
//!
//! The library parses nbformat v4 documents into typed cells and outputs,
//! writes them back in Jupyter's on-disk layout, and renders them as
//! Markdown. The `ipynb_api` binary wraps it in a single-file exporter.

pub mod error;
pub mod export;
pub(crate) mod files;
pub mod notebook;
pub mod telemetry;

pub use error::NotebookError;
pub use export::{ExportFormat, ExportOutcome, write_format, write_markdown, write_to_path};
pub use notebook::{
    Cell, CellType, MimeBundle, MultilineString, Notebook, NotebookMetadata, Output, OutputType,
};
