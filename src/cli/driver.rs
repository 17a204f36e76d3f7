//! Single-notebook export run.
//!
//! The driver checks the input path, works out where the export goes, and
//! hands the notebook to the export library.

use camino::{Utf8Path, Utf8PathBuf};
use ipynb_api::{ExportFormat, ExportOutcome, Notebook, NotebookError};
use tracing::debug;

use super::Invocation;

/// Extension a notebook path must carry, compared case-sensitively.
const NOTEBOOK_EXTENSION: &str = "ipynb";

/// Stem used when the notebook path has no file name to derive one from.
const FALLBACK_STEM: &str = "notebook";

/// Exports the notebook named by the invocation.
///
/// # Errors
///
/// Returns an error if:
/// - The notebook path does not exist or lacks the `.ipynb` extension
/// - The notebook cannot be read or parsed
/// - The output file cannot be created or written
pub fn run(invocation: &Invocation) -> Result<ExportOutcome, NotebookError> {
    let source = validate_notebook_path(&invocation.notebook)?;
    let format = invocation.export_type;
    let destination = resolve_output_path(source, invocation.output.as_deref(), format);

    debug!(%source, %destination, %format, "exporting notebook");

    let notebook = Notebook::open(source)?;
    notebook.export(&destination, format)?;

    Ok(ExportOutcome {
        source: source.to_owned(),
        destination,
        format,
    })
}

/// Checks that the path exists and ends in `.ipynb`.
///
/// # Errors
///
/// Returns [`NotebookError::InvalidInput`] when either check fails.
pub fn validate_notebook_path(path: &Utf8Path) -> Result<&Utf8Path, NotebookError> {
    if path.exists() && path.extension() == Some(NOTEBOOK_EXTENSION) {
        Ok(path)
    } else {
        Err(NotebookError::InvalidInput {
            path: path.to_string(),
        })
    }
}

/// Returns the explicit output path, or `<stem>.<extension>` in the current
/// directory.
#[must_use]
pub fn resolve_output_path(
    notebook: &Utf8Path,
    output: Option<&Utf8Path>,
    format: ExportFormat,
) -> Utf8PathBuf {
    output.map_or_else(
        || {
            let stem = notebook.file_stem().unwrap_or(FALLBACK_STEM);
            Utf8PathBuf::from(format!("{stem}.{}", format.extension()))
        },
        Utf8Path::to_path_buf,
    )
}
