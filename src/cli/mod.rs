//! Command-line surface of the exporter.
//!
//! - [`Invocation`]: parsed arguments
//! - [`driver`]: validates the input and runs the export
//!
//! Console messages are written by [`output`].

use camino::Utf8PathBuf;
use clap::Parser;
use ipynb_api::ExportFormat;

pub mod driver;
pub mod output;

/// Arguments of one exporter run.
///
/// Can be provided via:
/// - positional: the notebook path
/// - `--output <PATH>`: destination file
/// - `--type <FORMAT>`: export format (only `markdown`)
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "ipynb_api",
    version,
    about = "A command line program to export a Jupyter Notebook file."
)]
pub struct Invocation {
    /// The path of notebook file to export.
    pub notebook: Utf8PathBuf,

    /// The path of the exported file. Defaults to the notebook name with the
    /// format's extension, in the current directory.
    #[arg(long)]
    pub output: Option<Utf8PathBuf>,

    /// The format to export the notebook to.
    #[arg(long = "type", value_enum, default_value_t = ExportFormat::Markdown)]
    pub export_type: ExportFormat,
}
