//! Serialisable nbformat v4 structures.
//!
//! Cells and outputs are internally tagged enums keyed on `cell_type` and
//! `output_type`, mirroring the on-disk JSON so that a document read from
//! disk can be written back without losing the fields Jupyter relies on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::NotebookError;
use crate::export::markdown;

/// A JSON object keyed by MIME type, as used by output `data` and cell
/// `attachments` entries.
pub type MimeBundle = Map<String, Value>;

/// The nbformat "multiline string": either a single string or a list of
/// lines that each keep their trailing newline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MultilineString {
    /// The whole text in one string.
    Text(String),
    /// The text split into lines.
    Lines(Vec<String>),
}

impl Default for MultilineString {
    fn default() -> Self {
        Self::Lines(Vec::new())
    }
}

impl MultilineString {
    /// Returns the text as a single string.
    #[must_use]
    pub fn as_string(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Lines(lines) => lines.concat(),
        }
    }

    /// Returns the text split into lines, each keeping its newline.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Text(text) => text.split_inclusive('\n').map(str::to_owned).collect(),
            Self::Lines(lines) => lines.clone(),
        }
    }

    /// Returns `true` when the text holds nothing but whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Lines(lines) => lines.iter().all(|line| line.trim().is_empty()),
        }
    }
}

impl From<&str> for MultilineString {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// Type of notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Markdown documentation cell.
    Markdown,
    /// Executable code cell.
    Code,
    /// Raw cell passed through untouched.
    Raw,
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Markdown => "markdown",
            Self::Code => "code",
            Self::Raw => "raw",
        };
        f.write_str(name)
    }
}

impl FromStr for CellType {
    type Err = NotebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" => Ok(Self::Markdown),
            "code" => Ok(Self::Code),
            "raw" => Ok(Self::Raw),
            _ => Err(NotebookError::Parse {
                message: format!("unknown cell type '{s}': expected markdown, code or raw"),
            }),
        }
    }
}

/// Type of code cell output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputType {
    /// Text written to stdout or stderr.
    Stream,
    /// Rich data published by `display()`.
    DisplayData,
    /// Value of the last expression in the cell.
    ExecuteResult,
    /// Exception raised while running the cell.
    Error,
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stream => "stream",
            Self::DisplayData => "display_data",
            Self::ExecuteResult => "execute_result",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputType {
    type Err = NotebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "stream" => Ok(Self::Stream),
            "display_data" => Ok(Self::DisplayData),
            "execute_result" => Ok(Self::ExecuteResult),
            "error" => Ok(Self::Error),
            _ => Err(NotebookError::Parse {
                message: format!(
                    "unknown output type '{s}': expected stream, display_data, execute_result or error"
                ),
            }),
        }
    }
}

/// A notebook cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "snake_case")]
pub enum Cell {
    /// Markdown documentation.
    Markdown {
        /// Cell identifier (nbformat 4.5 and later).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Free-form cell metadata.
        #[serde(default)]
        metadata: Map<String, Value>,
        /// Markdown text.
        source: MultilineString,
        /// Inline files referenced as `attachment:<name>`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attachments: Option<Map<String, Value>>,
    },
    /// Source code with the outputs of its last execution.
    Code {
        /// Cell identifier (nbformat 4.5 and later).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Free-form cell metadata.
        #[serde(default)]
        metadata: Map<String, Value>,
        /// Program text.
        source: MultilineString,
        /// Execution counter, `null` when the cell never ran.
        #[serde(default)]
        execution_count: Option<u32>,
        /// Outputs produced by the last execution.
        #[serde(default)]
        outputs: Vec<Output>,
    },
    /// Raw content left for downstream tools.
    Raw {
        /// Cell identifier (nbformat 4.5 and later).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Free-form cell metadata.
        #[serde(default)]
        metadata: Map<String, Value>,
        /// Raw text.
        source: MultilineString,
        /// Inline files referenced as `attachment:<name>`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attachments: Option<Map<String, Value>>,
    },
}

impl Cell {
    /// Returns the cell type.
    #[must_use]
    pub const fn cell_type(&self) -> CellType {
        match self {
            Self::Markdown { .. } => CellType::Markdown,
            Self::Code { .. } => CellType::Code,
            Self::Raw { .. } => CellType::Raw,
        }
    }

    /// Returns the cell identifier when the notebook records one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Markdown { id, .. } | Self::Code { id, .. } | Self::Raw { id, .. } => {
                id.as_deref()
            }
        }
    }

    /// Returns the cell metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Map<String, Value> {
        match self {
            Self::Markdown { metadata, .. }
            | Self::Code { metadata, .. }
            | Self::Raw { metadata, .. } => metadata,
        }
    }

    /// Returns the raw source value.
    #[must_use]
    pub const fn raw_source(&self) -> &MultilineString {
        match self {
            Self::Markdown { source, .. } | Self::Code { source, .. } | Self::Raw { source, .. } => {
                source
            }
        }
    }

    /// Returns the source split into lines.
    #[must_use]
    pub fn source(&self) -> Vec<String> {
        self.raw_source().lines()
    }

    /// Returns the source joined into one string.
    #[must_use]
    pub fn source_as_string(&self) -> String {
        self.raw_source().as_string()
    }

    /// Returns the outputs of a code cell; other cells have none.
    #[must_use]
    pub fn outputs(&self) -> &[Output] {
        match self {
            Self::Code { outputs, .. } => outputs,
            Self::Markdown { .. } | Self::Raw { .. } => &[],
        }
    }

    /// Returns the execution counter of a code cell that has run.
    #[must_use]
    pub const fn execution_count(&self) -> Option<u32> {
        match self {
            Self::Code {
                execution_count, ..
            } => *execution_count,
            Self::Markdown { .. } | Self::Raw { .. } => None,
        }
    }

    /// Returns the attachments of a markdown or raw cell.
    #[must_use]
    pub const fn attachments(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Markdown { attachments, .. } | Self::Raw { attachments, .. } => {
                attachments.as_ref()
            }
            Self::Code { .. } => None,
        }
    }

    /// Renders the cell as Markdown.
    ///
    /// `language` tags the fence of code cells; pass `None` to leave it bare.
    /// Blank cells without outputs render as an empty string.
    #[must_use]
    pub fn to_markdown(&self, language: Option<&str>) -> String {
        markdown::render_cell(self, language)
    }
}

/// An output recorded under a code cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    /// Text written to a standard stream.
    Stream {
        /// Stream name, `stdout` or `stderr`.
        name: String,
        /// Written text.
        text: MultilineString,
    },
    /// Rich data published during execution.
    DisplayData {
        /// Representations keyed by MIME type.
        data: MimeBundle,
        /// Per-representation metadata.
        #[serde(default)]
        metadata: Map<String, Value>,
    },
    /// Value of the final expression.
    ExecuteResult {
        /// Execution counter the result belongs to.
        #[serde(default)]
        execution_count: Option<u32>,
        /// Representations keyed by MIME type.
        data: MimeBundle,
        /// Per-representation metadata.
        #[serde(default)]
        metadata: Map<String, Value>,
    },
    /// An exception raised by the cell.
    Error {
        /// Exception class name.
        ename: String,
        /// Exception message.
        evalue: String,
        /// Formatted traceback lines, possibly carrying ANSI colour codes.
        #[serde(default)]
        traceback: Vec<String>,
    },
}

/// MIME types rendered as inline images, in order of preference.
pub(crate) const IMAGE_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif"];

const PLAIN_TEXT_MIME: &str = "text/plain";

impl Output {
    /// Returns the output type.
    #[must_use]
    pub const fn output_type(&self) -> OutputType {
        match self {
            Self::Stream { .. } => OutputType::Stream,
            Self::DisplayData { .. } => OutputType::DisplayData,
            Self::ExecuteResult { .. } => OutputType::ExecuteResult,
            Self::Error { .. } => OutputType::Error,
        }
    }

    /// Returns the output name: the stream name, `result`, `display`, or the
    /// exception class name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Stream { name, .. } => name,
            Self::DisplayData { .. } => "display",
            Self::ExecuteResult { .. } => "result",
            Self::Error { ename, .. } => ename,
        }
    }

    /// Returns the textual content split into lines.
    ///
    /// Rich outputs contribute their `text/plain` representation and errors
    /// their traceback.
    #[must_use]
    pub fn text(&self) -> Vec<String> {
        match self {
            Self::Stream { text, .. } => text.lines(),
            Self::DisplayData { data, .. } | Self::ExecuteResult { data, .. } => {
                bundle_text(data, PLAIN_TEXT_MIME)
                    .map(|text| MultilineString::Text(text).lines())
                    .unwrap_or_default()
            }
            Self::Error { traceback, .. } => traceback.clone(),
        }
    }

    /// Returns the textual content joined into one string.
    #[must_use]
    pub fn text_as_string(&self) -> String {
        match self {
            Self::Stream { text, .. } => text.as_string(),
            Self::DisplayData { data, .. } | Self::ExecuteResult { data, .. } => {
                bundle_text(data, PLAIN_TEXT_MIME).unwrap_or_default()
            }
            Self::Error { traceback, .. } => traceback.join("\n"),
        }
    }

    /// Returns `true` for error outputs.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Returns the exception message of an error output.
    #[must_use]
    pub fn evalue(&self) -> Option<&str> {
        match self {
            Self::Error { evalue, .. } => Some(evalue),
            Self::Stream { .. } | Self::DisplayData { .. } | Self::ExecuteResult { .. } => None,
        }
    }

    /// Returns the traceback lines of an error output.
    #[must_use]
    pub fn traceback(&self) -> Option<&[String]> {
        match self {
            Self::Error { traceback, .. } => Some(traceback),
            Self::Stream { .. } | Self::DisplayData { .. } | Self::ExecuteResult { .. } => None,
        }
    }

    /// Returns the first inline image as `(mime type, base64 payload)`.
    #[must_use]
    pub fn image(&self) -> Option<(&'static str, String)> {
        match self {
            Self::DisplayData { data, .. } | Self::ExecuteResult { data, .. } => {
                IMAGE_MIME_TYPES.iter().find_map(|mime| {
                    bundle_text(data, mime).map(|payload| (*mime, compact_base64(&payload)))
                })
            }
            Self::Stream { .. } | Self::Error { .. } => None,
        }
    }

    /// Returns the output as plain text, with terminal escape sequences
    /// removed from tracebacks.
    #[must_use]
    pub fn to_text(&self) -> String {
        markdown::output_text(self)
    }

    /// Renders the output as Markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        markdown::render_output(self)
    }
}

/// Reads one representation out of a MIME bundle.
///
/// Values are multiline strings; JSON representations such as
/// `application/json` are not text and yield `None`.
pub(crate) fn bundle_text(bundle: &MimeBundle, mime: &str) -> Option<String> {
    match bundle.get(mime)? {
        Value::String(text) => Some(text.clone()),
        Value::Array(lines) => Some(lines.iter().filter_map(Value::as_str).collect()),
        _ => None,
    }
}

/// Removes the line wrapping Jupyter inserts into base64 payloads.
pub(crate) fn compact_base64(payload: &str) -> String {
    payload.split_whitespace().collect()
}

/// Top-level notebook document as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct NotebookDocument {
    #[serde(default)]
    pub(crate) cells: Vec<Cell>,
    #[serde(default)]
    pub(crate) metadata: Map<String, Value>,
    pub(crate) nbformat: u64,
    #[serde(default)]
    pub(crate) nbformat_minor: u64,
}

/// Version fields read ahead of the full document so that older formats
/// are reported as unsupported rather than malformed.
#[derive(Debug, Deserialize)]
pub(crate) struct VersionProbe {
    pub(crate) nbformat: u64,
    #[serde(default)]
    pub(crate) nbformat_minor: u64,
}
