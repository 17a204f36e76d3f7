//! Markdown formatter for notebooks.
//!
//! Markdown cells are copied through, code cells become fenced blocks tagged
//! with the kernel language, and each output follows its cell as an untagged
//! fenced block or an inline image.

use std::io::Write;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::error::NotebookError;
use crate::notebook::{Cell, Notebook, Output};

use crate::notebook::model::{IMAGE_MIME_TYPES, bundle_text, compact_base64};

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("ANSI escape pattern should compile")
});

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static ATTACHMENT_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"attachment:([^\s)"'>]+)"#).expect("attachment pattern should compile")
});

/// Writes the notebook in Markdown format to the given writer.
///
/// # Errors
///
/// Returns [`NotebookError::Io`] if writing to the output fails.
pub fn write_markdown<W: Write>(writer: &mut W, notebook: &Notebook) -> Result<(), NotebookError> {
    writer
        .write_all(render_notebook(notebook).as_bytes())
        .map_err(|error| NotebookError::io("write markdown for", notebook.path(), &error))
}

/// Renders every cell, separated by blank lines.
pub(crate) fn render_notebook(notebook: &Notebook) -> String {
    let language = notebook.language();
    let blocks: Vec<String> = notebook
        .cells()
        .iter()
        .map(|cell| render_cell(cell, language.as_deref()))
        .filter(|block| !block.is_empty())
        .collect();

    if blocks.is_empty() {
        return String::new();
    }
    let mut document = blocks.join("\n\n");
    document.push('\n');
    document
}

/// Renders one cell without a trailing newline.
pub(crate) fn render_cell(cell: &Cell, language: Option<&str>) -> String {
    let text = cell.source_as_string();
    let source = text.trim_end_matches(['\n', '\r']);

    match cell {
        Cell::Markdown { .. } | Cell::Raw { .. } if source.trim().is_empty() => String::new(),
        Cell::Markdown { attachments, .. } => {
            resolve_attachments(source, attachments.as_ref()).into_owned()
        }
        Cell::Raw { .. } => source.to_owned(),
        Cell::Code { outputs, .. } => render_code_cell(source, language, outputs),
    }
}

fn render_code_cell(source: &str, language: Option<&str>, outputs: &[Output]) -> String {
    let mut blocks = Vec::with_capacity(outputs.len() + 1);
    if !source.trim().is_empty() {
        blocks.push(fenced(source, language.unwrap_or_default()));
    }
    blocks.extend(
        outputs
            .iter()
            .map(render_output)
            .filter(|block| !block.is_empty()),
    );
    blocks.join("\n\n")
}

/// Renders one output: an inline image when the output carries one,
/// otherwise its text in an untagged fence.
pub(crate) fn render_output(output: &Output) -> String {
    if let Some((mime, payload)) = output.image() {
        return format!("![output](data:{mime};base64,{payload})");
    }

    let text = output_text(output);
    let trimmed = text.trim_end_matches(['\n', '\r']);
    if trimmed.trim().is_empty() {
        return String::new();
    }
    fenced(trimmed, "")
}

/// Returns the plain text of an output.
///
/// Tracebacks lose their terminal colour codes; an error without a
/// traceback falls back to `ename: evalue`.
pub(crate) fn output_text(output: &Output) -> String {
    match output {
        Output::Error {
            ename,
            evalue,
            traceback,
        } => {
            if traceback.is_empty() {
                format!("{ename}: {evalue}")
            } else {
                strip_ansi(&traceback.join("\n"))
            }
        }
        Output::Stream { .. } | Output::DisplayData { .. } | Output::ExecuteResult { .. } => {
            output.text_as_string()
        }
    }
}

fn fenced(content: &str, language: &str) -> String {
    let fence = compute_fence(content);
    format!("{fence}{language}\n{content}\n{fence}")
}

/// Computes a fence string that exceeds any backtick run in the content.
fn compute_fence(content: &str) -> String {
    let max_backticks = content.split(|c| c != '`').map(str::len).max().unwrap_or(0);
    let fence_len = max_backticks.max(2) + 1;
    "`".repeat(fence_len)
}

fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Replaces `attachment:<name>` references with data URIs built from the
/// cell attachments. Unknown names are left untouched.
fn resolve_attachments<'a>(
    source: &'a str,
    attachments: Option<&Map<String, Value>>,
) -> std::borrow::Cow<'a, str> {
    let Some(files) = attachments.filter(|files| !files.is_empty()) else {
        return std::borrow::Cow::Borrowed(source);
    };

    ATTACHMENT_REF.replace_all(source, |captures: &Captures<'_>| {
        let reference = captures.get(0).map_or("", |whole| whole.as_str());
        captures
            .get(1)
            .and_then(|name| files.get(name.as_str()))
            .and_then(Value::as_object)
            .and_then(attachment_data_uri)
            .unwrap_or_else(|| reference.to_owned())
    })
}

fn attachment_data_uri(bundle: &Map<String, Value>) -> Option<String> {
    let preferred = IMAGE_MIME_TYPES
        .iter()
        .find_map(|mime| bundle_text(bundle, mime).map(|payload| ((*mime).to_owned(), payload)));
    let (mime, payload) = preferred.or_else(|| {
        bundle
            .keys()
            .filter(|mime| is_base64_encoded(mime))
            .find_map(|mime| bundle_text(bundle, mime).map(|payload| (mime.clone(), payload)))
    })?;
    Some(format!("data:{mime};base64,{}", compact_base64(&payload)))
}

/// Reports whether nbformat stores payloads of this MIME type as base64.
///
/// Text, SVG, JSON, XML and JavaScript payloads are stored verbatim.
fn is_base64_encoded(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or(mime).trim();
    !(essence.starts_with("text/")
        || essence == "image/svg+xml"
        || essence == "application/json"
        || essence == "application/javascript"
        || essence.ends_with("+json")
        || essence.ends_with("+xml"))
}

#[cfg(test)]
#[path = "markdown_tests.rs"]
mod tests;
