//! Shared test utilities for notebook and export tests.
//!
//! This module provides a fluent builder for notebook JSON and the string
//! assertions used across the export test modules.

use serde_json::{Map, Value, json};

use crate::error::NotebookError;
use crate::notebook::Notebook;

/// Test data constants to reduce string argument repetition.
pub mod test_data {
    /// Default path attached to built notebooks.
    pub const DEFAULT_PATH: &str = "analysis.ipynb";
    /// Python traceback line as Jupyter stores it, with ANSI colour codes.
    pub const COLOURED_TRACEBACK_LINE: &str =
        "\u{1b}[0;31mZeroDivisionError\u{1b}[0m: division by zero";
    /// A one-pixel PNG, base64 encoded and wrapped the way Jupyter wraps it.
    pub const PNG_PAYLOAD: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk\n+A8AAQUBAScY42YAAAAASUVORK5CYII=\n";
}

/// Builder for notebook JSON documents with a fluent API.
///
/// Output methods attach to the most recently added code cell and
/// attachment methods to the most recently added markdown cell; they are
/// ignored when no such cell is last.
#[must_use]
pub struct NotebookBuilder {
    path: String,
    nbformat: u64,
    nbformat_minor: u64,
    metadata: Map<String, Value>,
    cells: Vec<Value>,
}

impl Default for NotebookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NotebookBuilder {
    /// Creates a builder for an empty nbformat 4.5 notebook.
    pub fn new() -> Self {
        Self {
            path: test_data::DEFAULT_PATH.to_owned(),
            nbformat: 4,
            nbformat_minor: 5,
            metadata: Map::new(),
            cells: Vec::new(),
        }
    }

    /// Sets the path attached to the built notebook.
    pub fn path(mut self, path: &str) -> Self {
        path.clone_into(&mut self.path);
        self
    }

    /// Overrides the declared nbformat version.
    pub const fn version(mut self, major: u64, minor: u64) -> Self {
        self.nbformat = major;
        self.nbformat_minor = minor;
        self
    }

    /// Records the kernel language in `language_info`.
    pub fn language(mut self, language: &str) -> Self {
        self.metadata
            .insert("language_info".to_owned(), json!({ "name": language }));
        self
    }

    /// Sets an arbitrary top-level metadata entry.
    pub fn metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_owned(), value);
        self
    }

    /// Appends a markdown cell.
    pub fn markdown(mut self, source: &str) -> Self {
        let id = self.next_id();
        self.cells.push(json!({
            "cell_type": "markdown",
            "id": id,
            "metadata": {},
            "source": split_lines(source),
        }));
        self
    }

    /// Appends a raw cell.
    pub fn raw(mut self, source: &str) -> Self {
        let id = self.next_id();
        self.cells.push(json!({
            "cell_type": "raw",
            "id": id,
            "metadata": {},
            "source": split_lines(source),
        }));
        self
    }

    /// Appends a code cell without outputs.
    pub fn code(mut self, source: &str) -> Self {
        let id = self.next_id();
        let count = self.cells.len() + 1;
        self.cells.push(json!({
            "cell_type": "code",
            "id": id,
            "metadata": {},
            "execution_count": count,
            "source": split_lines(source),
            "outputs": [],
        }));
        self
    }

    /// Attaches a stream output to the last code cell.
    pub fn stream(self, name: &str, text: &str) -> Self {
        self.output(json!({
            "output_type": "stream",
            "name": name,
            "text": split_lines(text),
        }))
    }

    /// Attaches an `execute_result` with a `text/plain` representation.
    pub fn execute_result(self, text: &str) -> Self {
        self.output(json!({
            "output_type": "execute_result",
            "execution_count": 1,
            "data": { "text/plain": split_lines(text) },
            "metadata": {},
        }))
    }

    /// Attaches a `display_data` output carrying the given bundle.
    pub fn display(self, data: Value) -> Self {
        self.output(json!({
            "output_type": "display_data",
            "data": data,
            "metadata": {},
        }))
    }

    /// Attaches an error output.
    pub fn error(self, ename: &str, evalue: &str, traceback: &[&str]) -> Self {
        self.output(json!({
            "output_type": "error",
            "ename": ename,
            "evalue": evalue,
            "traceback": traceback,
        }))
    }

    /// Adds an attachment to the last markdown cell.
    pub fn attachment(mut self, name: &str, mime: &str, payload: &str) -> Self {
        if let Some(cell) = self.last_cell_of_type("markdown") {
            let entry = cell
                .as_object_mut()
                .map(|object| object.entry("attachments").or_insert_with(|| json!({})));
            if let Some(Value::Object(files)) = entry {
                let mut bundle = Map::new();
                bundle.insert(mime.to_owned(), Value::String(payload.to_owned()));
                files.insert(name.to_owned(), Value::Object(bundle));
            }
        }
        self
    }

    /// Returns the notebook JSON as a string.
    pub fn to_json(&self) -> String {
        json!({
            "cells": self.cells,
            "metadata": self.metadata,
            "nbformat": self.nbformat,
            "nbformat_minor": self.nbformat_minor,
        })
        .to_string()
    }

    /// Parses the built JSON into a [`Notebook`].
    ///
    /// # Errors
    ///
    /// Returns the parse errors of [`Notebook::parse`].
    pub fn build(self) -> Result<Notebook, NotebookError> {
        Notebook::parse(self.path.as_str(), &self.to_json())
    }

    fn next_id(&self) -> String {
        format!("cell-{}", self.cells.len() + 1)
    }

    fn output(mut self, output: Value) -> Self {
        if let Some(Value::Array(outputs)) = self
            .last_cell_of_type("code")
            .and_then(|cell| cell.get_mut("outputs"))
        {
            outputs.push(output);
        }
        self
    }

    fn last_cell_of_type(&mut self, cell_type: &str) -> Option<&mut Value> {
        self.cells
            .last_mut()
            .filter(|cell| cell.get("cell_type").and_then(Value::as_str) == Some(cell_type))
    }
}

/// Splits text into nbformat source lines, keeping each newline.
fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Asserts that `haystack` contains `needle`, returning an error if not.
///
/// # Errors
///
/// Returns a description of the mismatch when `needle` is absent.
pub fn assert_contains(haystack: &str, needle: &str) -> Result<(), String> {
    if haystack.contains(needle) {
        Ok(())
    } else {
        Err(format!(
            "expected output to contain '{needle}', got:\n{haystack}"
        ))
    }
}

/// Asserts that `haystack` does NOT contain `needle`, returning an error if it does.
///
/// # Errors
///
/// Returns a description of the mismatch when `needle` is present.
pub fn assert_not_contains(haystack: &str, needle: &str) -> Result<(), String> {
    if haystack.contains(needle) {
        Err(format!(
            "expected output to NOT contain '{needle}', got:\n{haystack}"
        ))
    } else {
        Ok(())
    }
}
