//! Typed view over the notebook-level metadata object.

use serde_json::{Map, Value};

/// Commonly used notebook metadata fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotebookMetadata {
    /// Kernel name (e.g. `python3`, `ir`).
    pub kernel_name: Option<String>,
    /// Programming language name (e.g. `python`, `R`).
    pub language_name: Option<String>,
    /// Author names, in declaration order.
    pub authors: Vec<String>,
    /// Notebook title if specified.
    pub title: Option<String>,
}

impl NotebookMetadata {
    /// Extracts the typed fields from a raw metadata object.
    ///
    /// The language comes from `language_info.name`, falling back to
    /// `kernelspec.language` for notebooks that were never executed.
    #[must_use]
    pub fn from_map(metadata: &Map<String, Value>) -> Self {
        let kernelspec = metadata.get("kernelspec");
        let kernel_name = string_field(kernelspec, "name");
        let language_name = string_field(metadata.get("language_info"), "name")
            .or_else(|| string_field(kernelspec, "language"));

        let authors = metadata
            .get("authors")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|author| string_field(Some(author), "name"))
                    .collect()
            })
            .unwrap_or_default();

        let title = metadata
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_owned);

        Self {
            kernel_name,
            language_name,
            authors,
            title,
        }
    }
}

fn string_field(object: Option<&Value>, key: &str) -> Option<String> {
    object?
        .get(key)?
        .as_str()
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
