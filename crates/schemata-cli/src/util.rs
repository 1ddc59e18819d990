use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, anyhow};
use schemata::Value;

/// Read input from file path or stdin.
/// - `"-"` reads from stdin
/// - anything else reads from file
pub fn read_input(file: &str) -> anyhow::Result<Vec<u8>> {
    if file == "-" {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("Error reading from stdin")?;
        return Ok(buffer);
    }
    fs::read(file).with_context(|| format!("Error reading {file}"))
}

/// Helper to get display path for messages
pub fn display_path(file: &str) -> &str {
    if file == "-" { "<stdin>" } else { file }
}

/// Read and decode a JSON document, keeping integers exact.
pub fn read_document(file: &str) -> anyhow::Result<Value> {
    let data = read_input(file)?;
    schemata_value::from_slice(&data)
        .with_context(|| format!("Error decoding {}", display_path(file)))
}

/// The id a schema file is built under.
///
/// A document declaring its own root `id` is built under that id. Otherwise
/// it gets the file's `file:` URL so its relative references resolve next to
/// it. Stdin gets no base URI.
pub fn schema_id(file: &str, document: &Value) -> anyhow::Result<String> {
    let declared = document
        .as_object()
        .and_then(|object| object.get("id"))
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty() && !id.starts_with('#'));
    if file == "-" || declared {
        return Ok(String::new());
    }
    let path = Path::new(file)
        .canonicalize()
        .with_context(|| format!("Error resolving {file}"))?;
    url::Url::from_file_path(&path)
        .map(String::from)
        .map_err(|()| anyhow!("Cannot express {} as a file URL", path.display()))
}

/// Indents every line after the first, for nesting a report under a heading.
pub fn indent(text: &str) -> String {
    text.replace('\n', "\n  ")
}
