//! Input representation detection.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::upstream::{is_ocr_payload, strip_code_fences};

/// Representation of a statement handed over by an extraction service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFormat {
    /// Layout-preserving text with delimiter rows
    Layout,
    /// Cell-grid JSON (`[[[cell]]]` or `{"tables": [...]}`)
    Grid,
    /// OCR retrieve payload wrapping layout text
    OcrPayload,
    /// Model response with `headers` and `rows`
    LlmResponse,
}

impl InputFormat {
    /// Short name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            InputFormat::Layout => "layout",
            InputFormat::Grid => "grid",
            InputFormat::OcrPayload => "ocr",
            InputFormat::LlmResponse => "llm",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "layout" | "text" => Ok(InputFormat::Layout),
            "grid" => Ok(InputFormat::Grid),
            "ocr" => Ok(InputFormat::OcrPayload),
            "llm" => Ok(InputFormat::LlmResponse),
            other => Err(Error::InvalidOption(format!("unknown input format: {}", other))),
        }
    }
}

/// Detect the representation of `content`.
///
/// JSON documents are told apart by shape; anything else must contain at
/// least one line starting with `delimiter`.
pub fn detect_input_format(content: &str, delimiter: char) -> Result<InputFormat> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(Error::UnsupportedInput("empty input".to_string()));
    }

    let fenced = trimmed.starts_with("```");
    let candidate = strip_code_fences(trimmed);
    if candidate.starts_with('{') || candidate.starts_with('[') {
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => return classify_json(&value),
            // Broken JSON from a model still goes down the model path so
            // the failure is reported against the payload.
            Err(_) if fenced => return Ok(InputFormat::LlmResponse),
            Err(e) => log::debug!("not JSON ({}), trying layout text", e),
        }
    }

    if looks_like_layout(content, delimiter) {
        Ok(InputFormat::Layout)
    } else {
        Err(Error::UnsupportedInput(format!(
            "no line starts with the {:?} delimiter",
            delimiter
        )))
    }
}

/// Detect the representation of a file's content.
pub fn detect_input_format_from_path<P: AsRef<Path>>(path: P, delimiter: char) -> Result<InputFormat> {
    let content = fs::read_to_string(path)?;
    detect_input_format(&content, delimiter)
}

fn classify_json(value: &Value) -> Result<InputFormat> {
    if is_ocr_payload(value) {
        return Ok(InputFormat::OcrPayload);
    }
    match value {
        Value::Object(map) if map.contains_key("headers") || map.contains_key("rows") => {
            Ok(InputFormat::LlmResponse)
        }
        Value::Object(map) if map.contains_key("tables") => Ok(InputFormat::Grid),
        Value::Array(_) => Ok(InputFormat::Grid),
        _ => Err(Error::UnsupportedInput(
            "JSON document of unrecognized shape".to_string(),
        )),
    }
}

/// Check whether any line of `text` is a delimiter row.
pub fn looks_like_layout(text: &str, delimiter: char) -> bool {
    text.lines().any(|line| line.trim_start().starts_with(delimiter))
}
