//! Built-in source converters.

use crate::detect::InputFormat;
use crate::error::Result;

use super::{convert_content, ConvertOptions, ConvertResult, SourceConverter};

/// Converter for layout-preserving OCR text files.
#[derive(Debug, Clone, Default)]
pub struct LayoutTextConverter {
    _private: (),
}

impl LayoutTextConverter {
    /// Create a new layout text converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl SourceConverter for LayoutTextConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["txt", "text", "layout"]
    }

    fn name(&self) -> &str {
        "layout"
    }

    fn convert_str(&self, content: &str, options: &ConvertOptions) -> Result<ConvertResult> {
        let format = options.input_format.unwrap_or(InputFormat::Layout);
        convert_content(content, Some(format), options)
    }
}

/// Converter for JSON handed over by extraction services.
///
/// Cell grids, OCR retrieve payloads and model responses all arrive as
/// JSON; the shape decides which one it is unless the options force it.
#[derive(Debug, Clone, Default)]
pub struct JsonPayloadConverter {
    _private: (),
}

impl JsonPayloadConverter {
    /// Create a new JSON payload converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl SourceConverter for JsonPayloadConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn name(&self) -> &str {
        "json"
    }

    fn convert_str(&self, content: &str, options: &ConvertOptions) -> Result<ConvertResult> {
        convert_content(content, options.input_format, options)
    }
}
