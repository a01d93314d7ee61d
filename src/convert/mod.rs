//! Source converters: file in, rendered transaction table out.
//!
//! A converter knows which file extensions it handles and how to turn
//! their content into a [`TransactionTable`]. The registry dispatches on
//! extension or converter name.
//!
//! # Example
//!
//! ```no_run
//! use stmtable::convert::{ConvertOptions, ConverterRegistry};
//! use stmtable::render::OutputFormat;
//! use std::path::Path;
//!
//! fn main() -> stmtable::Result<()> {
//!     let registry = ConverterRegistry::with_defaults();
//!     let options = ConvertOptions::new().with_format(OutputFormat::Markdown);
//!     let result = registry.convert(Path::new("statement.txt"), &options)?;
//!     println!("{}", result.content);
//!     Ok(())
//! }
//! ```

mod sources;

pub use sources::{JsonPayloadConverter, LayoutTextConverter};

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::detect::InputFormat;
use crate::error::{Error, Result};
use crate::model::{ExtractionStats, TransactionTable};
use crate::parser::{ExtractOptions, StatementParser};
use crate::render::{render, OutputFormat};

/// Options for converting a statement file.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Reconstruction options
    pub extract: ExtractOptions,

    /// Force an input representation instead of detecting it
    pub input_format: Option<InputFormat>,

    /// Output format
    pub output_format: OutputFormat,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set reconstruction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }

    /// Force the input representation.
    pub fn with_input_format(mut self, format: InputFormat) -> Self {
        self.input_format = Some(format);
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

/// Result of converting one statement.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Rendered content
    pub content: String,

    /// The reconstructed table
    pub table: TransactionTable,

    /// MIME type of the content
    pub mime_type: &'static str,
}

impl ConvertResult {
    /// Render `table` with `format`.
    pub fn render(table: TransactionTable, format: OutputFormat) -> Result<Self> {
        let content = render(&table, format)?;
        Ok(Self {
            content,
            table,
            mime_type: format.mime_type(),
        })
    }

    /// Extraction statistics of the table.
    pub fn stats(&self) -> &ExtractionStats {
        &self.table.stats
    }

    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Trait for statement source converters.
pub trait SourceConverter: Send + Sync {
    /// Supported file extensions, lower case without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Name of this converter.
    fn name(&self) -> &str;

    /// Convert already-loaded content.
    fn convert_str(&self, content: &str, options: &ConvertOptions) -> Result<ConvertResult>;

    /// Convert a file at the given path.
    fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let content = fs::read_to_string(path)?;
        self.convert_str(&content, options)
    }

    /// Check if this converter supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Parse `content` and render the result; shared by the built-in converters.
pub(crate) fn convert_content(
    content: &str,
    format: Option<InputFormat>,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    let parser = StatementParser::from_content(content, format, options.extract.clone())?;
    let table = parser.parse()?;
    ConvertResult::render(table, options.output_format)
}

/// Registry for source converters.
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn SourceConverter>>,
    by_name: HashMap<String, Arc<dyn SourceConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the layout-text and JSON payload converters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(LayoutTextConverter::new()));
        registry.register(Arc::new(JsonPayloadConverter::new()));
        registry
    }

    /// Register a converter for all its extensions.
    ///
    /// A later registration replaces an earlier one for the same extension.
    pub fn register(&mut self, converter: Arc<dyn SourceConverter>) {
        for ext in converter.supported_extensions() {
            self.converters.insert(ext.to_lowercase(), converter.clone());
        }
        self.by_name.insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn SourceConverter>> {
        self.converters.get(&ext.to_lowercase()).cloned()
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn SourceConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.converters.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.converters.keys().map(|s| s.as_str()).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Convert a file using the converter registered for its extension.
    pub fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedInput(format!("{} has no extension", path.display())))?;

        let converter = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedInput(format!("no converter for extension: {}", ext)))?;

        log::debug!("converting {} with {}", path.display(), converter.name());
        converter.convert(path, options)
    }

    /// Convert content using the converter registered for `ext`.
    pub fn convert_str(
        &self,
        content: &str,
        ext: &str,
        options: &ConvertOptions,
    ) -> Result<ConvertResult> {
        let converter = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedInput(format!("no converter for extension: {}", ext)))?;

        converter.convert_str(content, options)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
