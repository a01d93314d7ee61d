//! Adapters for payloads produced by external extraction services.
//!
//! Three collaborators sit in front of the pipeline:
//!
//! - an OCR service whose retrieve call answers with a JSON document that
//!   carries the layout text under `extraction.result_text`;
//! - a PDF table extractor emitting cell grids as JSON;
//! - a language model asked to return `{"headers": [...], "rows": [[...]]}`,
//!   often wrapped in a Markdown code fence.
//!
//! Anything that does not have the expected shape is reported as
//! [`Error::MalformedUpstreamOutput`].

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{CellGrid, ExtractionStats, HeaderRow, TableRow, TransactionTable};
use crate::parser::{map_columns, ExtractOptions, Normalizer};

const OCR_TEXT_POINTER: &str = "/extraction/result_text";

/// Pull the layout text out of an OCR retrieve payload.
pub fn layout_text_from_ocr_payload(payload: &str) -> Result<String> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| Error::malformed(format!("OCR payload is not JSON: {}", e), payload))?;

    match value.pointer(OCR_TEXT_POINTER) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(Error::malformed("extraction.result_text is not a string", payload)),
        None => Err(Error::malformed("missing extraction.result_text", payload)),
    }
}

/// Deserialize cell-grid JSON from a table extractor.
pub fn cell_grid_from_json(payload: &str) -> Result<CellGrid> {
    serde_json::from_str(strip_code_fences(payload)).map_err(|e| {
        Error::malformed(
            format!("cell grid does not match [[[cell]]] or {{\"tables\": ...}}: {}", e),
            payload,
        )
    })
}

/// Check whether a JSON value looks like an OCR retrieve payload.
pub fn is_ocr_payload(value: &Value) -> bool {
    value.pointer(OCR_TEXT_POINTER).is_some()
}

/// Remove a surrounding Markdown code fence (```` ``` ```` or ```` ```json ````).
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim()
}

#[derive(Debug, Deserialize)]
struct LlmTable {
    #[serde(default)]
    headers: Option<Vec<String>>,
    #[serde(default)]
    rows: Option<Vec<Vec<Value>>>,
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Parse a model response into a [`TransactionTable`].
///
/// The model has already merged continuation lines, so rows skip the
/// merger but still go through role mapping and the final filter.
pub fn parse_llm_response(response: &str, options: &ExtractOptions) -> Result<TransactionTable> {
    let cleaned = strip_code_fences(response);
    let table: LlmTable = serde_json::from_str(cleaned)
        .map_err(|e| Error::malformed(format!("response is not valid JSON: {}", e), response))?;

    let headers = match table.headers {
        Some(headers) if !headers.is_empty() => headers,
        _ => return Err(Error::malformed("no headers in response", response)),
    };
    let rows = match table.rows {
        Some(rows) if !rows.is_empty() => rows,
        _ => {
            return Err(Error::malformed(
                "header found but no transaction rows extracted",
                response,
            ))
        }
    };

    let header = HeaderRow::new(0, TableRow::from_strings(headers.iter().map(|h| h.trim())));
    let roles = map_columns(&header, &options.role_rules)?;

    let mut stats = ExtractionStats::default();
    stats.rows_tokenized = rows.len() as u32;
    let rows = rows
        .iter()
        .map(|row| TableRow::new(row.iter().map(cell_text).collect()));

    let records = Normalizer::new(
        header.column_count(),
        roles.date(),
        &options.exclusions,
        &options.date_pattern,
    )
    .with_dedupe(options.dedupe)
    .normalize(rows, &mut stats);
    stats.records_emitted = records.len() as u32;

    log::debug!("model response: {} of {} rows kept", records.len(), stats.rows_tokenized);
    Ok(TransactionTable::new(header.row.into_cells(), roles, records, stats))
}
