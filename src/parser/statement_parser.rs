//! Statement parser composing the reconstruction stages.

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::detect::{detect_input_format, InputFormat};
use crate::error::{Error, Result};
use crate::model::{
    CellGrid, ColumnRoleMap, ExtractionStats, GridRegion, HeaderRow, TableRow,
    TransactionRecord, TransactionTable,
};
use crate::upstream;

use super::header::{find_header, locate_header, HeaderSignature};
use super::merge::merge_rows;
use super::normalize::{dedupe_records, Normalizer};
use super::options::ExtractOptions;
use super::roles::{map_columns, normalize_header_text};
use super::tokenizer::{clean_grid_cell, tokenize_grid_region, tokenize_text};

/// Input representation handed over by the extraction collaborator.
#[derive(Debug, Clone)]
pub enum StatementSource {
    /// Layout-preserving delimiter-row text
    Layout(String),
    /// Table regions extracted cell by cell
    Grid(CellGrid),
    /// A model response in `{"headers", "rows"}` form
    LlmResponse(String),
}

/// Bank statement parser.
///
/// Each parser handles one document; nothing is shared between instances.
pub struct StatementParser {
    source: StatementSource,
    options: ExtractOptions,
}

impl StatementParser {
    /// Parse layout text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_text_with_options(text, ExtractOptions::default())
    }

    /// Parse layout text with custom options.
    pub fn from_text_with_options(text: impl Into<String>, options: ExtractOptions) -> Self {
        Self::new(StatementSource::Layout(text.into()), options)
    }

    /// Parse a cell grid.
    pub fn from_grid(grid: CellGrid) -> Self {
        Self::from_grid_with_options(grid, ExtractOptions::default())
    }

    /// Parse a cell grid with custom options.
    pub fn from_grid_with_options(grid: CellGrid, options: ExtractOptions) -> Self {
        Self::new(StatementSource::Grid(grid), options)
    }

    /// Parse any source.
    pub fn new(source: StatementSource, options: ExtractOptions) -> Self {
        Self { source, options }
    }

    /// Open a file, detecting its representation from content.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_content(&content, None, options)
    }

    /// Read a document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ExtractOptions::default())
    }

    /// Read a document from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ExtractOptions) -> Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::from_content(&content, None, options)
    }

    /// Build a parser from raw content in a known (or detected) representation.
    pub fn from_content(
        content: &str,
        format: Option<InputFormat>,
        options: ExtractOptions,
    ) -> Result<Self> {
        let format = match format {
            Some(format) => format,
            None => detect_input_format(content, options.delimiter)?,
        };
        log::debug!("input format: {}", format);

        let source = match format {
            InputFormat::Layout => StatementSource::Layout(content.to_string()),
            InputFormat::Grid => StatementSource::Grid(upstream::cell_grid_from_json(content)?),
            InputFormat::OcrPayload => {
                StatementSource::Layout(upstream::layout_text_from_ocr_payload(content)?)
            }
            InputFormat::LlmResponse => StatementSource::LlmResponse(content.to_string()),
        };
        Ok(Self::new(source, options))
    }

    /// The options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// The input being parsed.
    pub fn source(&self) -> &StatementSource {
        &self.source
    }

    /// Reconstruct the transaction table.
    pub fn parse(&self) -> Result<TransactionTable> {
        let table = match &self.source {
            StatementSource::Layout(text) => self.parse_layout(text)?,
            StatementSource::Grid(grid) => self.parse_grid(grid)?,
            StatementSource::LlmResponse(response) => {
                upstream::parse_llm_response(response, &self.options)?
            }
        };
        log::debug!(
            "{} records, {} columns",
            table.len(),
            table.column_count()
        );
        Ok(table)
    }

    fn parse_layout(&self, text: &str) -> Result<TransactionTable> {
        let mut stats = ExtractionStats::default();
        let rows = tokenize_text(text, self.options.delimiter, &mut stats);

        let header = locate_header(&rows)?;
        let roles = map_columns(&header, &self.options.role_rules)?;
        stats.preamble_rows = header.index as u32;

        let data = rows.into_iter().skip(header.index + 1);
        let mut records = self.reconstruct(data, &header, &roles, &mut stats);
        if self.options.dedupe {
            records = dedupe_records(records, &mut stats);
        }
        stats.records_emitted = records.len() as u32;

        Ok(TransactionTable::new(header.row.into_cells(), roles, records, stats))
    }

    fn parse_grid(&self, grid: &CellGrid) -> Result<TransactionTable> {
        let signatures = [HeaderSignature::Layout, HeaderSignature::Grid];
        let mut stats = ExtractionStats::default();
        let mut output: Option<(HeaderRow, ColumnRoleMap)> = None;
        let mut records: Vec<TransactionRecord> = Vec::new();
        let mut first_failure: Option<Error> = None;
        let mut rows_scanned = 0;

        for (idx, region) in grid.tables.iter().enumerate() {
            stats.regions_scanned += 1;
            let rows = tokenize_grid_region(region, &mut stats);
            let window = header_window(region, self.options.grid_header_scan_rows);
            rows_scanned += window;

            let Some(header) = find_header(&rows, window, &signatures) else {
                log::debug!("grid region {} (page {:?}): no header, skipped", idx, region.page);
                continue;
            };
            let roles = match map_columns(&header, &self.options.role_rules) {
                Ok(roles) => roles,
                Err(e) => {
                    log::warn!("grid region {} (page {:?}): {}", idx, region.page, e);
                    if first_failure.is_none() {
                        first_failure = Some(e);
                    }
                    continue;
                }
            };

            let columns = match &output {
                None => None,
                Some((first, first_roles)) => {
                    let Some(columns) = align_columns(first, first_roles, &header, &roles) else {
                        log::warn!(
                            "grid region {} header [{}] cannot be aligned to [{}], skipped",
                            idx,
                            header.names().join(" | "),
                            first.names().join(" | ")
                        );
                        continue;
                    };
                    if first.names() != header.names() {
                        log::warn!(
                            "grid region {} header [{}] differs from [{}], columns realigned",
                            idx,
                            header.names().join(" | "),
                            first.names().join(" | ")
                        );
                    }
                    Some(columns)
                }
            };
            stats.regions_accepted += 1;
            stats.preamble_rows += header.index as u32;

            let data = rows.into_iter().skip(header.index + 1);
            let region_records = self.reconstruct(data, &header, &roles, &mut stats);

            match columns {
                None => {
                    records.extend(region_records);
                    output = Some((header, roles));
                }
                Some(columns) => records.extend(
                    region_records
                        .into_iter()
                        .map(|record| project_record(&record, &columns)),
                ),
            }
        }

        let Some((header, roles)) = output else {
            return Err(first_failure.unwrap_or(Error::HeaderNotFound { rows_scanned }));
        };

        if self.options.dedupe {
            records = dedupe_records(records, &mut stats);
        }
        stats.records_emitted = records.len() as u32;
        Ok(TransactionTable::new(header.row.into_cells(), roles, records, stats))
    }

    /// Merge and normalize the data rows of one table section.
    fn reconstruct(
        &self,
        rows: impl IntoIterator<Item = TableRow>,
        header: &HeaderRow,
        roles: &ColumnRoleMap,
        stats: &mut ExtractionStats,
    ) -> Vec<TransactionRecord> {
        let repeated = self.options.skip_repeated_headers.then_some(header);
        let merged = merge_rows(rows, roles, &self.options.exclusions, repeated, stats);
        Normalizer::new(
            header.column_count(),
            roles.date(),
            &self.options.exclusions,
            &self.options.date_pattern,
        )
        .normalize(merged, stats)
    }
}

/// Number of tokenized rows that come from the first `limit` raw rows of
/// `region`. Blank raw rows count toward the limit.
fn header_window(region: &GridRegion, limit: usize) -> usize {
    region
        .rows
        .iter()
        .take(limit)
        .filter(|raw| raw.iter().any(|c| !clean_grid_cell(c.as_deref()).is_empty()))
        .count()
}

/// For each column of `target`, the column of `header` with the same
/// normalized name, or else the one carrying the same role.
///
/// Returns `None` when the date column has no counterpart or no other
/// column does.
fn align_columns(
    target: &HeaderRow,
    target_roles: &ColumnRoleMap,
    header: &HeaderRow,
    roles: &ColumnRoleMap,
) -> Option<Vec<Option<usize>>> {
    let names: Vec<String> = header.names().iter().map(|n| normalize_header_text(n)).collect();
    let columns: Vec<Option<usize>> = target
        .names()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let name = normalize_header_text(name);
            let by_name = if name.is_empty() {
                None
            } else {
                names.iter().position(|n| *n == name)
            };
            by_name.or_else(|| target_roles.role_of(idx).and_then(|role| roles.get(role)))
        })
        .collect();

    let date = target_roles.date();
    columns.get(date).copied().flatten()?;
    let shared = columns
        .iter()
        .enumerate()
        .any(|(idx, column)| idx != date && column.is_some());
    shared.then_some(columns)
}

fn project_record(record: &TransactionRecord, columns: &[Option<usize>]) -> TransactionRecord {
    let cells = columns
        .iter()
        .map(|column| column.map(|idx| record.cell(idx).to_string()).unwrap_or_default())
        .collect();
    TransactionRecord::new(TableRow::new(cells))
}
