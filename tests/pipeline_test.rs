//! End-to-end tests for the reconstruction pipeline.

use stmtable::model::{ColumnRole, ExclusionVocabulary, ExtractionStats, HeaderRow, TableRow};
use stmtable::parser::{
    default_role_rules, locate_header, map_columns, merge_rows, Normalizer, RowTokenizer,
    DEFAULT_DATE_PATTERN,
};
use stmtable::{extract_from_text, extract_from_text_with_options, Error, ExtractOptions};

fn row(cells: &[&str]) -> TableRow {
    TableRow::from_strings(cells.iter().copied())
}

fn layout(rows: &[&[&str]]) -> String {
    rows.iter()
        .map(|cells| format!("| {} |\n", cells.join(" | ")))
        .collect()
}

const HEADER: &[&str] = &["Date", "Chq No", "Narration", "Credit", "Debit", "Balance"];

#[test]
fn test_continuation_merge_correctness() {
    let text = layout(&[
        HEADER,
        &["01-01-2024", "", "ATM WDL", "", "500", "1000"],
        &["", "", "REF 12345", "", "", ""],
    ]);
    let table = extract_from_text(&text).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0, "Narration"), Some("ATM WDL REF 12345"));
    assert_eq!(table.get(0, "Date"), Some("01-01-2024"));
    assert_eq!(table.get(0, "Balance"), Some("1000"));
}

#[test]
fn test_exclusion_precedence() {
    let text = layout(&[
        HEADER,
        &["01-01-2024", "", "ATM WDL", "", "500", "1000"],
        &["", "", "TOTAL", "", "", ""],
    ]);
    let table = extract_from_text(&text).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0, "Narration"), Some("ATM WDL"));
    assert_eq!(table.stats.excluded_rows, 1);
}

#[test]
fn test_header_detection_order() {
    let rows = vec![
        row(&["Account", "No", "123"]),
        row(&["Date", "Particulars", "Balance"]),
        row(&["01-01-2024", "Deposit", "500"]),
    ];
    let header = locate_header(&rows).unwrap();
    assert_eq!(header.index, 1);

    let text = layout(&[
        &["Account", "No", "123"],
        &["Date", "Particulars", "Balance"],
        &["01-01-2024", "Deposit", "500"],
    ]);
    let table = extract_from_text(&text).unwrap();
    assert_eq!(table.headers, vec!["Date", "Particulars", "Balance"]);
    assert_eq!(table.len(), 1);
}

#[test]
fn test_header_not_found_is_fatal() {
    let text = layout(&[&["Account", "No", "123"], &["01-01-2024", "Deposit", "500"]]);
    match extract_from_text(&text) {
        Err(Error::HeaderNotFound { rows_scanned }) => assert_eq!(rows_scanned, 2),
        other => panic!("expected HeaderNotFound, got {:?}", other),
    }
}

#[test]
fn test_date_column_missing_fails_closed() {
    let header = HeaderRow::new(0, row(&["Sr", "Particulars", "Balance"]));
    let result = map_columns(&header, &default_role_rules());
    assert!(matches!(result, Err(Error::DateColumnMissing { .. })));

    // "Transaction Date" is not a date column, so this header is rejected too.
    let text = layout(&[
        &["Transaction Date", "Particulars", "Balance"],
        &["01-01-2024", "Deposit", "500"],
    ]);
    let err = extract_from_text(&text).unwrap_err();
    assert!(matches!(err, Error::DateColumnMissing { .. }));
    assert_eq!(err.stage(), stmtable::Stage::ColumnRoleMapper);
}

#[test]
fn test_numeric_safety_filter() {
    let text = layout(&[
        HEADER,
        &["01-01-2024", "", "ATM WDL", "", "500", "1000"],
        &["Nil", "", "Cheque returned", "", "", "See note"],
    ]);
    let table = extract_from_text(&text).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.stats.rejected_no_digit, 1);
}

#[test]
fn test_completeness_without_continuations() {
    let mut rows: Vec<Vec<String>> = vec![HEADER.iter().map(|s| s.to_string()).collect()];
    for i in 0..25 {
        rows.push(vec![
            format!("{:02}-03-2024", i + 1),
            String::new(),
            format!("TXN {}", i),
            String::new(),
            format!("{}.00", i + 1),
            format!("{}.00", 1000 - i),
        ]);
    }
    let text: String = rows
        .iter()
        .map(|cells| format!("| {} |\n", cells.join(" | ")))
        .collect();

    let table = extract_from_text(&text).unwrap();
    assert_eq!(table.len(), 25);
    for (i, record) in table.records.iter().enumerate() {
        assert_eq!(record.cell(2), format!("TXN {}", i));
    }
}

#[test]
fn test_round_trip_column_count() {
    let text = layout(&[
        HEADER,
        &["01-01-2024", "", "SHORT ROW", "", "5"],
        &["02-01-2024", "", "LONG ROW", "", "5", "995", "stray", "cells"],
        &["03-01-2024", "", "EXACT", "", "5", "990"],
    ]);
    let table = extract_from_text(&text).unwrap();

    assert_eq!(table.len(), 3);
    assert!(table.records.iter().all(|r| r.len() == table.headers.len()));
}

#[test]
fn test_normalization_idempotence() {
    let text = layout(&[
        HEADER,
        &["01-01-2024", "", "ATM WDL", "", "500", "1000"],
        &["", "", "REF 12345", "", "", ""],
        &["xx", "", "junk", "", "", "5"],
        &["02-01-2024", "", "POS", "", "20", "980", "extra"],
    ]);
    let options = ExtractOptions::default();
    let rows: Vec<TableRow> = RowTokenizer::new(&text, '|').collect();
    let header = locate_header(&rows).unwrap();
    let roles = map_columns(&header, &options.role_rules).unwrap();

    let mut stats = ExtractionStats::default();
    let merged = merge_rows(
        rows.into_iter().skip(1),
        &roles,
        &options.exclusions,
        Some(&header),
        &mut stats,
    );
    let normalizer = Normalizer::new(
        header.column_count(),
        roles.date(),
        &options.exclusions,
        &options.date_pattern,
    );

    let once = normalizer.normalize(merged, &mut stats);
    let twice = normalizer.normalize(
        once.iter().cloned().map(|r| r.into_row()),
        &mut ExtractionStats::default(),
    );
    assert_eq!(once, twice);
    assert_eq!(once.len(), 2);
}

#[test]
fn test_single_amount_column_statement() {
    let text = "\
| Posting Date | Description        | Amount   |
|--------------|--------------------|----------|
| 04/01/2024   | CARD PURCHASE      | -23.40   |
|              | COFFEE HOUSE       |          |
| 05/01/2024   | REFUND             | 23.40    |
";
    let table = extract_from_text(text).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.get_role(0, ColumnRole::Description), Some("CARD PURCHASE COFFEE HOUSE"));
    assert_eq!(table.get_role(1, ColumnRole::Amount), Some("23.40"));
}

#[test]
fn test_custom_options() {
    let text = layout(&[
        HEADER,
        &["01-01-2024", "", "INTEREST PAID", "4", "", "1004"],
        &["2024-01-02", "", "POS", "", "4", "1000"],
    ]);

    let options = ExtractOptions::new().with_extra_exclusions(["interest"]);
    let table = extract_from_text_with_options(&text, &options).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0, "Narration"), Some("POS"));
    assert_eq!(table.stats.excluded_rows, 1);

    let options = ExtractOptions::new()
        .with_date_pattern(r"^\d{4}-\d{2}-\d{2}$")
        .unwrap();
    let table = extract_from_text_with_options(&text, &options).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0, "Narration"), Some("POS"));
    assert_eq!(table.stats.rejected_no_date, 1);
}

#[test]
fn test_empty_vocabulary_keeps_totals() {
    let text = layout(&[
        HEADER,
        &["31-01-2024", "", "MONTH TOTAL", "", "500", "1000"],
    ]);
    let options = ExtractOptions::new().with_exclusions(ExclusionVocabulary::empty());
    let table = extract_from_text_with_options(&text, &options).unwrap();
    assert_eq!(table.len(), 1);
}

#[test]
fn test_default_date_pattern_shapes() {
    let regex = regex::Regex::new(DEFAULT_DATE_PATTERN).unwrap();
    assert!(regex.is_match("01-01-2024"));
    assert!(regex.is_match("01/01/24"));
    assert!(!regex.is_match("1/1/2024"));
}
