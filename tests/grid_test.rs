//! Integration tests for cell-grid input.

use stmtable::{
    extract_from_grid, CellGrid, ColumnRole, Error, ExtractOptions, GridRegion, StatementParser,
};

fn header() -> Vec<Option<String>> {
    ["DATE", "MODE", "PARTICULARS", "DEPOSITS", "WITHDRAWALS", "BALANCE"]
        .iter()
        .map(|c| Some(c.to_string()))
        .collect()
}

fn cells(values: &[Option<&str>]) -> Vec<Option<String>> {
    values.iter().map(|c| c.map(str::to_string)).collect()
}

#[test]
fn test_grid_json_wrapped_shape() {
    let json = r#"{
        "tables": [
            {
                "page": 1,
                "rows": [
                    ["ACCOUNT SUMMARY", null, null],
                    ["DATE", "PARTICULARS", "AMOUNT"],
                    ["01-02-2024", "UPI/882211\nSWIGGY", "-320.00"],
                    [null, "ORDER 5521", null]
                ]
            }
        ]
    }"#;
    let grid: CellGrid = serde_json::from_str(json).unwrap();
    let table = extract_from_grid(grid, &ExtractOptions::default()).unwrap();

    assert_eq!(table.headers, vec!["DATE", "PARTICULARS", "AMOUNT"]);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0, "particulars"), Some("UPI/882211 SWIGGY ORDER 5521"));
    assert_eq!(table.stats.preamble_rows, 1);
}

#[test]
fn test_grid_header_beyond_scan_window_is_skipped() {
    let mut rows = vec![
        cells(&[Some("Name"), Some("A N OTHER")]),
        cells(&[Some("Branch"), Some("MAIN")]),
        cells(&[Some("IFSC"), Some("ABCD0001")]),
    ];
    rows.push(header());
    rows.push(cells(&[Some("01-01-2024"), Some("UPI"), Some("X"), None, Some("5"), Some("95")]));
    let grid = CellGrid::new(vec![GridRegion::new(rows.clone())]);

    let result = extract_from_grid(grid, &ExtractOptions::default());
    assert!(matches!(result, Err(Error::HeaderNotFound { .. })));

    let grid = CellGrid::new(vec![GridRegion::new(rows)]);
    let options = ExtractOptions::default().with_grid_header_scan_rows(4);
    let table = extract_from_grid(grid, &options).unwrap();
    assert_eq!(table.len(), 1);
}

#[test]
fn test_grid_regions_are_concatenated_in_order() {
    let grid = CellGrid::new(vec![
        GridRegion::new(vec![
            header(),
            cells(&[Some("01-01-2024"), Some("NEFT"), Some("SALARY"), Some("5000"), None, Some("5000")]),
        ])
        .on_page(1),
        GridRegion::new(vec![
            header(),
            cells(&[Some("02-01-2024"), Some("UPI"), Some("RENT"), None, Some("2000"), Some("3000")]),
            cells(&[None, None, Some("Closing Balance"), None, None, Some("3000")]),
        ])
        .on_page(2),
    ]);

    let table = extract_from_grid(grid, &ExtractOptions::default()).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(0, "PARTICULARS"), Some("SALARY"));
    assert_eq!(table.get(1, "PARTICULARS"), Some("RENT"));
    assert_eq!(table.stats.regions_accepted, 2);
    assert_eq!(table.stats.excluded_rows, 1);
}

#[test]
fn test_grid_dedupe_across_regions() {
    let row = cells(&[Some("01-01-2024"), Some("UPI"), Some("TEA"), None, Some("20"), Some("980")]);
    let grid = CellGrid::new(vec![
        GridRegion::new(vec![header(), row.clone()]),
        GridRegion::new(vec![header(), row]),
    ]);

    let table = extract_from_grid(grid.clone(), &ExtractOptions::default()).unwrap();
    assert_eq!(table.len(), 2);

    let table = extract_from_grid(grid, &ExtractOptions::default().with_dedupe(true)).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.stats.duplicates_removed, 1);
}

#[test]
fn test_later_region_realigned_to_first_header() {
    let grid = CellGrid::new(vec![
        GridRegion::new(vec![
            cells(&[Some("Date"), Some("Particulars"), Some("Balance")]),
            cells(&[Some("01-01-2024"), Some("A"), Some("10")]),
        ]),
        GridRegion::new(vec![
            cells(&[Some("Date"), Some("Particulars"), Some("Ref"), Some("Balance")]),
            cells(&[Some("02-01-2024"), Some("B"), Some("R1"), Some("20")]),
        ]),
    ]);

    let table = extract_from_grid(grid, &ExtractOptions::default()).unwrap();
    assert_eq!(table.headers, vec!["Date", "Particulars", "Balance"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.records[1].cells(), &["02-01-2024", "B", "20"]);
    assert_eq!(table.get_role(1, ColumnRole::Balance), Some("20"));
}

#[test]
fn test_later_region_reordered_columns() {
    let grid = CellGrid::new(vec![
        GridRegion::new(vec![
            cells(&[Some("Date"), Some("Particulars"), Some("Debit"), Some("Balance")]),
            cells(&[Some("01-01-2024"), Some("A"), Some("5"), Some("95")]),
        ]),
        GridRegion::new(vec![
            cells(&[Some("Value Date"), Some("Balance"), Some("Particulars")]),
            cells(&[Some("02-01-2024"), Some("90"), Some("B")]),
        ]),
    ]);

    let table = extract_from_grid(grid, &ExtractOptions::default()).unwrap();
    assert_eq!(table.records[1].cells(), &["02-01-2024", "B", "", "90"]);
}

#[test]
fn test_unalignable_region_is_skipped() {
    let grid = CellGrid::new(vec![
        GridRegion::new(vec![
            cells(&[Some("Date"), Some("Particulars"), Some("Balance")]),
            cells(&[Some("01-01-2024"), Some("A"), Some("10")]),
        ]),
        GridRegion::new(vec![
            cells(&[Some("Date"), Some("Amount")]),
            cells(&[Some("02-01-2024"), Some("-4.00")]),
        ]),
    ]);

    let table = extract_from_grid(grid, &ExtractOptions::default()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.stats.regions_scanned, 2);
    assert_eq!(table.stats.regions_accepted, 1);
}

#[test]
fn test_header_scan_counts_blank_rows() {
    let blank = cells(&[None, None, None]);
    let grid = CellGrid::new(vec![GridRegion::new(vec![
        blank.clone(),
        blank.clone(),
        blank,
        cells(&[Some("Date"), Some("Particulars"), Some("Balance")]),
        cells(&[Some("01-01-2024"), Some("A"), Some("10")]),
    ])]);

    let result = extract_from_grid(grid.clone(), &ExtractOptions::default());
    assert!(matches!(result, Err(Error::HeaderNotFound { rows_scanned: 0 })));

    let options = ExtractOptions::default().with_grid_header_scan_rows(4);
    assert_eq!(extract_from_grid(grid, &options).unwrap().len(), 1);
}

#[test]
fn test_grid_json_of_wrong_shape() {
    for json in ["[1, 2]", r#"{"tables": [{"rows": 5}]}"#] {
        match stmtable::extract_from_content(json, &ExtractOptions::default()) {
            Err(err @ Error::MalformedUpstreamOutput { .. }) => assert!(err.is_structural()),
            other => panic!("expected MalformedUpstreamOutput for {}, got {:?}", json, other),
        }
    }
}

#[test]
fn test_grid_region_without_date_role() {
    let grid = CellGrid::new(vec![GridRegion::new(vec![
        cells(&[Some("Tran Date"), Some("Particulars"), Some("Balance")]),
        cells(&[Some("01-01-2024"), Some("A"), Some("10")]),
    ])]);

    let result = StatementParser::from_grid(grid).parse();
    assert!(matches!(result, Err(Error::DateColumnMissing { .. })));
}

#[test]
fn test_bare_grid_json_through_detection() {
    let json = r#"[[["Date", "Particulars", "Balance"], ["05-05-2024", "ATM", "100"]]]"#;
    let table = stmtable::extract_from_content(json, &ExtractOptions::default()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.stats.regions_scanned, 1);
}
