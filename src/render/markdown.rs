//! Markdown rendering for transaction tables.

use crate::model::TransactionTable;

/// Convert a table to a Markdown pipe table.
pub fn to_markdown(table: &TransactionTable) -> String {
    let mut output = String::new();
    push_row(&mut output, table.headers.iter().map(String::as_str));

    output.push('|');
    for _ in &table.headers {
        output.push_str(" --- |");
    }
    output.push('\n');

    for record in &table.records {
        push_row(&mut output, record.cells().iter().map(String::as_str));
    }
    output
}

fn push_row<'a>(output: &mut String, cells: impl Iterator<Item = &'a str>) {
    output.push('|');
    for cell in cells {
        output.push(' ');
        output.push_str(&escape_cell(cell));
        output.push_str(" |");
    }
    output.push('\n');
}

/// Escape characters that would break a pipe table cell.
fn escape_cell(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '|' => {
                result.push('\\');
                result.push(c);
            }
            '\n' | '\r' => result.push(' '),
            _ => result.push(c),
        }
    }
    result
}
