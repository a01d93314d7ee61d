//! CSV rendering.

use std::io::Write;

use crate::error::{Error, Result};
use crate::model::TransactionTable;

/// Write a table as CSV, header line first.
pub fn write_csv<W: Write>(table: &TransactionTable, writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(writer);
    writer.write_record(&table.headers)?;
    for record in &table.records {
        writer.write_record(record.cells())?;
    }
    writer.flush()?;
    Ok(())
}

/// Convert a table to a CSV string.
pub fn to_csv(table: &TransactionTable) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| Error::Render(format!("CSV output is not UTF-8: {}", e)))
}
