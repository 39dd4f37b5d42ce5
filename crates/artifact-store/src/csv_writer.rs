//! Feature Table CSV Serialization
//!
//! Layout: the header's first slot is empty (it heads the feature-name
//! column), then one `label<N>` per column. Each row starts with the feature
//! name; cells a label did not produce are empty fields.

use crate::StoreError;
use feature_engine::{FeatureTable, FeatureValue};
use std::io::{self, Write};

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer)
}

/// Write `table` as CSV to `writer`
pub fn write_table<W: Write>(table: &FeatureTable, writer: W) -> Result<(), StoreError> {
    let mut wtr = csv_writer(writer);

    let header = std::iter::once(String::new()).chain(table.column_headers());
    wtr.write_record(header)?;

    for row in table.rows() {
        let cells = row.cells.iter().map(cell_field);
        wtr.write_record(std::iter::once(row.name.clone()).chain(cells))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Missing cells and NaN both become empty fields
fn cell_field(cell: &Option<FeatureValue>) -> String {
    match cell {
        Some(FeatureValue::Number(v)) if v.is_nan() => String::new(),
        Some(value) => value.to_string(),
        None => String::new(),
    }
}

/// Render `table` as a CSV string
pub fn table_to_csv(table: &FeatureTable) -> Result<String, StoreError> {
    let mut buf = Vec::new();
    write_table(table, &mut buf)?;
    String::from_utf8(buf).map_err(|e| StoreError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
