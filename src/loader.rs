//! Upload ingestion: dispatches on the file extension, decodes the byte
//! stream, and produces a typed [`Table`].
//!
//! `.csv` uploads go through the `csv` crate over `encoding_rs`-decoded text
//! (UTF-8 by default, BOM tolerated). `.xlsx` uploads go through `calamine`
//! over an in-memory cursor, reading the first worksheet with its first row
//! as headers. Any other extension fails with
//! [`PipelineError::UnsupportedFormat`].

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use encoding_rs::{Encoding, UTF_8};
use log::info;

use crate::{
    data::{Value, parse_cell},
    error::PipelineError,
    table::{Column, Table},
};

/// Loads an uploaded byte stream into a table, dispatching on the
/// filename's extension.
pub fn load_upload(bytes: &[u8], filename: &str) -> Result<Table, PipelineError> {
    load_upload_with_encoding(bytes, filename, UTF_8)
}

/// Like [`load_upload`], but decodes CSV text with the given encoding.
/// XLSX content carries its own encoding and ignores the parameter.
pub fn load_upload_with_encoding(
    bytes: &[u8],
    filename: &str,
    encoding: &'static Encoding,
) -> Result<Table, PipelineError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let table = match extension.as_str() {
        "csv" => read_csv(bytes, encoding)?,
        "xlsx" => read_xlsx(bytes)?,
        other => {
            return Err(PipelineError::UnsupportedFormat {
                extension: other.to_string(),
            });
        }
    };
    info!(
        "Loaded {} row(s) across {} column(s) from '{filename}'",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

/// Convenience wrapper for file-system uploads (tests, embedding hosts).
pub fn load_path(path: &Path) -> Result<Table, PipelineError> {
    let bytes = std::fs::read(path).map_err(PipelineError::parse)?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    load_upload(&bytes, filename)
}

fn read_csv(bytes: &[u8], encoding: &'static Encoding) -> Result<Table, PipelineError> {
    let (decoded, _, _) = encoding.decode(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .double_quote(true)
        .flexible(false)
        .from_reader(decoded.as_bytes());

    let headers = reader
        .headers()
        .map_err(PipelineError::parse)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();

    let mut cells: Vec<Vec<Option<Value>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(PipelineError::parse)?;
        for (idx, raw) in record.iter().enumerate().take(headers.len()) {
            cells[idx].push(parse_cell(raw));
        }
    }

    build_table(headers, cells)
}

fn read_xlsx(bytes: &[u8]) -> Result<Table, PipelineError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes.to_vec())).map_err(PipelineError::parse)?;
    let sheet_names = workbook.sheet_names();
    let Some(first_sheet) = sheet_names.first().cloned() else {
        return Err(PipelineError::NoColumns);
    };
    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(PipelineError::parse)?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row.iter().map(header_cell).collect::<Vec<_>>(),
        None => Vec::new(),
    };

    let mut cells: Vec<Vec<Option<Value>>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, column) in cells.iter_mut().enumerate() {
            let cell = row.get(idx).unwrap_or(&Data::Empty);
            column.push(convert_cell(cell));
        }
    }

    build_table(headers, cells)
}

fn build_table(headers: Vec<String>, cells: Vec<Vec<Option<Value>>>) -> Result<Table, PipelineError> {
    let names = dedupe_headers(headers);
    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Table::new(columns).map_err(|err| PipelineError::Parse { source: err.into() })
}

/// Assigns synthetic names to blank headers and disambiguates duplicates
/// with a numeric suffix; the first occurrence keeps its name.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(headers.len());
    for (idx, header) in headers.into_iter().enumerate() {
        let base = if header.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            header
        };
        let mut candidate = base.clone();
        let mut suffix = 2;
        while names.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        names.push(candidate);
    }
    names
}

fn header_cell(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(s) => parse_cell(s),
        Data::Int(i) => Some(Value::Integer(*i)),
        Data::Float(f) => Some(Value::Float(*f)),
        Data::Bool(b) => Some(Value::Text(b.to_string())),
        Data::DateTime(dt) => dt.as_datetime().map(|ndt| Value::Date(ndt.date())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => parse_cell(s),
        Data::Error(_) => None,
    }
}
