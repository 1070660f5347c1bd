#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

use tablescope::data::Value;
use tablescope::table::{Column, Table};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}

pub fn text_column(name: &str, values: &[Option<&str>]) -> Column {
    Column::new(
        name,
        values
            .iter()
            .map(|v| v.map(|s| Value::Text(s.to_string())))
            .collect(),
    )
}

pub fn int_column(name: &str, values: &[Option<i64>]) -> Column {
    Column::new(name, values.iter().map(|v| v.map(Value::Integer)).collect())
}

pub fn table(columns: Vec<Column>) -> Table {
    Table::new(columns).expect("well-formed test table")
}

/// Builds an in-memory XLSX workbook: one sheet, first row headers, string
/// cells for `Some(text)` and blanks for `None`, numeric cells as floats.
pub fn xlsx_fixture(headers: &[&str], rows: &[Vec<XlsxCell>]) -> Vec<u8> {
    use rust_xlsxwriter::Workbook;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write(0, col as u16, *header)
            .expect("write header");
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let row_num = (row_idx + 1) as u32;
            let col_num = col_idx as u16;
            match cell {
                XlsxCell::Text(s) => {
                    worksheet
                        .write(row_num, col_num, s.as_str())
                        .expect("write text cell");
                }
                XlsxCell::Number(n) => {
                    worksheet
                        .write(row_num, col_num, *n)
                        .expect("write number cell");
                }
                XlsxCell::Blank => {}
            }
        }
    }
    workbook.save_to_buffer().expect("serialize workbook")
}

pub enum XlsxCell {
    Text(String),
    Number(f64),
    Blank,
}

impl XlsxCell {
    pub fn text(value: &str) -> Self {
        XlsxCell::Text(value.to_string())
    }
}
