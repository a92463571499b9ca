//! Tabular input
//!
//! CSV with a header row; the first column holds item identifiers and the
//! remaining columns hold values. Which columns are features, structures or
//! responses is decided by the caller.

use crate::raw::RawTable;
use rasarx_core::{Error, Result};
use std::io::Read;
use std::path::Path;

/// Cell spellings treated as missing values
const MISSING: [&str; 6] = ["", "na", "nan", "null", "none", "n/a"];

/// A parsed CSV table with raw string cells
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    ids: Vec<String>,
    headers: Vec<String>,
    cells: Vec<String>,
}

impl Table {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header_row = csv.headers().map_err(csv_error)?.clone();
        if header_row.len() < 2 {
            return Err(Error::Parse(
                "table needs an identifier column and at least one value column".to_string(),
            ));
        }
        let headers: Vec<String> = header_row.iter().skip(1).map(str::to_string).collect();

        let mut ids = Vec::new();
        let mut cells = Vec::new();
        for (line, record) in csv.records().enumerate() {
            let record = record.map_err(csv_error)?;
            let id = record.get(0).unwrap_or_default();
            if id.is_empty() {
                return Err(Error::Parse(format!("row {} has an empty identifier", line + 1)));
            }
            ids.push(id.to_string());
            cells.extend(record.iter().skip(1).map(str::to_string));
        }

        Ok(Self { ids, headers, cells })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(bytes)
    }

    pub fn n_rows(&self) -> usize {
        self.ids.len()
    }

    /// Number of value columns (identifier column excluded)
    pub fn n_cols(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        &self.cells[row * self.n_cols() + col]
    }

    /// Raw text of one column, e.g. structure identifiers
    pub fn text_column(&self, col: usize) -> Vec<String> {
        (0..self.n_rows()).map(|row| self.cell(row, col).to_string()).collect()
    }

    /// Parse one column as nullable numbers
    pub fn numeric_column(&self, col: usize) -> Result<Vec<Option<f64>>> {
        (0..self.n_rows()).map(|row| self.numeric_cell(row, col)).collect()
    }

    /// Parse the first `width` value columns as a feature table
    pub fn numeric_block(&self, width: usize) -> Result<RawTable> {
        if width == 0 || width > self.n_cols() {
            return Err(Error::InvalidConfiguration(format!(
                "cannot take {} feature columns from a table with {} value columns",
                width,
                self.n_cols()
            )));
        }
        let mut values = Vec::with_capacity(self.n_rows() * width);
        for row in 0..self.n_rows() {
            for col in 0..width {
                values.push(self.numeric_cell(row, col)?);
            }
        }
        RawTable::new(self.ids.clone(), self.headers[..width].to_vec(), values)
    }

    fn numeric_cell(&self, row: usize, col: usize) -> Result<Option<f64>> {
        let text = self.cell(row, col);
        if MISSING.iter().any(|m| text.eq_ignore_ascii_case(m)) {
            return Ok(None);
        }
        text.parse::<f64>().map(Some).map_err(|_| {
            Error::Parse(format!(
                "item '{}', column '{}': '{}' is not a number",
                self.ids[row], self.headers[col], text
            ))
        })
    }
}

fn csv_error(e: csv::Error) -> Error {
    Error::Parse(e.to_string())
}
