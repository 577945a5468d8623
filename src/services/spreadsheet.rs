//! Spreadsheet reader
//!
//! Turns an uploaded `.xlsx`, `.xls` or `.csv` file into rows of named cells.
//! Only the first sheet is read; its first row provides the column names.

use std::collections::HashMap;
use std::fmt::Debug;
use std::io::{Cursor, Read, Seek};

use calamine::{open_workbook_from_rs, Data, Range, Reader, Xls, Xlsx};
use thiserror::Error;

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Xls,
    Csv,
}

impl SheetFormat {
    /// Detect the format from a file name's extension (case-insensitive)
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_lowercase().as_str() {
            "xlsx" => Some(SheetFormat::Xlsx),
            "xls" => Some(SheetFormat::Xls),
            "csv" => Some(SheetFormat::Csv),
            _ => None,
        }
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Whether the cell holds something worth taking: non-empty text,
    /// a non-zero number or `true`.
    pub fn is_filled(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Text(s) => !s.is_empty(),
            Cell::Number(n) => *n != 0.0 && !n.is_nan(),
            Cell::Bool(b) => *b,
        }
    }

    /// Text content, only for text cells
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Cell rendered as text; whole numbers lose their fractional part
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One data row keyed by column header
pub type SheetRow = HashMap<String, Cell>;

/// First filled cell among `columns`, in priority order
pub fn first_filled<'a>(row: &'a SheetRow, columns: &[&str]) -> Option<&'a Cell> {
    columns
        .iter()
        .filter_map(|column| row.get(*column))
        .find(|cell| cell.is_filled())
}

#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("Не удалось прочитать файл: {0}")]
    Workbook(String),

    #[error("В файле нет листов")]
    NoSheets,

    #[error("Не удалось прочитать CSV: {0}")]
    Csv(#[from] csv::Error),

    /// cp1251 and other legacy encodings are not decoded
    #[error("CSV должен быть в кодировке UTF-8. Сохраните файл как «CSV UTF-8».")]
    NotUtf8,
}

/// Parse an uploaded file into rows
pub fn read_rows(bytes: &[u8], format: SheetFormat) -> Result<Vec<SheetRow>, SpreadsheetError> {
    match format {
        SheetFormat::Xlsx => {
            let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
                .map_err(|e| SpreadsheetError::Workbook(format!("{:?}", e)))?;
            first_sheet_rows(workbook)
        }
        SheetFormat::Xls => {
            let workbook: Xls<_> = open_workbook_from_rs(Cursor::new(bytes))
                .map_err(|e| SpreadsheetError::Workbook(format!("{:?}", e)))?;
            first_sheet_rows(workbook)
        }
        SheetFormat::Csv => read_csv_rows(bytes),
    }
}

fn first_sheet_rows<RS, R>(mut workbook: R) -> Result<Vec<SheetRow>, SpreadsheetError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Debug,
{
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoSheets)?
        .map_err(|e| SpreadsheetError::Workbook(format!("{:?}", e)))?;

    Ok(range_to_rows(&range))
}

fn range_to_rows(range: &Range<Data>) -> Vec<SheetRow> {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|cell| convert_cell(cell).to_text()).collect(),
        None => return Vec::new(),
    };

    rows.map(|values| {
        let cells = values.iter().map(convert_cell);
        build_row(&headers, cells)
    })
    .filter(|row| row.values().any(|cell| *cell != Cell::Empty))
    .collect()
}

fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        other => Cell::Text(other.to_string()),
    }
}

/// Zip headers with cells. Columns without a header are dropped and the
/// first occurrence of a duplicated header wins.
fn build_row(headers: &[String], cells: impl Iterator<Item = Cell>) -> SheetRow {
    let mut row = SheetRow::new();
    for (header, cell) in headers.iter().zip(cells) {
        if header.is_empty() {
            continue;
        }
        row.entry(header.clone()).or_insert(cell);
    }
    for header in headers.iter().filter(|h| !h.is_empty()) {
        row.entry(header.clone()).or_insert(Cell::Empty);
    }
    row
}

fn read_csv_rows(bytes: &[u8]) -> Result<Vec<SheetRow>, SpreadsheetError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if std::str::from_utf8(bytes).is_err() {
        return Err(SpreadsheetError::NotUtf8);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(bytes))
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells = record.iter().map(|value| {
            if value.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(value.to_string())
            }
        });
        let row = build_row(&headers, cells);
        if row.values().any(|cell| *cell != Cell::Empty) {
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Pick `;`, tab or `,` by counting them in the header line
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    let count = |needle: u8| header.iter().filter(|b| **b == needle).count();

    [b';', b'\t']
        .into_iter()
        .filter(|d| count(*d) > count(b','))
        .max_by_key(|d| count(*d))
        .unwrap_or(b',')
}
