use crate::error::LoadError;
use crate::value::{Dataset, Row, Value};
use calamine::{open_workbook_auto, Data, Reader};
use csv::{ReaderBuilder, Trim};
use std::path::Path;

const ALLOWED_MIME_TYPES: [&str; 4] = [
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/json",
];

/// Input formats the loader accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Json,
    Spreadsheet,
}

impl FileKind {
    /// Classify by file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(FileKind::Csv),
            "json" => Some(FileKind::Json),
            "xls" | "xlsx" => Some(FileKind::Spreadsheet),
            _ => None,
        }
    }

    /// Classify by MIME type as reported by the upload source
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "text/csv" => Some(FileKind::Csv),
            "application/json" => Some(FileKind::Json),
            m if ALLOWED_MIME_TYPES.contains(&m) => Some(FileKind::Spreadsheet),
            _ => None,
        }
    }
}

/// Load a dataset from disk, classified by extension.
pub fn load_path(path: &Path) -> Result<Dataset, LoadError> {
    load_file(path, None)
}

/// Load a dataset from disk, rejecting disallowed file types before reading.
///
/// An allowed `mime` type wins over the extension; otherwise the extension decides.
pub fn load_file(path: &Path, mime: Option<&str>) -> Result<Dataset, LoadError> {
    let kind = mime
        .and_then(FileKind::from_mime)
        .or_else(|| FileKind::from_path(path))
        .ok_or_else(|| LoadError::UnsupportedFileType(path.display().to_string()))?;

    let data = match kind {
        FileKind::Csv => parse_csv(&read_text(path)?)?,
        FileKind::Json => parse_json(&read_text(path)?)?,
        FileKind::Spreadsheet => read_spreadsheet(path)?,
    };

    tracing::info!(
        "Loaded {} rows ({} fields) from {}",
        data.len(),
        data.field_names().len(),
        path.display()
    );
    Ok(data)
}

fn read_text(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Parse CSV text: first line is the header row.
pub fn parse_csv(content: &str) -> Result<Dataset, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = Row::new();
        // Short rows simply lack the trailing fields
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header.clone(), Value::from_cell(cell));
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(LoadError::Empty("CSV"));
    }

    Ok(Dataset::new(rows))
}

/// Parse JSON text: an array of flat objects.
pub fn parse_json(content: &str) -> Result<Dataset, LoadError> {
    let parsed: serde_json::Value = serde_json::from_str(content)?;
    let items = parsed
        .as_array()
        .ok_or_else(|| LoadError::Shape("expected a JSON array of objects".to_string()))?;

    let mut rows = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let object = item.as_object().ok_or_else(|| {
            LoadError::Shape(format!("element {} is not an object", idx))
        })?;
        let mut row = Row::new();
        for (key, value) in object {
            row.insert(key.clone(), json_to_value(value));
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(LoadError::Empty("JSON"));
    }

    Ok(Dataset::new(rows))
}

fn json_to_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Missing,
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) => Value::Numeric(f),
            None => Value::Text(n.to_string()),
        },
        serde_json::Value::String(s) => Value::Text(s.clone()),
        serde_json::Value::Bool(b) => Value::Text(b.to_string()),
        other => Value::Text(other.to_string()),
    }
}

/// Read the first worksheet of an xls/xlsx workbook; first row is headers.
pub fn read_spreadsheet(path: &Path) -> Result<Dataset, LoadError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| LoadError::Spreadsheet(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Spreadsheet("workbook has no worksheets".to_string()))?
        .map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = match sheet_rows.next() {
        Some(cells) => cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let name = cell.to_string();
                if name.trim().is_empty() {
                    format!("column_{}", idx + 1)
                } else {
                    name.trim().to_string()
                }
            })
            .collect(),
        None => return Err(LoadError::Empty("Spreadsheet")),
    };

    let mut rows = Vec::new();
    for cells in sheet_rows {
        let mut row = Row::new();
        for (header, cell) in headers.iter().zip(cells.iter()) {
            row.insert(header.clone(), cell_to_value(cell));
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(LoadError::Empty("Spreadsheet"));
    }

    Ok(Dataset::new(rows))
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Numeric(*i as f64),
        Data::Float(f) => Value::Numeric(*f),
        Data::Empty | Data::Error(_) => Value::Missing,
        Data::String(s) => Value::from_cell(s),
        other => Value::from_cell(&other.to_string()),
    }
}
