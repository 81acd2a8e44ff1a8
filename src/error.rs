use thiserror::Error;

/// Errors raised while turning an input file into a dataset.
///
/// Every variant is reported before any session state changes, so a failed
/// load never disturbs a previously loaded dataset.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File type not allowed: {0}")]
    UnsupportedFileType(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("Unexpected data shape: {0}")]
    Shape(String),

    #[error("{0} must contain at least one data row")]
    Empty(&'static str),
}
