//! Error types for mail merge operations

use thiserror::Error;

/// Errors that can occur during mail merge operations
#[derive(Debug, Error)]
pub enum MailMergeError {
    /// IO error reading/writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The template could not be opened, edited or saved
    #[error("Template error: {0}")]
    Docx(#[from] store::DocxError),

    /// The generated documents could not be archived
    #[error("Archive error: {0}")]
    Store(#[from] store::StoreError),

    /// Error parsing XLSX data
    #[error("XLSX parse error: {0}")]
    XlsxParse(String),

    /// Invalid data source configuration
    #[error("Invalid data source: {0}")]
    InvalidDataSource(String),

    /// Record not found
    #[error("Record not found at index {0}")]
    RecordNotFound(usize),

    /// Empty data source
    #[error("Data source is empty: {0}")]
    EmptyDataSource(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for mail merge operations
pub type Result<T> = std::result::Result<T, MailMergeError>;
