//! Mail Merge for diplomas
//!
//! This crate fills a DOCX template once per spreadsheet row and writes the
//! generated documents to a folder or a ZIP archive.
//!
//! # Features
//!
//! - XLSX/XLSM/XLS loading with sheet selection and normalized column names
//! - Thousands grouping with dots for the document-number column
//! - `{COLUMN}` token replacement across body, tables, headers, footers and
//!   text boxes, independent of how Word split the text into runs
//! - Batch generation with one output file per record
//!
//! # Example
//!
//! ```rust
//! use mail_merge::{create_inline_source, format_number_with_dots, placeholder, RawValue};
//!
//! let ds = create_inline_source(
//!     "diplomas",
//!     &["NOMBRE_COMPLETO", "N_DOCUMENTO"],
//!     vec![vec![("NOMBRE_COMPLETO", "Ana Gomez"), ("N_DOCUMENTO", "1.234.567")]],
//! );
//! assert_eq!(ds.record_count(), 1);
//!
//! assert_eq!(placeholder("NOMBRE_COMPLETO"), "{NOMBRE_COMPLETO}");
//! assert_eq!(format_number_with_dots(&RawValue::Int(1234567)), "1.234.567");
//! ```

mod data_source;
mod error;
mod number_format;
mod xlsx_parser;
pub mod merge_engine;
pub mod substitution;

use std::path::Path;

// Re-export main types
pub use data_source::{DataSource, DataSourceType, Record};
pub use error::{MailMergeError, Result};
pub use number_format::{format_number_with_dots, RawValue};
pub use xlsx_parser::{get_sheet_names, normalize_value, SheetSelector, XlsxConfig, XlsxParser};
pub use merge_engine::{
    GeneratedDocument, MergeEngine, MergeOptions, MergeProgress, MergeResult, ARCHIVE_NAME,
    OUTPUT_FOLDER,
};
pub use substitution::{placeholder, replace_all, replace_text};

/// Column holding the recipient's full name
pub const NAME_COLUMN: &str = "NOMBRE_COMPLETO";

/// Column holding the identity document number
pub const DOCUMENT_NUMBER_COLUMN: &str = "N_DOCUMENTO";

/// Column holding the place the document was issued
pub const ISSUE_PLACE_COLUMN: &str = "LUGAR_EXPEDICION";

/// Spreadsheet extensions accepted by [`load_from_file`]
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls"];

/// Load a data source from a workbook file, picking the format from the
/// extension
pub fn load_from_file(path: impl AsRef<Path>) -> Result<DataSource> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        XlsxParser::new().parse_file(path)
    } else {
        Err(MailMergeError::UnsupportedFormat(format!(
            "Unknown file extension for: {}",
            path.display()
        )))
    }
}

/// Load a data source from workbook bytes, detecting the format from content
pub fn load_from_bytes(data: &[u8], id: &str) -> Result<DataSource> {
    XlsxParser::new().parse_bytes(data, id)
}

/// Create an inline data source from rows of `(column, value)` pairs
pub fn create_inline_source(id: &str, columns: &[&str], rows: Vec<Vec<(&str, &str)>>) -> DataSource {
    let mut ds = DataSource::inline(id);

    for column in columns {
        ds.add_column(*column);
    }

    for row in rows {
        let record: Record = row
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ds.add_record(record);
    }

    ds
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn workbook_bytes() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "nombre_completo").unwrap();
        sheet.write_string(1, 0, "Ana").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_load_xlsx_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("datos.XLSX");
        std::fs::write(&path, workbook_bytes()).unwrap();

        let ds = load_from_file(&path).unwrap();
        assert_eq!(ds.record_count(), 1);
        assert!(ds.has_column(NAME_COLUMN));
    }

    #[test]
    fn test_load_from_bytes() {
        let ds = load_from_bytes(&workbook_bytes(), "upload").unwrap();
        assert_eq!(ds.id, "upload");
        assert_eq!(ds.get_value(0, NAME_COLUMN), Some("Ana"));
    }

    #[test]
    fn test_unsupported_format() {
        let result = load_from_file("/path/to/file.csv");
        assert!(matches!(result, Err(MailMergeError::UnsupportedFormat(_))));

        let result = load_from_file("/path/to/no_extension");
        assert!(matches!(result, Err(MailMergeError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_create_inline_source() {
        let ds = create_inline_source(
            "test",
            &["NOMBRE_COMPLETO", "CURSO"],
            vec![
                vec![("NOMBRE_COMPLETO", "Ana"), ("CURSO", "Rust")],
                vec![("NOMBRE_COMPLETO", "Luis")],
            ],
        );

        assert_eq!(ds.record_count(), 2);
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.get_value(0, "CURSO"), Some("Rust"));
        assert_eq!(ds.get_value(1, "CURSO"), None);
    }
}
