//! Data source types for mail merge

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single record (row): normalized column name to rendered value
pub type Record = HashMap<String, String>;

/// A loaded table of records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    /// Identifier (file stem for workbooks)
    pub id: String,
    /// Where the records came from
    pub source_type: DataSourceType,
    /// Column names in sheet order
    pub columns: Vec<String>,
    /// Records in sheet order
    pub records: Vec<Record>,
}

impl DataSource {
    /// Create a new data source with the given ID and source type
    pub fn new(id: impl Into<String>, source_type: DataSourceType) -> Self {
        Self {
            id: id.into(),
            source_type,
            columns: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Create an empty in-memory data source
    pub fn inline(id: impl Into<String>) -> Self {
        Self::new(id, DataSourceType::Inline)
    }

    pub fn add_column(&mut self, name: impl Into<String>) {
        self.columns.push(name.into());
    }

    pub fn add_record(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    pub fn get_record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// First `limit` records
    pub fn preview(&self, limit: usize) -> Vec<&Record> {
        self.records.iter().take(limit).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Value of one cell
    pub fn get_value(&self, record_index: usize, column_name: &str) -> Option<&str> {
        self.records
            .get(record_index)
            .and_then(|r| r.get(column_name))
            .map(String::as_str)
    }
}

/// Origin of a data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataSourceType {
    /// Spreadsheet workbook
    Xlsx {
        /// Path of the workbook, or the upload name for in-memory data
        path: String,
        /// Name of the sheet being used
        sheet: String,
    },
    /// Records built in code
    Inline,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataSource {
        let mut ds = DataSource::inline("test");
        ds.add_column("NOMBRE_COMPLETO");
        ds.add_column("N_DOCUMENTO");

        let mut record = Record::new();
        record.insert("NOMBRE_COMPLETO".into(), "Ana Gomez".into());
        record.insert("N_DOCUMENTO".into(), "1.234.567".into());
        ds.add_record(record);
        ds
    }

    #[test]
    fn test_accessors() {
        let ds = sample();
        assert_eq!(ds.record_count(), 1);
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.column_names(), vec!["NOMBRE_COMPLETO", "N_DOCUMENTO"]);
        assert!(ds.has_column("N_DOCUMENTO"));
        assert!(!ds.has_column("n_documento"));
        assert_eq!(ds.get_value(0, "NOMBRE_COMPLETO"), Some("Ana Gomez"));
        assert_eq!(ds.get_value(1, "NOMBRE_COMPLETO"), None);
        assert_eq!(ds.preview(5).len(), 1);
    }

    #[test]
    fn test_serialization() {
        let ds = DataSource::new(
            "diplomas",
            DataSourceType::Xlsx {
                path: "diplomas.xlsx".into(),
                sheet: "Hoja1".into(),
            },
        );
        let json = serde_json::to_value(&ds).unwrap();
        assert_eq!(json["source_type"]["type"], "xlsx");
        assert_eq!(json["source_type"]["sheet"], "Hoja1");

        let back: DataSource = serde_json::from_value(json).unwrap();
        assert_eq!(back.source_type, ds.source_type);
    }
}
