//! XLSX parser for mail merge data sources
//!
//! Every cell becomes a string. Column names come from the first row,
//! upper-cased and trimmed, so `{NOMBRE_COMPLETO}` matches a header written
//! as `nombre_completo `.

use std::collections::HashSet;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::{NaiveDate, NaiveDateTime};

use crate::data_source::{DataSource, DataSourceType, Record};
use crate::error::{MailMergeError, Result};
use crate::number_format::{format_number_with_dots, RawValue};
use crate::{DOCUMENT_NUMBER_COLUMN, ISSUE_PLACE_COLUMN};

/// Selector for which sheet to read from an Excel workbook
#[derive(Debug, Clone, Default)]
pub enum SheetSelector {
    /// Select sheet by name
    ByName(String),
    /// Select sheet by index (0-based)
    ByIndex(usize),
    /// Select the first sheet
    #[default]
    First,
}

/// XLSX parser configuration
#[derive(Debug, Clone)]
pub struct XlsxConfig {
    /// Sheet name or index to read from
    pub sheet: SheetSelector,
    /// Column whose raw cells are grouped with [`format_number_with_dots`]
    pub number_column: Option<String>,
    /// Column whose cells are kept exactly as rendered (no trim, no blanking)
    pub verbatim_column: Option<String>,
    /// Skip rows where every cell is empty
    pub skip_empty_rows: bool,
}

impl Default for XlsxConfig {
    fn default() -> Self {
        Self {
            sheet: SheetSelector::First,
            number_column: Some(DOCUMENT_NUMBER_COLUMN.to_string()),
            verbatim_column: Some(ISSUE_PLACE_COLUMN.to_string()),
            skip_empty_rows: true,
        }
    }
}

impl XlsxConfig {
    /// Create a new XLSX config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sheet to read by name
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet = SheetSelector::ByName(name.into());
        self
    }

    /// Set the sheet to read by index (0-based)
    pub fn with_sheet_index(mut self, index: usize) -> Self {
        self.sheet = SheetSelector::ByIndex(index);
        self
    }

    /// Set the document-number column (`None` disables grouping)
    pub fn with_number_column(mut self, column: Option<&str>) -> Self {
        self.number_column = column.map(normalize_header);
        self
    }

    /// Set the verbatim column (`None` disables it)
    pub fn with_verbatim_column(mut self, column: Option<&str>) -> Self {
        self.verbatim_column = column.map(normalize_header);
        self
    }

    /// Set whether to skip empty rows
    pub fn with_skip_empty_rows(mut self, skip: bool) -> Self {
        self.skip_empty_rows = skip;
        self
    }
}

/// How one column's cells are turned into record values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnRule {
    /// Rendered, then trimmed with `nan` blanked
    Normalized,
    /// Thousands-grouped from the raw cell
    DocumentNumber,
    /// Rendered as-is
    Verbatim,
}

/// XLSX parser for creating data sources from Excel files
#[derive(Debug, Clone, Default)]
pub struct XlsxParser {
    config: XlsxConfig,
}

impl XlsxParser {
    /// Create a new XLSX parser with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new XLSX parser with custom configuration
    pub fn with_config(config: XlsxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &XlsxConfig {
        &self.config
    }

    /// Parse a workbook file (`.xlsx`, `.xlsm`, `.xls`) and return a DataSource
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<DataSource> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(MailMergeError::FileNotFound(path.display().to_string()));
        }

        let mut workbook = open_workbook(path)?;

        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("xlsx_source")
            .to_string();

        self.parse_workbook(&mut workbook, id, path.display().to_string())
    }

    /// Parse a workbook held in memory; the format is detected from content
    pub fn parse_bytes(&self, data: &[u8], id: impl Into<String>) -> Result<DataSource> {
        let id = id.into();
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(data)).map_err(|e| {
            MailMergeError::XlsxParse(format!("Failed to read workbook from bytes: {}", e))
        })?;

        let origin = id.clone();
        self.parse_workbook(&mut workbook, id, origin)
    }

    /// Get the sheet name based on the selector
    fn get_sheet_name<RS: Read + Seek>(&self, workbook: &Sheets<RS>) -> Result<String> {
        let sheet_names = workbook.sheet_names();

        if sheet_names.is_empty() {
            return Err(MailMergeError::EmptyDataSource(
                "Workbook has no sheets".to_string(),
            ));
        }

        match &self.config.sheet {
            SheetSelector::ByName(name) => {
                if sheet_names.contains(name) {
                    Ok(name.clone())
                } else {
                    Err(MailMergeError::XlsxParse(format!(
                        "Sheet '{}' not found. Available sheets: {:?}",
                        name, sheet_names
                    )))
                }
            }
            SheetSelector::ByIndex(index) => sheet_names.get(*index).cloned().ok_or_else(|| {
                MailMergeError::XlsxParse(format!(
                    "Sheet index {} out of range. Workbook has {} sheets",
                    index,
                    sheet_names.len()
                ))
            }),
            SheetSelector::First => Ok(sheet_names[0].clone()),
        }
    }

    fn parse_workbook<RS: Read + Seek>(
        &self,
        workbook: &mut Sheets<RS>,
        id: String,
        origin: String,
    ) -> Result<DataSource> {
        let sheet_name = self.get_sheet_name(workbook)?;
        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            MailMergeError::XlsxParse(format!("Failed to read sheet '{}': {}", sheet_name, e))
        })?;

        let source_type = DataSourceType::Xlsx {
            path: origin,
            sheet: sheet_name.clone(),
        };
        let data_source = self.parse_range(&range, id, source_type)?;

        tracing::info!(
            "Loaded {} record(s) with columns {:?} from sheet '{}'",
            data_source.record_count(),
            data_source.columns,
            sheet_name
        );

        Ok(data_source)
    }

    /// Turn a sheet range into a DataSource
    ///
    /// Generic columns are rendered and then blanked/trimmed; the document
    /// number and verbatim columns are computed last from the raw cells, so
    /// the blanking step never sees their values.
    fn parse_range(
        &self,
        range: &Range<Data>,
        id: String,
        source_type: DataSourceType,
    ) -> Result<DataSource> {
        if range.is_empty() {
            return Err(MailMergeError::EmptyDataSource(
                "Excel sheet is empty".to_string(),
            ));
        }

        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header_row) => extract_headers(header_row),
            None => {
                return Err(MailMergeError::EmptyDataSource(
                    "Excel sheet has no header row".to_string(),
                ))
            }
        };

        let headers = disambiguate_headers(headers);
        let rules: Vec<ColumnRule> = headers.iter().map(|h| self.rule_for(h)).collect();

        let mut data_source = DataSource::new(id, source_type);
        for header in &headers {
            data_source.add_column(header.clone());
        }

        for row in rows {
            if self.config.skip_empty_rows && row.iter().all(|cell| matches!(cell, Data::Empty)) {
                continue;
            }

            let mut record = Record::with_capacity(headers.len());
            for (index, (header, rule)) in headers.iter().zip(&rules).enumerate() {
                let cell = row.get(index).unwrap_or(&Data::Empty);
                let value = match rule {
                    ColumnRule::Normalized => normalize_value(&render_cell(cell)),
                    ColumnRule::DocumentNumber => format_number_with_dots(&RawValue::from(cell)),
                    ColumnRule::Verbatim => render_cell(cell),
                };
                record.insert(header.clone(), value);
            }
            data_source.add_record(record);
        }

        Ok(data_source)
    }

    fn rule_for(&self, header: &str) -> ColumnRule {
        if self.config.number_column.as_deref() == Some(header) {
            ColumnRule::DocumentNumber
        } else if self.config.verbatim_column.as_deref() == Some(header) {
            ColumnRule::Verbatim
        } else {
            ColumnRule::Normalized
        }
    }
}

/// Open a workbook file, detecting the format from its content so that
/// upper-case or missing extensions still work
fn open_workbook(path: &Path) -> Result<Sheets<Cursor<Vec<u8>>>> {
    let data = std::fs::read(path)?;
    open_workbook_auto_from_rs(Cursor::new(data)).map_err(|e| {
        MailMergeError::XlsxParse(format!("Failed to open workbook {}: {}", path.display(), e))
    })
}

/// Normalize the header row: upper-case, trim, name blank headers by position
fn extract_headers(row: &[Data]) -> Vec<String> {
    row.iter()
        .enumerate()
        .map(|(i, cell)| {
            let header = normalize_header(&render_cell(cell));
            if header.is_empty() {
                format!("COLUMN{}", i + 1)
            } else {
                header
            }
        })
        .collect()
}

/// Rename repeated headers `X`, `X.1`, `X.2`, ... in sheet order
///
/// A suffix already taken by another column is skipped.
fn disambiguate_headers(headers: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut out = Vec::with_capacity(headers.len());

    for header in headers {
        let mut name = header.clone();
        let mut suffix = 1;
        while taken.contains(&name) {
            name = format!("{}.{}", header, suffix);
            suffix += 1;
        }
        if name != header {
            tracing::warn!("Duplicate column {:?} renamed to {:?}", header, name);
        }
        taken.insert(name.clone());
        out.push(name);
    }

    out
}

fn normalize_header(header: &str) -> String {
    header.trim().to_uppercase()
}

/// Blank out empty and `nan` values, trim everything else
pub fn normalize_value(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Render a cell the way it reads in the sheet
///
/// Integral numbers lose their `.0`, booleans read `True`/`False` and dates
/// are written as `YYYY-MM-DD HH:MM:SS`.
pub(crate) fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(n) => format_float(*n),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => format_excel_datetime(dt.as_f64()),
        Data::DateTimeIso(s) => try_parse_iso_datetime(s)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| s.clone()),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERROR:{:?}", e),
    }
}

/// Convert an Excel serial date (days since 1899-12-30, with the fictitious
/// 1900-02-29 at serial 60) to a date and time
fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let mut days = serial.floor() as i64;
    let seconds = ((serial - serial.floor()) * 86_400.0).round() as i64;

    // Serials before the phantom leap day are one day off
    if days < 61 {
        days += 1;
    }

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    epoch
        .checked_add_signed(chrono::Duration::try_days(days)?)?
        .checked_add_signed(chrono::Duration::try_seconds(seconds)?)
}

/// Try to parse an ISO date or datetime string
fn try_parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%d %H:%M:%S",
    ];

    for format in &formats {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
            return Some(datetime);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Format a float without unnecessary decimal places
fn format_float(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Format an Excel datetime for display
fn format_excel_datetime(serial: f64) -> String {
    match excel_serial_to_datetime(serial) {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format_float(serial),
    }
}

/// Get list of sheet names from an Excel file
pub fn get_sheet_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MailMergeError::FileNotFound(path.display().to_string()));
    }

    Ok(open_workbook(path)?.sheet_names().to_vec())
}
