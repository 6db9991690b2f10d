//! Mail Merge Execution Engine
//!
//! Orchestrates the batch: for every record a fresh copy of the template is
//! opened, each column becomes a `{COLUMN}` token, and the filled document is
//! saved under a name derived from the full-name column.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use store::{Document, DocxPackage};

use crate::data_source::{DataSource, Record};
use crate::error::{MailMergeError, Result};
use crate::substitution::{placeholder, replace_all};
use crate::NAME_COLUMN;

/// Folder the generated documents are written to
pub const OUTPUT_FOLDER: &str = "DIPLOMAS_GENERADOS";

/// File name of the archive holding every generated document
pub const ARCHIVE_NAME: &str = "diplomas_generados.zip";

/// Output naming options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Column whose value names the output file
    pub name_field: String,
    /// Prefix of every output file name
    pub file_prefix: String,
    /// Used with the 1-based record number when the name column is missing
    pub fallback_name: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            name_field: NAME_COLUMN.to_string(),
            file_prefix: "Diploma_".to_string(),
            fallback_name: "SinNombre_".to_string(),
        }
    }
}

impl MergeOptions {
    pub fn with_name_field(mut self, field: impl Into<String>) -> Self {
        self.name_field = field.into();
        self
    }

    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    pub fn with_fallback_name(mut self, name: impl Into<String>) -> Self {
        self.fallback_name = name.into();
        self
    }
}

/// Progress report passed to [`MergeEngine::execute_with_progress`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeProgress {
    pub current_record: usize,
    pub total_records: usize,
    pub percent: f64,
}

impl MergeProgress {
    pub fn at(current: usize, total: usize) -> Self {
        let percent = if total > 0 {
            (current as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        Self {
            current_record: current,
            total_records: total,
            percent,
        }
    }
}

/// One document written by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub record_index: usize,
    pub file_name: String,
    pub path: PathBuf,
}

/// Outcome of a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeResult {
    pub total_records: usize,
    pub generated: Vec<GeneratedDocument>,
    pub archive_path: Option<PathBuf>,
    pub summary: String,
}

impl MergeResult {
    fn new(total_records: usize) -> Self {
        Self {
            total_records,
            generated: Vec::new(),
            archive_path: None,
            summary: String::new(),
        }
    }

    /// Output file names in generation order
    pub fn file_names(&self) -> Vec<&str> {
        self.generated.iter().map(|doc| doc.file_name.as_str()).collect()
    }
}

/// Batch generator for one template and one data source
#[derive(Debug, Clone)]
pub struct MergeEngine {
    template: DocxPackage,
    data_source: DataSource,
    options: MergeOptions,
}

impl MergeEngine {
    /// Create an engine, checking that the template opens as a document
    pub fn new(template: DocxPackage, data_source: DataSource, options: MergeOptions) -> Result<Self> {
        Document::from_package(template.clone())?;
        Ok(Self {
            template,
            data_source,
            options,
        })
    }

    /// Load the template and the workbook from disk
    pub fn from_files(
        template_path: impl AsRef<Path>,
        data_path: impl AsRef<Path>,
        options: MergeOptions,
    ) -> Result<Self> {
        let template_path = template_path.as_ref();
        if !template_path.exists() {
            return Err(MailMergeError::FileNotFound(template_path.display().to_string()));
        }

        let template = DocxPackage::open(template_path)?;
        let data_source = crate::load_from_file(data_path)?;
        Self::new(template, data_source, options)
    }

    pub fn data_source(&self) -> &DataSource {
        &self.data_source
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Fill the template with one record
    ///
    /// Tokens are applied in column order, so a value containing another
    /// column's token is substituted by the later pass.
    pub fn render_record(&self, index: usize) -> Result<Document> {
        let record = self
            .data_source
            .get_record(index)
            .ok_or(MailMergeError::RecordNotFound(index))?;

        let mut document = Document::from_package(self.template.clone())?;
        let pairs = self.data_source.columns.iter().map(|column| {
            let value = record.get(column).map(String::as_str).unwrap_or_default();
            (placeholder(column), value)
        });
        replace_all(&mut document, pairs);

        Ok(document)
    }

    /// File name for a record: `Diploma_<name>.docx`, or
    /// `Diploma_SinNombre_<n>.docx` when the name column is missing
    pub fn output_name(&self, index: usize, record: &Record) -> String {
        match record.get(&self.options.name_field) {
            Some(name) => format!("{}{}.docx", self.options.file_prefix, file_stem_for(name)),
            None => format!(
                "{}{}{}.docx",
                self.options.file_prefix,
                self.options.fallback_name,
                index + 1
            ),
        }
    }

    /// Generate one document per record into `output_dir`
    pub fn execute(&self, output_dir: impl AsRef<Path>) -> Result<MergeResult> {
        self.execute_with_progress(output_dir, |_| {})
    }

    /// Generate one document per record, reporting progress after each one
    pub fn execute_with_progress<F>(&self, output_dir: impl AsRef<Path>, mut on_progress: F) -> Result<MergeResult>
    where
        F: FnMut(MergeProgress),
    {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        let total = self.data_source.record_count();
        let mut result = MergeResult::new(total);

        for (index, record) in self.data_source.records.iter().enumerate() {
            let document = self.render_record(index)?;
            let file_name = self.output_name(index, record);
            let path = output_dir.join(&file_name);
            document.save(&path)?;

            tracing::info!("Generated {}", file_name);
            result.generated.push(GeneratedDocument {
                record_index: index,
                file_name,
                path,
            });
            on_progress(MergeProgress::at(index + 1, total));
        }

        result.summary = format!("Generated {} of {} documents", result.generated.len(), total);
        tracing::info!("{} in {}", result.summary, output_dir.display());
        Ok(result)
    }

    /// Generate every document under `work_dir/DIPLOMAS_GENERADOS` and zip
    /// that folder into `work_dir/diplomas_generados.zip`
    pub fn generate_archive(&self, work_dir: impl AsRef<Path>) -> Result<MergeResult> {
        let work_dir = work_dir.as_ref();
        let output_dir = work_dir.join(OUTPUT_FOLDER);
        let mut result = self.execute(&output_dir)?;

        let archive_path = work_dir.join(ARCHIVE_NAME);
        let entries = store::archive_directory(&output_dir, &archive_path)?;
        tracing::info!("Archived {} document(s) into {}", entries, archive_path.display());

        result.archive_path = Some(archive_path);
        Ok(result)
    }
}

/// Spaces and path separators become underscores
fn file_stem_for(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}
