//! Service state shared by the handlers

use std::path::PathBuf;

use mail_merge::{MergeEngine, MergeOptions};
use tempfile::TempDir;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::upload::GenerateUpload;

/// Everything the handlers need, built once at startup and never mutated
#[derive(Debug, Clone)]
pub struct AppService {
    pub config: ServerConfig,
    /// Directory probed first for the sample files
    pub work_dir: PathBuf,
    pub merge_options: MergeOptions,
}

impl AppService {
    pub fn new(config: ServerConfig) -> Self {
        let work_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_work_dir(config, work_dir)
    }

    pub fn with_work_dir(config: ServerConfig, work_dir: PathBuf) -> Self {
        Self {
            config,
            work_dir,
            merge_options: MergeOptions::default(),
        }
    }

    pub fn assets_dir(&self) -> &std::path::Path {
        &self.config.assets_dir
    }

    /// Run a whole batch in a fresh scratch directory and return the ZIP
    ///
    /// Blocking; the scratch directory is removed when this returns, on
    /// success or failure.
    pub fn generate(&self, upload: &GenerateUpload) -> Result<Vec<u8>, ApiError> {
        let scratch = TempDir::new()?;

        let template_path = scratch.path().join(upload.template.stored_name("template"));
        let excel_path = scratch.path().join(upload.excel.stored_name("excel"));
        std::fs::write(&template_path, &upload.template.data)?;
        std::fs::write(&excel_path, &upload.excel.data)?;

        tracing::info!(
            "Generating diplomas from {:?} and {:?}",
            upload.template.file_name,
            upload.excel.file_name
        );

        let engine = MergeEngine::from_files(&template_path, &excel_path, self.merge_options.clone())?;
        let result = engine.generate_archive(scratch.path())?;

        let archive_path = result
            .archive_path
            .ok_or_else(|| ApiError::Internal("Error al procesar: no se generó el archivo ZIP".to_string()))?;
        let archive = std::fs::read(&archive_path)?;

        tracing::info!("{} ({} bytes)", result.summary, archive.len());
        Ok(archive)
    }
}
