//! Sample files offered for download
//!
//! Each sample has an ordered list of candidate file names; the first one
//! found wins. Candidates are probed in the working directory first and then
//! in the asset directory.

use std::path::{Path, PathBuf};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A downloadable sample file
#[derive(Debug, Clone, Copy)]
pub struct SampleAsset {
    /// Short label used in logs and error messages
    pub label: &'static str,
    /// File names to look for, in order
    pub candidates: &'static [&'static str],
    /// Name the file is served under
    pub download_name: &'static str,
    pub content_type: &'static str,
    /// Message of the 404 response when no candidate exists
    pub not_found_message: &'static str,
}

/// Sample workbook
pub const EXCEL_SAMPLE: SampleAsset = SampleAsset {
    label: "Excel",
    candidates: &[
        "INFORMACIÓN DIPLOMAS.xlsx",
        "INFORMACION DIPLOMAS.xlsx",
        "informacion_diplomas.xlsx",
    ],
    download_name: "INFORMACION_DIPLOMAS.xlsx",
    content_type: XLSX_CONTENT_TYPE,
    not_found_message: "Archivo Excel de ejemplo no encontrado. Verifica que el archivo \"INFORMACIÓN DIPLOMAS.xlsx\" esté en el directorio raíz del proyecto.",
};

/// Sample template
pub const WORD_SAMPLE: SampleAsset = SampleAsset {
    label: "Word",
    candidates: &[
        "Diploma  nuevo 2025.docx",
        "Diploma nuevo 2025.docx",
        "diploma nuevo 2025.docx",
        "diploma_nuevo_2025.docx",
    ],
    download_name: "Diploma_nuevo_2025.docx",
    content_type: DOCX_CONTENT_TYPE,
    not_found_message: "Archivo Word de ejemplo no encontrado. Verifica que el archivo \"Diploma  nuevo 2025.docx\" esté en el directorio raíz del proyecto.",
};

impl SampleAsset {
    /// First existing candidate, or `None` after logging what was searched
    pub fn locate(&self, work_dir: &Path, assets_dir: &Path) -> Option<PathBuf> {
        tracing::debug!(
            "Looking for the {} sample in {} and {}",
            self.label,
            work_dir.display(),
            assets_dir.display()
        );

        for name in self.candidates {
            for dir in [work_dir, assets_dir] {
                let path = dir.join(name);
                if path.is_file() {
                    tracing::info!("Found {} sample at {}", self.label, path.display());
                    return Some(path);
                }
            }
            tracing::debug!("Not found: {}", name);
        }

        log_directory(assets_dir);
        None
    }
}

/// Log the entries of a directory to help locate misplaced samples
fn log_directory(dir: &Path) {
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            tracing::warn!("Files in {}: {:?}", dir.display(), names);
        }
        Err(e) => tracing::warn!("Could not list {}: {}", dir.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_candidate_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("diploma_nuevo_2025.docx"), b"b").unwrap();
        std::fs::write(dir.path().join("Diploma nuevo 2025.docx"), b"a").unwrap();

        let found = WORD_SAMPLE.locate(dir.path(), dir.path()).unwrap();
        assert_eq!(found, dir.path().join("Diploma nuevo 2025.docx"));
    }

    #[test]
    fn test_working_directory_before_assets() {
        let work = TempDir::new().unwrap();
        let assets = TempDir::new().unwrap();
        std::fs::write(work.path().join("informacion_diplomas.xlsx"), b"w").unwrap();
        std::fs::write(assets.path().join("informacion_diplomas.xlsx"), b"a").unwrap();

        let found = EXCEL_SAMPLE.locate(work.path(), assets.path()).unwrap();
        assert_eq!(found, work.path().join("informacion_diplomas.xlsx"));

        let found = EXCEL_SAMPLE.locate(&work.path().join("missing"), assets.path()).unwrap();
        assert_eq!(found, assets.path().join("informacion_diplomas.xlsx"));
    }

    #[test]
    fn test_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(EXCEL_SAMPLE.locate(dir.path(), dir.path()).is_none());
    }
}
