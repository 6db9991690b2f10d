//! Public API for opening and saving DOCX documents
//!
//! This module provides the main entry points for working with DOCX files.

use crate::docx::document::Document;
use crate::docx::error::DocxResult;
use crate::docx::package::DocxPackage;
use std::path::Path;

/// Open a DOCX file from disk for editing
///
/// # Example
///
/// ```ignore
/// use store::docx::{open_docx, save_docx};
///
/// let mut doc = open_docx("template.docx")?;
/// save_docx(&doc, "out/filled.docx")?;
/// ```
pub fn open_docx(path: impl AsRef<Path>) -> DocxResult<Document> {
    Document::from_package(DocxPackage::open(path)?)
}

/// Open a DOCX document from bytes (e.g. an upload)
pub fn open_docx_bytes(bytes: &[u8]) -> DocxResult<Document> {
    Document::from_package(DocxPackage::from_bytes(bytes)?)
}

/// Save a document to disk, creating parent directories if they don't exist
pub fn save_docx(doc: &Document, path: impl AsRef<Path>) -> DocxResult<()> {
    doc.save(path)
}

/// Serialize a document to DOCX bytes
pub fn docx_to_bytes(doc: &Document) -> DocxResult<Vec<u8>> {
    doc.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::builder::PackageBuilder;
    use crate::docx::DocxError;
    use tempfile::TempDir;

    #[test]
    fn test_open_save_roundtrip() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("template.docx");
        std::fs::write(
            &template,
            PackageBuilder::from_body("<w:p><w:r><w:t>Hola</w:t></w:r></w:p>")
                .to_bytes()
                .unwrap(),
        )
        .unwrap();

        let doc = open_docx(&template).unwrap();
        let out = dir.path().join("out").join("copy.docx");
        save_docx(&doc, &out).unwrap();

        let copy = open_docx(&out).unwrap();
        assert_eq!(copy.paragraph_texts(), vec!["Hola"]);
    }

    #[test]
    fn test_open_bytes() {
        let bytes = PackageBuilder::from_body("<w:p/>").to_bytes().unwrap();
        let doc = open_docx_bytes(&bytes).unwrap();
        assert!(!docx_to_bytes(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_open_garbage_bytes() {
        assert!(matches!(open_docx_bytes(b"plain text"), Err(DocxError::Zip(_))));
    }
}
