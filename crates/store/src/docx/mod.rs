//! DOCX Package Module
//!
//! This module opens Microsoft Word DOCX files as editable XML trees and
//! writes them back. DOCX is based on the Office Open XML (OOXML) format
//! defined in ECMA-376.
//!
//! ## Structure
//!
//! A DOCX file is a ZIP archive containing XML files:
//! - `[Content_Types].xml` - Content type definitions
//! - `_rels/.rels` - Root relationships
//! - `word/document.xml` - Main document content
//! - `word/_rels/document.xml.rels` - Document relationships
//! - `word/header*.xml`, `word/footer*.xml` - Section headers and footers
//!
//! Every part is carried through unchanged except the main document and its
//! header/footer parts, which are parsed into [`XmlDocument`] trees and
//! re-serialized on save.

mod error;
mod reader;
mod relationships;
mod xml_tree;
mod package;
mod document;
mod builder;
mod api;

pub use error::{DocxError, DocxResult};
pub use api::{open_docx, open_docx_bytes, save_docx, docx_to_bytes};
pub use package::{DocxPackage, PackageEntry};
pub use builder::PackageBuilder;
pub use relationships::{Relationship, Relationships, TargetMode, resolve_part_name, rels_part_name};
pub use xml_tree::{XmlDocument, XmlElement, XmlNode};
pub use document::{
    set_leaf_text, Document, HeaderFooterKind, HeaderFooterType, Paragraph, Run, Section,
    Story, Table, TableRow,
};

/// XML namespaces used in DOCX files
pub mod namespaces {
    /// Main WordprocessingML namespace
    pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    /// Relationships namespace
    pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    /// Package relationships namespace
    pub const PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
    /// DrawingML namespace
    pub const A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
    /// WordprocessingML Drawing namespace
    pub const WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
    /// Word 2010 shapes namespace (text boxes)
    pub const WPS: &str = "http://schemas.microsoft.com/office/word/2010/wordprocessingShape";
    /// VML namespace
    pub const V: &str = "urn:schemas-microsoft-com:vml";
    /// The reserved `xml:` prefix
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
}

/// Relationship types used in DOCX
pub mod relationship_types {
    pub const DOCUMENT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const HEADER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
    pub const FOOTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
    pub const HYPERLINK: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        assert!(namespaces::W.contains("wordprocessingml"));
        assert!(relationship_types::HEADER.ends_with("/header"));
    }
}
