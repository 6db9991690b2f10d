//! Minimal package assembly
//!
//! Builds a valid DOCX package from raw part XML. Used to create templates
//! programmatically, mostly as fixtures for tests across the workspace.

use crate::docx::error::DocxResult;
use crate::docx::namespaces;
use crate::docx::package::DocxPackage;
use crate::docx::relationship_types;

const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const MAIN_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const HEADER_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
const FOOTER_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

#[derive(Debug, Clone)]
struct RelatedPart {
    id: String,
    rel_type: &'static str,
    content_type: &'static str,
    target: String,
    xml: String,
}

/// Builder for a DOCX package with a main document and optional
/// header/footer parts
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    document_xml: String,
    related: Vec<RelatedPart>,
    extra: Vec<(String, Vec<u8>)>,
}

impl PackageBuilder {
    /// Start from a complete `word/document.xml`
    pub fn new(document_xml: impl Into<String>) -> Self {
        Self {
            document_xml: document_xml.into(),
            related: Vec::new(),
            extra: Vec::new(),
        }
    }

    /// Start from the inner XML of `w:body`
    pub fn from_body(body_xml: &str) -> Self {
        Self::new(Self::document_xml(body_xml))
    }

    /// Add a header part stored at `word/<target>`
    pub fn header(self, rel_id: &str, target: &str, xml: impl Into<String>) -> Self {
        self.related_part(rel_id, relationship_types::HEADER, HEADER_CONTENT_TYPE, target, xml.into())
    }

    /// Add a footer part stored at `word/<target>`
    pub fn footer(self, rel_id: &str, target: &str, xml: impl Into<String>) -> Self {
        self.related_part(rel_id, relationship_types::FOOTER, FOOTER_CONTENT_TYPE, target, xml.into())
    }

    /// Add an arbitrary part without a relationship (media, custom XML)
    pub fn part(mut self, name: &str, data: impl Into<Vec<u8>>) -> Self {
        self.extra.push((name.to_string(), data.into()));
        self
    }

    /// Assemble the package
    pub fn build(&self) -> DocxPackage {
        let mut parts: Vec<(String, Vec<u8>)> = vec![
            ("[Content_Types].xml".to_string(), self.content_types_xml().into_bytes()),
            ("_rels/.rels".to_string(), root_rels_xml().into_bytes()),
            ("word/document.xml".to_string(), self.document_xml.clone().into_bytes()),
            ("word/_rels/document.xml.rels".to_string(), self.document_rels_xml().into_bytes()),
        ];

        for part in &self.related {
            parts.push((format!("word/{}", part.target), part.xml.clone().into_bytes()));
        }
        parts.extend(self.extra.iter().cloned());

        DocxPackage::from_parts(parts)
    }

    /// Assemble and serialize the package
    pub fn to_bytes(&self) -> DocxResult<Vec<u8>> {
        self.build().to_bytes()
    }

    /// Wrap body content into a complete `w:document`
    pub fn document_xml(body_xml: &str) -> String {
        format!(
            "{}\n<w:document {}><w:body>{}</w:body></w:document>",
            XML_DECLARATION,
            namespace_declarations(),
            body_xml
        )
    }

    /// Wrap block content into a `w:hdr` part
    pub fn header_xml(content: &str) -> String {
        format!(
            "{}\n<w:hdr {}>{}</w:hdr>",
            XML_DECLARATION,
            namespace_declarations(),
            content
        )
    }

    /// Wrap block content into a `w:ftr` part
    pub fn footer_xml(content: &str) -> String {
        format!(
            "{}\n<w:ftr {}>{}</w:ftr>",
            XML_DECLARATION,
            namespace_declarations(),
            content
        )
    }

    fn related_part(
        mut self,
        rel_id: &str,
        rel_type: &'static str,
        content_type: &'static str,
        target: &str,
        xml: String,
    ) -> Self {
        self.related.push(RelatedPart {
            id: rel_id.to_string(),
            rel_type,
            content_type,
            target: target.to_string(),
            xml,
        });
        self
    }

    fn content_types_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(XML_DECLARATION);
        xml.push('\n');
        xml.push_str(&format!(r#"<Types xmlns="{}">"#, CONTENT_TYPES_NS));
        xml.push_str(
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        );
        xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
        xml.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);
        xml.push_str(&format!(
            r#"<Override PartName="/word/document.xml" ContentType="{}"/>"#,
            MAIN_CONTENT_TYPE
        ));
        for part in &self.related {
            xml.push_str(&format!(
                r#"<Override PartName="/word/{}" ContentType="{}"/>"#,
                part.target, part.content_type
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn document_rels_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(XML_DECLARATION);
        xml.push('\n');
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, namespaces::PKG_REL));
        for part in &self.related {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                part.id, part.rel_type, part.target
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

fn root_rels_xml() -> String {
    format!(
        r#"{}
<Relationships xmlns="{}"><Relationship Id="rId1" Type="{}" Target="word/document.xml"/></Relationships>"#,
        XML_DECLARATION,
        namespaces::PKG_REL,
        relationship_types::DOCUMENT
    )
}

fn namespace_declarations() -> String {
    format!(
        r#"xmlns:w="{}" xmlns:r="{}" xmlns:a="{}" xmlns:wp="{}" xmlns:wps="{}" xmlns:v="{}""#,
        namespaces::W,
        namespaces::R,
        namespaces::A,
        namespaces::WP,
        namespaces::WPS,
        namespaces::V
    )
}
