//! Editable document model
//!
//! [`Document`] parses the main document part and every header/footer part
//! referenced by a section into [`XmlDocument`] trees. The wrappers in this
//! module ([`Story`], [`Paragraph`], [`Run`], [`Table`], [`TableRow`]) are
//! thin mutable views over those trees that follow the WordprocessingML
//! content model: a story holds paragraphs and tables, a paragraph holds
//! runs, a table holds rows of cells and each cell is again a story.

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::namespaces::W;
use crate::docx::package::DocxPackage;
use crate::docx::relationship_types;
use crate::docx::relationships::{rels_part_name, resolve_part_name, Relationships, TargetMode};
use crate::docx::xml_tree::{XmlDocument, XmlElement, XmlNode};
use std::collections::BTreeMap;
use std::path::Path;

/// Part used when the package relationships do not name a main document
const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// Header and footer variants a section can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeaderFooterType {
    /// Used on every page without a more specific variant
    Default,
    /// First page of the section
    First,
    /// Even pages
    Even,
}

impl HeaderFooterType {
    /// All variants in processing order
    pub const ALL: [HeaderFooterType; 3] = [Self::Default, Self::First, Self::Even];

    /// Parse the `w:type` attribute of a header or footer reference
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("first") => Self::First,
            Some("even") => Self::Even,
            _ => Self::Default,
        }
    }
}

/// Whether a part is a header or a footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderFooterKind {
    Header,
    Footer,
}

impl std::fmt::Display for HeaderFooterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Footer => write!(f, "footer"),
        }
    }
}

/// Header and footer parts in effect for one section
///
/// A variant the section does not reference itself is inherited from the
/// previous section, so every entry here is the part Word would display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    headers: BTreeMap<HeaderFooterType, String>,
    footers: BTreeMap<HeaderFooterType, String>,
}

impl Section {
    /// Part name of one header or footer variant
    pub fn part(&self, kind: HeaderFooterKind, variant: HeaderFooterType) -> Option<&str> {
        self.map(kind).get(&variant).map(String::as_str)
    }

    /// All parts of the section: headers first, then footers
    pub fn parts(&self) -> Vec<&str> {
        let mut parts = Vec::new();
        for kind in [HeaderFooterKind::Header, HeaderFooterKind::Footer] {
            for variant in HeaderFooterType::ALL {
                if let Some(part) = self.part(kind, variant) {
                    parts.push(part);
                }
            }
        }
        parts
    }

    fn map(&self, kind: HeaderFooterKind) -> &BTreeMap<HeaderFooterType, String> {
        match kind {
            HeaderFooterKind::Header => &self.headers,
            HeaderFooterKind::Footer => &self.footers,
        }
    }

    fn map_mut(&mut self, kind: HeaderFooterKind) -> &mut BTreeMap<HeaderFooterType, String> {
        match kind {
            HeaderFooterKind::Header => &mut self.headers,
            HeaderFooterKind::Footer => &mut self.footers,
        }
    }
}

/// An opened DOCX document
#[derive(Debug, Clone)]
pub struct Document {
    package: DocxPackage,
    main_part_name: String,
    main: XmlDocument,
    sections: Vec<Section>,
    related: BTreeMap<String, XmlDocument>,
}

impl Document {
    /// Parse the document parts of a package
    pub fn from_package(package: DocxPackage) -> DocxResult<Self> {
        let main_part_name = find_main_part(&package)?;
        let main_bytes = package
            .part(&main_part_name)
            .ok_or_else(|| DocxError::MissingPart(main_part_name.clone()))?;
        let main = XmlDocument::parse_bytes(main_bytes)?;

        let rels = match package.part_as_string(&rels_part_name(&main_part_name))? {
            Some(content) => Relationships::parse(content)?,
            None => Relationships::new(),
        };

        let body = main.root.find_child(W, "body").ok_or_else(|| {
            DocxError::InvalidStructure(format!("{} has no w:body element", main_part_name))
        })?;
        let sections = resolve_sections(body, &rels, &main_part_name);

        let mut related = BTreeMap::new();
        for section in &sections {
            for part in section.parts() {
                if related.contains_key(part) {
                    continue;
                }
                match package.part(part) {
                    Some(bytes) => {
                        related.insert(part.to_string(), XmlDocument::parse_bytes(bytes)?);
                    }
                    None => tracing::warn!("Referenced part {} is missing from the package", part),
                }
            }
        }

        tracing::debug!(
            "Opened {} with {} section(s) and {} header/footer part(s)",
            main_part_name,
            sections.len(),
            related.len()
        );

        Ok(Self {
            package,
            main_part_name,
            main,
            sections,
            related,
        })
    }

    /// Name of the main document part
    pub fn main_part_name(&self) -> &str {
        &self.main_part_name
    }

    /// The parsed main document part
    pub fn main(&self) -> &XmlDocument {
        &self.main
    }

    /// Sections in document order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The `w:body` element
    pub fn body(&self) -> Option<&XmlElement> {
        self.main.root.find_child(W, "body")
    }

    /// Mutable `w:body` element
    pub fn body_mut(&mut self) -> Option<&mut XmlElement> {
        self.main.root.find_child_mut(W, "body")
    }

    /// The body as a story of paragraphs and tables
    pub fn body_story(&mut self) -> Option<Story<'_>> {
        self.body_mut().map(Story::new)
    }

    /// Header and footer part names, each listed once, in section order
    pub fn header_footer_parts(&self) -> Vec<String> {
        let mut parts: Vec<String> = Vec::new();
        for section in &self.sections {
            for part in section.parts() {
                if self.related.contains_key(part) && !parts.iter().any(|p| p == part) {
                    parts.push(part.to_string());
                }
            }
        }
        parts
    }

    /// A parsed header or footer part
    pub fn part(&self, name: &str) -> Option<&XmlDocument> {
        self.related.get(name)
    }

    /// A header or footer part as a story
    pub fn part_story(&mut self, name: &str) -> Option<Story<'_>> {
        self.related.get_mut(name).map(|doc| Story::new(&mut doc.root))
    }

    /// Text of every paragraph, main part first, then headers and footers
    ///
    /// Paragraphs nested in text boxes are listed after the paragraph that
    /// anchors them.
    pub fn paragraph_texts(&self) -> Vec<String> {
        let mut texts = Vec::new();
        let mut collect = |el: &XmlElement| {
            if el.is(W, "p") {
                texts.push(paragraph_text(el));
            }
        };

        self.main.root.walk(&mut collect);
        for name in self.header_footer_parts() {
            if let Some(part) = self.related.get(&name) {
                part.root.walk(&mut collect);
            }
        }
        texts
    }

    /// Package with the edited parts serialized back in
    pub fn to_package(&self) -> DocxPackage {
        let mut package = self.package.clone();
        self.write_parts(&mut package);
        package
    }

    /// Serialize to DOCX bytes
    pub fn to_bytes(&self) -> DocxResult<Vec<u8>> {
        self.to_package().to_bytes()
    }

    /// Save to disk
    pub fn save(&self, path: impl AsRef<Path>) -> DocxResult<()> {
        self.to_package().save(path)
    }

    fn write_parts(&self, package: &mut DocxPackage) {
        package.set_part(&self.main_part_name, self.main.to_xml().into_bytes());
        for (name, part) in &self.related {
            package.set_part(name, part.to_xml().into_bytes());
        }
    }
}

/// A container of block content: the body, a header, a footer or a table cell
#[derive(Debug)]
pub struct Story<'a> {
    element: &'a mut XmlElement,
}

impl<'a> Story<'a> {
    pub fn new(element: &'a mut XmlElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &XmlElement {
        &*self.element
    }

    pub fn element_mut(&mut self) -> &mut XmlElement {
        &mut *self.element
    }

    /// Direct child paragraphs
    pub fn paragraphs(&mut self) -> Vec<Paragraph<'_>> {
        self.element
            .child_elements_mut()
            .filter(|el| el.is(W, "p"))
            .map(Paragraph::new)
            .collect()
    }

    /// Direct child tables
    pub fn tables(&mut self) -> Vec<Table<'_>> {
        self.element
            .child_elements_mut()
            .filter(|el| el.is(W, "tbl"))
            .map(Table::new)
            .collect()
    }
}

/// A `w:tbl` element
#[derive(Debug)]
pub struct Table<'a> {
    element: &'a mut XmlElement,
}

impl<'a> Table<'a> {
    pub fn new(element: &'a mut XmlElement) -> Self {
        Self { element }
    }

    pub fn rows(&mut self) -> Vec<TableRow<'_>> {
        self.element
            .child_elements_mut()
            .filter(|el| el.is(W, "tr"))
            .map(TableRow::new)
            .collect()
    }
}

/// A `w:tr` element
#[derive(Debug)]
pub struct TableRow<'a> {
    element: &'a mut XmlElement,
}

impl<'a> TableRow<'a> {
    pub fn new(element: &'a mut XmlElement) -> Self {
        Self { element }
    }

    /// Cells of the row, each one visited once even when merged
    pub fn cells(&mut self) -> Vec<Story<'_>> {
        self.element
            .child_elements_mut()
            .filter(|el| el.is(W, "tc"))
            .map(Story::new)
            .collect()
    }
}

/// A `w:p` element
#[derive(Debug)]
pub struct Paragraph<'a> {
    element: &'a mut XmlElement,
}

impl<'a> Paragraph<'a> {
    pub fn new(element: &'a mut XmlElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &XmlElement {
        &*self.element
    }

    /// Concatenated text of the direct child runs
    pub fn text(&self) -> String {
        paragraph_text(&*self.element)
    }

    pub fn run_count(&self) -> usize {
        self.element.child_elements().filter(|el| el.is(W, "r")).count()
    }

    /// Direct child runs (runs inside hyperlinks or fields are not included)
    pub fn runs(&mut self) -> Vec<Run<'_>> {
        self.element
            .child_elements_mut()
            .filter(|el| el.is(W, "r"))
            .map(Run::new)
            .collect()
    }

    /// Append a new unformatted run holding `text`
    pub fn add_run(&mut self, text: &str) {
        let name = qualified(self.element.prefix(), "r");
        let mut run = XmlElement::new(name, self.element.namespace.as_deref());
        Run::new(&mut run).set_text(text);
        self.element.push_element(run);
    }
}

/// A `w:r` element
#[derive(Debug)]
pub struct Run<'a> {
    element: &'a mut XmlElement,
}

impl<'a> Run<'a> {
    pub fn new(element: &'a mut XmlElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &XmlElement {
        &*self.element
    }

    /// Visible text: `w:t` content, tabs as `\t`, line breaks as `\n`
    pub fn text(&self) -> String {
        run_text(&*self.element)
    }

    /// Replace the run's text content
    ///
    /// Text-bearing children are removed and the new content is inserted
    /// where the first of them was. Run properties, drawings, field
    /// characters and page breaks stay in place.
    pub fn set_text(&mut self, text: &str) {
        let prefix = self.element.prefix().map(String::from);
        let namespace = self.element.namespace.clone();

        let position = self
            .element
            .children
            .iter()
            .position(is_text_content)
            .unwrap_or(self.element.children.len());
        self.element.children.retain(|node| !is_text_content(node));

        let nodes = text_content_nodes(text, prefix.as_deref(), namespace.as_deref());
        let position = position.min(self.element.children.len());
        let tail = self.element.children.split_off(position);
        self.element.children.extend(nodes);
        self.element.children.extend(tail);
    }
}

/// Set the character content of a text leaf (`w:t`, `a:t`, ...)
///
/// Adds `xml:space="preserve"` when the value has leading or trailing
/// whitespace, otherwise Word would drop it.
pub fn set_leaf_text(element: &mut XmlElement, text: &str) {
    element.set_text(text);
    if text.trim() != text {
        element.set_attribute("xml:space", "preserve");
    }
}

fn find_main_part(package: &DocxPackage) -> DocxResult<String> {
    let root_rels = match package.part_as_string("_rels/.rels")? {
        Some(content) => Relationships::parse(content)?,
        None => return Ok(DEFAULT_MAIN_PART.to_string()),
    };

    Ok(root_rels
        .get_by_type(relationship_types::DOCUMENT)
        .filter(|rel| rel.target_mode == TargetMode::Internal)
        .map(|rel| resolve_part_name("", &rel.target))
        .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string()))
}

/// Section properties in document order: paragraph-level `w:sectPr` first,
/// the trailing body-level one last
fn section_properties(body: &XmlElement) -> Vec<&XmlElement> {
    let mut found = Vec::new();
    for child in body.child_elements() {
        if child.is(W, "p") {
            if let Some(sect_pr) = child
                .find_child(W, "pPr")
                .and_then(|ppr| ppr.find_child(W, "sectPr"))
            {
                found.push(sect_pr);
            }
        } else if child.is(W, "sectPr") {
            found.push(child);
        }
    }
    found
}

fn resolve_sections(body: &XmlElement, rels: &Relationships, source_part: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for sect_pr in section_properties(body) {
        let mut section = sections.last().cloned().unwrap_or_default();

        for reference in sect_pr.child_elements() {
            let kind = if reference.is(W, "headerReference") {
                HeaderFooterKind::Header
            } else if reference.is(W, "footerReference") {
                HeaderFooterKind::Footer
            } else {
                continue;
            };

            let variant = HeaderFooterType::from_attribute(local_attribute(reference, "type"));
            let Some(id) = local_attribute(reference, "id") else {
                tracing::warn!("{} reference without a relationship id", kind);
                continue;
            };

            match rels.get(id) {
                Some(rel) if rel.target_mode == TargetMode::Internal => {
                    let part = resolve_part_name(source_part, &rel.target);
                    section.map_mut(kind).insert(variant, part);
                }
                _ => tracing::warn!("Unresolved {} relationship {}", kind, id),
            }
        }

        sections.push(section);
    }

    sections
}

/// Attribute lookup ignoring the prefix (`w:type`, `r:id`)
fn local_attribute<'e>(element: &'e XmlElement, local: &str) -> Option<&'e str> {
    element
        .attributes
        .iter()
        .find(|(key, _)| key.rsplit_once(':').map(|(_, l)| l).unwrap_or(key) == local)
        .map(|(_, value)| value.as_str())
}

fn paragraph_text(paragraph: &XmlElement) -> String {
    paragraph
        .child_elements()
        .filter(|el| el.is(W, "r"))
        .map(run_text)
        .collect()
}

fn run_text(run: &XmlElement) -> String {
    let mut text = String::new();
    for child in run.child_elements() {
        if child.namespace.as_deref() != Some(W) {
            continue;
        }
        match child.local_name() {
            "t" => text.push_str(&child.text()),
            "tab" | "ptab" => text.push('\t'),
            "cr" => text.push('\n'),
            "br" if is_line_break(child) => text.push('\n'),
            "noBreakHyphen" => text.push('-'),
            _ => {}
        }
    }
    text
}

fn is_line_break(br: &XmlElement) -> bool {
    matches!(local_attribute(br, "type"), None | Some("textWrapping"))
}

/// Children that make up a run's text, as opposed to its properties or
/// embedded objects
fn is_text_content(node: &XmlNode) -> bool {
    let XmlNode::Element(el) = node else {
        return false;
    };
    if el.namespace.as_deref() != Some(W) {
        return false;
    }
    match el.local_name() {
        "t" | "tab" | "ptab" | "cr" | "noBreakHyphen" => true,
        "br" => is_line_break(el),
        _ => false,
    }
}

/// Build `w:t`, `w:tab` and `w:br` elements for a string
fn text_content_nodes(text: &str, prefix: Option<&str>, namespace: Option<&str>) -> Vec<XmlNode> {
    let mut nodes = Vec::new();
    let mut pending = String::new();

    let flush = |pending: &mut String, nodes: &mut Vec<XmlNode>| {
        if !pending.is_empty() {
            let mut t = XmlElement::new(qualified(prefix, "t"), namespace);
            set_leaf_text(&mut t, pending.as_str());
            nodes.push(XmlNode::Element(t));
            pending.clear();
        }
    };

    for ch in text.chars() {
        match ch {
            '\t' => {
                flush(&mut pending, &mut nodes);
                nodes.push(XmlNode::Element(XmlElement::new(qualified(prefix, "tab"), namespace)));
            }
            '\n' | '\r' => {
                flush(&mut pending, &mut nodes);
                nodes.push(XmlNode::Element(XmlElement::new(qualified(prefix, "br"), namespace)));
            }
            other => pending.push(other),
        }
    }
    flush(&mut pending, &mut nodes);

    nodes
}

fn qualified(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::builder::PackageBuilder;

    fn open(builder: PackageBuilder) -> Document {
        Document::from_package(builder.build()).unwrap()
    }

    #[test]
    fn test_run_text_model() {
        let mut doc = open(PackageBuilder::from_body(
            r#"<w:p><w:r><w:t>He</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>ll</w:t></w:r><w:r><w:t>o</w:t><w:tab/><w:t>x</w:t><w:br/><w:br w:type="page"/></w:r></w:p>"#,
        ));

        let mut body = doc.body_story().unwrap();
        let mut paragraphs = body.paragraphs();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].run_count(), 3);
        assert_eq!(paragraphs[0].text(), "Hello\tx\n");

        let runs = paragraphs[0].runs();
        let texts: Vec<String> = runs.iter().map(Run::text).collect();
        assert_eq!(texts, vec!["He", "ll", "o\tx\n"]);
    }

    #[test]
    fn test_set_text_keeps_properties_and_objects() {
        let mut doc = open(PackageBuilder::from_body(
            r#"<w:p><w:r><w:rPr><w:i/></w:rPr><w:t>old</w:t><w:drawing/><w:t>er</w:t></w:r></w:p>"#,
        ));

        {
            let mut body = doc.body_story().unwrap();
            let mut paragraphs = body.paragraphs();
            let mut runs = paragraphs[0].runs();
            runs[0].set_text(" new\tline\nend");
        }

        let body = doc.body().unwrap();
        let run = body.child_elements().next().unwrap().child_elements().next().unwrap();
        let names: Vec<&str> = run.child_elements().map(|el| el.name.as_str()).collect();
        assert_eq!(names, vec!["w:rPr", "w:t", "w:tab", "w:t", "w:br", "w:t", "w:drawing"]);

        let first_t = run.find_child(W, "t").unwrap();
        assert_eq!(first_t.text(), " new");
        assert_eq!(first_t.attribute("xml:space"), Some("preserve"));
        assert_eq!(run_text(run), " new\tline\nend");
    }

    #[test]
    fn test_set_empty_text_clears_run() {
        let mut doc = open(PackageBuilder::from_body(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>gone</w:t></w:r></w:p>"#,
        ));

        let mut body = doc.body_story().unwrap();
        let mut paragraphs = body.paragraphs();
        let mut runs = paragraphs[0].runs();
        runs[0].set_text("");
        assert_eq!(runs[0].text(), "");
        assert_eq!(runs[0].element().child_elements().count(), 1);
    }

    #[test]
    fn test_add_run_to_empty_paragraph() {
        let mut doc = open(PackageBuilder::from_body("<w:p><w:pPr/></w:p>"));

        let mut body = doc.body_story().unwrap();
        let mut paragraphs = body.paragraphs();
        assert_eq!(paragraphs[0].run_count(), 0);
        paragraphs[0].add_run("added");
        assert_eq!(paragraphs[0].run_count(), 1);
        assert_eq!(paragraphs[0].text(), "added");
    }

    #[test]
    fn test_tables_rows_and_cells() {
        let mut doc = open(PackageBuilder::from_body(
            r#"<w:tbl><w:tblPr/><w:tr><w:tc><w:p><w:r><w:t>a</w:t></w:r></w:p><w:p><w:r><w:t>b</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>c</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        ));

        let mut body = doc.body_story().unwrap();
        let mut tables = body.tables();
        assert_eq!(tables.len(), 1);

        let mut rows = tables[0].rows();
        let mut cells = rows[0].cells();
        assert_eq!(cells.len(), 2);

        let texts: Vec<String> = cells[0].paragraphs().iter().map(Paragraph::text).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_section_inheritance_and_part_order() {
        let document = PackageBuilder::document_xml(
            r#"<w:p><w:pPr><w:sectPr><w:headerReference w:type="default" r:id="rId10"/><w:headerReference w:type="first" r:id="rId12"/><w:footerReference w:type="default" r:id="rId11"/></w:sectPr></w:pPr></w:p><w:p/><w:sectPr><w:headerReference w:type="default" r:id="rId13"/></w:sectPr>"#,
        );
        let doc = open(
            PackageBuilder::new(document)
                .header("rId10", "header1.xml", PackageBuilder::header_xml("<w:p/>"))
                .footer("rId11", "footer1.xml", PackageBuilder::footer_xml("<w:p/>"))
                .header("rId12", "header3.xml", PackageBuilder::header_xml("<w:p/>"))
                .header("rId13", "header2.xml", PackageBuilder::header_xml("<w:p/>")),
        );

        let sections = doc.sections();
        assert_eq!(sections.len(), 2);

        let second = &sections[1];
        assert_eq!(second.part(HeaderFooterKind::Header, HeaderFooterType::Default), Some("word/header2.xml"));
        assert_eq!(second.part(HeaderFooterKind::Header, HeaderFooterType::First), Some("word/header3.xml"));
        assert_eq!(second.part(HeaderFooterKind::Footer, HeaderFooterType::Default), Some("word/footer1.xml"));
        assert_eq!(second.part(HeaderFooterKind::Footer, HeaderFooterType::Even), None);

        assert_eq!(
            doc.header_footer_parts(),
            vec!["word/header1.xml", "word/header3.xml", "word/footer1.xml", "word/header2.xml"]
        );
    }

    #[test]
    fn test_missing_header_part_is_skipped() {
        let document = PackageBuilder::document_xml(
            r#"<w:p/><w:sectPr><w:headerReference w:type="default" r:id="rId99"/></w:sectPr>"#,
        );
        let doc = open(PackageBuilder::new(document));
        assert!(doc.header_footer_parts().is_empty());
    }

    #[test]
    fn test_save_roundtrip_keeps_other_parts() {
        let document = PackageBuilder::document_xml(
            r#"<w:p><w:r><w:t>before</w:t></w:r></w:p><w:sectPr><w:footerReference w:type="default" r:id="rId5"/></w:sectPr>"#,
        );
        let mut doc = open(
            PackageBuilder::new(document)
                .footer("rId5", "footer1.xml", PackageBuilder::footer_xml("<w:p><w:r><w:t>page</w:t></w:r></w:p>"))
                .part("word/media/image1.png", vec![1, 2, 3]),
        );

        {
            let mut body = doc.body_story().unwrap();
            let mut paragraphs = body.paragraphs();
            paragraphs[0].runs()[0].set_text("after");
        }
        {
            let mut footer = doc.part_story("word/footer1.xml").unwrap();
            footer.paragraphs()[0].runs()[0].set_text("foot");
        }

        let bytes = doc.to_bytes().unwrap();
        let package = DocxPackage::from_bytes(&bytes).unwrap();
        assert_eq!(package.part("word/media/image1.png"), Some(&[1u8, 2, 3][..]));

        let reopened = Document::from_package(package).unwrap();
        assert_eq!(reopened.paragraph_texts(), vec!["after", "foot"]);
    }

    #[test]
    fn test_missing_body_is_invalid() {
        let builder = PackageBuilder::new(format!(
            r#"<w:document xmlns:w="{}"/>"#,
            W
        ));
        let result = Document::from_package(builder.build());
        assert!(matches!(result, Err(DocxError::InvalidStructure(_))));
    }

    #[test]
    fn test_missing_main_part() {
        let package = DocxPackage::from_parts(vec![("[Content_Types].xml", b"<Types/>".to_vec())]);
        let result = Document::from_package(package);
        assert!(matches!(result, Err(DocxError::MissingPart(_))));
    }

    #[test]
    fn test_set_leaf_text_preserves_space() {
        let mut t = XmlElement::new("a:t", Some(crate::docx::namespaces::A));
        set_leaf_text(&mut t, "trimmed");
        assert_eq!(t.attribute("xml:space"), None);
        set_leaf_text(&mut t, "padded ");
        assert_eq!(t.attribute("xml:space"), Some("preserve"));
    }
}
