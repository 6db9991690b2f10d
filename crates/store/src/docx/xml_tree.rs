//! Mutable XML element tree
//!
//! Document parts are parsed into a small owned tree instead of a typed
//! model so that text can be rewritten in place and everything the reader
//! does not understand (drawings, fields, revision marks, extension
//! elements) is written back untouched.

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::namespaces;
use crate::docx::reader::XmlParser;
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Standard declaration written in front of every serialized part
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// A node in the tree
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// Child element
    Element(XmlElement),
    /// Character data (unescaped)
    Text(String),
    /// CDATA section content
    CData(String),
    /// Comment content
    Comment(String),
}

/// An XML element with its resolved namespace
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Qualified name as written in the source (e.g. `w:t`)
    pub name: String,
    /// Namespace URI the element's prefix resolved to
    pub namespace: Option<String>,
    /// Attributes in document order, values unescaped
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.map(String::from),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Name without its prefix
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Prefix of the qualified name, if any
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Check namespace and local name
    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name() == local
    }

    /// Get an attribute by its qualified name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Iterate over child elements
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Iterate mutably over child elements
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// First child element with the given namespace and local name
    pub fn find_child(&self, namespace: &str, local: &str) -> Option<&XmlElement> {
        self.child_elements().find(|el| el.is(namespace, local))
    }

    /// Mutable variant of [`XmlElement::find_child`]
    pub fn find_child_mut(&mut self, namespace: &str, local: &str) -> Option<&mut XmlElement> {
        self.child_elements_mut().find(|el| el.is(namespace, local))
    }

    /// Append a child element
    pub fn push_element(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Direct character content (text and CDATA children, concatenated)
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                XmlNode::Text(t) | XmlNode::CData(t) => text.push_str(t),
                _ => {}
            }
        }
        text
    }

    /// Replace the direct character content, keeping child elements
    pub fn set_text(&mut self, text: &str) {
        self.children
            .retain(|node| !matches!(node, XmlNode::Text(_) | XmlNode::CData(_)));
        if !text.is_empty() {
            self.children.insert(0, XmlNode::Text(text.to_string()));
        }
    }

    /// Visit this element and every descendant element, depth first
    pub fn walk(&self, visit: &mut dyn FnMut(&XmlElement)) {
        visit(self);
        for child in self.child_elements() {
            child.walk(visit);
        }
    }

    /// Mutable variant of [`XmlElement::walk`]
    pub fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut XmlElement)) {
        visit(self);
        for child in self.child_elements_mut() {
            child.walk_mut(visit);
        }
    }

    /// Serialize the element and its subtree
    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for child in &self.children {
            match child {
                XmlNode::Element(el) => el.write_to(out),
                XmlNode::Text(text) => out.push_str(&partial_escape(text.as_str())),
                XmlNode::CData(data) => {
                    out.push_str("<![CDATA[");
                    out.push_str(data);
                    out.push_str("]]>");
                }
                XmlNode::Comment(comment) => {
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->");
                }
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// A parsed XML part
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    /// Whether the source carried an XML declaration
    pub declaration: bool,
    /// Comments preceding the root element
    pub prolog: Vec<XmlNode>,
    /// Root element
    pub root: XmlElement,
}

impl XmlDocument {
    /// Parse a part from its raw bytes
    pub fn parse_bytes(bytes: &[u8]) -> DocxResult<Self> {
        Self::parse(XmlParser::decode_part(bytes)?)
    }

    /// Parse a part from a string
    pub fn parse(content: &str) -> DocxResult<Self> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);

        let mut declaration = false;
        let mut prolog = Vec::new();
        let mut root: Option<XmlElement> = None;
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut scopes: Vec<Vec<(String, String)>> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                DocxError::XmlParse(format!("at byte {}: {}", reader.buffer_position(), e))
            })?;

            match event {
                Event::Decl(_) => declaration = true,
                Event::Start(start) => {
                    let element = open_element(&start, &mut scopes)?;
                    stack.push(element);
                }
                Event::Empty(start) => {
                    let element = open_element(&start, &mut scopes)?;
                    scopes.pop();
                    attach(element, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    scopes.pop();
                    let element = stack.pop().ok_or_else(|| {
                        DocxError::XmlParse("closing tag without matching start".into())
                    })?;
                    attach(element, &mut stack, &mut root)?;
                }
                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = text
                            .unescape()
                            .map_err(|e| DocxError::XmlParse(e.to_string()))?;
                        push_text(parent, &text);
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        parent
                            .children
                            .push(XmlNode::CData(String::from_utf8_lossy(&data).into_owned()));
                    }
                }
                Event::Comment(comment) => {
                    let node = XmlNode::Comment(String::from_utf8_lossy(&comment).into_owned());
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None if root.is_none() => prolog.push(node),
                        None => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(DocxError::XmlParse(format!(
                "unexpected end of document inside <{}>",
                stack.last().map(|el| el.name.as_str()).unwrap_or_default()
            )));
        }

        let root = root.ok_or_else(|| DocxError::XmlParse("document has no root element".into()))?;

        Ok(Self {
            declaration,
            prolog,
            root,
        })
    }

    /// Serialize the part
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        if self.declaration {
            out.push_str(XML_DECLARATION);
            out.push('\n');
        }
        for node in &self.prolog {
            if let XmlNode::Comment(comment) = node {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
        }
        self.root.write_to(&mut out);
        out
    }
}

/// Build an element from a start tag, pushing its namespace declarations
fn open_element(
    start: &BytesStart<'_>,
    scopes: &mut Vec<Vec<(String, String)>>,
) -> DocxResult<XmlElement> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    let mut declared = Vec::new();

    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| DocxError::XmlParse(e.to_string()))?
            .into_owned();

        if key == "xmlns" {
            declared.push((String::new(), value.clone()));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            declared.push((prefix.to_string(), value.clone()));
        }
        attributes.push((key, value));
    }

    scopes.push(declared);

    let prefix = name.split_once(':').map(|(p, _)| p).unwrap_or("");
    let namespace = resolve_prefix(scopes, prefix);

    Ok(XmlElement {
        name,
        namespace,
        attributes,
        children: Vec::new(),
    })
}

/// Resolve a prefix against the open namespace scopes, innermost first
fn resolve_prefix(scopes: &[Vec<(String, String)>], prefix: &str) -> Option<String> {
    if prefix == "xml" {
        return Some(namespaces::XML.to_string());
    }
    scopes
        .iter()
        .rev()
        .flat_map(|scope| scope.iter())
        .find(|(p, _)| p == prefix)
        .map(|(_, uri)| uri.clone())
        .filter(|uri| !uri.is_empty())
}

/// Attach a finished element to its parent, or make it the root
fn attach(
    element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> DocxResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.push_element(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(DocxError::XmlParse(format!(
                "second root element <{}>",
                element.name
            )))
        }
    }
    Ok(())
}

/// Append text, merging with a preceding text node
fn push_text(parent: &mut XmlElement, text: &str) {
    if let Some(XmlNode::Text(previous)) = parent.children.last_mut() {
        previous.push_str(text);
    } else {
        parent.children.push(XmlNode::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::namespaces::{A, W};

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><w:body><w:p><w:r><w:t xml:space="preserve">Tom &amp; Jerry </w:t></w:r></w:p><a:t>shape</a:t><!-- note --><w:sectPr/></w:body></w:document>"#;

    #[test]
    fn test_parse_resolves_namespaces() {
        let doc = XmlDocument::parse(SAMPLE).unwrap();
        assert!(doc.declaration);
        assert!(doc.root.is(W, "document"));

        let body = doc.root.find_child(W, "body").unwrap();
        let shape_text = body.child_elements().find(|el| el.local_name() == "t").unwrap();
        assert!(shape_text.is(A, "t"));
        assert_eq!(shape_text.text(), "shape");
    }

    #[test]
    fn test_text_is_unescaped_and_whitespace_kept() {
        let doc = XmlDocument::parse(SAMPLE).unwrap();
        let mut texts = Vec::new();
        doc.root.walk(&mut |el| {
            if el.is(W, "t") {
                texts.push(el.text());
            }
        });
        assert_eq!(texts, vec!["Tom & Jerry ".to_string()]);
    }

    #[test]
    fn test_xml_prefix_is_reserved() {
        let doc = XmlDocument::parse(SAMPLE).unwrap();
        let mut space = None;
        doc.root.walk(&mut |el| {
            if el.is(W, "t") {
                space = el.attribute("xml:space").map(String::from);
            }
        });
        assert_eq!(space.as_deref(), Some("preserve"));
    }

    #[test]
    fn test_roundtrip_preserves_structure() {
        let doc = XmlDocument::parse(SAMPLE).unwrap();
        let xml = doc.to_xml();
        assert!(xml.contains("Tom &amp; Jerry "));
        assert!(xml.contains("<!-- note -->"));
        assert!(xml.contains("<w:sectPr/>"));

        let reparsed = XmlDocument::parse(&xml).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_set_text_keeps_child_elements() {
        let mut el = XmlElement::new("w:t", Some(W));
        el.children.push(XmlNode::Text("old".into()));
        el.push_element(XmlElement::new("w:x", Some(W)));

        el.set_text("new");
        assert_eq!(el.text(), "new");
        assert_eq!(el.child_elements().count(), 1);

        el.set_text("");
        assert_eq!(el.text(), "");
        assert_eq!(el.children.len(), 1);
    }

    #[test]
    fn test_default_namespace() {
        let doc = XmlDocument::parse(r#"<Relationships xmlns="urn:x"><Relationship/></Relationships>"#).unwrap();
        assert_eq!(doc.root.namespace.as_deref(), Some("urn:x"));
        assert!(!doc.declaration);
    }

    #[test]
    fn test_unprefixed_element_without_default_namespace() {
        let doc = XmlDocument::parse("<root><t>x</t></root>").unwrap();
        let t = doc.root.child_elements().next().unwrap();
        assert_eq!(t.local_name(), "t");
        assert!(t.namespace.is_none());
    }

    #[test]
    fn test_attribute_escaping() {
        let mut el = XmlElement::new("w:x", Some(W));
        el.set_attribute("w:val", "a\"b<c");
        let mut out = String::new();
        el.write_to(&mut out);
        assert_eq!(out, r#"<w:x w:val="a&quot;b&lt;c"/>"#);
    }

    #[test]
    fn test_parse_errors() {
        assert!(XmlDocument::parse("<a><b></a>").is_err());
        assert!(XmlDocument::parse("").is_err());
        assert!(XmlDocument::parse("<a>").is_err());
    }

    proptest::proptest! {
        #[test]
        fn prop_text_survives_serialization(text in "[a-zA-Z0-9 <>&\"'.,{}]{0,40}") {
            let mut doc = XmlDocument::parse(SAMPLE).unwrap();
            doc.root.walk_mut(&mut |el| {
                if el.is(W, "t") {
                    el.set_text(&text);
                }
            });

            let reparsed = XmlDocument::parse(&doc.to_xml()).unwrap();
            let mut found = None;
            reparsed.root.walk(&mut |el| {
                if el.is(W, "t") {
                    found = Some(el.text());
                }
            });
            proptest::prop_assert_eq!(found, Some(text.clone()));
        }
    }
}
