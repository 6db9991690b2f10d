//! ZIP archive reading and XML parsing utilities

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::package::PackageEntry;
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// A wrapper around a ZIP archive for reading DOCX files
pub struct DocxReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> DocxReader<R> {
    /// Create a new DOCX reader from a source that implements Read + Seek
    pub fn new(reader: R) -> DocxResult<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Read every file entry in archive order
    ///
    /// Directory entries are skipped; the compression method of each entry is
    /// kept so the package can be written back the same way.
    pub fn read_entries(&mut self) -> DocxResult<Vec<PackageEntry>> {
        let mut entries = Vec::with_capacity(self.archive.len());

        for index in 0..self.archive.len() {
            let mut file = self.archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }

            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;

            entries.push(PackageEntry {
                name: file.name().to_string(),
                data,
                compression: file.compression(),
            });
        }

        Ok(entries)
    }
}

/// XML reader utilities for small DOCX parts
pub struct XmlParser;

impl XmlParser {
    /// Create a new XML reader from a string
    pub fn from_string(content: &str) -> Reader<&[u8]> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);
        reader
    }

    /// Get an attribute value from an event
    pub fn get_attribute(event: &quick_xml::events::BytesStart, name: &[u8]) -> Option<String> {
        event.attributes()
            .filter_map(|a| a.ok())
            .find(|a| a.key.as_ref() == name)
            .map(|a| String::from_utf8_lossy(&a.value).to_string())
    }

    /// Check if an element name matches with optional namespace prefix
    pub fn matches_element(name: &[u8], expected: &str) -> bool {
        let name_str = std::str::from_utf8(name).unwrap_or("");
        name_str == expected || name_str.ends_with(&format!(":{}", expected))
    }

    /// Decode a part's bytes as UTF-8, dropping a leading byte order mark
    pub fn decode_part(bytes: &[u8]) -> DocxResult<&str> {
        let text = std::str::from_utf8(bytes).map_err(DocxError::Utf8)?;
        Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
    }
}
