//! Raw DOCX package
//!
//! Holds every ZIP entry of a DOCX file in archive order so that a document
//! can be saved back with all parts it never looked at (styles, media,
//! settings, custom XML) byte-for-byte intact.

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::reader::{DocxReader, XmlParser};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// One entry of the package archive
#[derive(Debug, Clone)]
pub struct PackageEntry {
    /// Part name as stored in the archive (no leading slash)
    pub name: String,
    /// Raw part content
    pub data: Vec<u8>,
    /// Compression used when the entry was read
    pub compression: CompressionMethod,
}

/// All parts of a DOCX file
#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    entries: Vec<PackageEntry>,
}

impl DocxPackage {
    /// Read a package from any seekable source
    pub fn from_reader<R: Read + Seek>(reader: R) -> DocxResult<Self> {
        let entries = DocxReader::new(reader)?.read_entries()?;
        Ok(Self { entries })
    }

    /// Read a package from an in-memory byte slice
    pub fn from_bytes(bytes: &[u8]) -> DocxResult<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Read a package from disk
    pub fn open(path: impl AsRef<Path>) -> DocxResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DocxError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                ))
            } else {
                DocxError::Io(e)
            }
        })?;

        Self::from_reader(BufReader::new(file))
    }

    /// Assemble a package from named parts, all deflate-compressed
    pub fn from_parts<I, N, D>(parts: I) -> Self
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: Into<Vec<u8>>,
    {
        let entries = parts
            .into_iter()
            .map(|(name, data)| PackageEntry {
                name: name.into(),
                data: data.into(),
                compression: CompressionMethod::Deflated,
            })
            .collect();

        Self { entries }
    }

    /// Check if this looks like a valid DOCX package
    pub fn is_valid_docx(&self) -> bool {
        self.has_part("[Content_Types].xml") && self.has_part("_rels/.rels")
    }

    /// Whether a part exists
    pub fn has_part(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Raw bytes of a part
    ///
    /// Part names are matched exactly first and then case-insensitively, as
    /// OPC part names are not case sensitive.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.find(name).map(|index| self.entries[index].data.as_slice())
    }

    /// A part decoded as UTF-8 text
    pub fn part_as_string(&self, name: &str) -> DocxResult<Option<&str>> {
        match self.part(name) {
            Some(bytes) => Ok(Some(XmlParser::decode_part(bytes)?)),
            None => Ok(None),
        }
    }

    /// Replace a part's content, or append a new part
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.find(name) {
            Some(index) => self.entries[index].data = data,
            None => self.entries.push(PackageEntry {
                name: name.to_string(),
                data,
                compression: CompressionMethod::Deflated,
            }),
        }
    }

    /// Names of all parts in archive order
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Write the package as a ZIP archive
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> DocxResult<W> {
        let mut zip = ZipWriter::new(writer);

        for entry in &self.entries {
            // Only stored and deflated entries are written back; anything
            // else found in the source is re-compressed with deflate.
            let method = match entry.compression {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let options = SimpleFileOptions::default().compression_method(method);

            zip.start_file(entry.name.as_str(), options)?;
            zip.write_all(&entry.data)?;
        }

        Ok(zip.finish()?)
    }

    /// Serialize the package to bytes
    pub fn to_bytes(&self) -> DocxResult<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write the package to disk, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> DocxResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let mut writer = self.write_to(BufWriter::new(file))?;
        writer.flush()?;
        Ok(())
    }

    fn find(&self, name: &str) -> Option<usize> {
        let name = name.trim_start_matches('/');
        self.entries
            .iter()
            .position(|entry| entry.name == name)
            .or_else(|| {
                self.entries
                    .iter()
                    .position(|entry| entry.name.eq_ignore_ascii_case(name))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> DocxPackage {
        DocxPackage::from_parts(vec![
            ("[Content_Types].xml", b"<Types/>".to_vec()),
            ("_rels/.rels", b"<Relationships/>".to_vec()),
            ("word/media/image1.png", vec![0x89, 0x50, 0x4e, 0x47]),
        ])
    }

    #[test]
    fn test_part_lookup() {
        let package = sample();
        assert!(package.is_valid_docx());
        assert_eq!(package.part("word/media/image1.png").unwrap().len(), 4);
        assert!(package.part("/WORD/MEDIA/IMAGE1.PNG").is_some());
        assert!(package.part("word/document.xml").is_none());
    }

    #[test]
    fn test_set_part_replaces_in_place() {
        let mut package = sample();
        package.set_part("_rels/.rels", b"<Relationships></Relationships>".to_vec());
        package.set_part("word/document.xml", b"<w:document/>".to_vec());

        let names: Vec<&str> = package.part_names().collect();
        assert_eq!(
            names,
            vec!["[Content_Types].xml", "_rels/.rels", "word/media/image1.png", "word/document.xml"]
        );
        assert_eq!(package.part_as_string("_rels/.rels").unwrap(), Some("<Relationships></Relationships>"));
    }

    #[test]
    fn test_bytes_roundtrip_keeps_order_and_content() {
        let package = sample();
        let bytes = package.to_bytes().unwrap();
        let reread = DocxPackage::from_bytes(&bytes).unwrap();

        let names: Vec<&str> = reread.part_names().collect();
        assert_eq!(names, vec!["[Content_Types].xml", "_rels/.rels", "word/media/image1.png"]);
        assert_eq!(reread.part("word/media/image1.png"), package.part("word/media/image1.png"));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.docx");
        sample().save(&path).unwrap();

        let reread = DocxPackage::open(&path).unwrap();
        assert!(reread.is_valid_docx());
    }

    #[test]
    fn test_open_missing_file() {
        let result = DocxPackage::open("/nonexistent/template.docx");
        assert!(matches!(result, Err(DocxError::Io(_))));
    }
}
