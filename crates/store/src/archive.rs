//! Output archiving
//!
//! Bundles a folder of generated documents into a single ZIP file. Entries
//! are named relative to the folder, so a flat output folder produces a flat
//! archive.

use crate::{Result, StoreError};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Zip every file under `source_dir` into a new archive at `archive_path`
///
/// Returns the number of files written.
pub fn archive_directory(source_dir: impl AsRef<Path>, archive_path: impl AsRef<Path>) -> Result<usize> {
    let archive_path = archive_path.as_ref();
    let file = File::create(archive_path)?;
    let count = archive_directory_to_writer(source_dir, BufWriter::new(file))?;

    tracing::debug!("Wrote {} entries to {}", count, archive_path.display());
    Ok(count)
}

/// Zip every file under `source_dir` into the given writer
pub fn archive_directory_to_writer<W: Write + Seek>(
    source_dir: impl AsRef<Path>,
    writer: W,
) -> Result<usize> {
    let source_dir = source_dir.as_ref();

    if !source_dir.is_dir() {
        return Err(StoreError::FileNotFound(source_dir.display().to_string()));
    }

    let mut files = Vec::new();
    collect_files(source_dir, &mut files)?;
    files.sort();

    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(writer);

    for path in &files {
        let name = archive_name(source_dir, path)?;
        zip.start_file(name, options)?;
        let data = std::fs::read(path)?;
        zip.write_all(&data)?;
    }

    let mut inner = zip.finish()?;
    inner.flush()?;

    Ok(files.len())
}

/// Build an in-memory archive from named entries
pub fn archive_entries<I, N, D>(entries: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = (N, D)>,
    N: Into<String>,
    D: AsRef<[u8]>,
{
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, data) in entries {
        let name: String = name.into();
        zip.start_file(name, options)?;
        zip.write_all(data.as_ref())?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Recursively collect regular files below a directory
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else if path.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

/// Archive entry name for a file, relative to the archived folder
fn archive_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        StoreError::InvalidFormat(format!(
            "{} is outside of {}",
            path.display(),
            root.display()
        ))
    })?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    Ok(parts.join("/"))
}
