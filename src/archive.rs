//! Zip-level access to the OOXML package. The pipeline reads exactly one
//! entry (`word/document.xml`) and treats everything else as opaque bytes:
//! on rewrite, untouched entries are copied raw, without recompression, so
//! they stay byte-identical in the output.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::Error;

/// A named entry to write into the rebuilt package.
pub struct Entry {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Entry {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Entry {
            name: name.into(),
            bytes,
        }
    }
}

fn open(package: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>, Error> {
    ZipArchive::new(Cursor::new(package))
        .map_err(|e| Error::Archive(format!("not a zip archive: {e}")))
}

/// Read one entry out of the package.
pub fn extract_entry(package: &[u8], entry_name: &str) -> Result<Vec<u8>, Error> {
    let mut zip = open(package)?;
    let mut entry = zip
        .by_name(entry_name)
        .map_err(|_| Error::Archive(format!("missing entry {entry_name} (is this a DOCX file?)")))?;
    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Rebuild the package with some entries replaced and some appended.
///
/// Every entry not named in `replacements` is raw-copied unchanged. Each
/// replacement must name an existing entry; `additions` must not collide with
/// existing names. Returns the complete new package or fails — no partial
/// output is ever observable.
pub fn rewrite_package(
    package: &[u8],
    replacements: &[Entry],
    additions: &[Entry],
) -> Result<Vec<u8>, Error> {
    let mut zip = open(package)?;
    let names: Vec<String> = zip.file_names().map(|n| n.to_string()).collect();

    for r in replacements {
        if !names.iter().any(|n| n == &r.name) {
            return Err(Error::Archive(format!(
                "cannot replace missing entry {}",
                r.name
            )));
        }
    }
    for a in additions {
        if names.iter().any(|n| n == &a.name) {
            return Err(Error::Archive(format!(
                "cannot add entry {}: name already taken",
                a.name
            )));
        }
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for i in 0..zip.len() {
        let entry = zip
            .by_index_raw(i)
            .map_err(|e| Error::Archive(format!("corrupt entry at index {i}: {e}")))?;
        let replacement = replacements.iter().find(|r| r.name == entry.name());
        match replacement {
            Some(r) => {
                writer
                    .start_file(r.name.as_str(), options)
                    .map_err(|e| Error::Archive(format!("cannot write {}: {e}", r.name)))?;
                writer.write_all(&r.bytes)?;
            }
            None => {
                writer
                    .raw_copy_file(entry)
                    .map_err(|e| Error::Archive(format!("cannot copy entry: {e}")))?;
            }
        }
    }

    for a in additions {
        writer
            .start_file(a.name.as_str(), options)
            .map_err(|e| Error::Archive(format!("cannot write {}: {e}", a.name)))?;
        writer.write_all(&a.bytes)?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| Error::Archive(format!("cannot finalize package: {e}")))?;
    Ok(cursor.into_inner())
}
