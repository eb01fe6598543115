//! In-place placeholder replacement for a single document
//!
//! The archive is never mounted or patched in place. Instead the designated
//! members are rewritten in memory and a fresh archive is streamed into a
//! temporary file next to the original: untouched entries are copied raw, in
//! their original order and compression, and the temporary file is then
//! persisted over the original path. A symbolic link is resolved first so the
//! rename lands on the document it points to.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use zip::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

use super::io::{Archive, DESIGNATED_MEMBERS, check_writable, open_readable, read_member};
use super::parsing::placeholder::replace_placeholders;
use crate::error::{Error, Result};

/// Options controlling how rewritten members are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOptions {
    /// Spaces per nesting level for rewritten XML; `0` disables indentation.
    /// Non-zero values add whitespace between adjacent inline elements.
    pub xml_indent: usize,
}

impl Default for ReplaceOptions {
    fn default() -> Self {
        Self { xml_indent: 2 }
    }
}

/// Replaces every placeholder equal to `target` with `replacement`.
///
/// Returns whether any designated member was modified. Members without a
/// match keep their original bytes. When nothing matched, the archive file is
/// not rewritten at all.
pub fn replace_in_document(
    path: &Path,
    target: &str,
    replacement: &str,
    options: &ReplaceOptions,
) -> Result<bool> {
    let file = open_readable(path)?;
    let metadata = file.metadata()?;
    check_writable(path, &metadata)?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| Error::UnsupportedContainer {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut rewritten: HashMap<&'static str, Vec<u8>> = HashMap::new();
    for name in DESIGNATED_MEMBERS {
        let Some(xml) = read_member(&mut archive, path, name)? else {
            continue;
        };
        if let Some((updated, count)) =
            replace_placeholders(&xml, target, replacement, options.xml_indent)?
        {
            log::debug!(
                "Rewrote {count} placeholder(s) in {name} of {}",
                path.display()
            );
            rewritten.insert(name, updated);
        }
    }

    if rewritten.is_empty() {
        return Ok(false);
    }

    let target_path = fs::canonicalize(path)?;
    let parent = match target_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(parent)?;
    write_archive(&mut archive, &rewritten, staged.as_file_mut(), path)?;

    // Release the source handle before the rename replaces it.
    drop(archive);

    staged.as_file().sync_all()?;
    fs::set_permissions(staged.path(), metadata.permissions())?;
    staged
        .persist(&target_path)
        .map_err(|e| Error::Io(e.error))?;
    Ok(true)
}

/// Streams every entry of `archive` into `output`, substituting rewritten members.
fn write_archive(
    archive: &mut Archive,
    rewritten: &HashMap<&'static str, Vec<u8>>,
    output: &mut File,
    path: &Path,
) -> Result<()> {
    let mut writer = ZipWriter::new(output);

    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index).map_err(|e| zip_error(path, e))?;
        match rewritten.get(entry.name()) {
            Some(content) => {
                let mut options =
                    SimpleFileOptions::default().compression_method(entry.compression());
                if let Some(modified) = entry.last_modified() {
                    options = options.last_modified_time(modified);
                }
                let name = entry.name().to_string();
                drop(entry);
                writer
                    .start_file(name, options)
                    .map_err(|e| zip_error(path, e))?;
                writer.write_all(content)?;
            }
            None => writer.raw_copy_file(entry).map_err(|e| zip_error(path, e))?,
        }
    }

    writer.finish().map_err(|e| zip_error(path, e))?;
    Ok(())
}

fn zip_error(path: &Path, error: zip::result::ZipError) -> Error {
    match error {
        zip::result::ZipError::Io(e) => Error::Io(e),
        other => Error::CorruptArchive {
            path: path.to_path_buf(),
            source: other,
        },
    }
}
