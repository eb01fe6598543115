//! Container I/O and validation
//!
//! This module opens .odt archives, reads the designated XML members and
//! classifies archive failures.

use std::fs::{File, Metadata, OpenOptions};
use std::io::{self, BufReader, ErrorKind, Read};
use std::path::Path;

use zip::ZipArchive;
use zip::result::ZipError;

use super::parsing::placeholder::extract_placeholders;
use crate::error::{Error, Result};

/// Extension of the documents this crate handles, including the dot.
pub const DOCUMENT_EXTENSION: &str = ".odt";

/// Members inspected for placeholders, in processing order: body, then styling.
pub const DESIGNATED_MEMBERS: [&str; 2] = ["content.xml", "styles.xml"];

pub(crate) type Archive = ZipArchive<BufReader<File>>;

/// Upper bound on the buffer reserved from a member's declared size.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// Whether a file name carries the document extension (case-insensitive).
pub fn is_document_name(name: &str) -> bool {
    name.to_lowercase().ends_with(DOCUMENT_EXTENSION)
}

pub fn is_document_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| is_document_name(&name.to_string_lossy()))
        .unwrap_or(false)
}

/// Opens a file for reading, mapping permission failures to [`Error::AccessDenied`].
pub(crate) fn open_readable(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| open_error(path, e))
}

/// Fails unless the file at `path` may be modified in place.
pub(crate) fn check_writable(path: &Path, metadata: &Metadata) -> Result<()> {
    if metadata.permissions().readonly() {
        return Err(Error::NotWritable {
            path: path.to_path_buf(),
        });
    }
    OpenOptions::new()
        .write(true)
        .open(path)
        .map(drop)
        .map_err(|e| match open_error(path, e) {
            Error::AccessDenied { path } => Error::NotWritable { path },
            other => other,
        })
}

fn open_error(path: &Path, error: io::Error) -> Error {
    match error.kind() {
        ErrorKind::PermissionDenied => Error::AccessDenied {
            path: path.to_path_buf(),
        },
        _ => Error::Io(error),
    }
}

/// Reads a designated member, returning `None` when the archive lacks it.
pub(crate) fn read_member(
    archive: &mut Archive,
    path: &Path,
    name: &str,
) -> Result<Option<Vec<u8>>> {
    let mut member = match archive.by_name(name) {
        Ok(member) => member,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(archive_error(path, e)),
    };

    // The declared size comes from the archive header and is not trusted.
    let capacity = member.size().min(MAX_PREALLOCATION) as usize;
    let mut content = Vec::with_capacity(capacity);
    member.read_to_end(&mut content)?;
    Ok(Some(content))
}

fn archive_error(path: &Path, error: ZipError) -> Error {
    match error {
        ZipError::Io(e) => Error::Io(e),
        other => Error::CorruptArchive {
            path: path.to_path_buf(),
            source: other,
        },
    }
}

/// Returns the distinct placeholders of one document, in first-seen order.
///
/// A document without designated members or without placeholders yields an
/// empty list. The archive is closed before returning on every path.
pub fn read_placeholders(path: &Path) -> Result<Vec<String>> {
    let file = open_readable(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| archive_error(path, e))?;

    let mut placeholders = Vec::new();
    for name in DESIGNATED_MEMBERS {
        if let Some(xml) = read_member(&mut archive, path, name)? {
            placeholders.extend(extract_placeholders(&xml)?);
        }
    }

    Ok(distinct(placeholders))
}

/// Whether the document contains `token` as one of its placeholders.
pub fn contains_placeholder(path: &Path, token: &str) -> Result<bool> {
    Ok(read_placeholders(path)?.iter().any(|p| p == token))
}

fn distinct(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
