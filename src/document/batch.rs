//! Operations over every document beneath a path
//!
//! Documents are processed one after another. A failure on one document is
//! reported and recorded, never allowed to stop the rest of the batch.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::editor::{ReplaceOptions, replace_in_document};
use super::io::{is_document_file, read_placeholders};
use super::models::ReplaceSummary;
use super::report::{Report, Reporter};
use crate::error::{Error, Result};

/// Recursively lists every document beneath `root`, sorted by path.
///
/// `root` may itself be a document. Symbolic links are followed, so a linked
/// document is listed under its link path. Entries that cannot be visited,
/// including dangling links and link loops, are reported and skipped.
pub fn list_documents(root: &Path, reporter: &mut dyn Reporter) -> Vec<PathBuf> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        match entry {
            Ok(entry) if entry.file_type().is_file() && is_document_file(entry.path()) => {
                documents.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => reporter.report(&Report::WalkError {
                path: e.path(),
                message: e.to_string(),
            }),
        }
    }

    documents.sort();
    documents
}

/// Placeholders of every document beneath `root`, concatenated in listing order.
///
/// Each document contributes its distinct placeholders; documents that fail
/// to read contribute nothing.
pub fn collect_placeholders(root: &Path, reporter: &mut dyn Reporter) -> Vec<String> {
    let mut placeholders = Vec::new();

    for path in list_documents(root, reporter) {
        match read_placeholders(&path) {
            Ok(found) => placeholders.extend(found),
            Err(e) => {
                let message = e.to_string();
                reporter.report(&Report::NodeError {
                    path: &path,
                    message: &message,
                });
            }
        }
    }

    placeholders
}

/// Replaces `target` with `replacement` in every document beneath `root`.
pub fn replace_in_path(
    root: &Path,
    target: &str,
    replacement: &str,
    options: &ReplaceOptions,
    reporter: &mut dyn Reporter,
) -> Result<ReplaceSummary> {
    if !root.exists() {
        return Err(Error::NotFound(format!(
            "The specified path {} does not exist.",
            root.display()
        )));
    }
    if root.is_file() && !is_document_file(root) {
        return Err(Error::Validation(format!(
            "The specified file {} is not ODT file.",
            root.display()
        )));
    }

    let documents = list_documents(root, reporter);
    if documents.is_empty() {
        return Err(Error::NotFound(format!(
            "The specified path {} does not contain ODT files.",
            root.display()
        )));
    }

    let mut summary = ReplaceSummary::default();
    for path in documents {
        match replace_in_document(&path, target, replacement, options) {
            Ok(true) => {
                reporter.report(&Report::Replaced { path: &path });
                summary.replaced.push(path);
            }
            Ok(false) => {
                reporter.report(&Report::Unchanged { path: &path });
                summary.unchanged.push(path);
            }
            Err(error) => {
                reporter.report(&Report::ReplaceFailed {
                    path: &path,
                    error: &error,
                });
                summary.failed.push((path, error.to_string()));
            }
        }
    }

    Ok(summary)
}
