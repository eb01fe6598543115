//! Inventory tree construction
//!
//! Walks a filesystem subtree and describes every directory and document
//! together with the placeholders found in each document. Nodes that carry no
//! information are pruned while the tree is being built: a child is only
//! attached to its parent when it survives [`InventoryNode::is_retained`].

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::io::{is_document_file, read_placeholders};
use super::models::InventoryNode;
use super::report::{Report, Reporter};
use crate::error::{Error, Result};

/// Builds the pruned inventory tree rooted at `root`.
///
/// Fails with [`Error::NotFound`] when `root` does not exist or when nothing
/// beneath it is worth reporting (no document and no error).
pub fn build_inventory(root: &Path, reporter: &mut dyn Reporter) -> Result<InventoryNode> {
    if fs::symlink_metadata(root).is_err() {
        return Err(Error::NotFound(format!(
            "The specified path {} does not exist.",
            root.display()
        )));
    }

    build_node(root, reporter).ok_or_else(|| {
        Error::NotFound(format!(
            "The specified path {} does not contain an odt file.",
            root.display()
        ))
    })
}

/// Describes one filesystem entry, or returns `None` when it is pruned.
pub fn build_node(path: &Path, reporter: &mut dyn Reporter) -> Option<InventoryNode> {
    let name = node_name(path);

    let node = match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => build_directory(path, name, reporter),
        Ok(_) if is_document_file(path) => build_document(path, name, reporter),
        Ok(_) => return None,
        Err(e) => {
            let message = format!("Failed to access {}. Error: {}", path.display(), e);
            record_error(reporter, path, InventoryNode::file(name), message)
        }
    };

    node.is_retained().then_some(node)
}

fn build_directory(path: &Path, name: String, reporter: &mut dyn Reporter) -> InventoryNode {
    let node = InventoryNode::directory(name);

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            let message = Error::AccessDenied {
                path: path.to_path_buf(),
            }
            .to_string();
            return record_error(reporter, path, node, message);
        }
        Err(e) => {
            let message = format!(
                "Failed to list contents of directory {}. Error: {}",
                path.display(),
                e
            );
            return record_error(reporter, path, node, message);
        }
    };

    let mut node = node;
    for entry in entries {
        match entry {
            Ok(entry) => {
                if let Some(child) = build_node(&entry.path(), reporter) {
                    node.children.push(child);
                }
            }
            Err(e) => {
                let message = format!(
                    "Failed to list contents of directory {}. Error: {}",
                    path.display(),
                    e
                );
                reporter.report(&Report::NodeError {
                    path,
                    message: &message,
                });
                node.error = Some(message);
            }
        }
    }

    node
}

fn build_document(path: &Path, name: String, reporter: &mut dyn Reporter) -> InventoryNode {
    let mut node = InventoryNode::file(name);
    match read_placeholders(path) {
        Ok(placeholders) => node.placeholders = placeholders,
        Err(e) => return record_error(reporter, path, node, e.to_string()),
    }
    node
}

fn record_error(
    reporter: &mut dyn Reporter,
    path: &Path,
    node: InventoryNode,
    message: String,
) -> InventoryNode {
    reporter.report(&Report::NodeError {
        path,
        message: &message,
    });
    node.with_error(message)
}

fn node_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
