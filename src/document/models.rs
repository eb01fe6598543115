//! Core data structures for inventory trees and replacement outcomes
//!
//! This module defines the public types produced by the inventory walk and the
//! batch replacement, including their JSON shape.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::io::is_document_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

/// One filesystem entry in the inventory tree.
///
/// Absent collections and errors are omitted from the JSON form rather than
/// written as `null` or `[]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub placeholders: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<InventoryNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InventoryNode {
    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Directory)
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::File)
    }

    fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            placeholders: Vec::new(),
            children: Vec::new(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Whether this node survives pruning.
    ///
    /// Directories need at least one retained child, document files are always
    /// kept, and any node carrying an error is kept.
    pub fn is_retained(&self) -> bool {
        (self.is_directory() && !self.children.is_empty())
            || (self.is_file() && is_document_name(&self.name))
            || self.error.is_some()
    }
}

/// Result of a batch placeholder replacement.
#[must_use = "the summary records which documents failed"]
#[derive(Debug, Clone, Default)]
pub struct ReplaceSummary {
    /// Documents where at least one placeholder was rewritten.
    pub replaced: Vec<PathBuf>,
    /// Documents that did not contain the target placeholder.
    pub unchanged: Vec<PathBuf>,
    /// Documents that could not be processed, with the failure message.
    pub failed: Vec<(PathBuf, String)>,
}

impl ReplaceSummary {
    pub fn total(&self) -> usize {
        self.replaced.len() + self.unchanged.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
