//! odtblocks: import placeholder inventory and replacement for .odt files
//!
//! This library finds `[import <name>.odt]` placeholders inside OpenDocument
//! text documents, rewrites them in place, and describes whole directory
//! trees of documents as JSON.

pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use document::{InventoryNode, NodeKind, ReplaceOptions, ReplaceSummary, Report, Reporter};
pub use error::{Error, ErrorKind, Result};
pub use export::{ExportOptions, write_inventory_json};
