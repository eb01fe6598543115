//! Document inventory and placeholder editing
//!
//! This module opens .odt containers, extracts and rewrites import
//! placeholders, and walks directory trees of documents.

pub mod batch;
pub mod editor;
pub mod inventory;
pub mod io;
pub mod models;
pub(crate) mod parsing;
pub mod report;

pub use batch::{collect_placeholders, list_documents, replace_in_path};
pub use editor::{ReplaceOptions, replace_in_document};
pub use inventory::{build_inventory, build_node};
pub use io::{
    DESIGNATED_MEMBERS, DOCUMENT_EXTENSION, contains_placeholder, is_document_file,
    is_document_name, read_placeholders,
};
pub use models::*;
pub use parsing::placeholder::{extract_placeholders, replace_placeholders};
pub use report::{LogReporter, NullReporter, Report, Reporter};
