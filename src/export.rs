//! JSON export of inventory trees

use std::fs;
use std::path::Path;

use crate::document::{InventoryNode, Reporter, build_inventory};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

pub fn inventory_to_json(node: &InventoryNode, options: &ExportOptions) -> Result<String> {
    let json = if options.pretty {
        serde_json::to_string_pretty(node)?
    } else {
        serde_json::to_string(node)?
    };
    Ok(json)
}

/// Builds the inventory of `input` and writes it as JSON to `output`.
///
/// The tree is returned so callers can inspect what was written.
pub fn write_inventory_json(
    input: &Path,
    output: &Path,
    options: &ExportOptions,
    reporter: &mut dyn Reporter,
) -> Result<InventoryNode> {
    let inventory = build_inventory(input, reporter)?;
    let json = inventory_to_json(&inventory, options)?;
    fs::write(output, json)?;
    log::info!("JSON file created successfully at {}", output.display());
    Ok(inventory)
}
