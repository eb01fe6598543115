//! Argument validation for the command line actions
//!
//! Every check here runs before any document is opened.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::document::is_document_file;
use crate::error::{Error, Result};

/// Accepted form of an import block: `[import <name>.odt]`, no whitespace in the name.
pub const IMPORT_BLOCK_PATTERN: &str = r"^\[import\s[^\s]+?\.odt\]$";

static IMPORT_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(IMPORT_BLOCK_PATTERN).unwrap());

pub fn is_valid_import_block(block: &str) -> bool {
    IMPORT_BLOCK.is_match(block)
}

/// An existing regular file or directory.
pub fn is_valid_path(path: &Path) -> bool {
    path.is_file() || path.is_dir()
}

/// Checks the arguments of the `json` action.
pub fn validate_json_args(input: &Path, output: &Path) -> Result<()> {
    if !is_valid_path(input) {
        return Err(Error::Validation(format!(
            "Invalid path provided: {}",
            input.display()
        )));
    }

    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.is_dir() {
        return Err(Error::Validation(format!(
            "The directory does not exist: {}",
            parent.display()
        )));
    }
    Ok(())
}

/// Checks the arguments of the `replace` action.
pub fn validate_replace_args(input: &Path, old_block: &str, new_block: &str) -> Result<()> {
    if !is_valid_path(input) {
        return Err(Error::Validation(format!(
            "Invalid path provided: {}",
            input.display()
        )));
    }
    if input.is_file() && !is_document_file(input) {
        return Err(Error::Validation(format!(
            "The specified file {} is not ODT file.",
            input.display()
        )));
    }
    if !is_valid_import_block(old_block) {
        return Err(Error::Validation(format!(
            "Invalid format of 'block to replace'. Must match pattern: {IMPORT_BLOCK_PATTERN}"
        )));
    }
    if !is_valid_import_block(new_block) {
        return Err(Error::Validation(format!(
            "Invalid format of 'new block'. Must match pattern: {IMPORT_BLOCK_PATTERN}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_import_blocks() {
        assert!(is_valid_import_block("[import h.odt]"));
        assert!(is_valid_import_block("[import dir/sub-file_1.odt]"));
        assert!(is_valid_import_block("[import\tx.odt]"));
    }

    #[test]
    fn test_invalid_import_blocks() {
        for block in [
            "",
            "[import .odt]",
            "[import a b.odt]",
            "[import a.odt",
            "import a.odt]",
            "[import a.docx]",
            "[importa.odt]",
            " [import a.odt]",
            "[import a.odt] ",
            "[IMPORT a.odt]",
        ] {
            assert!(!is_valid_import_block(block), "{block:?} should be rejected");
        }
    }

    #[test]
    fn test_json_args() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.json");
        assert!(validate_json_args(dir.path(), &output).is_ok());

        let missing = dir.path().join("missing");
        let err = validate_json_args(&missing, &output).unwrap_err();
        assert!(err.to_string().starts_with("Invalid path provided"));

        let err = validate_json_args(dir.path(), &missing.join("out.json")).unwrap_err();
        assert!(err.to_string().starts_with("The directory does not exist"));
    }

    #[test]
    fn test_bare_output_name_uses_current_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_json_args(dir.path(), Path::new("out.json")).is_ok());
    }

    #[test]
    fn test_replace_args() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_replace_args(dir.path(), "[import a.odt]", "[import b.odt]").is_ok());

        let err = validate_replace_args(dir.path(), "[import a b.odt]", "[import b.odt]")
            .unwrap_err();
        assert!(err.to_string().contains("'block to replace'"));

        let err = validate_replace_args(dir.path(), "[import a.odt]", "b.odt").unwrap_err();
        assert!(err.to_string().contains("'new block'"));

        let text = dir.path().join("notes.txt");
        std::fs::write(&text, "x").unwrap();
        let err = validate_replace_args(&text, "[import a.odt]", "[import b.odt]").unwrap_err();
        assert!(err.to_string().contains("is not ODT file"));
    }
}
