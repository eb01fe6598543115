//! Progress and failure reporting for walking operations
//!
//! Inventory and batch replacement contain per-document failures instead of
//! returning them. Each contained failure, and each replacement outcome, is
//! handed to a [`Reporter`] so callers decide where diagnostics go.

use std::path::Path;

use crate::error::Error;

#[derive(Debug)]
pub enum Report<'a> {
    /// An inventory node was recorded with an error.
    NodeError { path: &'a Path, message: &'a str },
    /// An entry could not be visited while listing documents.
    WalkError { path: Option<&'a Path>, message: String },
    /// At least one placeholder was rewritten in this document.
    Replaced { path: &'a Path },
    /// The document held no placeholder equal to the target.
    Unchanged { path: &'a Path },
    /// The document could not be edited; the batch continues.
    ReplaceFailed { path: &'a Path, error: &'a Error },
}

pub trait Reporter {
    fn report(&mut self, report: &Report<'_>);
}

impl<F> Reporter for F
where
    F: FnMut(&Report<'_>),
{
    fn report(&mut self, report: &Report<'_>) {
        self(report)
    }
}

/// Forwards every report to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, report: &Report<'_>) {
        match report {
            Report::NodeError { path, message } => {
                log::error!("Failed to process {}. {}", path.display(), message);
            }
            Report::WalkError {
                path: Some(path),
                message,
            } => {
                log::error!("Failed to access file: {} Error: {}", path.display(), message);
            }
            Report::WalkError { path: None, message } => {
                log::error!("Error walking file tree: {message}");
            }
            Report::Replaced { path } => log::info!("Replaced in file: {}", path.display()),
            Report::Unchanged { path } => {
                log::info!("No blocks to replace in file: {}", path.display());
            }
            Report::ReplaceFailed { path, error } => {
                log::error!("Error processing file: {}. Error message: {}", path.display(), error);
            }
        }
    }
}

/// Discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _report: &Report<'_>) {}
}
