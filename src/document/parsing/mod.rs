//! Document parsing utilities
//!
//! This module contains the XML-level logic for finding and rewriting
//! import placeholders inside a single document member.

pub(crate) mod placeholder;
