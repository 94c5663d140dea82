//! Diagnostics collected during a generation run.
//!
//! Diagnostics are plain messages grouped by category. Categories are usually
//! a generator id, or `configuration` for problems found while validating
//! option values. They end up in build logs and the run report, never in the
//! generated source.

use indexmap::IndexMap;
use serde::Serialize;

/// Category used for configuration validation messages.
pub const CONFIGURATION_CATEGORY: &str = "configuration";

/// Append-only log of messages grouped by category.
///
/// Categories keep the order in which they were first used, and messages keep
/// the order in which they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: IndexMap<String, Vec<String>>,
}

impl Diagnostics {
    /// Create an empty diagnostics log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to a category, creating the category on first use.
    pub fn add(&mut self, category: impl Into<String>, message: impl Into<String>) {
        self.entries
            .entry(category.into())
            .or_default()
            .push(message.into());
    }

    /// Messages recorded for a category, in insertion order.
    pub fn get(&self, category: &str) -> &[String] {
        self.entries
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterate over categories and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(category, messages)| (category.as_str(), messages.as_slice()))
    }

    /// Categories in first-use order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Total number of messages across all categories.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Check if no message was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
