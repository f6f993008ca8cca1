//! Recursive diff between a configuration tree and a partial update tree.
//!
//! The diff walks only the paths present in the update tree: it reports
//! what an import *touched*, not the universe of all fields. Arrays are
//! compared as opaque values, never element-wise.

use std::fmt;

use serde_json::Value;

use crate::path::get_nested;

/// How one touched path relates to the prior tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    /// The path was absent before.
    New,
    /// The path existed with a deep-unequal value.
    Updated,
    /// The path existed with an equal value.
    Unchanged,
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Updated => write!(f, "updated"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// One touched path and its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    /// Internal dot-path of the touched leaf.
    pub path: String,
    /// Relation to the prior tree.
    pub status: ChangeStatus,
}

/// Ordered list of touched paths with per-status counts.
#[derive(Debug, Clone, Default)]
pub struct ChangeReport {
    /// Entries in traversal order of the update tree.
    pub entries: Vec<ChangeEntry>,
}

impl ChangeReport {
    /// Number of touched paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the update tree touched nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths absent before the update.
    #[must_use]
    pub fn new_count(&self) -> usize {
        self.count(ChangeStatus::New)
    }

    /// Paths whose value changed.
    #[must_use]
    pub fn updated_count(&self) -> usize {
        self.count(ChangeStatus::Updated)
    }

    /// Paths touched with an identical value.
    #[must_use]
    pub fn unchanged_count(&self) -> usize {
        self.count(ChangeStatus::Unchanged)
    }

    fn count(&self, status: ChangeStatus) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.status == status)
            .count()
    }
}

/// Diff a partial update tree against the tree it is about to be applied
/// to.
#[must_use]
pub fn diff(before: &Value, after_updates: &Value) -> ChangeReport {
    let mut report = ChangeReport::default();
    if let Value::Object(map) = after_updates {
        for (key, child) in map {
            walk(before, key.clone(), child, &mut report.entries);
        }
    }
    report
}

fn walk(before: &Value, path: String, after: &Value, entries: &mut Vec<ChangeEntry>) {
    if let Value::Object(map) = after {
        for (key, child) in map {
            walk(before, format!("{path}.{key}"), child, entries);
        }
        return;
    }

    let status = match get_nested(before, &path) {
        None => ChangeStatus::New,
        Some(prior) if prior == after => ChangeStatus::Unchanged,
        Some(_) => ChangeStatus::Updated,
    };
    entries.push(ChangeEntry { path, status });
}
