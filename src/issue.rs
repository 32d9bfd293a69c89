//! Diagnostic model shared by the traversal engine and the metric evaluator.
//!
//! Traversal rules produce plain messages; metric checks produce
//! severity-tagged messages with a remediation hint. Identity is the
//! message text plus severity, so repeated detections of the same fact
//! collapse into one issue.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Severity attached to metric threshold issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message.
///
/// `severity` is `None` for traversal rules (their messages are the whole
/// verdict) and `Some` for metric threshold results. The hint is advisory
/// and never part of the issue's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Issue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: None,
            hint: None,
        }
    }

    pub fn with_severity(
        message: impl Into<String>,
        severity: Severity,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            severity: Some(severity),
            hint: Some(hint.into()),
        }
    }
}

impl PartialEq for Issue {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message && self.severity == other.severity
    }
}

impl Eq for Issue {}

impl Hash for Issue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.message.hash(state);
        self.severity.hash(state);
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n    Action: {hint}")?;
        }
        Ok(())
    }
}

/// Deduplicating, insertion-ordered set of issues.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueSet {
    items: IndexSet<Issue>,
}

impl IssueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an issue, keeping the first occurrence on duplicates.
    /// Returns true if the issue was not already present.
    pub fn insert(&mut self, issue: Issue) -> bool {
        self.items.insert(issue)
    }

    pub fn push_message(&mut self, message: impl Into<String>) -> bool {
        self.insert(Issue::new(message))
    }

    /// Moves every issue from `other` into this set, preserving order.
    pub fn merge(&mut self, other: IssueSet) {
        for issue in other.items {
            self.items.insert(issue);
        }
    }

    pub fn contains_message(&self, message: &str) -> bool {
        self.items.iter().any(|issue| issue.message == message)
    }

    /// Keeps only the issues for which the predicate returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&Issue) -> bool) {
        self.items.retain(|issue| keep(issue));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for IssueSet {
    type Item = Issue;
    type IntoIter = indexmap::set::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<Issue> for IssueSet {
    fn from_iter<T: IntoIterator<Item = Issue>>(iter: T) -> Self {
        let mut set = Self::new();
        for issue in iter {
            set.insert(issue);
        }
        set
    }
}
