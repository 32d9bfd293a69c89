//! Calls to debug-output functions that must not reach production.

use crate::issue::Issue;
use crate::syntax::{Node, NodeKind};

use super::Check;

/// Flags calls to any function on the configured debug list. Matching is
/// case-insensitive, but the reported message keeps the spelling as written.
pub struct DebugCallCheck {
    functions: Vec<String>,
}

impl DebugCallCheck {
    pub fn new(functions: &[String]) -> Self {
        Self {
            functions: functions.iter().map(|f| f.to_lowercase()).collect(),
        }
    }
}

impl Check for DebugCallCheck {
    fn name(&self) -> &'static str {
        "debug-calls"
    }

    fn description(&self) -> &'static str {
        "Debug output functions left in the code"
    }

    fn check(&self, node: &Node) -> Vec<Issue> {
        let NodeKind::FuncCall { name: Some(name), .. } = &node.kind else {
            return Vec::new();
        };
        if !self.functions.iter().any(|f| f == &name.to_lowercase()) {
            return Vec::new();
        }
        vec![Issue::new(format!(
            "Remove call to debug function '{name}' to prevent information leakage in production."
        ))]
    }
}
