//! Duplicate keys in array literals.

use rustc_hash::FxHashSet;

use crate::issue::Issue;
use crate::syntax::{Node, NodeKind};

use super::Check;

/// Flags array literals that write the same key twice. Integer keys and
/// their decimal string forms collide, matching the runtime's key
/// coercion; computed keys cannot be compared and are skipped.
pub struct ArrayKeyCheck;

impl Check for ArrayKeyCheck {
    fn name(&self) -> &'static str {
        "array-keys"
    }

    fn description(&self) -> &'static str {
        "Array literals with duplicated keys"
    }

    fn check(&self, node: &Node) -> Vec<Issue> {
        let NodeKind::ArrayLit { items } = &node.kind else {
            return Vec::new();
        };

        let mut issues = Vec::new();
        let mut seen = FxHashSet::default();
        for item in items {
            let key = match item.key.as_ref().map(|k| &k.kind) {
                Some(NodeKind::Str { value }) => value.clone(),
                Some(NodeKind::Int { value }) => value.to_string(),
                _ => continue,
            };
            if !seen.insert(key.clone()) {
                issues.push(Issue::new(format!("Duplicated key in array: {key}")));
            }
        }
        issues
    }
}
