//! The `@` error-suppression operator.

use crate::issue::Issue;
use crate::syntax::{Node, NodeKind};

use super::Check;

const SUPPRESS_OPERATOR: &str = "Remove the error suppression operator \"@\". Suppressing errors hides potential bugs and prevents proper error handling.";

pub struct SuppressionCheck;

impl Check for SuppressionCheck {
    fn name(&self) -> &'static str {
        "error-suppression"
    }

    fn description(&self) -> &'static str {
        "Expressions silenced with the @ operator"
    }

    fn check(&self, node: &Node) -> Vec<Issue> {
        match node.kind {
            NodeKind::ErrorSuppress { .. } => vec![Issue::new(SUPPRESS_OPERATOR)],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppressed_expression_is_flagged() {
        let node = Node::new(
            NodeKind::ErrorSuppress {
                expr: Box::new(Node::call("unlink", vec![Node::var("path", 4)], 4)),
            },
            4,
        );
        let issues = SuppressionCheck.check(&node);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, SUPPRESS_OPERATOR);
    }

    #[test]
    fn plain_call_passes() {
        let node = Node::call("unlink", vec![], 4);
        assert!(SuppressionCheck.check(&node).is_empty());
    }
}
