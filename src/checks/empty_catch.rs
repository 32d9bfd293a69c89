//! Catch blocks that swallow exceptions without a trace.

use crate::issue::Issue;
use crate::syntax::{Node, NodeKind};

use super::Check;

const EMPTY_CATCH: &str = "Add error handling or logging to the empty catch block. Suppressing exceptions hides bugs and makes debugging difficult.";

pub struct EmptyCatchCheck;

impl Check for EmptyCatchCheck {
    fn name(&self) -> &'static str {
        "empty-catch"
    }

    fn description(&self) -> &'static str {
        "Catch clauses with no body"
    }

    fn check(&self, node: &Node) -> Vec<Issue> {
        let NodeKind::TryCatch { catches, .. } = &node.kind else {
            return Vec::new();
        };
        catches
            .iter()
            .filter(|clause| clause.body.is_empty())
            .map(|_| Issue::new(EMPTY_CATCH))
            .collect()
    }
}
