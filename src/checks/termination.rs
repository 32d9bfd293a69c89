//! `exit`/`die` inside type or function bodies.
//!
//! Terminating the whole process from library code denies callers any
//! chance to handle the failure. At the top level of a script the same
//! expression is a legitimate way to end the program, so this rule is
//! scope-gated and only runs while the walk is inside a local scope.

use crate::issue::Issue;
use crate::syntax::{Node, NodeKind};

use super::Check;

pub struct TerminationCheck;

impl Check for TerminationCheck {
    fn name(&self) -> &'static str {
        "termination"
    }

    fn description(&self) -> &'static str {
        "exit/die expressions in local scope"
    }

    fn local_only(&self) -> bool {
        true
    }

    fn check(&self, node: &Node) -> Vec<Issue> {
        let NodeKind::Exit { kind, .. } = &node.kind else {
            return Vec::new();
        };
        vec![Issue::new(format!(
            "Replace the '{}' expression with an exception throw to allow proper error handling.",
            kind.keyword()
        ))]
    }
}
