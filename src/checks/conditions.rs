//! Control-flow hazards: assignments where comparisons belong, plus the
//! statement forms (`eval`, `global`, `goto`, weak includes) that reliably
//! turn into maintenance problems.

use crate::issue::Issue;
use crate::syntax::{IncludeKind, Node, NodeKind};

use super::Check;

const ASSIGNMENT_IN_CONDITION: &str =
    "Move the assignment out of the condition to avoid confusion with equality checks";
const EVAL_USAGE: &str = "Remove eval() usage to prevent code injection vulnerabilities";
const GLOBAL_KEYWORD: &str = "Remove the \"global\" keyword and pass variables as function arguments to ensure explicit dependencies";
const GOTO_USAGE: &str = "Remove goto statements and refactor control flow to improve code structure";

pub struct ConditionCheck;

impl Check for ConditionCheck {
    fn name(&self) -> &'static str {
        "conditions"
    }

    fn description(&self) -> &'static str {
        "Assignments inside conditions and unsafe statement forms"
    }

    fn check(&self, node: &Node) -> Vec<Issue> {
        let mut issues = Vec::new();
        match &node.kind {
            NodeKind::If { cond, elseifs, .. } => {
                scan_for_assignment(cond, &mut issues);
                for arm in elseifs {
                    scan_for_assignment(&arm.cond, &mut issues);
                }
            }
            NodeKind::Eval { .. } => issues.push(Issue::new(EVAL_USAGE)),
            NodeKind::Global { .. } => issues.push(Issue::new(GLOBAL_KEYWORD)),
            NodeKind::Goto { .. } => issues.push(Issue::new(GOTO_USAGE)),
            NodeKind::Include { kind, .. } if *kind != IncludeKind::RequireOnce => {
                issues.push(Issue::new(format!(
                    "Replace {} with require_once to ensure the file is loaded and halt execution on failure",
                    kind.keyword()
                )));
            }
            _ => {}
        }
        issues
    }
}

/// An assignment counts no matter how deeply it hides in the condition,
/// including inside nested calls or index expressions.
fn scan_for_assignment(node: &Node, issues: &mut Vec<Issue>) {
    if matches!(node.kind, NodeKind::Assign { .. }) {
        issues.push(Issue::new(ASSIGNMENT_IN_CONDITION));
    }
    for child in node.children() {
        scan_for_assignment(child, issues);
    }
}
