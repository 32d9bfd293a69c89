//! Repeated numeric literal detection.
//!
//! Numbers are keyed by their canonical string form, so `12` and `12.0`
//! collapse into one bucket the way PHP's string cast would render them.
//! Occurrences inside `const` and class constant initializers never
//! count; a constant definition is exactly where a number belongs. Only
//! values seen more than once are reported, at scope close, with every
//! line they appeared on.
//!
//! Exemptions follow long-standing convention: 0.0 and 1.0, any
//! single-character rendering (which covers the digits 0 through 9),
//! and values whose digits are all the same (55, 777, -11) read as
//! deliberate sentinels rather than buried configuration.

use indexmap::IndexMap;

use crate::issue::IssueSet;
use crate::syntax::{Node, NodeKind};

use super::ScopeTracker;

#[derive(Default)]
struct Occurrence {
    count: u32,
    lines: Vec<u32>,
}

/// Collects numeric literals outside constant definitions and reports
/// values that recur.
#[derive(Default)]
pub struct MagicLiterals {
    const_depth: u32,
    seen: IndexMap<String, Occurrence>,
}

impl MagicLiterals {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, rendered: String, line: u32) {
        let slot = self.seen.entry(rendered).or_default();
        slot.count += 1;
        slot.lines.push(line);
    }
}

/// Whole floats render without a fractional part, matching PHP's cast.
fn render_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// True when every digit of the rendering is the same digit.
fn is_repeated_digit(rendered: &str) -> bool {
    let digits: Vec<char> = rendered.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.len() > 1 && digits.iter().all(|c| *c == digits[0])
}

fn is_exempt(rendered: &str) -> bool {
    rendered.chars().count() == 1 || is_repeated_digit(rendered)
}

impl ScopeTracker for MagicLiterals {
    fn name(&self) -> &'static str {
        "magic-literals"
    }

    fn enter(&mut self, node: &Node, _issues: &mut IssueSet) {
        match &node.kind {
            NodeKind::Const { .. } | NodeKind::ClassConst { .. } => {
                self.const_depth += 1;
            }
            NodeKind::Int { value } if self.const_depth == 0 => {
                let rendered = value.to_string();
                if !is_exempt(&rendered) {
                    self.record(rendered, node.line);
                }
            }
            NodeKind::Float { value } if self.const_depth == 0 => {
                // Strict float identity: integral 0 and 1 still fall
                // through to the single-character rule.
                if *value == 0.0 || *value == 1.0 {
                    return;
                }
                let rendered = render_float(*value);
                if !is_exempt(&rendered) {
                    self.record(rendered, node.line);
                }
            }
            _ => {}
        }
    }

    fn leave(&mut self, node: &Node, _issues: &mut IssueSet) {
        if node.is_const_definition() {
            self.const_depth = self.const_depth.saturating_sub(1);
        }
    }

    fn finish(&mut self, issues: &mut IssueSet) {
        for (value, occurrence) in &self.seen {
            if occurrence.count > 1 {
                let lines = occurrence
                    .lines
                    .iter()
                    .map(|l| l.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                issues.push_message(format!(
                    "Replace the magic number {value} with a named constant. It appears {} times on lines {lines}. Centralizing this value improves maintainability and readability.",
                    occurrence.count
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(tree: &Node) -> IssueSet {
        fn walk(tracker: &mut MagicLiterals, node: &Node, issues: &mut IssueSet) {
            tracker.enter(node, issues);
            for child in node.children() {
                walk(tracker, child, issues);
            }
            tracker.leave(node, issues);
        }
        let mut tracker = MagicLiterals::new();
        let mut issues = IssueSet::new();
        walk(&mut tracker, tree, &mut issues);
        tracker.finish(&mut issues);
        issues
    }

    #[test]
    fn repeated_number_reports_every_line() {
        let tree = Node::program(vec![
            Node::int(42, 3),
            Node::int(42, 7),
            Node::int(42, 9),
        ]);
        let issues = run(&tree);
        assert!(issues.contains_message(
            "Replace the magic number 42 with a named constant. It appears 3 times on lines 3, 7, 9. Centralizing this value improves maintainability and readability."
        ));
    }

    #[test]
    fn single_occurrence_is_silent() {
        let tree = Node::program(vec![Node::int(42, 3)]);
        assert!(run(&tree).is_empty());
    }

    #[test]
    fn negative_digit_counts_but_its_positive_twin_does_not() {
        let tree = Node::program(vec![
            Node::int(-5, 2),
            Node::int(-5, 4),
            Node::int(5, 6),
            Node::int(5, 8),
        ]);
        let issues = run(&tree);
        assert!(issues.iter().any(|i| i.message.contains("magic number -5")));
        assert!(!issues.iter().any(|i| i.message.contains("number 5 ")));
    }

    #[test]
    fn repeated_digit_values_are_exempt() {
        let tree = Node::program(vec![
            Node::int(55, 2),
            Node::int(55, 3),
            Node::int(777, 4),
            Node::int(777, 5),
            Node::int(-11, 6),
            Node::int(-11, 7),
        ]);
        assert!(run(&tree).is_empty());
    }

    #[test]
    fn constant_initializers_do_not_count() {
        let tree = Node::program(vec![
            Node::new(
                NodeKind::Const {
                    name: "LIMIT".to_string(),
                    value: Box::new(Node::int(42, 2)),
                },
                2,
            ),
            Node::int(42, 5),
        ]);
        // One exempt occurrence plus one real one: never repeated.
        assert!(run(&tree).is_empty());
    }

    #[test]
    fn float_zero_and_one_are_exempt() {
        let tree = Node::program(vec![
            Node::float(1.0, 2),
            Node::float(1.0, 3),
            Node::float(0.0, 4),
            Node::float(0.0, 5),
        ]);
        assert!(run(&tree).is_empty());
    }

    #[test]
    fn whole_floats_share_a_bucket_with_integers() {
        let tree = Node::program(vec![Node::float(12.0, 2), Node::int(12, 6)]);
        let issues = run(&tree);
        assert!(issues.iter().any(|i| i
            .message
            .starts_with("Replace the magic number 12 with a named constant. It appears 2 times on lines 2, 6.")));
    }

    #[test]
    fn fractional_values_are_reported_verbatim() {
        let tree = Node::program(vec![Node::float(0.75, 2), Node::float(0.75, 9)]);
        let issues = run(&tree);
        assert!(issues.iter().any(|i| i.message.contains("magic number 0.75")));
    }
}
