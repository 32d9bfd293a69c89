//! Single-pass traversal driver.
//!
//! Each unit's tree is walked exactly once, depth first. On the way in
//! a node may open a scope frame, every stateless rule inspects it, and
//! every tracker records what it needs; on the way out trackers settle
//! their books and the frame is popped with its kind validated. Scope
//! state belongs to the walk, never to the rules, so the same rule set
//! serves any number of units concurrently.
//!
//! A batch run hands units to rayon; each gets fresh tracker state and
//! its own issue set, so one malformed tree fails alone.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::checks::{self, Check};
use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};
use crate::issue::IssueSet;
use crate::syntax::{Node, NodeKind};
use crate::trackers::{GlobalsContext, MagicLiterals, MemberUsage, ScopeTracker, VariableUsage};

/// Lexical region a stack frame represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Namespace,
    Type,
    Function,
    Closure,
}

impl ScopeKind {
    fn of(node: &Node) -> Option<ScopeKind> {
        match &node.kind {
            NodeKind::Namespace { .. } => Some(ScopeKind::Namespace),
            NodeKind::TypeDecl { .. } => Some(ScopeKind::Type),
            NodeKind::Function { .. } | NodeKind::Method { .. } => Some(ScopeKind::Function),
            NodeKind::Closure { .. } => Some(ScopeKind::Closure),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct ScopeFrame {
    kind: ScopeKind,
    name: Option<String>,
}

impl ScopeFrame {
    fn open(node: &Node) -> Option<ScopeFrame> {
        let kind = ScopeKind::of(node)?;
        let name = match &node.kind {
            NodeKind::Namespace { name, .. } | NodeKind::TypeDecl { name, .. } => name.clone(),
            NodeKind::Function { name, .. } | NodeKind::Method { name, .. } => Some(name.clone()),
            _ => None,
        };
        Some(ScopeFrame { kind, name })
    }
}

/// Walk state for one unit: the scope stack, per-unit tracker books,
/// and the accumulating issue set.
struct UnitWalk<'a> {
    unit: &'a str,
    frames: Vec<ScopeFrame>,
    trackers: Vec<Box<dyn ScopeTracker>>,
    issues: IssueSet,
}

impl<'a> UnitWalk<'a> {
    fn new(unit: &'a str, config: &AnalyzerConfig) -> Self {
        let trackers: Vec<Box<dyn ScopeTracker>> = vec![
            Box::new(MemberUsage::new()),
            Box::new(VariableUsage::new()),
            Box::new(MagicLiterals::new()),
            Box::new(GlobalsContext::new(&config.global_access_suffixes)),
        ];
        Self {
            unit,
            frames: Vec::new(),
            trackers,
            issues: IssueSet::new(),
        }
    }

    /// A namespace body is still global; anything else on the stack
    /// makes the current position local.
    fn in_local_scope(&self) -> bool {
        self.frames.iter().any(|f| f.kind != ScopeKind::Namespace)
    }

    fn visit(&mut self, node: &Node, checks: &[Box<dyn Check>]) -> Result<()> {
        self.enter(node, checks);
        for child in node.children() {
            self.visit(child, checks)?;
        }
        self.leave(node)
    }

    fn enter(&mut self, node: &Node, checks: &[Box<dyn Check>]) {
        if let Some(frame) = ScopeFrame::open(node) {
            debug!(unit = self.unit, scope = ?frame.kind, name = ?frame.name, "scope opened");
            self.frames.push(frame);
        }
        let local = self.in_local_scope();
        for check in checks {
            if check.local_only() && !local {
                continue;
            }
            for issue in check.check(node) {
                self.issues.insert(issue);
            }
        }
        for tracker in self.trackers.iter_mut() {
            tracker.enter(node, &mut self.issues);
        }
    }

    fn leave(&mut self, node: &Node) -> Result<()> {
        for tracker in self.trackers.iter_mut() {
            tracker.leave(node, &mut self.issues);
        }
        if let Some(kind) = ScopeKind::of(node) {
            match self.frames.pop() {
                Some(frame) if frame.kind == kind => {}
                Some(frame) => {
                    return Err(self.imbalance(format!(
                        "closing {kind:?} but innermost open scope is {:?}",
                        frame.kind
                    )));
                }
                None => {
                    return Err(self.imbalance(format!("closing {kind:?} with no scope open")));
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        for tracker in self.trackers.iter_mut() {
            debug!(unit = self.unit, tracker = tracker.name(), "settling tracker");
            tracker.finish(&mut self.issues);
        }
        if !self.frames.is_empty() {
            let open: Vec<String> = self
                .frames
                .iter()
                .map(|f| format!("{:?}", f.kind))
                .collect();
            return Err(self.imbalance(format!(
                "unit ended with open scopes: {}",
                open.join(", ")
            )));
        }
        Ok(())
    }

    fn imbalance(&self, context: String) -> AnalyzerError {
        AnalyzerError::ScopeImbalance {
            unit: self.unit.to_string(),
            context,
        }
    }
}

/// Outcome for one unit in a batch run.
#[derive(Debug)]
pub struct UnitReport {
    pub unit: String,
    pub result: Result<IssueSet>,
}

/// Composes the rule registry once and drives one walk per unit.
///
/// Rules are stateless and shared; tracker books live in the walk. One
/// analyzer therefore serves any number of units, sequentially or in
/// parallel, and repeated analysis of the same tree yields the same set.
pub struct Analyzer {
    config: AnalyzerConfig,
    checks: Vec<Box<dyn Check>>,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let checks = checks::build_registry(&config);
        Self { config, checks }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Rule names and descriptions, in registry order.
    pub fn rules(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.checks
            .iter()
            .map(|check| (check.name(), check.description()))
    }

    /// Analyzes one unit's tree and returns its reconciled issue set.
    pub fn analyze_unit(&self, unit: &str, tree: &Node) -> Result<IssueSet> {
        let mut walk = UnitWalk::new(unit, &self.config);
        walk.visit(tree, &self.checks)?;
        walk.finish()?;
        let mut issues = walk.issues;
        issues.retain(|issue| !self.config.is_suppressed(&issue.message));
        debug!(unit, issues = issues.len(), "unit analyzed");
        Ok(issues)
    }

    /// Analyzes a batch of units in parallel. Report order matches input
    /// order; a failed unit carries its error without affecting the rest.
    pub fn analyze_units(&self, units: &[(String, Node)]) -> Vec<UnitReport> {
        info!(units = units.len(), "starting analysis");
        units
            .par_iter()
            .map(|(unit, tree)| {
                let result = self.analyze_unit(unit, tree);
                if let Err(error) = &result {
                    warn!(unit = %unit, error = %error, "unit analysis failed");
                }
                UnitReport {
                    unit: unit.clone(),
                    result,
                }
            })
            .collect()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{ExitKind, Param, Visibility};

    fn exit_node(line: u32) -> Node {
        Node::new(
            NodeKind::Exit {
                kind: ExitKind::Exit,
                expr: None,
            },
            line,
        )
    }

    fn eval_node(line: u32) -> Node {
        Node::new(
            NodeKind::Eval {
                expr: Box::new(Node::string("code", line)),
            },
            line,
        )
    }

    fn analyze(tree: &Node) -> IssueSet {
        Analyzer::default().analyze_unit("unit.php", tree).unwrap()
    }

    #[test]
    fn stateless_and_stateful_rules_compose() {
        let class = Node::class(
            "Cart",
            vec![Node::property("total", Visibility::Private, 2)],
            1,
        );
        let func = Node::func("halt", vec![Param::new("code")], vec![exit_node(6)], 5);
        let issues = analyze(&Node::program(vec![class, func]));
        assert!(issues.contains_message(
            "Remove unused private non-static property total to reduce dead code."
        ));
        assert!(issues.contains_message(
            "Remove unused parameter \"code\" from function \"halt()\"; it is defined but not used in the function body."
        ));
        assert!(issues.contains_message(
            "Replace the 'exit' expression with an exception throw to allow proper error handling."
        ));
    }

    #[test]
    fn exit_at_the_top_level_is_allowed() {
        let issues = analyze(&Node::program(vec![exit_node(1)]));
        assert!(!issues.iter().any(|i| i.message.contains("exception throw")));
    }

    #[test]
    fn namespace_body_still_counts_as_global() {
        let ns = Node::new(
            NodeKind::Namespace {
                name: Some("App".to_string()),
                body: vec![exit_node(3)],
            },
            2,
        );
        let issues = analyze(&Node::program(vec![ns]));
        assert!(!issues.iter().any(|i| i.message.contains("exception throw")));
    }

    #[test]
    fn exit_inside_a_function_is_flagged() {
        let func = Node::func("halt", vec![], vec![exit_node(2)], 1);
        let issues = analyze(&Node::program(vec![func]));
        assert!(issues.contains_message(
            "Replace the 'exit' expression with an exception throw to allow proper error handling."
        ));
    }

    #[test]
    fn repeated_findings_collapse_into_one_issue() {
        let issues = analyze(&Node::program(vec![eval_node(1), eval_node(9)]));
        let matches = issues
            .iter()
            .filter(|i| i.message.contains("eval()"))
            .count();
        assert_eq!(matches, 1);
    }

    #[test]
    fn analyzer_is_reusable_across_units() {
        let analyzer = Analyzer::default();
        let tree = Node::program(vec![eval_node(1)]);
        let first = analyzer.analyze_unit("a.php", &tree).unwrap();
        let second = analyzer.analyze_unit("a.php", &tree).unwrap();
        assert_eq!(first.len(), second.len());
        // A clean unit right after a dirty one picks up nothing.
        let clean = analyzer
            .analyze_unit("b.php", &Node::program(vec![]))
            .unwrap();
        assert!(clean.is_empty());
    }

    #[test]
    fn suppressed_messages_never_surface() {
        let config = AnalyzerConfig {
            suppress: vec![
                "Remove eval() usage to prevent code injection vulnerabilities".to_string(),
            ],
            ..AnalyzerConfig::default()
        };
        let analyzer = Analyzer::new(config);
        let issues = analyzer
            .analyze_unit("a.php", &Node::program(vec![eval_node(1)]))
            .unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn batch_reports_keep_input_order() {
        let units = vec![
            ("dirty.php".to_string(), Node::program(vec![eval_node(1)])),
            ("clean.php".to_string(), Node::program(vec![])),
        ];
        let reports = Analyzer::default().analyze_units(&units);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].unit, "dirty.php");
        assert_eq!(reports[1].unit, "clean.php");
        assert!(!reports[0].result.as_ref().unwrap().is_empty());
        assert!(reports[1].result.as_ref().unwrap().is_empty());
    }

    #[test]
    fn unbalanced_leave_reports_scope_imbalance() {
        let config = AnalyzerConfig::default();
        let mut walk = UnitWalk::new("broken.php", &config);
        let err = walk
            .leave(&Node::class("Orphan", vec![], 1))
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::ScopeImbalance { .. }));
        assert!(err.to_string().contains("broken.php"));
    }

    #[test]
    fn rule_registry_is_exposed_in_order() {
        let analyzer = Analyzer::default();
        let names: Vec<_> = analyzer.rules().map(|(name, _)| name).collect();
        assert_eq!(names.len(), 9);
        assert!(names.contains(&"conditions"));
        assert!(names.contains(&"termination"));
    }
}
