//! Variable reference counts per function-like scope.
//!
//! Every function, method, and closure gets a ledger; references are
//! tallied per name and judged when the scope closes. Parameters are
//! recorded from the signature but not counted as references, so a
//! parameter nothing in the body touches reconciles to zero and is
//! reported. `$this` is never tallied.
//!
//! A property fetch receiver is not a standalone reference. The walk
//! visits `PropertyFetch` before its target, so entering one arms a
//! one-shot flag that swallows the very next variable. Method call
//! receivers are left alone; holding an object to call through it is a
//! real use.

use std::mem;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::issue::IssueSet;
use crate::syntax::{Node, NodeKind, Param};

use super::ScopeTracker;

const CLOSURE_NAME: &str = "{closure}";

struct VarLedger {
    function_name: String,
    is_abstract: bool,
    /// Parameter names with their constructor-promotion flag, in
    /// declaration order.
    params: IndexMap<String, bool>,
    /// Names brought in through a closure `use` clause.
    captures: FxHashSet<String>,
    counts: IndexMap<String, u32>,
}

impl VarLedger {
    fn open(function_name: String, is_abstract: bool, params: &[Param]) -> Self {
        Self {
            function_name,
            is_abstract,
            params: params
                .iter()
                .map(|p| (p.name.clone(), p.promoted))
                .collect(),
            captures: FxHashSet::default(),
            counts: IndexMap::new(),
        }
    }

    fn tally(&mut self, name: &str) {
        *self.counts.entry(name.to_string()).or_insert(0) += 1;
    }

    fn reconcile(self, issues: &mut IssueSet) {
        let f = &self.function_name;
        if !self.is_abstract {
            for (param, promoted) in &self.params {
                // Promoted parameters declare a property; "unused" in the
                // body is their normal state.
                if !promoted && !self.counts.contains_key(param) {
                    issues.push_message(format!(
                        "Remove unused parameter \"{param}\" from function \"{f}()\"; it is defined but not used in the function body."
                    ));
                }
            }
        }
        for (name, count) in &self.counts {
            if *count == 1
                && !self.params.contains_key(name)
                && !self.captures.contains(name)
            {
                issues.push_message(format!(
                    "Remove or inline variable \"{name}\" in function \"{f}()\"; it is referenced only once."
                ));
            }
        }
    }
}

/// Counts variable references per function-like scope and reports
/// unused parameters and single-reference locals.
#[derive(Default)]
pub struct VariableUsage {
    stack: Vec<VarLedger>,
    receiver_pending: bool,
}

impl VariableUsage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScopeTracker for VariableUsage {
    fn name(&self) -> &'static str {
        "variable-usage"
    }

    fn enter(&mut self, node: &Node, _issues: &mut IssueSet) {
        let pending = mem::take(&mut self.receiver_pending);

        match &node.kind {
            NodeKind::Function { name, params, .. } => {
                self.stack.push(VarLedger::open(name.clone(), false, params));
            }
            NodeKind::Method {
                name,
                is_abstract,
                params,
                body,
                ..
            } => {
                self.stack.push(VarLedger::open(
                    name.clone(),
                    *is_abstract || body.is_none(),
                    params,
                ));
            }
            NodeKind::Closure { params, uses, .. } => {
                // Each capture is one reference in the scope it is taken
                // from; inside the closure the name is exempt.
                if let Some(enclosing) = self.stack.last_mut() {
                    for u in uses {
                        enclosing.tally(&u.name);
                    }
                }
                let mut ledger = VarLedger::open(CLOSURE_NAME.to_string(), false, params);
                ledger.captures = uses.iter().map(|u| u.name.clone()).collect();
                self.stack.push(ledger);
            }
            NodeKind::Variable { name: Some(name) } => {
                if !pending && name != "this" {
                    if let Some(ledger) = self.stack.last_mut() {
                        ledger.tally(name);
                    }
                }
            }
            NodeKind::PropertyFetch { target, .. } => {
                if matches!(target.kind, NodeKind::Variable { .. }) {
                    self.receiver_pending = true;
                }
            }
            NodeKind::TryCatch { catches, .. } => {
                // The catch binder is a reference; a body that never reads
                // it reconciles to a single-use report.
                if let Some(ledger) = self.stack.last_mut() {
                    for clause in catches {
                        if let Some(var) = &clause.var {
                            ledger.tally(var);
                        }
                    }
                }
            }
            NodeKind::Global { names } => {
                if let Some(ledger) = self.stack.last_mut() {
                    for name in names {
                        ledger.tally(name);
                    }
                }
            }
            _ => {}
        }
    }

    fn leave(&mut self, node: &Node, issues: &mut IssueSet) {
        if node.is_function_like() {
            if let Some(ledger) = self.stack.pop() {
                ledger.reconcile(issues);
            }
        }
    }
}
