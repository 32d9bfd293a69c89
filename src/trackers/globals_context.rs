//! Superglobal access policy.
//!
//! PHP's request superglobals are fine at the top of a script and
//! inside HTTP-edge classes, and a smell everywhere else. This tracker
//! keeps a stack of open class names plus a function nesting depth and
//! reports each offending access as soon as it is seen. Which class
//! names count as the HTTP edge comes from configuration; the defaults
//! are the conventional `Controller` and `Middleware` suffixes.
//!
//! Only `class` declarations join the stack. A trait or interface body
//! never grants access, so a trait method reaching for `$_GET` reads
//! as plain function scope.

use crate::issue::IssueSet;
use crate::syntax::{Node, NodeKind, TypeKind};

use super::ScopeTracker;

const SUPERGLOBALS: [&str; 8] = [
    "_GET", "_POST", "_SESSION", "_COOKIE", "_FILES", "_SERVER", "_ENV", "_REQUEST",
];

const ANON_CLASS: &str = "Anonymous";

/// Flags superglobal reads outside the global scope and outside classes
/// whose names carry an allowed suffix.
pub struct GlobalsContext {
    allowed_suffixes: Vec<String>,
    class_stack: Vec<String>,
    function_depth: u32,
}

impl GlobalsContext {
    pub fn new(allowed_suffixes: &[String]) -> Self {
        Self {
            allowed_suffixes: allowed_suffixes.to_vec(),
            class_stack: Vec::new(),
            function_depth: 0,
        }
    }

    fn is_allowed(&self) -> bool {
        if let Some(class) = self.class_stack.last() {
            return self
                .allowed_suffixes
                .iter()
                .any(|suffix| class.ends_with(suffix.as_str()));
        }
        self.function_depth == 0
    }

    fn context(&self) -> String {
        if let Some(class) = self.class_stack.last() {
            format!("class {class}")
        } else if self.function_depth > 0 {
            "function scope".to_string()
        } else {
            "global scope".to_string()
        }
    }
}

impl ScopeTracker for GlobalsContext {
    fn name(&self) -> &'static str {
        "globals-context"
    }

    fn enter(&mut self, node: &Node, issues: &mut IssueSet) {
        match &node.kind {
            NodeKind::TypeDecl {
                kind: TypeKind::Class,
                name,
                ..
            } => {
                self.class_stack
                    .push(name.clone().unwrap_or_else(|| ANON_CLASS.to_string()));
            }
            NodeKind::Variable { name: Some(name) }
                if SUPERGLOBALS.contains(&name.as_str()) =>
            {
                if !self.is_allowed() {
                    let suffixes = self.allowed_suffixes.join(" or ");
                    issues.push_message(format!(
                        "Move superglobal ${name} access out of {}. Superglobals should only be accessed in the global scope or within classes ending in {suffixes} to ensure proper encapsulation.",
                        self.context()
                    ));
                }
            }
            _ => {
                if node.is_function_like() {
                    self.function_depth += 1;
                }
            }
        }
    }

    fn leave(&mut self, node: &Node, _issues: &mut IssueSet) {
        match &node.kind {
            NodeKind::TypeDecl {
                kind: TypeKind::Class,
                ..
            } => {
                self.class_stack.pop();
            }
            _ => {
                if node.is_function_like() {
                    self.function_depth = self.function_depth.saturating_sub(1);
                }
            }
        }
    }
}
