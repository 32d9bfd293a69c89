//! Member ledgers for type declarations.
//!
//! Each open type declaration gets its own ledger recording member
//! declarations and member usages by name. Nothing is judged until the
//! declaration closes, so a usage seen before its declaration (or the
//! other way round) reconciles identically. Matching is by name alone:
//! `$other->helper()` marks a same-named member used even when `$other`
//! is some other type, trading precision for never needing type inference.
//!
//! Closures do not open a ledger; member usage inside one attributes to
//! the innermost open type, which is what makes callback-heavy code keep
//! its members alive. Nested type declarations stack, so an anonymous
//! class inside a method settles its own members without disturbing the
//! enclosing type's books.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::issue::IssueSet;
use crate::syntax::{Node, NodeKind, TypeKind, Visibility};

use super::ScopeTracker;

const ANON_TYPE: &str = "<anonymous>";
const PROPERTY_AFTER_METHOD: &str =
    "Move all properties above all methods to follow standard code organization.";

#[derive(Debug, Clone, Copy)]
struct MemberDecl {
    visibility: Visibility,
    is_static: bool,
}

impl MemberDecl {
    fn static_label(&self) -> &'static str {
        if self.is_static {
            "static"
        } else {
            "non-static"
        }
    }
}

/// Books for one open type declaration.
struct MemberLedger {
    name: Option<String>,
    kind: TypeKind,
    properties: IndexMap<String, MemberDecl>,
    methods: IndexMap<String, MemberDecl>,
    used_properties: FxHashSet<String>,
    used_methods: FxHashSet<String>,
}

impl MemberLedger {
    fn open(kind: TypeKind, name: Option<String>) -> Self {
        Self {
            name,
            kind,
            properties: IndexMap::new(),
            methods: IndexMap::new(),
            used_properties: FxHashSet::default(),
            used_methods: FxHashSet::default(),
        }
    }

    fn reconcile(self, issues: &mut IssueSet) {
        for (name, decl) in &self.properties {
            let used = self.used_properties.contains(name);
            match decl.visibility {
                Visibility::Private if !used => {
                    issues.push_message(format!(
                        "Remove unused private {} property {name} to reduce dead code.",
                        decl.static_label()
                    ));
                }
                // Public state is flagged whether or not the type itself
                // reads it; outside writers are the point.
                Visibility::Public => {
                    issues.push_message(format!(
                        "Change public property {name} to private or protected to improve encapsulation."
                    ));
                }
                _ => {}
            }
        }
        check_visibility_order(&self.properties, "properties", issues);

        let type_name = self.name.as_deref().unwrap_or(ANON_TYPE);
        for (name, decl) in &self.methods {
            if decl.visibility == Visibility::Private && !self.used_methods.contains(name) {
                issues.push_message(format!(
                    "Remove unused private {} method {type_name}::{name}() to reduce dead code.",
                    decl.static_label()
                ));
            }
        }
        check_visibility_order(&self.methods, "methods", issues);
    }
}

/// Reports the first member that breaks public, protected, private order.
fn check_visibility_order(
    members: &IndexMap<String, MemberDecl>,
    plural_label: &str,
    issues: &mut IssueSet,
) {
    let mut seen_protected = false;
    let mut seen_private = false;
    for (name, decl) in members {
        match decl.visibility {
            Visibility::Public => {
                if seen_protected || seen_private {
                    issues.push_message(format!(
                        "Reorder {plural_label} to place public members first, followed by protected, then private, correcting position of {name}."
                    ));
                    return;
                }
            }
            Visibility::Protected => {
                if seen_private {
                    issues.push_message(format!(
                        "Reorder {plural_label} to place public members first, followed by protected, then private, correcting position of {name}."
                    ));
                    return;
                }
                seen_protected = true;
            }
            Visibility::Private => {
                seen_private = true;
            }
        }
    }
}

/// Tracks member declarations and usages per open type declaration.
#[derive(Default)]
pub struct MemberUsage {
    stack: Vec<MemberLedger>,
}

impl MemberUsage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScopeTracker for MemberUsage {
    fn name(&self) -> &'static str {
        "member-usage"
    }

    fn enter(&mut self, node: &Node, issues: &mut IssueSet) {
        if let NodeKind::TypeDecl { kind, name, .. } = &node.kind {
            self.stack.push(MemberLedger::open(*kind, name.clone()));
            return;
        }

        let Some(ledger) = self.stack.last_mut() else {
            return;
        };

        match &node.kind {
            NodeKind::Property {
                name,
                visibility,
                is_static,
                ..
            } => {
                if !ledger.methods.is_empty() {
                    issues.push_message(PROPERTY_AFTER_METHOD);
                }
                ledger.properties.insert(
                    name.clone(),
                    MemberDecl {
                        visibility: *visibility,
                        is_static: *is_static,
                    },
                );
            }
            NodeKind::Method {
                name,
                visibility,
                is_static,
                ..
            } => {
                // Interfaces cannot carry PHP 4 constructors.
                if ledger.kind != TypeKind::Interface {
                    if let Some(type_name) = &ledger.name {
                        if name.eq_ignore_ascii_case(type_name) {
                            issues.push_message(format!(
                                "Rename method {name}() to __construct() in class {type_name} to use modern PHP constructor syntax."
                            ));
                        }
                    }
                }
                ledger.methods.insert(
                    name.clone(),
                    MemberDecl {
                        visibility: *visibility,
                        is_static: *is_static,
                    },
                );
            }
            NodeKind::PropertyFetch {
                name: Some(name), ..
            }
            | NodeKind::StaticPropertyFetch {
                name: Some(name), ..
            } => {
                // Recorded blindly; declarations may not have been seen yet.
                ledger.used_properties.insert(name.clone());
            }
            NodeKind::MethodCall {
                name: Some(name), ..
            }
            | NodeKind::StaticCall {
                name: Some(name), ..
            } => {
                ledger.used_methods.insert(name.clone());
            }
            _ => {}
        }
    }

    fn leave(&mut self, node: &Node, issues: &mut IssueSet) {
        if node.is_type_decl() {
            if let Some(ledger) = self.stack.pop() {
                ledger.reconcile(issues);
            }
        }
    }
}
