//! Naming conventions: case style, name length, and suffix policies.
//!
//! Types and namespaces are expected in PascalCase, functions, methods and
//! variables in camelCase, constants in UPPER_SNAKE_CASE. Globally visible
//! names are kept between 3 and 32 characters (with `id` and `db` allowed
//! as standard short names); variables may be shorter but not longer than
//! 24. A handful of suffixes that add no information are rejected outright.
//!
//! Parameter, capture, catch-clause and `global` names live in declaration
//! metadata rather than as child nodes, so this rule reads them off the
//! owning declaration to give them the same variable treatment.

use std::sync::OnceLock;

use regex::Regex;

use crate::issue::Issue;
use crate::syntax::{Node, NodeKind};

use super::Check;

/// Magic methods are exempt from case rules.
const MAGIC_METHODS: &[&str] = &[
    "__construct",
    "__destruct",
    "__call",
    "__callStatic",
    "__get",
    "__set",
    "__isset",
    "__unset",
    "__sleep",
    "__wakeup",
    "__serialize",
    "__unserialize",
    "__toString",
    "__invoke",
    "__set_state",
    "__clone",
    "__debugInfo",
];

/// Engine-defined names exempt from case rules.
const SUPERGLOBALS: &[&str] = &[
    "GLOBALS",
    "_SERVER",
    "_GET",
    "_POST",
    "_FILES",
    "_REQUEST",
    "_SESSION",
    "_ENV",
    "_COOKIE",
    "http_response_header",
    "argc",
    "argv",
];

/// Short names that are unambiguous despite being under three characters.
const VALID_SHORT_NAMES: &[&str] = &["db", "id"];

/// Suffixes rejected on type-like names, with the reason reported.
const BAD_TYPE_SUFFIXES: &[(&str, &str)] = &[
    (
        "Abstract",
        "violates standard PHP naming conventions; use as a prefix or let the \"abstract\" keyword handle it",
    ),
    (
        "Array",
        "classes are objects, not primitives; use \"Collection\" or a domain-specific plural name instead",
    ),
    (
        "Impl",
        "is a \"Java-ism\" that adds no value; name the class after its specific strategy (e.g., \"S3Storage\" vs \"StorageImpl\")",
    ),
    (
        "Implementation",
        "is redundant when using interfaces; describe *how* it implements it (e.g., \"JsonParser\" vs \"ParserImplementation\")",
    ),
    (
        "Instance",
        "is redundant; every class is a blueprint for an instance, so the suffix provides no additional context",
    ),
    (
        "Object",
        "is redundant; in an OOP language, the fact that a class defines an object is already implied",
    ),
];

static LOWER_CAMEL_VIOLATION: OnceLock<Regex> = OnceLock::new();
static UPPER_CAMEL_VIOLATION: OnceLock<Regex> = OnceLock::new();
static UPPER_SNAKE: OnceLock<Regex> = OnceLock::new();

fn lower_camel_violation() -> &'static Regex {
    LOWER_CAMEL_VIOLATION.get_or_init(|| Regex::new("^[A-Z]|[A-Z]{2}|_").expect("valid regex"))
}

fn upper_camel_violation() -> &'static Regex {
    UPPER_CAMEL_VIOLATION.get_or_init(|| Regex::new("[A-Z]{2}|_").expect("valid regex"))
}

fn upper_snake() -> &'static Regex {
    UPPER_SNAKE.get_or_init(|| Regex::new("^[A-Z]+(_[A-Z]+)*$").expect("valid regex"))
}

pub struct NamingCheck;

impl Check for NamingCheck {
    fn name(&self) -> &'static str {
        "naming"
    }

    fn description(&self) -> &'static str {
        "Case style, length, and suffix conventions for names"
    }

    fn check(&self, node: &Node) -> Vec<Issue> {
        let mut issues = Vec::new();
        match &node.kind {
            NodeKind::Namespace { name: Some(name), .. } => {
                for part in name.split('\\') {
                    check_upper_name(part, &mut issues);
                }
                check_suffix(name, "Namespace", &mut issues);
            }
            NodeKind::TypeDecl {
                kind,
                name: Some(name),
                ..
            } => {
                check_upper_name(name, &mut issues);
                check_global_length(name, kind.label(), &mut issues);
                check_suffix(name, kind.label(), &mut issues);
            }
            NodeKind::Method { name, params, .. } => {
                check_lower_name(name, &mut issues);
                check_global_length(name, "Method", &mut issues);
                check_params(params, &mut issues);
            }
            NodeKind::Function { name, params, .. } => {
                check_lower_name(name, &mut issues);
                check_global_length(name, "Function", &mut issues);
                check_params(params, &mut issues);
            }
            NodeKind::Closure { params, uses, .. } => {
                check_params(params, &mut issues);
                for capture in uses {
                    check_variable(&capture.name, &mut issues);
                }
            }
            NodeKind::Variable { name: Some(name) } => {
                check_variable(name, &mut issues);
            }
            NodeKind::Const { name, .. } | NodeKind::ClassConst { name, .. } => {
                check_all_cap_name(name, &mut issues);
                check_global_length(name, "Constant", &mut issues);
            }
            NodeKind::TryCatch { catches, .. } => {
                for clause in catches {
                    if let Some(var) = &clause.var {
                        check_variable(var, &mut issues);
                    }
                }
            }
            NodeKind::Global { names } => {
                for name in names {
                    check_variable(name, &mut issues);
                }
            }
            _ => {}
        }
        issues
    }
}

fn is_exempt(name: &str) -> bool {
    MAGIC_METHODS.contains(&name) || SUPERGLOBALS.contains(&name)
}

fn check_variable(name: &str, issues: &mut Vec<Issue>) {
    check_lower_name(name, issues);
    check_local_length(name, "Variable", issues);
}

fn check_params(params: &[crate::syntax::Param], issues: &mut Vec<Issue>) {
    for param in params {
        check_variable(&param.name, issues);
    }
}

fn check_lower_name(name: &str, issues: &mut Vec<Issue>) {
    if !is_exempt(name) && lower_camel_violation().is_match(name) {
        issues.push(Issue::new(format!(
            "Rename '{name}' to use camelCase. Methods, functions, and variables should start with a lowercase letter."
        )));
    }
}

fn check_upper_name(name: &str, issues: &mut Vec<Issue>) {
    if !is_exempt(name) && upper_camel_violation().is_match(name) {
        issues.push(Issue::new(format!(
            "Rename '{name}' to use PascalCase. Classes, interfaces, traits, and namespaces should start with an uppercase letter."
        )));
    }
}

fn check_all_cap_name(name: &str, issues: &mut Vec<Issue>) {
    if !upper_snake().is_match(name) {
        issues.push(Issue::new(format!(
            "Rename constant '{name}' to use UPPER_SNAKE_CASE. Constants should be uppercase to distinguish them from variables."
        )));
    }
}

/// Globally visible names: classes, methods, functions, constants.
fn check_global_length(name: &str, type_label: &str, issues: &mut Vec<Issue>) {
    if name.len() > 32 {
        issues.push(Issue::new(format!(
            "Rename {type_label} '{name}' to be 32 characters or fewer. Long names harm readability."
        )));
    }
    if name.len() < 3 && !VALID_SHORT_NAMES.contains(&name) {
        issues.push(Issue::new(format!(
            "Rename {type_label} '{name}' to be at least 3 characters long. Short names are often ambiguous unless they are standard abbreviations like 'id' or 'db'."
        )));
    }
}

/// Locally visible names can be short, but still not arbitrarily long.
fn check_local_length(name: &str, type_label: &str, issues: &mut Vec<Issue>) {
    if name.len() > 24 {
        issues.push(Issue::new(format!(
            "Rename {type_label} '{name}' to be 24 characters or fewer. Long variable names can make code harder to read."
        )));
    }
}

/// Only type-like names carry suffix policies. The first matching bad
/// suffix wins; the redundant-type check applies after none matched.
fn check_suffix(name: &str, type_label: &str, issues: &mut Vec<Issue>) {
    if !matches!(type_label, "Namespace" | "Class" | "Interface" | "Trait") {
        return;
    }

    let lowered = name.to_ascii_lowercase();
    for (suffix, reason) in BAD_TYPE_SUFFIXES {
        if lowered.ends_with(&suffix.to_ascii_lowercase()) {
            issues.push(Issue::new(format!(
                "Rename {type_label} '{name}' to remove the '{suffix}' suffix. The suffix '{suffix}' {reason}."
            )));
            return;
        }
    }

    if name.ends_with(type_label) {
        issues.push(Issue::new(format!(
            "Rename {type_label} '{name}' to remove the '{type_label}' suffix. The suffix '{type_label}' is redundant."
        )));
    }
}
