//! Function and method signature hygiene: parameter count and the naming
//! contract for bool-returning routines.

use std::sync::OnceLock;

use regex::Regex;

use crate::issue::Issue;
use crate::syntax::{Node, NodeKind, Param};

use super::Check;

const MAX_PARAMS: usize = 9;

/// Prefixes that already read as a yes/no question.
const BOOL_PREFIXES: &[&str] = &[
    "accepts", "allows", "applies", "are", "can", "complies", "contains", "equals", "exists",
    "expects", "expires", "has", "have", "is", "matches", "needs", "requires", "returns",
    "should", "supports", "uses", "was",
];

/// Common non-boolean prefixes with a concrete rename to suggest.
const BOOL_RENAMES: &[(&str, &str)] = &[
    ("check", "isValid"),
    ("validate", "isValid"),
    ("stop", "canStop"),
    ("fail", "shouldFail"),
    ("accept", "shouldAccept"),
    ("use", "shouldUse"),
    ("be", "shouldBe"),
    ("invoke", "canInvoke"),
];

static PREFIX_TRIM: OnceLock<Regex> = OnceLock::new();

/// Strips everything from the first upper-case letter or underscore that
/// follows a lower-case letter, leaving the leading word of a camelCase or
/// snake_case name.
fn prefix_trim() -> &'static Regex {
    PREFIX_TRIM.get_or_init(|| Regex::new("([a-z])[A-Z_].*").expect("valid regex"))
}

pub struct SignatureCheck;

impl Check for SignatureCheck {
    fn name(&self) -> &'static str {
        "signatures"
    }

    fn description(&self) -> &'static str {
        "Parameter counts and bool-return naming"
    }

    fn check(&self, node: &Node) -> Vec<Issue> {
        let (name, kind_label, params, return_type) = match &node.kind {
            NodeKind::Function {
                name,
                params,
                return_type,
                ..
            } => (name, "Function", params, return_type),
            NodeKind::Method {
                name,
                params,
                return_type,
                ..
            } => (name, "Method", params, return_type),
            _ => return Vec::new(),
        };

        let mut issues = Vec::new();
        check_param_count(name, kind_label, params, &mut issues);
        if return_type.as_deref() == Some("bool") {
            check_bool_name(name, kind_label, &mut issues);
        }
        issues
    }
}

fn check_param_count(name: &str, kind_label: &str, params: &[Param], issues: &mut Vec<Issue>) {
    if params.len() > MAX_PARAMS {
        issues.push(Issue::new(format!(
            "Reduce the parameter count of {kind_label} {name}() from {} to {MAX_PARAMS} or fewer. Long parameter lists reduce readability and increase the chance of errors.",
            params.len()
        )));
    }
}

fn check_bool_name(name: &str, kind_label: &str, issues: &mut Vec<Issue>) {
    let prefix = prefix_trim().replace(name, "$1");
    if BOOL_PREFIXES.contains(&prefix.as_ref()) {
        return;
    }

    let suggest = BOOL_RENAMES
        .iter()
        .find(|(from, _)| *from == prefix.as_ref())
        .map(|(_, to)| format!("{to}()"))
        .unwrap_or_else(|| "isX(), hasX(), etc.".to_string());

    issues.push(Issue::new(format!(
        "Rename {kind_label} {name}() to {suggest} or a similar boolean prefix (is, has, can). Methods returning bool should indicate their result via their name."
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Visibility;

    fn bool_func(name: &str) -> Node {
        Node::new(
            NodeKind::Function {
                name: name.to_string(),
                params: vec![],
                return_type: Some("bool".to_string()),
                body: vec![],
            },
            1,
        )
    }

    #[test]
    fn ten_params_is_one_too_many() {
        let params: Vec<Param> = (0..10).map(|i| Param::new(format!("p{i}"))).collect();
        let node = Node::func("configure", params, vec![], 1);
        let issues = SignatureCheck.check(&node);
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message,
            "Reduce the parameter count of Function configure() from 10 to 9 or fewer. Long parameter lists reduce readability and increase the chance of errors."
        );
    }

    #[test]
    fn nine_params_passes() {
        let params: Vec<Param> = (0..9).map(|i| Param::new(format!("p{i}"))).collect();
        let node = Node::func("configure", params, vec![], 1);
        assert!(SignatureCheck.check(&node).is_empty());
    }

    #[test]
    fn bool_return_with_is_prefix_passes() {
        assert!(SignatureCheck.check(&bool_func("isValid")).is_empty());
        assert!(SignatureCheck.check(&bool_func("hasChildren")).is_empty());
        assert!(SignatureCheck.check(&bool_func("canRetry")).is_empty());
    }

    #[test]
    fn known_prefix_gets_a_concrete_rename() {
        let issues = SignatureCheck.check(&bool_func("checkInput"));
        assert_eq!(
            issues[0].message,
            "Rename Function checkInput() to isValid() or a similar boolean prefix (is, has, can). Methods returning bool should indicate their result via their name."
        );
    }

    #[test]
    fn unknown_prefix_gets_the_generic_suggestion() {
        let issues = SignatureCheck.check(&bool_func("computeFlag"));
        assert!(issues[0].message.contains("to isX(), hasX(), etc. or a similar boolean prefix"));
    }

    #[test]
    fn snake_case_prefix_is_extracted_before_the_underscore() {
        // "validate_input" trims to "validate", which maps to isValid().
        let issues = SignatureCheck.check(&bool_func("validate_input"));
        assert!(issues[0].message.contains("to isValid()"));
    }

    #[test]
    fn non_bool_returns_are_left_alone() {
        let node = Node::func("computeTotal", vec![], vec![], 1);
        assert!(SignatureCheck.check(&node).is_empty());
    }

    #[test]
    fn methods_are_labeled_as_methods() {
        let mut node = Node::method("checkAccess", Visibility::Public, vec![], vec![], 1);
        if let NodeKind::Method { return_type, .. } = &mut node.kind {
            *return_type = Some("bool".to_string());
        }
        let issues = SignatureCheck.check(&node);
        assert!(issues[0].message.starts_with("Rename Method checkAccess()"));
    }
}
