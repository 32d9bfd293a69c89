//! PHPDoc tag placement and validity.
//!
//! Tags carry meaning for documentation tooling only when they appear in a
//! `/** */` docblock. A known tag in a line or block comment is lost to the
//! tooling; an unknown tag in a docblock is usually a typo.

use std::sync::OnceLock;

use regex::Regex;

use crate::issue::Issue;
use crate::syntax::{CommentKind, Node};

use super::Check;

/// The standard PHPDoc tag set, lowercase.
const PHPDOC_TAGS: &[&str] = &[
    "@api",
    "@author",
    "@copyright",
    "@deprecated",
    "@generated",
    "@internal",
    "@link",
    "@method",
    "@package",
    "@param",
    "@property",
    "@return",
    "@see",
    "@since",
    "@throws",
    "@todo",
    "@uses",
    "@var",
    "@version",
];

static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();

fn tag_pattern() -> &'static Regex {
    TAG_PATTERN.get_or_init(|| Regex::new(r"@\w+").expect("valid regex"))
}

pub struct DocCommentCheck;

impl Check for DocCommentCheck {
    fn name(&self) -> &'static str {
        "doc-comments"
    }

    fn description(&self) -> &'static str {
        "PHPDoc tags in the wrong comment style, or unknown tags"
    }

    fn check(&self, node: &Node) -> Vec<Issue> {
        let mut issues = Vec::new();
        for comment in &node.comments {
            for tag_match in tag_pattern().find_iter(&comment.text) {
                let tag = tag_match.as_str();
                let known = PHPDOC_TAGS.contains(&tag.to_lowercase().as_str());
                match comment.kind {
                    CommentKind::Doc if !known => {
                        issues.push(Issue::new(format!(
                            "Invalid PHPDoc tag found in docblock: {tag}"
                        )));
                    }
                    CommentKind::Line if known => {
                        issues.push(Issue::new(format!(
                            "PHPDoc tag found in single-line comment instead of docblock: {tag}"
                        )));
                    }
                    CommentKind::Block if known => {
                        issues.push(Issue::new(format!(
                            "PHPDoc tag found in multi-line comment instead of docblock: {tag}"
                        )));
                    }
                    _ => {}
                }
            }
        }
        issues
    }
}
