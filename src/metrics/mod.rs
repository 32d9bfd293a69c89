//! Dual-threshold metric evaluation.
//!
//! Metric facts are computed elsewhere and arrive as records, one per
//! class, routine, or file, keyed by short mnemonics (`csz`, `ccn2`,
//! `loc`, ...). The evaluator compares each fact it knows about against
//! a warn/error bound pair and produces severity-tagged issues with a
//! remediation hint. Count-like values are truncated before comparison
//! so a fractional artifact never tips a verdict; the comment ratio is
//! derived from `cloc`/`eloc` rather than read directly. A record
//! missing a fact skips that check quietly.

mod thresholds;

pub use thresholds::{
    evaluate_max, evaluate_min, Bound, ClassThresholds, FileThresholds, RoutineThresholds,
    ThresholdTable,
};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::issue::{Issue, IssueSet, Severity};

/// Metric identifiers as they appear in fact records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "ca")]
    AfferentCoupling,
    #[serde(rename = "ce")]
    EfferentCoupling,
    #[serde(rename = "csz")]
    ClassSize,
    #[serde(rename = "cr")]
    CodeRank,
    #[serde(rename = "ccn2")]
    CyclomaticComplexity,
    #[serde(rename = "he")]
    HalsteadEffort,
    #[serde(rename = "dit")]
    InheritanceDepth,
    #[serde(rename = "loc")]
    LinesOfCode,
    #[serde(rename = "npath")]
    NpathComplexity,
    #[serde(rename = "nocc")]
    ChildClasses,
    #[serde(rename = "cbo")]
    ObjectCoupling,
    #[serde(rename = "vars")]
    Properties,
    #[serde(rename = "varsnp")]
    NonPrivateProperties,
    #[serde(rename = "npm")]
    PublicMethods,
    #[serde(rename = "cloc")]
    CommentLines,
    #[serde(rename = "eloc")]
    ExecutableLines,
    #[serde(rename = "ratio")]
    CommentRatio,
    #[serde(rename = "mi")]
    MaintainabilityIndex,
}

impl Metric {
    /// Human name used in issue messages.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::AfferentCoupling => "Afferent coupling",
            Metric::EfferentCoupling => "Efferent coupling",
            Metric::ClassSize => "Class size (# methods + # properties)",
            Metric::CodeRank => "Code rank",
            Metric::CyclomaticComplexity => "Extended cyclomatic complexity",
            Metric::HalsteadEffort => "Halstead effort",
            Metric::InheritanceDepth => "Inheritance depth",
            Metric::LinesOfCode => "# lines of code",
            Metric::NpathComplexity => "NPath complexity",
            Metric::ChildClasses => "# child classes",
            Metric::ObjectCoupling => "Coupling between objects",
            Metric::Properties => "# properties",
            Metric::NonPrivateProperties => "# non-private properties",
            Metric::PublicMethods => "# public methods",
            Metric::CommentLines => "# comment lines",
            Metric::ExecutableLines => "# executable lines",
            Metric::CommentRatio => "Comment to code ratio",
            Metric::MaintainabilityIndex => "Maintainability index",
        }
    }

    /// Remediation hint attached to threshold issues.
    pub fn hint(&self) -> &'static str {
        match self {
            Metric::AfferentCoupling => {
                "Reduce incoming dependencies; consider interface segregation or decoupling."
            }
            Metric::EfferentCoupling => {
                "Reduce outgoing dependencies; use dependency injection or interfaces."
            }
            Metric::ClassSize => "Reduce class size; extract classes or delegate responsibilities.",
            Metric::CodeRank => {
                "High rank implies high responsibility/centrality; ensure stability and test coverage."
            }
            Metric::CyclomaticComplexity => {
                "Reduce complexity; extract methods or simplify conditional logic."
            }
            Metric::HalsteadEffort => {
                "Reduce code volume/complexity; simplify logic or break down methods."
            }
            Metric::InheritanceDepth => {
                "Reduce inheritance depth; prefer composition over inheritance."
            }
            Metric::LinesOfCode | Metric::ExecutableLines => {
                "Reduce lines of code; extract logic into smaller units."
            }
            Metric::NpathComplexity => {
                "Reduce branching paths; simplify control structures or return early."
            }
            Metric::ChildClasses => "Review hierarchy; base class may be too generic or complex.",
            Metric::ObjectCoupling => "Reduce coupling; decouple from other objects or use events.",
            Metric::Properties => "Reduce state; extract value objects or services.",
            Metric::NonPrivateProperties => {
                "Encapsulate fields; make properties private and use accessors."
            }
            Metric::PublicMethods => "Reduce public interface; hide internal methods.",
            Metric::CommentLines | Metric::CommentRatio => {
                "Increase documentation; add comments for complex logic."
            }
            Metric::MaintainabilityIndex => "Improve maintainability; refactor complex code.",
        }
    }

    /// Count-like metrics drop their fractional part before comparison
    /// and display; the two genuinely fractional ones pass through.
    fn normalize(&self, value: f64) -> f64 {
        match self {
            Metric::CodeRank | Metric::CommentRatio => value,
            _ => value.trunc(),
        }
    }

    fn render(&self, value: f64) -> String {
        match self {
            Metric::CodeRank | Metric::CommentRatio | Metric::MaintainabilityIndex => {
                format!("{value:.2}")
            }
            _ => format!("{}", value as i64),
        }
    }
}

/// Fact values for one record, keyed by metric.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericFacts {
    values: FxHashMap<Metric, f64>,
}

impl NumericFacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.values.insert(metric, value);
        self
    }

    pub fn insert(&mut self, metric: Metric, value: f64) {
        self.values.insert(metric, value);
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

enum RecordShape {
    Class,
    Routine,
    File,
}

/// Externally computed facts for one class, routine, or file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRecord {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    pub facts: NumericFacts,
}

impl MetricRecord {
    pub fn for_class(
        file: impl Into<String>,
        class_name: impl Into<String>,
        facts: NumericFacts,
    ) -> Self {
        Self {
            file: file.into(),
            class_name: Some(class_name.into()),
            function_name: None,
            facts,
        }
    }

    pub fn for_routine(
        file: impl Into<String>,
        function_name: impl Into<String>,
        facts: NumericFacts,
    ) -> Self {
        Self {
            file: file.into(),
            class_name: None,
            function_name: Some(function_name.into()),
            facts,
        }
    }

    pub fn for_method(
        file: impl Into<String>,
        class_name: impl Into<String>,
        function_name: impl Into<String>,
        facts: NumericFacts,
    ) -> Self {
        Self {
            file: file.into(),
            class_name: Some(class_name.into()),
            function_name: Some(function_name.into()),
            facts,
        }
    }

    pub fn for_file(file: impl Into<String>, facts: NumericFacts) -> Self {
        Self {
            file: file.into(),
            class_name: None,
            function_name: None,
            facts,
        }
    }

    /// Subject as it reads in a message: `Cart`, `Cart::total()`,
    /// `render()`, or `File`.
    pub fn owner(&self) -> String {
        match (&self.class_name, &self.function_name) {
            (Some(class), Some(function)) => format!("{class}::{function}()"),
            (Some(class), None) => class.clone(),
            (None, Some(function)) => format!("{function}()"),
            (None, None) => "File".to_string(),
        }
    }

    fn shape(&self) -> RecordShape {
        if self.function_name.is_some() {
            RecordShape::Routine
        } else if self.class_name.is_some() {
            RecordShape::Class
        } else {
            RecordShape::File
        }
    }
}

/// Parses fact records from the JSON array the metric pass emits.
pub fn records_from_json(json: &str) -> Result<Vec<MetricRecord>> {
    Ok(serde_json::from_str(json)?)
}

#[derive(Clone, Copy, PartialEq)]
enum Direction {
    Max,
    Min,
}

impl Direction {
    fn symbol(&self) -> &'static str {
        match self {
            Direction::Max => ">",
            Direction::Min => "<",
        }
    }
}

fn threshold_issue(
    owner: &str,
    metric: Metric,
    value: f64,
    bound: Bound,
    severity: Severity,
    direction: Direction,
) -> Issue {
    let limit = match severity {
        Severity::Error => bound.error,
        Severity::Warning => bound.warn,
    };
    let mut message = format!(
        "{owner} - {} = {} {} {}",
        metric.label(),
        metric.render(value),
        direction.symbol(),
        metric.render(limit)
    );
    // Rank past the error bound marks a hub of the dependency graph.
    if metric == Metric::CodeRank && severity == Severity::Error {
        message.push_str(" (review priority)");
    }
    Issue::with_severity(message, severity, metric.hint())
}

/// Grades metric records against a threshold table.
pub struct MetricsEvaluator {
    thresholds: ThresholdTable,
}

impl MetricsEvaluator {
    pub fn new(thresholds: ThresholdTable) -> Self {
        Self { thresholds }
    }

    /// Evaluates one record against the bounds for its shape.
    pub fn evaluate(&self, record: &MetricRecord) -> IssueSet {
        let mut issues = IssueSet::new();
        match record.shape() {
            RecordShape::Class => self.evaluate_class(record, &mut issues),
            RecordShape::Routine => self.evaluate_routine(record, &mut issues),
            RecordShape::File => self.evaluate_file(record, &mut issues),
        }
        issues
    }

    /// Evaluates a batch and groups the findings by file, first seen
    /// first.
    pub fn evaluate_all(&self, records: &[MetricRecord]) -> MetricsReport {
        let mut report = MetricsReport::new();
        for record in records {
            report.add(&record.file, self.evaluate(record));
        }
        report
    }

    fn evaluate_class(&self, record: &MetricRecord, issues: &mut IssueSet) {
        let t = &self.thresholds.classes;
        self.check_max(record, Metric::ClassSize, t.class_size, issues);
        self.check_max(record, Metric::CodeRank, t.code_rank, issues);
        self.check_max(record, Metric::LinesOfCode, t.lines_of_code, issues);
        self.check_max(
            record,
            Metric::NonPrivateProperties,
            t.non_private_properties,
            issues,
        );
        self.check_max(record, Metric::Properties, t.properties, issues);
        self.check_max(record, Metric::PublicMethods, t.public_methods, issues);
        self.check_max(record, Metric::AfferentCoupling, t.afferent_coupling, issues);
        self.check_max(record, Metric::EfferentCoupling, t.efferent_coupling, issues);
        if let Some(bound) = t.inheritance_depth {
            self.check_max(record, Metric::InheritanceDepth, bound, issues);
        }
        if let Some(bound) = t.child_classes {
            self.check_max(record, Metric::ChildClasses, bound, issues);
        }
        if let Some(bound) = t.object_coupling {
            self.check_max(record, Metric::ObjectCoupling, bound, issues);
        }
        self.check_comment_ratio(record, t.comment_ratio, issues);
    }

    fn evaluate_routine(&self, record: &MetricRecord, issues: &mut IssueSet) {
        let t = &self.thresholds.routines;
        self.check_max(
            record,
            Metric::CyclomaticComplexity,
            t.cyclomatic_complexity,
            issues,
        );
        self.check_max(record, Metric::LinesOfCode, t.lines_of_code, issues);
        self.check_max(record, Metric::NpathComplexity, t.npath_complexity, issues);
        self.check_max(record, Metric::HalsteadEffort, t.halstead_effort, issues);
        self.check_min(
            record,
            Metric::MaintainabilityIndex,
            t.maintainability_index,
            issues,
        );
    }

    fn evaluate_file(&self, record: &MetricRecord, issues: &mut IssueSet) {
        self.check_max(
            record,
            Metric::LinesOfCode,
            self.thresholds.files.lines_of_code,
            issues,
        );
    }

    fn check_max(&self, record: &MetricRecord, metric: Metric, bound: Bound, issues: &mut IssueSet) {
        self.check(record, metric, bound, Direction::Max, issues);
    }

    fn check_min(&self, record: &MetricRecord, metric: Metric, bound: Bound, issues: &mut IssueSet) {
        self.check(record, metric, bound, Direction::Min, issues);
    }

    fn check(
        &self,
        record: &MetricRecord,
        metric: Metric,
        bound: Bound,
        direction: Direction,
        issues: &mut IssueSet,
    ) {
        let Some(raw) = record.facts.get(metric) else {
            debug!(owner = %record.owner(), metric = ?metric, "fact missing, check skipped");
            return;
        };
        let value = metric.normalize(raw);
        let graded = match direction {
            Direction::Max => evaluate_max(value, bound),
            Direction::Min => evaluate_min(value, bound),
        };
        if let Some(severity) = graded {
            issues.insert(threshold_issue(
                &record.owner(),
                metric,
                value,
                bound,
                severity,
                direction,
            ));
        }
    }

    fn check_comment_ratio(&self, record: &MetricRecord, bound: Bound, issues: &mut IssueSet) {
        let (Some(cloc), Some(eloc)) = (
            record.facts.get(Metric::CommentLines),
            record.facts.get(Metric::ExecutableLines),
        ) else {
            debug!(owner = %record.owner(), "line counts missing, ratio skipped");
            return;
        };
        // No executable lines, no meaningful ratio.
        if eloc == 0.0 {
            return;
        }
        let ratio = cloc / eloc;
        if let Some(severity) = evaluate_min(ratio, bound) {
            issues.insert(threshold_issue(
                &record.owner(),
                Metric::CommentRatio,
                ratio,
                bound,
                severity,
                Direction::Min,
            ));
        }
    }
}

impl Default for MetricsEvaluator {
    fn default() -> Self {
        Self::new(ThresholdTable::default())
    }
}

/// Threshold findings grouped by file, in first-seen order. Records
/// that graded clean leave no group behind.
#[derive(Debug, Default)]
pub struct MetricsReport {
    groups: IndexMap<String, IssueSet>,
}

impl MetricsReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, file: &str, issues: IssueSet) {
        if issues.is_empty() {
            return;
        }
        self.groups.entry(file.to_string()).or_default().merge(issues);
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn issues_for(&self, file: &str) -> Option<&IssueSet> {
        self.groups.get(file)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IssueSet)> {
        self.groups.iter().map(|(file, issues)| (file.as_str(), issues))
    }

    pub fn issue_count(&self) -> usize {
        self.groups.values().map(IssueSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> MetricsEvaluator {
        MetricsEvaluator::default()
    }

    #[test]
    fn class_size_grades_warn_then_error() {
        let warn = MetricRecord::for_class(
            "src/Cart.php",
            "Cart",
            NumericFacts::new().with(Metric::ClassSize, 30.0),
        );
        let issues = evaluator().evaluate(&warn);
        let issue = issues.iter().next().unwrap();
        assert_eq!(
            issue.message,
            "Cart - Class size (# methods + # properties) = 30 > 24"
        );
        assert_eq!(issue.severity, Some(Severity::Warning));
        assert_eq!(
            issue.hint.as_deref(),
            Some("Reduce class size; extract classes or delegate responsibilities.")
        );

        let error = MetricRecord::for_class(
            "src/Cart.php",
            "Cart",
            NumericFacts::new().with(Metric::ClassSize, 60.0),
        );
        let issues = evaluator().evaluate(&error);
        let issue = issues.iter().next().unwrap();
        assert_eq!(
            issue.message,
            "Cart - Class size (# methods + # properties) = 60 > 56"
        );
        assert_eq!(issue.severity, Some(Severity::Error));
    }

    #[test]
    fn value_within_bounds_stays_silent() {
        let record = MetricRecord::for_class(
            "src/Cart.php",
            "Cart",
            NumericFacts::new().with(Metric::ClassSize, 10.0),
        );
        assert!(evaluator().evaluate(&record).is_empty());
    }

    #[test]
    fn missing_facts_skip_their_checks() {
        let record = MetricRecord::for_class("src/Cart.php", "Cart", NumericFacts::new());
        assert!(evaluator().evaluate(&record).is_empty());
    }

    #[test]
    fn code_rank_error_is_marked_review_priority() {
        let record = MetricRecord::for_class(
            "src/Kernel.php",
            "Kernel",
            NumericFacts::new().with(Metric::CodeRank, 0.8),
        );
        let issues = evaluator().evaluate(&record);
        assert!(issues.contains_message("Kernel - Code rank = 0.80 > 0.75 (review priority)"));

        let record = MetricRecord::for_class(
            "src/Kernel.php",
            "Kernel",
            NumericFacts::new().with(Metric::CodeRank, 0.6),
        );
        let issues = evaluator().evaluate(&record);
        assert!(issues.contains_message("Kernel - Code rank = 0.60 > 0.55"));
    }

    #[test]
    fn maintainability_index_is_a_minimum() {
        let record = MetricRecord::for_routine(
            "src/legacy.php",
            "legacy",
            NumericFacts::new().with(Metric::MaintainabilityIndex, 20.0),
        );
        let issues = evaluator().evaluate(&record);
        let issue = issues.iter().next().unwrap();
        assert_eq!(
            issue.message,
            "legacy() - Maintainability index = 20.00 < 25.00"
        );
        assert_eq!(issue.severity, Some(Severity::Error));

        let record = MetricRecord::for_routine(
            "src/legacy.php",
            "legacy",
            NumericFacts::new().with(Metric::MaintainabilityIndex, 30.9),
        );
        let issues = evaluator().evaluate(&record);
        assert!(issues.contains_message("legacy() - Maintainability index = 30.00 < 40.00"));
    }

    #[test]
    fn counts_truncate_before_comparison() {
        // 130.9 truncates to 130, which does not pass the 130 error bound.
        let record = MetricRecord::for_method(
            "src/Cart.php",
            "Cart",
            "total",
            NumericFacts::new().with(Metric::LinesOfCode, 130.9),
        );
        let issues = evaluator().evaluate(&record);
        let issue = issues.iter().next().unwrap();
        assert_eq!(issue.message, "Cart::total() - # lines of code = 130 > 50");
        assert_eq!(issue.severity, Some(Severity::Warning));
    }

    #[test]
    fn comment_ratio_derives_from_line_counts() {
        let record = MetricRecord::for_class(
            "src/Cart.php",
            "Cart",
            NumericFacts::new()
                .with(Metric::CommentLines, 2.0)
                .with(Metric::ExecutableLines, 100.0),
        );
        let issues = evaluator().evaluate(&record);
        assert!(issues.contains_message("Cart - Comment to code ratio = 0.02 < 0.05"));
    }

    #[test]
    fn empty_code_body_skips_the_ratio() {
        let record = MetricRecord::for_class(
            "src/Empty.php",
            "Husk",
            NumericFacts::new()
                .with(Metric::CommentLines, 0.0)
                .with(Metric::ExecutableLines, 0.0),
        );
        assert!(evaluator().evaluate(&record).is_empty());
    }

    #[test]
    fn optional_bounds_are_off_by_default() {
        let record = MetricRecord::for_class(
            "src/Deep.php",
            "Deep",
            NumericFacts::new().with(Metric::InheritanceDepth, 12.0),
        );
        assert!(evaluator().evaluate(&record).is_empty());

        let mut table = ThresholdTable::default();
        table.classes.inheritance_depth = Some(Bound::new(4.0, 8.0));
        let issues = MetricsEvaluator::new(table).evaluate(&record);
        assert!(issues.contains_message("Deep - Inheritance depth = 12 > 8"));
    }

    #[test]
    fn file_records_grade_against_file_bounds() {
        let record = MetricRecord::for_file(
            "src/bootstrap.php",
            NumericFacts::new().with(Metric::LinesOfCode, 150.0),
        );
        let issues = evaluator().evaluate(&record);
        assert!(issues.contains_message("File - # lines of code = 150 > 100"));
    }

    #[test]
    fn report_groups_by_file_in_first_seen_order() {
        let records = vec![
            MetricRecord::for_class(
                "src/b.php",
                "B",
                NumericFacts::new().with(Metric::ClassSize, 30.0),
            ),
            MetricRecord::for_class(
                "src/a.php",
                "A",
                NumericFacts::new().with(Metric::ClassSize, 10.0),
            ),
            MetricRecord::for_routine(
                "src/b.php",
                "helper",
                NumericFacts::new().with(Metric::CyclomaticComplexity, 12.0),
            ),
            MetricRecord::for_file(
                "src/c.php",
                NumericFacts::new().with(Metric::LinesOfCode, 300.0),
            ),
        ];
        let report = evaluator().evaluate_all(&records);
        let files: Vec<_> = report.files().collect();
        // a.php graded clean and never formed a group.
        assert_eq!(files, ["src/b.php", "src/c.php"]);
        assert_eq!(report.issues_for("src/b.php").unwrap().len(), 2);
        assert_eq!(report.issue_count(), 3);
    }

    #[test]
    fn records_parse_from_json() {
        let json = r#"[
            {
                "file": "src/Cart.php",
                "class_name": "Cart",
                "facts": { "csz": 30, "cr": 0.6 }
            },
            {
                "file": "src/util.php",
                "function_name": "render",
                "facts": { "ccn2": 4 }
            }
        ]"#;
        let records = records_from_json(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].owner(), "Cart");
        assert_eq!(records[0].facts.get(Metric::ClassSize), Some(30.0));
        assert_eq!(records[1].owner(), "render()");
    }
}
