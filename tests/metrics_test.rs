//! Metric threshold evaluation through the public API.
//!
//! Covers the path a consumer actually takes: fact records arrive as
//! JSON or are built in code, bounds come from `phlint.toml` or the
//! defaults, and findings land in a per-file report with severities
//! and remediation hints.

use phlint::metrics::{records_from_json, Metric, MetricRecord, MetricsEvaluator, NumericFacts};
use phlint::{AnalyzerError, Config, Severity};

#[test]
fn config_thresholds_flow_into_the_evaluator() {
    let toml = r#"
[thresholds.classes]
class_size = { warn = 10, error = 20 }
"#;
    let config: Config = toml::from_str(toml).expect("parses");
    let record = MetricRecord::for_class(
        "src/Cart.php",
        "Cart",
        NumericFacts::new().with(Metric::ClassSize, 15.0),
    );

    let issues = MetricsEvaluator::new(config.thresholds).evaluate(&record);
    assert!(issues.contains_message("Cart - Class size (# methods + # properties) = 15 > 10"));

    // Under the default bounds the same record grades clean.
    assert!(MetricsEvaluator::default().evaluate(&record).is_empty());
}

#[test]
fn batch_evaluation_groups_by_file_with_mixed_severities() {
    let records = vec![
        MetricRecord::for_class(
            "src/Cart.php",
            "Cart",
            NumericFacts::new()
                .with(Metric::ClassSize, 60.0)
                .with(Metric::CodeRank, 0.6),
        ),
        MetricRecord::for_routine(
            "src/render.php",
            "render",
            NumericFacts::new().with(Metric::CyclomaticComplexity, 30.0),
        ),
        MetricRecord::for_class(
            "src/Tidy.php",
            "Tidy",
            NumericFacts::new().with(Metric::ClassSize, 5.0),
        ),
    ];

    let report = MetricsEvaluator::default().evaluate_all(&records);
    let files: Vec<_> = report.files().collect();
    assert_eq!(files, ["src/Cart.php", "src/render.php"]);
    assert_eq!(report.issue_count(), 3);

    let cart = report.issues_for("src/Cart.php").expect("cart group");
    assert!(cart.contains_message("Cart - Class size (# methods + # properties) = 60 > 56"));
    assert!(cart.contains_message("Cart - Code rank = 0.60 > 0.55"));
    let severities: Vec<_> = cart.iter().map(|i| i.severity).collect();
    assert_eq!(severities, [Some(Severity::Error), Some(Severity::Warning)]);

    let render = report.issues_for("src/render.php").expect("render group");
    assert!(render.contains_message("render() - Extended cyclomatic complexity = 30 > 25"));
}

#[test]
fn minimum_metrics_report_shortfalls() {
    let class = MetricRecord::for_class(
        "src/Api.php",
        "Api",
        NumericFacts::new()
            .with(Metric::CommentLines, 2.0)
            .with(Metric::ExecutableLines, 25.0),
    );
    let issues = MetricsEvaluator::default().evaluate(&class);
    let issue = issues.iter().next().expect("ratio issue");
    assert_eq!(issue.message, "Api - Comment to code ratio = 0.08 < 0.10");
    assert_eq!(issue.severity, Some(Severity::Warning));

    let routine = MetricRecord::for_routine(
        "src/legacy.php",
        "legacy",
        NumericFacts::new().with(Metric::MaintainabilityIndex, 35.0),
    );
    let issues = MetricsEvaluator::default().evaluate(&routine);
    assert!(issues.contains_message("legacy() - Maintainability index = 35.00 < 40.00"));
}

#[test]
fn code_rank_errors_are_marked_for_review() {
    let record = MetricRecord::for_class(
        "src/Kernel.php",
        "Kernel",
        NumericFacts::new().with(Metric::CodeRank, 0.9),
    );
    let issues = MetricsEvaluator::default().evaluate(&record);
    assert!(issues.contains_message("Kernel - Code rank = 0.90 > 0.75 (review priority)"));
}

#[test]
fn json_fact_records_evaluate_end_to_end() {
    let json = r#"[
        {
            "file": "src/Order.php",
            "class_name": "Order",
            "facts": { "csz": 30, "vars": 3 }
        },
        {
            "file": "src/Order.php",
            "class_name": "Order",
            "function_name": "total",
            "facts": { "ccn2": 12, "loc": 20 }
        },
        {
            "file": "src/bootstrap.php",
            "facts": { "loc": 250 }
        }
    ]"#;
    let records = records_from_json(json).expect("records parse");
    assert_eq!(records[1].owner(), "Order::total()");

    let report = MetricsEvaluator::default().evaluate_all(&records);
    let order = report.issues_for("src/Order.php").expect("order group");
    assert!(order.contains_message("Order - Class size (# methods + # properties) = 30 > 24"));
    assert!(order.contains_message("Order::total() - Extended cyclomatic complexity = 12 > 9"));

    let bootstrap = report.issues_for("src/bootstrap.php").expect("file group");
    assert!(bootstrap.contains_message("File - # lines of code = 250 > 200"));
}

#[test]
fn malformed_fact_json_is_an_error() {
    let err = records_from_json("{]").unwrap_err();
    assert!(matches!(err, AnalyzerError::JsonDecode(_)));
}

#[test]
fn issues_render_with_their_action_hint() {
    let record = MetricRecord::for_class(
        "src/Cart.php",
        "Cart",
        NumericFacts::new().with(Metric::ClassSize, 60.0),
    );
    let issues = MetricsEvaluator::default().evaluate(&record);
    let rendered = issues.iter().next().expect("issue").to_string();
    assert_eq!(
        rendered,
        "Cart - Class size (# methods + # properties) = 60 > 56\n    Action: Reduce class size; extract classes or delegate responsibilities."
    );
}
