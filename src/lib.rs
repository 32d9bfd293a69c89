//! Phlint - Scope-aware PHP code quality analysis
//!
//! A diagnostic engine over parsed PHP syntax trees. Each unit gets one
//! depth-first walk that feeds stateless rules and scope-local trackers,
//! reconciling deferred judgements (dead members, unused variables,
//! repeated magic numbers) when scopes close. A separate evaluator
//! grades externally computed metric facts against warn/error
//! thresholds.

pub mod checks;
pub mod config;
pub mod engine;
pub mod error;
pub mod issue;
pub mod metrics;
pub mod syntax;
pub mod trackers;

pub use config::{AnalyzerConfig, Config};
pub use engine::{Analyzer, ScopeKind, UnitReport};
pub use error::{AnalyzerError, Result};
pub use issue::{Issue, IssueSet, Severity};
pub use metrics::{
    Metric, MetricRecord, MetricsEvaluator, MetricsReport, NumericFacts, ThresholdTable,
};
pub use syntax::{Node, NodeKind};
