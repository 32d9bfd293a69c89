//! Stateless, per-node diagnostic rules.
//!
//! Every rule here looks at exactly one node and decides on the spot.
//! Anything that needs to remember surrounding scope (member ledgers,
//! variable tallies, nesting context) lives in [`crate::trackers`] instead.
//! The registry is built once per [`Analyzer`](crate::engine::Analyzer) and
//! shared across units, so a rule may hold configuration but never per-unit
//! state.

mod arrays;
mod conditions;
mod debug_calls;
mod doc_comments;
mod empty_catch;
mod naming;
mod signatures;
mod suppression;
mod termination;

pub use arrays::ArrayKeyCheck;
pub use conditions::ConditionCheck;
pub use debug_calls::DebugCallCheck;
pub use doc_comments::DocCommentCheck;
pub use empty_catch::EmptyCatchCheck;
pub use naming::NamingCheck;
pub use signatures::SignatureCheck;
pub use suppression::SuppressionCheck;
pub use termination::TerminationCheck;

use crate::config::AnalyzerConfig;
use crate::issue::Issue;
use crate::syntax::Node;

/// A single-node diagnostic rule.
pub trait Check: Send + Sync {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;

    /// One-line summary of what the rule flags.
    fn description(&self) -> &'static str;

    /// Rules that only make sense inside a type or function body return
    /// true here and are skipped while the walk is at the top level.
    fn local_only(&self) -> bool {
        false
    }

    /// Inspect one node and report whatever it violates.
    fn check(&self, node: &Node) -> Vec<Issue>;
}

/// Builds the full rule set in reporting order.
pub fn build_registry(config: &AnalyzerConfig) -> Vec<Box<dyn Check>> {
    vec![
        Box::new(ConditionCheck),
        Box::new(DebugCallCheck::new(&config.debug_functions)),
        Box::new(SuppressionCheck),
        Box::new(EmptyCatchCheck),
        Box::new(NamingCheck),
        Box::new(DocCommentCheck),
        Box::new(ArrayKeyCheck),
        Box::new(SignatureCheck),
        Box::new(TerminationCheck),
    ]
}
