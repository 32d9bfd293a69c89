//! Stateful checkers that accumulate scope context during the walk.
//!
//! Where [`crate::checks`] rules judge one node at a time, trackers carry
//! ledgers across the walk and settle their verdicts when a scope closes:
//! a member is "unused" only once the whole type body has been seen, a
//! variable is "referenced once" only once its function has been left.
//! Declaration order never matters to a verdict, only the final tally.
//!
//! Trackers are built fresh for every unit, so a batch run never leaks
//! state between files.

mod globals_context;
mod magic_literals;
mod member_usage;
mod variable_usage;

pub use globals_context::GlobalsContext;
pub use magic_literals::MagicLiterals;
pub use member_usage::MemberUsage;
pub use variable_usage::VariableUsage;

use crate::issue::IssueSet;
use crate::syntax::Node;

/// A checker that needs to remember where in the tree it is.
///
/// The walk calls [`enter`](ScopeTracker::enter) on the way down and
/// [`leave`](ScopeTracker::leave) on the way back up, in matched pairs.
/// [`finish`](ScopeTracker::finish) runs once after the root has been left,
/// for anything batched across the whole unit. Trackers push issues as they
/// conclude them; the engine owns the shared set.
pub trait ScopeTracker {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;

    fn enter(&mut self, _node: &Node, _issues: &mut IssueSet) {}

    fn leave(&mut self, _node: &Node, _issues: &mut IssueSet) {}

    fn finish(&mut self, _issues: &mut IssueSet) {}
}
