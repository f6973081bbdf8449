//! Stopping criteria: when an iterative run should finish.
//!
//! A [`Criterion`] is an immutable tree. Leaves are single conditions
//! (an iteration cap, a wall-clock budget, or a [`StoppingRule`] that inspects
//! the problem, algorithm, and state); groups require [`All`] or [`Any`] of
//! their children to stop.
//!
//! A [`CriterionState`] mirrors the criterion one-to-one and holds the
//! bookkeeping that changes during a run: the iteration each leaf triggered
//! at and, for time budgets, the start instant and elapsed time. It is built
//! once per run with [`CriterionState::new`] and reset in place on restart.
//!
//! # Combining
//!
//! [`combine_all`] and [`combine_any`] (also available as `&` and `|`) flatten
//! same-operator groups, so `a & b & c` is a single three-child group.
//! Mixing operators nests.
//!
//! # Evaluation
//!
//! [`evaluate`] updates every leaf (groups never short-circuit) and reports
//! whether the run should stop, why, and whether the stop indicates
//! convergence.
//!
//! [`All`]: GroupOp::All
//! [`Any`]: GroupOp::Any

mod combine;
mod criterion;
mod criterion_state;
mod evaluate;
mod report;
mod rule;

#[cfg(test)]
mod tests;

pub use combine::{combine_all, combine_any};
pub use criterion::{Criterion, CriterionError, Group, GroupOp, Leaf};
pub use criterion_state::{
    CriterionState, DurationState, GroupState, MarkerState, Shape, StructureError,
};
pub use evaluate::{Evaluation, evaluate};
pub use report::{get_reason, has_stopped, indicates_convergence_at, summary};
pub use rule::StoppingRule;

/// Returns whether `criterion` can only stop for reasons of convergence.
///
/// Resource limits ([`Leaf::AfterIteration`], [`Leaf::AfterDuration`]) never
/// indicate convergence; rule leaves answer via
/// [`StoppingRule::indicates_convergence`]. A group indicates convergence only
/// if every child does, since it may have stopped because of any of them.
#[must_use]
pub fn indicates_convergence<P, A, S>(criterion: &Criterion<P, A, S>) -> bool {
    match criterion {
        Criterion::Leaf(Leaf::AfterIteration { .. } | Leaf::AfterDuration { .. }) => false,
        Criterion::Leaf(Leaf::Rule(rule)) => rule.indicates_convergence(),
        Criterion::Group(group) => group.children().iter().all(indicates_convergence),
    }
}
