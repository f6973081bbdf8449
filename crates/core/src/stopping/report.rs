//! Human-readable reporting on a criterion and its state.
//!
//! These functions read the markers stored by the last [`evaluate`] call and
//! never update them. They assume the state was built for the criterion; a
//! node whose state has the wrong shape reports as not stopped.
//!
//! [`evaluate`]: super::evaluate

use super::{Criterion, CriterionState, GroupOp, Leaf, indicates_convergence};

/// Separates child reasons and summaries within a group.
const DELIMITER: &str = "; ";

/// Returns whether `criterion` currently indicates to stop.
///
/// A leaf has stopped if its marker is set. An `All` group has stopped if
/// every child has; an `Any` group if at least one child has.
#[must_use]
pub fn has_stopped<P, A, S>(
    criterion: &Criterion<P, A, S>,
    criterion_state: &CriterionState,
) -> bool {
    match (criterion, criterion_state) {
        (
            Criterion::Leaf(Leaf::AfterIteration { .. } | Leaf::Rule(_)),
            CriterionState::Marker(marker),
        ) => marker.at_iteration.is_some(),
        (Criterion::Leaf(Leaf::AfterDuration { .. }), CriterionState::Duration(duration)) => {
            duration.at_iteration.is_some()
        }
        (Criterion::Group(group), CriterionState::Group(group_state))
            if group.children().len() == group_state.children().len() =>
        {
            let mut pairs = group.children().iter().zip(group_state.children());
            match group.op() {
                GroupOp::All => pairs.all(|(child, state)| has_stopped(child, state)),
                GroupOp::Any => pairs.any(|(child, state)| has_stopped(child, state)),
            }
        }
        _ => false,
    }
}

/// Returns why `criterion` indicated to stop, or an empty string if it has not.
///
/// Leaf reasons name the iteration at which the leaf triggered, for example
/// `Max Iterations (200): reached at iteration 200`. A stopped group joins the
/// non-empty reasons of its stopped children with `"; "`.
#[must_use]
pub fn get_reason<P, A, S>(
    criterion: &Criterion<P, A, S>,
    criterion_state: &CriterionState,
) -> String {
    if !has_stopped(criterion, criterion_state) {
        return String::new();
    }

    match (criterion, criterion_state) {
        (Criterion::Leaf(leaf @ Leaf::AfterDuration { .. }), CriterionState::Duration(duration)) => {
            let at = duration.at_iteration.unwrap_or_default();
            format!(
                "{}: reached at iteration {at} after {:?}",
                leaf_label(leaf),
                duration.elapsed
            )
        }
        (Criterion::Leaf(leaf), _) => {
            let at = criterion_state.at_iteration().unwrap_or_default();
            format!("{}: reached at iteration {at}", leaf_label(leaf))
        }
        (Criterion::Group(group), _) => group
            .children()
            .iter()
            .zip(criterion_state.children())
            .map(|(child, state)| get_reason(child, state))
            .filter(|reason| !reason.is_empty())
            .collect::<Vec<_>>()
            .join(DELIMITER),
    }
}

/// Returns a one-line summary of the criterion's parameters and status.
///
/// ```text
/// Max Iterations (15): not reached
/// Stop When Any (2): reached [Max Iterations (5): reached; Max Duration (60s): not reached]
/// ```
#[must_use]
pub fn summary<P, A, S>(
    criterion: &Criterion<P, A, S>,
    criterion_state: &CriterionState,
) -> String {
    let status = if has_stopped(criterion, criterion_state) {
        "reached"
    } else {
        "not reached"
    };

    match criterion {
        Criterion::Leaf(leaf) => format!("{}: {status}", leaf_label(leaf)),
        Criterion::Group(group) => {
            let label = match group.op() {
                GroupOp::All => "Stop When All",
                GroupOp::Any => "Stop When Any",
            };
            let children: Vec<String> = group
                .children()
                .iter()
                .zip(criterion_state.children())
                .map(|(child, state)| summary(child, state))
                .collect();
            format!(
                "{label} ({}): {status} [{}]",
                group.children().len(),
                children.join(DELIMITER)
            )
        }
    }
}

/// Returns whether `criterion` has stopped and the stop indicates convergence.
#[must_use]
pub fn indicates_convergence_at<P, A, S>(
    criterion: &Criterion<P, A, S>,
    criterion_state: &CriterionState,
) -> bool {
    has_stopped(criterion, criterion_state) && indicates_convergence(criterion)
}

/// Returns the label of a leaf, such as `Max Iterations (5)`.
pub(super) fn leaf_label<P, A, S>(leaf: &Leaf<P, A, S>) -> String {
    match leaf {
        Leaf::AfterIteration { max_iterations } => format!("Max Iterations ({max_iterations})"),
        Leaf::AfterDuration { threshold } => format!("Max Duration ({threshold:?})"),
        Leaf::Rule(rule) => rule.describe(),
    }
}
