use std::time::Instant;

use tracing::debug;

use super::{
    Criterion, CriterionState, GroupOp, Leaf, Shape, StructureError, get_reason,
    indicates_convergence, report::leaf_label,
};

/// The outcome of evaluating a stopping criterion at one iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Whether the run should stop.
    pub stopped: bool,

    /// Why the run stopped, or empty if it has not.
    pub reason: String,

    /// Whether the stop indicates convergence; always `false` if not stopped.
    pub converged: bool,
}

/// Evaluates `criterion` at `iteration`, updating `criterion_state`.
///
/// Call once per iteration, starting at iteration 0 before any step so a
/// criterion that is already satisfied stops the run immediately. At
/// iteration 0 every leaf forgets its previous trigger and duration leaves
/// restart their clock.
///
/// Every leaf is evaluated on every call: groups never short-circuit, so
/// bookkeeping such as elapsed time stays current regardless of which child
/// decides the outcome. A leaf records the iteration it started indicating to
/// stop and keeps that record while it continues to do so; re-evaluating a
/// stopped criterion is safe and does not move its trigger points.
///
/// # Errors
///
/// Returns a [`StructureError`] if `criterion_state` was not built for
/// `criterion`. The shape is checked before anything is updated.
pub fn evaluate<P, A, S>(
    problem: &P,
    algorithm: &A,
    state: &S,
    criterion: &Criterion<P, A, S>,
    criterion_state: &mut CriterionState,
    iteration: usize,
) -> Result<Evaluation, StructureError> {
    criterion_state.check_shape(criterion)?;

    let context = Context {
        problem,
        algorithm,
        state,
        iteration,
        now: Instant::now(),
    };
    let mut path = Vec::new();
    let stopped = context.update(criterion, criterion_state, &mut path)?;

    if !stopped {
        return Ok(Evaluation::default());
    }

    Ok(Evaluation {
        stopped,
        reason: get_reason(criterion, criterion_state),
        converged: indicates_convergence(criterion),
    })
}

/// Everything a single evaluation pass reads but does not change.
struct Context<'a, P, A, S> {
    problem: &'a P,
    algorithm: &'a A,
    state: &'a S,
    iteration: usize,
    now: Instant,
}

impl<P, A, S> Context<'_, P, A, S> {
    /// Updates one node and returns whether it indicates to stop.
    fn update(
        &self,
        criterion: &Criterion<P, A, S>,
        criterion_state: &mut CriterionState,
        path: &mut Vec<usize>,
    ) -> Result<bool, StructureError> {
        match (criterion, &mut *criterion_state) {
            (Criterion::Leaf(leaf), leaf_state) => {
                if let Some(stopped) = self.update_leaf(leaf, leaf_state) {
                    return Ok(stopped);
                }
            }
            (Criterion::Group(group), CriterionState::Group(group_state))
                if group.children().len() == group_state.children.len() =>
            {
                let mut stopped_children = 0;
                for (index, (child, child_state)) in
                    group.children().iter().zip(&mut group_state.children).enumerate()
                {
                    path.push(index);
                    if self.update(child, child_state, path)? {
                        stopped_children += 1;
                    }
                    path.pop();
                }

                return Ok(match group.op() {
                    GroupOp::All => stopped_children == group.children().len(),
                    GroupOp::Any => stopped_children > 0,
                });
            }
            (Criterion::Group(_), _) => {}
        }

        Err(StructureError {
            path: path.clone(),
            expected: Shape::of(criterion),
            found: criterion_state.shape(),
        })
    }

    /// Updates a leaf, or returns `None` if its state has the wrong shape.
    fn update_leaf(&self, leaf: &Leaf<P, A, S>, leaf_state: &mut CriterionState) -> Option<bool> {
        let (stopped, at_iteration) = match (leaf, leaf_state) {
            (Leaf::AfterIteration { max_iterations }, CriterionState::Marker(marker)) => {
                (self.iteration >= *max_iterations, &mut marker.at_iteration)
            }
            (Leaf::Rule(rule), CriterionState::Marker(marker)) => (
                rule.is_met(self.problem, self.algorithm, self.state),
                &mut marker.at_iteration,
            ),
            (Leaf::AfterDuration { threshold }, CriterionState::Duration(duration)) => {
                if self.iteration == 0 || duration.start.is_none() {
                    duration.start = Some(self.now);
                }
                let start = duration.start.unwrap_or(self.now);
                duration.elapsed = self.now.saturating_duration_since(start);
                (duration.elapsed >= *threshold, &mut duration.at_iteration)
            }
            _ => return None,
        };

        self.mark(leaf, at_iteration, stopped);
        Some(stopped)
    }

    /// Keeps a leaf's trigger marker in sync with whether it indicates to stop.
    ///
    /// The first iteration of an uninterrupted stop is recorded and left
    /// alone afterwards. Iteration 0 always starts from a cleared marker.
    fn mark(&self, leaf: &Leaf<P, A, S>, at_iteration: &mut Option<usize>, stopped: bool) {
        if !stopped || self.iteration == 0 {
            *at_iteration = None;
        }
        if stopped && at_iteration.is_none() {
            *at_iteration = Some(self.iteration);
            debug!(
                criterion = %leaf_label(leaf),
                iteration = self.iteration,
                "stopping criterion triggered"
            );
        }
    }
}
