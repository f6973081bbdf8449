use crate::CriterionState;

/// The mutable, per-run data of an iterative algorithm.
///
/// A state holds the iteration the run is currently performing (or last
/// performed), the current iterate, and the [`CriterionState`] that records
/// how the algorithm's stopping criterion has evaluated so far.
///
/// # Deriving
///
/// With the `derive` feature (on by default), `#[derive(State)]` implements
/// this trait for structs whose fields follow the naming convention:
///
/// - `iteration: usize`
/// - `iterate: T` (sets `Iterate = T`)
/// - `stopping_criterion_state: CriterionState`
///
/// Structs that use other field names can mark them with
/// `#[state(iteration)]`, `#[state(iterate)]`, or `#[state(criterion_state)]`,
/// or implement the trait by hand.
///
/// ```
/// use cadence_core::{CriterionState, State};
///
/// #[derive(State)]
/// struct Walk {
///     iteration: usize,
///     #[state(iterate)]
///     position: f64,
///     stopping_criterion_state: CriterionState,
/// }
/// ```
pub trait State {
    /// The algorithm-specific iterate `x⁽ᵏ⁾`.
    type Iterate;

    /// Returns the iteration the run is currently performing or last performed.
    fn iteration(&self) -> usize;

    /// Overwrites the iteration counter.
    fn set_iteration(&mut self, iteration: usize);

    /// Returns the current iterate.
    fn iterate(&self) -> &Self::Iterate;

    /// Returns the stopping criterion state.
    fn stopping_criterion_state(&self) -> &CriterionState;

    /// Returns the stopping criterion state for in-place updates.
    fn stopping_criterion_state_mut(&mut self) -> &mut CriterionState;

    /// Advances the iteration counter by exactly one.
    fn increment(&mut self) {
        self.set_iteration(self.iteration() + 1);
    }
}
