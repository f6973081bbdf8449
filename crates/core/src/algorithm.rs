use crate::{Criterion, OptionsError, State};

/// Static configuration of an iterative algorithm for problems of type `P`.
///
/// An algorithm holds its parameters and owns exactly one stopping
/// [`Criterion`]. Together with a problem it can build (or reset) a
/// [`State`], and it defines what a single step does to that state.
///
/// Algorithms are never mutated during a run, so one instance may drive any
/// number of independent states.
pub trait Algorithm<P>: Sized {
    type State: State;

    /// Per-run initial values, such as a starting iterate.
    ///
    /// Fields are usually `Option`s: [`initialize_state`] reports required
    /// fields that are `None`, while [`reinitialize_state`] only overwrites
    /// fields that are `Some`.
    ///
    /// [`initialize_state`]: Algorithm::initialize_state
    /// [`reinitialize_state`]: Algorithm::reinitialize_state
    type Options;

    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the stopping criterion that decides when a run is finished.
    fn stopping_criterion(&self) -> &Criterion<P, Self, Self::State>;

    /// Builds a fresh state from the problem and options.
    ///
    /// The returned state should start at iteration 0 with a criterion state
    /// built by [`CriterionState::new`] from [`Self::stopping_criterion`].
    /// The free function [`crate::initialize_state`] enforces both.
    ///
    /// [`CriterionState::new`]: crate::CriterionState::new
    ///
    /// # Errors
    ///
    /// Returns an [`OptionsError`] if a required option is missing or invalid.
    fn initialize_state(&self, problem: &P, options: Self::Options)
    -> Result<Self::State, OptionsError>;

    /// Resets an existing state in place, overwriting only the given options.
    ///
    /// The iteration counter and criterion state are reset by
    /// [`crate::reinitialize_state`]; implementations only need to handle
    /// their own fields.
    ///
    /// # Errors
    ///
    /// Returns an [`OptionsError`] if a provided option is invalid.
    fn reinitialize_state(
        &self,
        state: &mut Self::State,
        problem: &P,
        options: Self::Options,
    ) -> Result<(), OptionsError>;

    /// Performs one unit of work, updating the iterate in `state`.
    ///
    /// Steps must not touch the iteration counter or the criterion state.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the step cannot be computed.
    fn step(&self, problem: &P, state: &mut Self::State) -> Result<(), Self::Error>;
}
