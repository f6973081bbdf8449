//! The generic execution loop.
//!
//! A run moves from a freshly initialized state through repeated
//! evaluate / step / increment cycles until the algorithm's stopping criterion
//! indicates to stop:
//!
//! ```text
//! loop {
//!     if is_finished(problem, algorithm, state)? { return }
//!     step(state, problem, algorithm)?;
//!     increment(state);
//! }
//! ```
//!
//! Non-mutating functions take `(problem, algorithm, state)`, ordered from the
//! most static to the most variable argument. Mutating functions take the
//! mutated value first.

use tracing::{debug, info, instrument, trace};

use crate::{Algorithm, Error, Evaluation, Observer, State, evaluate};

/// Events emitted by [`solve_in_place_observed`].
#[derive(Debug)]
pub enum Event<'a, S> {
    /// A step finished; `iteration` has not been incremented yet.
    Stepped { iteration: usize, state: &'a S },

    /// The stopping criterion indicated to stop.
    Finished {
        evaluation: &'a Evaluation,
        state: &'a S,
    },
}

/// Builds a fresh state at iteration 0 with an untriggered criterion state.
///
/// # Errors
///
/// Returns [`Error::Options`] if the options are incomplete or invalid, or
/// [`Error::Structure`] if the algorithm built a criterion state that does
/// not match its criterion.
pub fn initialize_state<P, A>(
    problem: &P,
    algorithm: &A,
    options: A::Options,
) -> Result<A::State, Error>
where
    A: Algorithm<P>,
{
    let mut state = algorithm.initialize_state(problem, options)?;
    state.set_iteration(0);

    let criterion_state = state.stopping_criterion_state_mut();
    criterion_state.check_shape(algorithm.stopping_criterion())?;
    criterion_state.reset();

    debug!("initialized state");
    Ok(state)
}

/// Resets `state` in place so it can be solved again.
///
/// The iteration returns to 0 and every criterion leaf to untriggered, without
/// rebuilding the criterion state. Only the options that are present are
/// applied; everything else keeps its current value.
///
/// # Errors
///
/// Returns [`Error::Structure`] if the state's criterion state was not built
/// for the algorithm's criterion (checked before anything changes), or
/// [`Error::Options`] if a provided option is invalid.
pub fn reinitialize_state<P, A>(
    state: &mut A::State,
    problem: &P,
    algorithm: &A,
    options: A::Options,
) -> Result<(), Error>
where
    A: Algorithm<P>,
{
    state
        .stopping_criterion_state()
        .check_shape(algorithm.stopping_criterion())?;

    algorithm.reinitialize_state(state, problem, options)?;
    state.set_iteration(0);
    state.stopping_criterion_state_mut().reset();

    debug!("reinitialized state");
    Ok(())
}

/// Evaluates the algorithm's stopping criterion at the state's iteration.
///
/// This updates the state's criterion state: calling it twice without a step
/// in between gives the same answer, but time-based leaves record the extra
/// elapsed time.
///
/// # Errors
///
/// Returns [`Error::Structure`] if the state's criterion state does not match
/// the algorithm's criterion.
pub fn evaluate_state<P, A>(
    problem: &P,
    algorithm: &A,
    state: &mut A::State,
) -> Result<Evaluation, Error>
where
    A: Algorithm<P>,
{
    // Rules read the state while its criterion state is updated, so the tree
    // is moved out for the duration of the evaluation.
    let mut criterion_state = std::mem::take(state.stopping_criterion_state_mut());
    let result = evaluate(
        problem,
        algorithm,
        &*state,
        algorithm.stopping_criterion(),
        &mut criterion_state,
        state.iteration(),
    );
    *state.stopping_criterion_state_mut() = criterion_state;

    Ok(result?)
}

/// Returns `true` if the run described by `state` is finished.
///
/// See [`evaluate_state`] for the side effects on the criterion state.
///
/// # Errors
///
/// Returns [`Error::Structure`] if the state's criterion state does not match
/// the algorithm's criterion.
pub fn is_finished<P, A>(problem: &P, algorithm: &A, state: &mut A::State) -> Result<bool, Error>
where
    A: Algorithm<P>,
{
    evaluate_state(problem, algorithm, state).map(|evaluation| evaluation.stopped)
}

/// Performs one algorithm step.
///
/// The iteration counter and criterion state are left unchanged.
///
/// # Errors
///
/// Returns [`Error::Algorithm`] if the step fails.
pub fn step<P, A>(state: &mut A::State, problem: &P, algorithm: &A) -> Result<(), Error>
where
    A: Algorithm<P>,
{
    algorithm.step(problem, state).map_err(Error::algorithm)
}

/// Advances the iteration counter by exactly one.
pub fn increment<S: State>(state: &mut S) {
    state.increment();
}

/// Runs the algorithm from the state's current iteration until it finishes.
///
/// Returns the final evaluation, whose reason and convergence flag describe
/// why the run stopped. A state that is already finished returns at once.
///
/// # Errors
///
/// Returns an error if a step fails or the criterion state does not match.
pub fn solve_in_place<P, A>(
    state: &mut A::State,
    problem: &P,
    algorithm: &A,
) -> Result<Evaluation, Error>
where
    A: Algorithm<P>,
{
    solve_in_place_observed(state, problem, algorithm, ())
}

/// Runs the algorithm like [`solve_in_place`], reporting progress to `observer`.
///
/// The observer receives [`Event::Stepped`] after each step, before the
/// iteration is incremented, and [`Event::Finished`] once at the end.
///
/// # Errors
///
/// Returns an error if a step fails or the criterion state does not match.
#[instrument(skip_all, level = "debug")]
pub fn solve_in_place_observed<P, A, Obs>(
    state: &mut A::State,
    problem: &P,
    algorithm: &A,
    mut observer: Obs,
) -> Result<Evaluation, Error>
where
    A: Algorithm<P>,
    Obs: for<'a> Observer<Event<'a, A::State>>,
{
    debug!(iteration = state.iteration(), "run started");

    loop {
        let evaluation = evaluate_state(problem, algorithm, state)?;
        if evaluation.stopped {
            info!(
                iterations = state.iteration(),
                converged = evaluation.converged,
                reason = %evaluation.reason,
                "run finished"
            );
            observer.observe(&Event::Finished {
                evaluation: &evaluation,
                state: &*state,
            });
            return Ok(evaluation);
        }

        step(state, problem, algorithm)?;
        trace!(iteration = state.iteration(), "step complete");
        observer.observe(&Event::Stepped {
            iteration: state.iteration(),
            state: &*state,
        });

        increment(state);
    }
}

/// Initializes a state from `options` and runs it to completion.
///
/// # Errors
///
/// Returns an error if initialization or any step fails.
#[instrument(skip_all, level = "debug")]
pub fn solve<P, A>(problem: &P, algorithm: &A, options: A::Options) -> Result<A::State, Error>
where
    A: Algorithm<P>,
{
    let mut state = initialize_state(problem, algorithm, options)?;
    solve_in_place(&mut state, problem, algorithm)?;
    Ok(state)
}
