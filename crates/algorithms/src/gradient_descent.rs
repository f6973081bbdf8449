//! Fixed-step gradient descent for problems with an analytic gradient.
//!
//! # Algorithm
//!
//! Each step moves the iterate against the gradient:
//!
//! ```text
//! x⁽ᵏ⁺¹⁾ = x⁽ᵏ⁾ - α ∇f(x⁽ᵏ⁾)
//! ```
//!
//! where `α` is [`Config::step_size`]. A step longer than
//! [`Config::max_step_norm`] is shortened to that length, which keeps the
//! first steps on steep problems from overshooting.
//!
//! # Stopping
//!
//! The algorithm owns a [`Criterion`] and runs until it indicates to stop.
//! The rules in this module ([`GradientNormBelow`], [`CostChangeBelow`],
//! [`IterateChangeBelow`]) indicate convergence; combine them with an
//! iteration or duration limit to bound the run:
//!
//! ```ignore
//! let criterion = Criterion::rule(GradientNormBelow::new(1e-8)?)
//!     | Criterion::after_iteration(10_000);
//! ```
//!
//! A group only reports convergence when every child does, so a run stopped
//! by the group above never reports it, even when the gradient rule fired.
//! Inspect [`DescentState::gradient_norm`] to tell the cases apart.

mod config;
mod error;
mod rules;
mod state;


use std::fmt;

use cadence_core::{Algorithm, Criterion, CriterionState, OptionsError};
use tracing::trace;

pub use config::{Config, ConfigError};
pub use error::Error;
pub use rules::{CostChangeBelow, GradientNormBelow, IterateChangeBelow};
pub use state::{DescentState, Options};

use crate::DifferentiableProblem;

use state::Previous;

/// Fixed-step gradient descent over `N` variables.
pub struct GradientDescent<P, const N: usize> {
    config: Config,
    criterion: Criterion<P, GradientDescent<P, N>, DescentState<N>>,
}

impl<P, const N: usize> GradientDescent<P, N> {
    /// Creates the algorithm from its step configuration and stopping criterion.
    #[must_use]
    pub fn new(
        config: Config,
        criterion: Criterion<P, GradientDescent<P, N>, DescentState<N>>,
    ) -> Self {
        Self { config, criterion }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<P, const N: usize> fmt::Debug for GradientDescent<P, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientDescent")
            .field("config", &self.config)
            .field("criterion", &self.criterion)
            .finish()
    }
}

impl<P, const N: usize> Algorithm<P> for GradientDescent<P, N>
where
    P: DifferentiableProblem<N>,
{
    type State = DescentState<N>;
    type Options = Options<N>;
    type Error = Error;

    fn stopping_criterion(&self) -> &Criterion<P, Self, DescentState<N>> {
        &self.criterion
    }

    fn initialize_state(
        &self,
        problem: &P,
        options: Options<N>,
    ) -> Result<DescentState<N>, OptionsError> {
        let x = OptionsError::require("x0", options.x0)?;
        let (cost, gradient) = evaluate_start(problem, &x)?;

        Ok(DescentState {
            iteration: 0,
            x,
            cost,
            gradient,
            previous: None,
            stopping_criterion_state: CriterionState::new(&self.criterion),
        })
    }

    fn reinitialize_state(
        &self,
        state: &mut DescentState<N>,
        problem: &P,
        options: Options<N>,
    ) -> Result<(), OptionsError> {
        if let Some(x) = options.x0 {
            let (cost, gradient) = evaluate_start(problem, &x)?;
            state.x = x;
            state.cost = cost;
            state.gradient = gradient;
        }
        state.previous = None;
        Ok(())
    }

    fn step(&self, problem: &P, state: &mut DescentState<N>) -> Result<(), Error> {
        let mut scale = self.config.step_size();
        let length = scale * state.gradient_norm();
        if length > self.config.max_step_norm() {
            scale *= self.config.max_step_norm() / length;
        }

        let x: [f64; N] = std::array::from_fn(|i| state.x[i] - scale * state.gradient[i]);
        let cost = problem
            .cost(&x)
            .map_err(|err| Error::Problem(Box::new(err)))?;
        if !cost.is_finite() {
            return Err(Error::NonFiniteCost);
        }
        let gradient = problem
            .gradient(&x)
            .map_err(|err| Error::Problem(Box::new(err)))?;

        trace!(iteration = state.iteration, cost, scale, "descent step");

        state.previous = Some(Previous {
            x: state.x,
            cost: state.cost,
        });
        state.x = x;
        state.cost = cost;
        state.gradient = gradient;
        Ok(())
    }
}

/// Evaluates the cost and gradient at a starting point.
fn evaluate_start<P, const N: usize>(
    problem: &P,
    x: &[f64; N],
) -> Result<(f64, [f64; N]), OptionsError>
where
    P: DifferentiableProblem<N>,
{
    let invalid = |err: P::Error| OptionsError::invalid("x0", err.to_string());

    let cost = problem.cost(x).map_err(invalid)?;
    if !cost.is_finite() {
        return Err(OptionsError::invalid("x0", "cost is not finite"));
    }
    let gradient = problem.gradient(x).map_err(invalid)?;

    Ok((cost, gradient))
}
