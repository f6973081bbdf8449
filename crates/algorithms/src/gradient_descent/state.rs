use cadence_core::{CriterionState, State};

/// Initial values for a gradient descent run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Options<const N: usize> {
    /// The starting point. Required for a fresh run; a restart without it
    /// continues from the current iterate.
    pub x0: Option<[f64; N]>,
}

impl<const N: usize> Options<N> {
    /// Options that start (or restart) from `x0`.
    #[must_use]
    pub fn starting_at(x0: [f64; N]) -> Self {
        Self { x0: Some(x0) }
    }
}

/// The per-run data of gradient descent.
#[derive(Debug, Clone, PartialEq, State)]
pub struct DescentState<const N: usize> {
    pub(super) iteration: usize,
    #[state(iterate)]
    pub(super) x: [f64; N],
    pub(super) cost: f64,
    pub(super) gradient: [f64; N],
    pub(super) previous: Option<Previous<N>>,
    pub(super) stopping_criterion_state: CriterionState,
}

/// The iterate and cost before the most recent step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Previous<const N: usize> {
    pub(super) x: [f64; N],
    pub(super) cost: f64,
}

impl<const N: usize> DescentState<N> {
    /// Returns the current iterate.
    #[must_use]
    pub fn x(&self) -> &[f64; N] {
        &self.x
    }

    /// Returns the cost at the current iterate.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns the gradient at the current iterate.
    #[must_use]
    pub fn gradient(&self) -> &[f64; N] {
        &self.gradient
    }

    /// Returns the Euclidean norm of the current gradient.
    #[must_use]
    pub fn gradient_norm(&self) -> f64 {
        norm(&self.gradient)
    }

    /// Returns how much the last step lowered the cost, if a step was taken.
    ///
    /// Negative when the cost went up.
    #[must_use]
    pub fn cost_decrease(&self) -> Option<f64> {
        self.previous.map(|previous| previous.cost - self.cost)
    }

    /// Returns the length of the last step, if a step was taken.
    #[must_use]
    pub fn step_norm(&self) -> Option<f64> {
        self.previous.map(|previous| {
            let delta: [f64; N] = std::array::from_fn(|i| self.x[i] - previous.x[i]);
            norm(&delta)
        })
    }
}

pub(super) fn norm<const N: usize>(v: &[f64; N]) -> f64 {
    v.iter().map(|vi| vi * vi).sum::<f64>().sqrt()
}
