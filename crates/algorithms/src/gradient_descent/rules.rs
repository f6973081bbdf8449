//! Convergence rules that read a [`DescentState`].
//!
//! Each rule is met while its measure is strictly below the tolerance. Rules
//! that compare against the previous iterate are never met before the first
//! step.

use cadence_core::StoppingRule;

use super::{ConfigError, DescentState, GradientDescent, config::tolerance};

/// Met while the gradient norm is below the tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientNormBelow {
    tolerance: f64,
}

impl GradientNormBelow {
    /// Creates the rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Tolerance`] if `tolerance` is negative or not finite.
    pub fn new(tolerance: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            tolerance: self::tolerance(tolerance)?,
        })
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl<P, const N: usize> StoppingRule<P, GradientDescent<P, N>, DescentState<N>>
    for GradientNormBelow
{
    fn is_met(
        &self,
        _problem: &P,
        _algorithm: &GradientDescent<P, N>,
        state: &DescentState<N>,
    ) -> bool {
        state.gradient_norm() < self.tolerance
    }

    fn describe(&self) -> String {
        format!("Gradient Norm (< {:e})", self.tolerance)
    }
}

/// Met while the magnitude of the last cost change is below the tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostChangeBelow {
    tolerance: f64,
}

impl CostChangeBelow {
    /// Creates the rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Tolerance`] if `tolerance` is negative or not finite.
    pub fn new(tolerance: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            tolerance: self::tolerance(tolerance)?,
        })
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl<P, const N: usize> StoppingRule<P, GradientDescent<P, N>, DescentState<N>>
    for CostChangeBelow
{
    fn is_met(
        &self,
        _problem: &P,
        _algorithm: &GradientDescent<P, N>,
        state: &DescentState<N>,
    ) -> bool {
        state.cost_decrease().map(f64::abs).is_some_and(|value| value < self.tolerance)
    }

    fn describe(&self) -> String {
        format!("Cost Change (< {:e})", self.tolerance)
    }
}

/// Met while the length of the last step is below the tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterateChangeBelow {
    tolerance: f64,
}

impl IterateChangeBelow {
    /// Creates the rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Tolerance`] if `tolerance` is negative or not finite.
    pub fn new(tolerance: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            tolerance: self::tolerance(tolerance)?,
        })
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl<P, const N: usize> StoppingRule<P, GradientDescent<P, N>, DescentState<N>>
    for IterateChangeBelow
{
    fn is_met(
        &self,
        _problem: &P,
        _algorithm: &GradientDescent<P, N>,
        state: &DescentState<N>,
    ) -> bool {
        state.step_norm().is_some_and(|value| value < self.tolerance)
    }

    fn describe(&self) -> String {
        format!("Iterate Change (< {:e})", self.tolerance)
    }
}
