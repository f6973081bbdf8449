use thiserror::Error;

/// Configuration for fixed-step gradient descent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    step_size: f64,
    max_step_norm: f64,
}

/// Errors that can occur when validating gradient descent settings.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("step_size must be finite and positive")]
    StepSize,

    #[error("max_step_norm must be positive")]
    MaxStepNorm,

    #[error("tolerance must be finite and non-negative")]
    Tolerance,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step_size: 1e-3,
            max_step_norm: f64::INFINITY,
        }
    }
}

impl Config {
    /// Creates a new config with a validated step size and step limit.
    ///
    /// Each step moves `step_size` times the negative gradient, shortened to
    /// `max_step_norm` if it would be longer. Pass `f64::INFINITY` to never
    /// shorten a step.
    ///
    /// # Errors
    ///
    /// Returns an error if `step_size` is not finite and positive, or if
    /// `max_step_norm` is not positive.
    pub fn new(step_size: f64, max_step_norm: f64) -> Result<Self, ConfigError> {
        if !step_size.is_finite() || step_size <= 0.0 {
            return Err(ConfigError::StepSize);
        }
        if max_step_norm.is_nan() || max_step_norm <= 0.0 {
            return Err(ConfigError::MaxStepNorm);
        }

        Ok(Self {
            step_size,
            max_step_norm,
        })
    }

    /// Returns the multiplier applied to the negative gradient.
    #[must_use]
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Returns the longest step the algorithm will take.
    #[must_use]
    pub fn max_step_norm(&self) -> f64 {
        self.max_step_norm
    }
}

/// Validates a stopping rule tolerance.
pub(super) fn tolerance(value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Tolerance)
    }
}
