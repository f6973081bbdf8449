use thiserror::Error;

/// Errors reported while initializing a state from algorithm options.
///
/// A missing required option is always reported. Algorithms only fall back to
/// a value when they document that default.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("missing required option `{name}`")]
    Missing { name: &'static str },

    #[error("invalid option `{name}`: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl OptionsError {
    /// Creates an error for a required option that was not provided.
    #[must_use]
    pub fn missing(name: &'static str) -> Self {
        Self::Missing { name }
    }

    /// Creates an error for an option whose value was rejected.
    #[must_use]
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            reason: reason.into(),
        }
    }

    /// Returns `Ok(value)` if the option is present, otherwise a missing error.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Missing`] if `value` is `None`.
    pub fn require<T>(name: &'static str, value: Option<T>) -> Result<T, Self> {
        value.ok_or(Self::Missing { name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_passes_through_present_values() {
        assert_eq!(OptionsError::require("x0", Some(3)), Ok(3));
    }

    #[test]
    fn require_reports_missing_values() {
        let err = OptionsError::require::<f64>("x0", None).unwrap_err();
        assert_eq!(err, OptionsError::missing("x0"));
        assert_eq!(err.to_string(), "missing required option `x0`");
    }

    #[test]
    fn invalid_formats_reason() {
        let err = OptionsError::invalid("x0", "must be finite");
        assert_eq!(err.to_string(), "invalid option `x0`: must be finite");
    }
}
