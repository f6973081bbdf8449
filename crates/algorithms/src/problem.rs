/// A scalar cost over `N` variables with an analytic gradient.
///
/// The const generic `N` is the number of variables. For example, `N = 2`
/// represents a cost over the plane.
pub trait DifferentiableProblem<const N: usize> {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Computes the cost at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the cost is undefined at `x`.
    fn cost(&self, x: &[f64; N]) -> Result<f64, Self::Error>;

    /// Computes the gradient of the cost at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the gradient is undefined at `x`.
    fn gradient(&self, x: &[f64; N]) -> Result<[f64; N], Self::Error>;
}
