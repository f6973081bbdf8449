/// Errors that can occur during a gradient descent step.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("problem error: {0}")]
    Problem(Box<dyn std::error::Error + Send + Sync>),

    #[error("cost is not finite at the new iterate")]
    NonFiniteCost,
}
