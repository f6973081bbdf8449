use std::error::Error as StdError;

use thiserror::Error;

use crate::{OptionsError, StructureError};

/// Errors surfaced by the execution loop.
///
/// Nothing is retried internally: a failed initialization, a mismatched
/// criterion state, or a failed step is returned to the caller as-is.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid options: {0}")]
    Options(#[from] OptionsError),

    #[error("stopping criterion state is corrupt: {0}")]
    Structure(#[from] StructureError),

    #[error("algorithm step failed")]
    Algorithm(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn algorithm<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Algorithm(Box::new(err))
    }
}
