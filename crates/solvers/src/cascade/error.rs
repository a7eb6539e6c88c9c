use std::error::Error as StdError;

use thiserror::Error;

use crate::bisection;

/// Errors that can occur while solving a cascade of equations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to solve `{equation}`")]
    Solve {
        equation: String,
        #[source]
        source: bisection::Error,
    },

    #[error("failed to evaluate the residual of `{equation}`")]
    Residual {
        equation: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("`{equation}` has a non-finite residual {residual}")]
    NonFiniteResidual { equation: String, residual: f64 },

    #[error("stage {frontier} did not converge after {cycles} cycles (residuals: {residuals:?})")]
    Stalled {
        frontier: usize,
        cycles: usize,
        residuals: Vec<(String, f64)>,
    },
}
