use std::error::Error as StdError;

use thiserror::Error;

use super::bracket::BracketError;

/// Errors that can occur during bisection solving.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid bracket: {0}")]
    InvalidBracket(#[from] BracketError),

    #[error(
        "residual does not change sign on [{left}, {right}] \
         (residuals {left_residual} and {right_residual})"
    )]
    NoSignChange {
        left: f64,
        right: f64,
        left_residual: f64,
        right_residual: f64,
    },

    #[error("no convergence after {iters} iterations (best x = {best_x}, residual = {best_residual})")]
    MaxIters {
        iters: usize,
        best_x: f64,
        best_residual: f64,
    },

    #[error("non-finite residual {residual} at x = {x}")]
    NonFiniteResidual { x: f64, residual: f64 },

    #[error("residual evaluation failed")]
    Residual(#[source] Box<dyn StdError + Send + Sync>),
}
