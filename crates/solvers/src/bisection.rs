//! Bracketed bisection for a single scalar residual.
//!
//! The residual is any `FnMut(f64) -> Result<f64, E>`, so callers can close
//! over mutable state (for example, writing each trial value into a shared
//! parameter record before evaluating it).

mod action;
mod best;
mod bracket;
mod config;
mod error;
mod event;
mod solution;

pub use action::Action;
pub use bracket::BracketError;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use std::error::Error as StdError;

use brillouin_core::Observer;
use tracing::trace;

use best::Best;
use bracket::{Bounds, Bracket, Sign};

/// Finds a root of `residual` within `bracket` using the bisection method.
///
/// If either endpoint already satisfies the residual tolerance it is returned
/// with zero iterations. Otherwise the bracket is halved, keeping the half
/// where the residual changes sign, until the bracket width or the midpoint
/// residual meets the configured tolerances.
///
/// Observers see each midpoint evaluation and may stop the solver early, in
/// which case the best point seen so far is returned.
///
/// # Errors
///
/// Returns an error if the bracket is invalid, the residual does not change
/// sign across it, an evaluation fails or is non-finite, or `max_iters` is
/// reached without convergence.
pub fn solve<F, E, Obs>(
    mut residual: F,
    bracket: [f64; 2],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: StdError + Send + Sync + 'static,
    Obs: Observer<Event, Action>,
{
    let bounds = Bounds::new(bracket)?;
    let [left, right] = bounds.as_array();

    let left_residual = evaluate(&mut residual, left)?;
    if left_residual.abs() <= config.residual_tol() {
        return Ok(Best::new(left, left_residual).finish(Status::Converged, 0));
    }

    let right_residual = evaluate(&mut residual, right)?;
    if right_residual.abs() <= config.residual_tol() {
        return Ok(Best::new(right, right_residual).finish(Status::Converged, 0));
    }

    let left_sign = Sign::of(left_residual);
    if left_sign == Sign::of(right_residual) {
        return Err(Error::NoSignChange {
            left,
            right,
            left_residual,
            right_residual,
        });
    }

    let mut bracket = Bracket::new(bounds, left_sign);
    let mut best = Best::new(left, left_residual);
    best.update(right, right_residual);

    for iter in 1..=config.max_iters() {
        let x = bracket.midpoint();
        let value = evaluate(&mut residual, x)?;
        best.update(x, value);

        trace!(iter, x, residual = value, "bisection step");

        let event = Event {
            iter,
            x,
            residual: value,
            bracket: bracket.as_array(),
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(best.finish(Status::StoppedByObserver, iter));
        }

        if value.abs() <= config.residual_tol()
            || bracket.is_x_converged(config.x_abs_tol(), config.x_rel_tol())
        {
            return Ok(Best::new(x, value).finish(Status::Converged, iter));
        }

        bracket.shrink(x, Sign::of(value));
    }

    Err(Error::MaxIters {
        iters: config.max_iters(),
        best_x: best.x(),
        best_residual: best.residual(),
    })
}

/// Runs bisection without observation.
///
/// # Errors
///
/// Returns an error under the same conditions as [`solve`].
pub fn solve_unobserved<F, E>(
    residual: F,
    bracket: [f64; 2],
    config: &Config,
) -> Result<Solution, Error>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: StdError + Send + Sync + 'static,
{
    solve(residual, bracket, config, ())
}

/// Evaluates the residual at `x`, rejecting failures and non-finite values.
fn evaluate<F, E>(residual: &mut F, x: f64) -> Result<f64, Error>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: StdError + Send + Sync + 'static,
{
    let value = residual(x).map_err(|error| Error::Residual(Box::new(error)))?;
    if !value.is_finite() {
        return Err(Error::NonFiniteResidual { x, residual: value });
    }
    Ok(value)
}
