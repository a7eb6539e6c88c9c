//! Priority-cascaded solving of coupled scalar equations.
//!
//! Equations are ordered by priority: index 0 is the cheapest or most
//! sensitive and is re-solved most often. The solver admits equations one at
//! a time. Each time a new equation joins, every admitted equation is
//! re-solved from the newest back to the first, and that cycle repeats until
//! all admitted residuals are below the tolerance together.
//!
//! ```text
//! stage 0: E0
//! stage 1: E1 E0, E1 E0, ...
//! stage 2: E2 E1 E0, E2 E1 E0, ...
//! ```

mod config;
mod equation;
mod error;
mod report;

pub use config::{Config, ConfigError};
pub use equation::{BracketRule, Equation, Scalar};
pub use error::Error;
pub use report::Report;

use std::error::Error as StdError;

use tracing::{debug, info, warn};

use crate::bisection;

/// Solves one equation for its value, writing the root into `state`.
///
/// Each trial value is written into `state` before the residual is evaluated,
/// so the residual sees the candidate. On success the root is left in
/// `state`. On failure the value held before the call is restored.
///
/// # Errors
///
/// Returns [`Error::Solve`] naming the equation if bisection fails.
pub fn solve_one<S, Q>(
    equation: &Q,
    state: &mut S,
    config: &bisection::Config,
) -> Result<bisection::Solution, Error>
where
    Q: Equation<S> + ?Sized,
{
    let original = equation.value(state);
    let bracket = equation.bracket(state);

    let result = bisection::solve_unobserved(
        |x| {
            equation.set_value(state, x);
            equation.residual(state)
        },
        bracket,
        config,
    );

    match result {
        Ok(solution) => {
            equation.set_value(state, solution.x);
            Ok(solution)
        }
        Err(source) => {
            equation.set_value(state, original);
            Err(Error::Solve {
                equation: equation.name().to_owned(),
                source,
            })
        }
    }
}

/// Drives every equation to convergence using the cascade protocol.
///
/// Stage `k` admits `equations[k]` and cycles over `equations[k]` down to
/// `equations[0]` until the largest admitted residual magnitude is below the
/// configured tolerance. Each stage runs at least one cycle.
///
/// # Errors
///
/// Returns an error if any single-equation solve fails, a residual cannot be
/// evaluated or is not finite, or a stage exceeds `max_cycles` without
/// converging.
pub fn solve<S, E>(
    equations: &[&dyn Equation<S, Error = E>],
    state: &mut S,
    config: &Config,
) -> Result<Report, Error>
where
    E: StdError + Send + Sync + 'static,
{
    let tolerance = config.tolerance();
    let mut report = Report::new(equations.len());

    for (frontier, newest) in equations.iter().enumerate() {
        info!(equation = newest.name(), frontier, "admitting equation");

        let admitted = &equations[..=frontier];
        let mut cycles = 0;

        loop {
            cycles += 1;
            for (index, equation) in admitted.iter().enumerate().rev() {
                solve_one(*equation, state, config.root())?;
                report.solves[index] += 1;
            }

            let residuals = residuals(admitted, state)?;
            let worst = report::worst(&residuals);
            debug!(frontier, cycle = cycles, worst, ?residuals, "cascade cycle");

            if tolerance.is_zero(worst) {
                break;
            }
            if cycles == config.max_cycles() {
                warn!(frontier, cycles, worst, "cascade stalled");
                return Err(Error::Stalled {
                    frontier,
                    cycles,
                    residuals,
                });
            }
        }

        report.stage_cycles.push(cycles);
    }

    report.residuals = residuals(equations, state)?;
    info!(
        equations = equations.len(),
        solves = report.solves.iter().sum::<usize>(),
        "cascade converged"
    );
    Ok(report)
}

/// Evaluates each equation's residual at the current state.
///
/// Non-finite residuals are errors, so a NaN can never pass the tolerance
/// check.
fn residuals<S, E>(
    equations: &[&dyn Equation<S, Error = E>],
    state: &S,
) -> Result<Vec<(String, f64)>, Error>
where
    E: StdError + Send + Sync + 'static,
{
    equations
        .iter()
        .map(|equation| {
            let name = equation.name().to_owned();
            match equation.residual(state) {
                Ok(residual) if residual.is_finite() => Ok((name, residual)),
                Ok(residual) => Err(Error::NonFiniteResidual {
                    equation: name,
                    residual,
                }),
                Err(source) => Err(Error::Residual {
                    equation: name,
                    source: Box::new(source),
                }),
            }
        })
        .collect()
}
