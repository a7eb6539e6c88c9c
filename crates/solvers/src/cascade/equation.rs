use std::{error::Error as StdError, marker::PhantomData};

use brillouin_core::plus_minus;

/// A scalar equation that determines one value of a shared state.
///
/// The residual is signed and must change sign across the bracket for the
/// equation to be solvable by bisection.
pub trait Equation<S> {
    type Error: StdError + Send + Sync + 'static;

    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Evaluates the signed residual at the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the residual cannot be evaluated.
    fn residual(&self, state: &S) -> Result<f64, Self::Error>;

    /// Returns the value this equation determines.
    fn value(&self, state: &S) -> f64;

    /// Writes the value this equation determines.
    fn set_value(&self, state: &mut S, value: f64);

    /// Returns the bisection bracket to search from the current state.
    fn bracket(&self, state: &S) -> [f64; 2];
}

/// How a [`Scalar`] equation picks its bisection bracket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BracketRule {
    /// Always search the same interval.
    Fixed([f64; 2]),
    /// Search `step` either side of the current value.
    Around { step: f64 },
}

impl BracketRule {
    /// Returns the bracket for a current `value`.
    #[must_use]
    pub fn bracket(&self, value: f64) -> [f64; 2] {
        match *self {
            Self::Fixed(bracket) => bracket,
            Self::Around { step } => {
                let (above, below) = plus_minus(value, step);
                [below, above]
            }
        }
    }
}

/// An [`Equation`] assembled from a residual closure and field accessors.
pub struct Scalar<S, F, E> {
    name: String,
    residual: F,
    get: fn(&S) -> f64,
    set: fn(&mut S, f64),
    rule: BracketRule,
    error: PhantomData<fn() -> E>,
}

impl<S, F, E> Scalar<S, F, E>
where
    F: Fn(&S) -> Result<f64, E>,
    E: StdError + Send + Sync + 'static,
{
    /// Creates an equation named `name` that solves `residual(state) = 0` for
    /// the value read by `get` and written by `set`.
    pub fn new(
        name: impl Into<String>,
        residual: F,
        get: fn(&S) -> f64,
        set: fn(&mut S, f64),
        rule: BracketRule,
    ) -> Self {
        Self {
            name: name.into(),
            residual,
            get,
            set,
            rule,
            error: PhantomData,
        }
    }
}

impl<S, F, E> Equation<S> for Scalar<S, F, E>
where
    F: Fn(&S) -> Result<f64, E>,
    E: StdError + Send + Sync + 'static,
{
    type Error = E;

    fn name(&self) -> &str {
        &self.name
    }

    fn residual(&self, state: &S) -> Result<f64, E> {
        (self.residual)(state)
    }

    fn value(&self, state: &S) -> f64 {
        (self.get)(state)
    }

    fn set_value(&self, state: &mut S, value: f64) {
        (self.set)(state, value);
    }

    fn bracket(&self, state: &S) -> [f64; 2] {
        self.rule.bracket(self.value(state))
    }
}
