//! Reducers fold per-point evaluations into a single result.
//!
//! A reducer is a plain value. The engine calls [`Reducer::initialize`] once
//! per worker, moves each instance into its worker, threads it through
//! [`Reducer::absorb`], and combines the returned instances with
//! [`Reducer::merge`]. Because `absorb` and `merge` take `self` by value, an
//! instance can never be aliased across workers.

mod delta;
mod extremum;
mod mean;

pub use delta::{BinError, Delta, DeltaBinner};
pub use extremum::{Maximum, Minimum};
pub use mean::Mean;

/// A fold over per-point evaluations.
pub trait Reducer: Send + Sized {
    /// The value produced for each point.
    type Value;

    /// The final result of a reduction.
    type Output;

    /// Returns an empty instance with the same configuration as `self`.
    #[must_use]
    fn initialize(&self) -> Self;

    /// Returns the reducer after absorbing one point's value.
    #[must_use]
    fn absorb(self, value: Self::Value) -> Self;

    /// Combines two partial reductions.
    ///
    /// Merging must be associative. Floating-point rounding may still make the
    /// result depend on merge order in the last bits.
    #[must_use]
    fn merge(self, other: Self) -> Self;

    /// Returns the number of points absorbed.
    fn count(&self) -> u64;

    /// Returns the result of the reduction so far.
    fn result(&self) -> Self::Output;
}
