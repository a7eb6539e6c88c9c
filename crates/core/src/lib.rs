//! Core types for self-consistent lattice calculations.
//!
//! This crate defines the shared building blocks that the grid engine and the
//! solvers build on:
//!
//! - [`PointSource`] and [`SquareLattice`]: the finite point sets to reduce over
//! - [`make_range`]: evenly spaced values, inclusive of both endpoints
//! - [`CompensatedSum`] and [`kahan_sum`]: summation with bounded rounding error
//! - [`Tolerance`]: machine-epsilon based convergence thresholds
//! - [`Observer`]: receives solver events and optionally returns control actions
//! - [`Environment`]: the shared parameter state threaded through a run

pub mod environment;
mod observer;
pub mod points;
mod summation;
mod tolerance;

pub use environment::{EnvError, Environment};
pub use observer::Observer;
pub use points::{Point2, PointSource, RangeError, SquareLattice, make_range, plus_minus};
pub use summation::{CompensatedSum, kahan_sum};
pub use tolerance::{MACHINE_EPSILON, Tolerance, fuzzier_eq, fuzzy_eq};
