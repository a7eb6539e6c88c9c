//! Concurrent reductions over lattice point sets.
//!
//! A reduction pass evaluates a function at every point of a
//! [`PointSource`] and folds the results into a [`Reducer`]. Work is split
//! across a fixed number of scoped worker threads. Each worker owns a private
//! reducer, and the partial reducers are merged on the calling thread once
//! every worker has joined, so no reducer is ever shared between threads.
//!
//! # Reducers
//!
//! - [`Mean`]: compensated average of scalar values
//! - [`Minimum`] / [`Maximum`]: running extrema
//! - [`DeltaBinner`]: histogram of weighted delta terms
//!
//! [`PointSource`]: brillouin_core::PointSource

mod engine;
pub mod reducer;

pub use engine::{GridError, average, bin_deltas, maximum, minimum, reduce};
pub use reducer::{BinError, Delta, DeltaBinner, Maximum, Mean, Minimum, Reducer};
