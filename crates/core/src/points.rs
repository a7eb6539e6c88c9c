//! Finite point sets for grid reductions.
//!
//! A [`PointSource`] produces a repeatable sequence of points. The grid engine
//! pulls from [`PointSource::points`] once per reduction pass, so every call
//! must yield the same sequence.

use std::f64::consts::PI;

use thiserror::Error;

/// A point in the two-dimensional Brillouin zone, `[kx, ky]`.
pub type Point2 = [f64; 2];

/// Errors that can occur when building a range or lattice.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum RangeError {
    /// Fewer than two points were requested.
    #[error("a range needs at least 2 points, got {count}")]
    TooFewPoints { count: usize },

    /// One or both endpoints are non-finite.
    #[error("range endpoints must be finite: [{left}, {right}]")]
    NonFinite { left: f64, right: f64 },
}

/// Returns `count` values evenly spaced over `[left, right]`.
///
/// Both endpoints are included and the spacing is `(right - left) / (count - 1)`.
///
/// # Errors
///
/// Returns an error if `count < 2` or either endpoint is non-finite.
#[allow(clippy::cast_precision_loss)]
pub fn make_range(left: f64, right: f64, count: usize) -> Result<Vec<f64>, RangeError> {
    let step = range_step(left, right, count)?;
    Ok((0..count).map(|i| left + i as f64 * step).collect())
}

/// Returns `(x + step, x - step)`.
#[must_use]
pub fn plus_minus(x: f64, step: f64) -> (f64, f64) {
    (x + step, x - step)
}

#[allow(clippy::cast_precision_loss)]
fn range_step(left: f64, right: f64, count: usize) -> Result<f64, RangeError> {
    if !left.is_finite() || !right.is_finite() {
        return Err(RangeError::NonFinite { left, right });
    }
    if count < 2 {
        return Err(RangeError::TooFewPoints { count });
    }

    Ok((right - left) / (count - 1) as f64)
}

/// A finite, restartable sequence of points to reduce over.
pub trait PointSource {
    type Point: Send;

    /// Returns the number of points a full pass yields.
    fn len(&self) -> usize;

    /// Returns true if a pass yields no points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a fresh iterator over every point, in a fixed order.
    fn points(&self) -> impl Iterator<Item = Self::Point> + '_;
}

impl PointSource for [f64] {
    type Point = f64;

    fn len(&self) -> usize {
        <[f64]>::len(self)
    }

    fn points(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().copied()
    }
}

/// A square lattice of `n × n` points.
///
/// Both axes share the same inclusive extent and spacing as [`make_range`].
/// Points are produced in row-major order: `kx` varies slowest.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareLattice {
    axis: Vec<f64>,
}

impl SquareLattice {
    /// Creates a lattice with `points_per_side` points on each axis of `extent`.
    ///
    /// # Errors
    ///
    /// Returns an error if `points_per_side < 2` or the extent is non-finite.
    pub fn new(extent: [f64; 2], points_per_side: usize) -> Result<Self, RangeError> {
        let [left, right] = extent;
        let axis = make_range(left, right, points_per_side)?;
        Ok(Self { axis })
    }

    /// Creates a lattice covering the first Brillouin zone, `[-π, π]` on each axis.
    ///
    /// # Errors
    ///
    /// Returns an error if `points_per_side < 2`.
    pub fn brillouin_zone(points_per_side: usize) -> Result<Self, RangeError> {
        Self::new([-PI, PI], points_per_side)
    }

    /// Returns the number of points on each side.
    #[must_use]
    pub fn points_per_side(&self) -> usize {
        self.axis.len()
    }

    /// Returns the coordinates shared by both axes.
    #[must_use]
    pub fn axis(&self) -> &[f64] {
        &self.axis
    }
}

impl PointSource for SquareLattice {
    type Point = Point2;

    fn len(&self) -> usize {
        self.axis.len() * self.axis.len()
    }

    fn points(&self) -> impl Iterator<Item = Point2> + '_ {
        self.axis
            .iter()
            .flat_map(move |&kx| self.axis.iter().map(move |&ky| [kx, ky]))
    }
}
