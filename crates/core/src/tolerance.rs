/// Upper bound on the relative rounding error of an `f64` operation, `2^-53`.
pub const MACHINE_EPSILON: f64 = 1.0 / 9_007_199_254_740_992.0;

/// Returns true if `x` and `y` are within [`MACHINE_EPSILON`] of one another.
#[must_use]
pub fn fuzzy_eq(x: f64, y: f64) -> bool {
    (x - y).abs() < MACHINE_EPSILON
}

/// Returns true if `x` and `y` are within `64 ·` [`MACHINE_EPSILON`] of one another.
#[must_use]
pub fn fuzzier_eq(x: f64, y: f64) -> bool {
    (x - y).abs() < 64.0 * MACHINE_EPSILON
}

/// A positive threshold below which a residual counts as zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Tolerance(f64);

impl Tolerance {
    /// Machine epsilon itself.
    #[must_use]
    pub fn machine() -> Self {
        Self(MACHINE_EPSILON)
    }

    /// Machine epsilon multiplied by `factor`.
    #[must_use]
    pub fn scaled(factor: u32) -> Self {
        Self(MACHINE_EPSILON * f64::from(factor.max(1)))
    }

    /// Returns the threshold value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns true if `|residual|` is strictly below the threshold.
    #[must_use]
    pub fn is_zero(self, residual: f64) -> bool {
        residual.abs() < self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::machine()
    }
}

impl From<Tolerance> for f64 {
    fn from(tolerance: Tolerance) -> Self {
        tolerance.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_epsilon_is_half_ulp_of_one() {
        assert_eq!(MACHINE_EPSILON, f64::EPSILON / 2.0);
        assert_eq!(1.0 + MACHINE_EPSILON, 1.0);
    }

    #[test]
    fn fuzzy_comparisons() {
        assert!(fuzzy_eq(1.0, 1.0 + f64::EPSILON / 4.0));
        assert!(!fuzzy_eq(1.0, 1.0 + 1e-12));
        assert!(fuzzier_eq(0.0, 10.0 * MACHINE_EPSILON));
        assert!(!fuzzier_eq(0.0, 100.0 * MACHINE_EPSILON));
    }

    #[test]
    fn scaled_tolerance() {
        let tol = Tolerance::scaled(1 << 10);
        assert_eq!(tol.value(), 1024.0 * MACHINE_EPSILON);
        assert!(tol.is_zero(-1e-14));
        assert!(!tol.is_zero(1e-12));
        assert_eq!(Tolerance::scaled(0), Tolerance::machine());
    }
}
