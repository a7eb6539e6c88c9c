/// Adds `value` to a running compensated sum.
///
/// Returns the new `(sum, compensation)` pair. The compensation holds the
/// low-order bits lost by the previous addition and is subtracted from the next
/// value before it is added, so the accumulated error stays near `N·ε·|sum|`
/// instead of growing with the running total.
#[must_use]
pub fn kahan_sum(value: f64, sum: f64, compensation: f64) -> (f64, f64) {
    let y = value - compensation;
    let next = sum + y;
    let next_compensation = (next - sum) - y;
    (next, next_compensation)
}

/// A running sum with Kahan compensation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    /// Creates an empty sum.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sum after adding `value`.
    #[must_use]
    pub fn add(self, value: f64) -> Self {
        let (sum, compensation) = kahan_sum(value, self.sum, self.compensation);
        Self { sum, compensation }
    }

    /// Combines two partial sums.
    ///
    /// The other sum is added first, then its outstanding compensation is
    /// removed, both through [`kahan_sum`]. Neither input's error bound is lost.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        self.add(other.sum).add(-other.compensation)
    }

    /// Returns the current sum.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.sum
    }

    /// Returns the outstanding compensation term.
    #[must_use]
    pub fn compensation(&self) -> f64 {
        self.compensation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    const N: usize = 1_000_000;

    #[test]
    fn beats_naive_summation() {
        let value = 0.1;

        #[allow(clippy::cast_precision_loss)]
        let exact = value * N as f64;

        let naive: f64 = std::iter::repeat_n(value, N).sum();
        let compensated = std::iter::repeat_n(value, N).fold(CompensatedSum::new(), CompensatedSum::add);

        let naive_error = (naive - exact).abs();
        let compensated_error = (compensated.value() - exact).abs();

        assert!(naive_error > 0.0);
        assert!(compensated_error < naive_error);
        assert!(compensated_error < 1e-9);
    }

    #[test]
    fn recovers_small_terms_next_to_large_ones() {
        let sum = CompensatedSum::new()
            .add(1.0)
            .add(1e-16)
            .add(1e-16)
            .add(1e-16)
            .add(1e-16);

        assert_relative_eq!(sum.value(), 1.0 + 4e-16, epsilon = 1e-16);
    }

    #[test]
    fn merge_matches_sequential_sum() {
        let values: Vec<f64> = (1..=1000).map(|i| 1.0 / f64::from(i)).collect();
        let (left, right) = values.split_at(377);

        let sequential = values.iter().copied().fold(CompensatedSum::new(), CompensatedSum::add);
        let merged = left
            .iter()
            .copied()
            .fold(CompensatedSum::new(), CompensatedSum::add)
            .merge(right.iter().copied().fold(CompensatedSum::new(), CompensatedSum::add));

        assert_relative_eq!(merged.value(), sequential.value(), epsilon = 1e-14);
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let sum = CompensatedSum::new().add(3.5).add(0.25);
        assert_eq!(sum.merge(CompensatedSum::new()).value(), sum.value());
        assert_eq!(CompensatedSum::new().merge(sum).value(), sum.value());
    }

    #[test]
    fn primitive_tracks_lost_bits() {
        let (sum, compensation) = kahan_sum(1e-16, 1.0, 0.0);
        assert_eq!(sum, 1.0);
        assert!(compensation < 0.0);
    }
}
