use brillouin_core::CompensatedSum;

use super::Reducer;

/// Averages scalar values with compensated summation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    sum: CompensatedSum,
    count: u64,
}

impl Mean {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compensated sum of absorbed values.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.sum.value()
    }
}

impl Reducer for Mean {
    type Value = f64;
    type Output = f64;

    fn initialize(&self) -> Self {
        Self::new()
    }

    fn absorb(self, value: f64) -> Self {
        Self {
            sum: self.sum.add(value),
            count: self.count + 1,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            sum: self.sum.merge(other.sum),
            count: self.count + other.count,
        }
    }

    fn count(&self) -> u64 {
        self.count
    }

    /// Returns `sum / count`, which is NaN when nothing was absorbed.
    #[allow(clippy::cast_precision_loss)]
    fn result(&self) -> f64 {
        self.sum.value() / self.count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn absorb_all(values: impl IntoIterator<Item = f64>) -> Mean {
        values.into_iter().fold(Mean::new(), Mean::absorb)
    }

    #[test]
    fn averages_values() {
        let mean = absorb_all([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(mean.count(), 4);
        assert_relative_eq!(mean.sum(), 10.0);
        assert_relative_eq!(mean.result(), 2.5);
    }

    #[test]
    fn empty_mean_is_nan() {
        assert!(Mean::new().result().is_nan());
    }

    #[test]
    fn merge_combines_counts_and_sums() {
        let merged = absorb_all([1.0, 2.0]).merge(absorb_all([3.0, 4.0, 5.0]));
        assert_eq!(merged.count(), 5);
        assert_relative_eq!(merged.result(), 3.0);
    }

    #[test]
    fn merge_is_associative() {
        let a = absorb_all((0..100).map(|i| 0.1 * f64::from(i)));
        let b = absorb_all((0..57).map(|i| 1.0 / f64::from(i + 1)));
        let c = absorb_all([1e8, -1e8, 3.0]);

        let left = a.merge(b).merge(c);
        let right = a.merge(b.merge(c));

        assert_eq!(left.count(), right.count());
        assert_relative_eq!(left.result(), right.result(), epsilon = 1e-12);
    }

    #[test]
    fn initialize_discards_state() {
        let mean = absorb_all([5.0, 6.0]);
        let fresh = mean.initialize();
        assert_eq!(fresh.count(), 0);
        assert_eq!(fresh, Mean::new());
    }
}
