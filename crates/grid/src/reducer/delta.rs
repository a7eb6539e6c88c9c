use brillouin_core::CompensatedSum;
use thiserror::Error;

use super::Reducer;

/// A weighted delta function at `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    pub position: f64,
    pub weight: f64,
}

impl Delta {
    #[must_use]
    pub fn new(position: f64, weight: f64) -> Self {
        Self { position, weight }
    }
}

/// Errors that can occur when configuring a [`DeltaBinner`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum BinError {
    #[error("bin count must be positive")]
    NoBins,

    #[error("bin range [{start}, {stop}) must be finite and non-empty")]
    InvalidRange { start: f64, stop: f64 },
}

/// Approximates a sum of delta functions with a histogram.
///
/// Each point evaluates to a list of [`Delta`] terms. A term's weight is added
/// to the bin whose range contains its position; positions outside
/// `[start, stop)` are dropped. Every bin keeps its own compensated sum.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaBinner {
    start: f64,
    stop: f64,
    bins: Vec<CompensatedSum>,
    count: u64,
}

impl DeltaBinner {
    /// Creates an empty binner with `bins` equal-width bins over `[start, stop)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `bins` is zero or the range is empty or non-finite.
    pub fn new(start: f64, stop: f64, bins: usize) -> Result<Self, BinError> {
        if bins == 0 {
            return Err(BinError::NoBins);
        }
        if !start.is_finite() || !stop.is_finite() || start >= stop {
            return Err(BinError::InvalidRange { start, stop });
        }

        Ok(Self {
            start,
            stop,
            bins: vec![CompensatedSum::new(); bins],
            count: 0,
        })
    }

    /// Returns the width of a single bin.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bin_width(&self) -> f64 {
        (self.stop - self.start) / self.bins.len() as f64
    }

    /// Returns the center of each bin.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bin_centers(&self) -> Vec<f64> {
        let width = self.bin_width();
        (0..self.bins.len())
            .map(|i| self.start + (i as f64 + 0.5) * width)
            .collect()
    }

    /// Returns the compensated sum over all bins.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.bins
            .iter()
            .fold(CompensatedSum::new(), |acc, bin| acc.merge(*bin))
            .value()
    }

    /// Returns the bin containing `position`, if any.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn bin_index(&self, position: f64) -> Option<usize> {
        if !(self.start..self.stop).contains(&position) {
            return None;
        }
        let index = ((position - self.start) / self.bin_width()).floor() as usize;
        Some(index.min(self.bins.len() - 1))
    }
}

impl Reducer for DeltaBinner {
    type Value = Vec<Delta>;
    type Output = Vec<f64>;

    fn initialize(&self) -> Self {
        Self {
            start: self.start,
            stop: self.stop,
            bins: vec![CompensatedSum::new(); self.bins.len()],
            count: 0,
        }
    }

    fn absorb(mut self, deltas: Vec<Delta>) -> Self {
        for delta in deltas {
            if let Some(index) = self.bin_index(delta.position) {
                self.bins[index] = self.bins[index].add(delta.weight);
            }
        }
        self.count += 1;
        self
    }

    /// Merges bin by bin.
    ///
    /// # Panics
    ///
    /// Panics if the two binners differ in range or bin count. Instances
    /// created by [`Reducer::initialize`] always share their configuration.
    #[allow(clippy::float_cmp)]
    fn merge(mut self, other: Self) -> Self {
        assert!(
            self.start == other.start
                && self.stop == other.stop
                && self.bins.len() == other.bins.len(),
            "cannot merge binners over [{}, {}) x {} and [{}, {}) x {}",
            self.start,
            self.stop,
            self.bins.len(),
            other.start,
            other.stop,
            other.bins.len(),
        );
        for (bin, other_bin) in self.bins.iter_mut().zip(other.bins) {
            *bin = bin.merge(other_bin);
        }
        self.count += other.count;
        self
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn result(&self) -> Vec<f64> {
        self.bins.iter().map(CompensatedSum::value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn binner() -> DeltaBinner {
        DeltaBinner::new(0.0, 1.0, 4).expect("valid binner")
    }

    #[test]
    fn places_weights_by_position() {
        let binner = binner().absorb(vec![
            Delta::new(0.0, 1.0),
            Delta::new(0.3, 2.0),
            Delta::new(0.49, 3.0),
            Delta::new(0.5, 4.0),
            Delta::new(0.99, 5.0),
        ]);

        assert_eq!(binner.result(), vec![1.0, 5.0, 4.0, 5.0]);
        assert_eq!(binner.count(), 1);
    }

    #[test]
    fn drops_out_of_range_positions() {
        let binner = binner().absorb(vec![
            Delta::new(-0.1, 10.0),
            Delta::new(1.0, 20.0),
            Delta::new(f64::NAN, 30.0),
            Delta::new(0.6, 0.5),
        ]);

        assert_eq!(binner.result(), vec![0.0, 0.0, 0.5, 0.0]);
        assert_relative_eq!(binner.total(), 0.5);
    }

    #[test]
    fn merge_adds_bin_by_bin() {
        let a = binner().absorb(vec![Delta::new(0.1, 1.0), Delta::new(0.9, 2.0)]);
        let b = binner()
            .absorb(vec![Delta::new(0.2, 0.5)])
            .absorb(vec![Delta::new(0.8, 0.25)]);

        let merged = a.merge(b);
        assert_eq!(merged.result(), vec![1.5, 0.0, 0.0, 2.25]);
        assert_eq!(merged.count(), 3);
    }

    #[test]
    #[should_panic(expected = "cannot merge binners")]
    fn merge_rejects_different_bin_counts() {
        let finer = DeltaBinner::new(0.0, 1.0, 8).expect("valid binner");
        let _ = binner().merge(finer);
    }

    #[test]
    #[should_panic(expected = "cannot merge binners")]
    fn merge_rejects_different_ranges() {
        let shifted = DeltaBinner::new(0.5, 1.5, 4).expect("valid binner");
        let _ = binner().merge(shifted);
    }

    #[test]
    fn initialize_keeps_configuration() {
        let used = binner().absorb(vec![Delta::new(0.1, 1.0)]);
        let fresh = used.initialize();

        assert_eq!(fresh, binner());
        assert_eq!(fresh.bin_centers(), vec![0.125, 0.375, 0.625, 0.875]);
    }

    #[test]
    fn rejects_bad_configuration() {
        assert_eq!(DeltaBinner::new(0.0, 1.0, 0), Err(BinError::NoBins));
        assert!(matches!(
            DeltaBinner::new(1.0, 1.0, 4),
            Err(BinError::InvalidRange { .. })
        ));
        assert!(matches!(
            DeltaBinner::new(0.0, f64::INFINITY, 4),
            Err(BinError::InvalidRange { .. })
        ));
    }
}
