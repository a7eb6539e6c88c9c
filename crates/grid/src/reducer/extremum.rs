use super::Reducer;

/// Tracks the smallest value absorbed.
///
/// Starts at `+∞`, which is also the result when nothing was absorbed.
/// NaN values never replace the running minimum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    value: f64,
    count: u64,
}

/// Tracks the largest value absorbed.
///
/// Starts at `-∞`, which is also the result when nothing was absorbed.
/// NaN values never replace the running maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Maximum {
    value: f64,
    count: u64,
}

impl Minimum {
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: f64::INFINITY,
            count: 0,
        }
    }
}

impl Default for Minimum {
    fn default() -> Self {
        Self::new()
    }
}

impl Maximum {
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: f64::NEG_INFINITY,
            count: 0,
        }
    }
}

impl Default for Maximum {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for Minimum {
    type Value = f64;
    type Output = f64;

    fn initialize(&self) -> Self {
        Self::new()
    }

    fn absorb(self, value: f64) -> Self {
        Self {
            value: if value < self.value { value } else { self.value },
            count: self.count + 1,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            value: if other.value < self.value {
                other.value
            } else {
                self.value
            },
            count: self.count + other.count,
        }
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn result(&self) -> f64 {
        self.value
    }
}

impl Reducer for Maximum {
    type Value = f64;
    type Output = f64;

    fn initialize(&self) -> Self {
        Self::new()
    }

    fn absorb(self, value: f64) -> Self {
        Self {
            value: if value > self.value { value } else { self.value },
            count: self.count + 1,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            value: if other.value > self.value {
                other.value
            } else {
                self.value
            },
            count: self.count + other.count,
        }
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn result(&self) -> f64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUES: [f64; 6] = [3.0, -1.5, 7.25, f64::NAN, 0.0, -1.5];

    #[test]
    fn minimum_finds_smallest() {
        let min = VALUES.into_iter().fold(Minimum::new(), Minimum::absorb);
        assert_eq!(min.result(), -1.5);
        assert_eq!(min.count(), 6);
    }

    #[test]
    fn maximum_finds_largest() {
        let max = VALUES.into_iter().fold(Maximum::new(), Maximum::absorb);
        assert_eq!(max.result(), 7.25);
        assert_eq!(max.count(), 6);
    }

    #[test]
    fn empty_trackers_return_sentinels() {
        assert_eq!(Minimum::new().result(), f64::INFINITY);
        assert_eq!(Maximum::new().result(), f64::NEG_INFINITY);
    }

    #[test]
    fn nan_first_does_not_stick() {
        let min = Minimum::new().absorb(f64::NAN).absorb(2.0);
        assert_eq!(min.result(), 2.0);
    }

    #[test]
    fn merge_keeps_better_extremum() {
        let a = Minimum::new().absorb(4.0).absorb(2.0);
        let b = Minimum::new().absorb(3.0);
        assert_eq!(a.merge(b).result(), 2.0);
        assert_eq!(b.merge(a).result(), 2.0);
        assert_eq!(a.merge(b).count(), 3);

        let a = Maximum::new().absorb(4.0);
        let b = Maximum::new().absorb(9.0).absorb(-3.0);
        assert_eq!(a.merge(b).result(), 9.0);
        assert_eq!(b.merge(Maximum::new()).result(), 9.0);
    }
}
