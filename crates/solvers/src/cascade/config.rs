use brillouin_core::Tolerance;
use thiserror::Error;

use crate::bisection;

/// Configuration for the cascaded solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    tolerance: Tolerance,
    max_cycles: usize,
    root: bisection::Config,
}

/// Errors that can occur when validating a cascade config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_cycles must be positive")]
    MaxCycles,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::scaled(1 << 20),
            max_cycles: 200,
            root: bisection::Config::default(),
        }
    }
}

impl Config {
    /// Creates a new cascade config.
    ///
    /// `tolerance` bounds the largest residual magnitude accepted at the end
    /// of a cycle, `max_cycles` caps the cycles spent on each stage, and
    /// `root` configures every single-equation solve.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_cycles` is zero.
    pub fn new(
        tolerance: Tolerance,
        max_cycles: usize,
        root: bisection::Config,
    ) -> Result<Self, ConfigError> {
        if max_cycles == 0 {
            return Err(ConfigError::MaxCycles);
        }
        Ok(Self {
            tolerance,
            max_cycles,
            root,
        })
    }

    #[must_use]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    #[must_use]
    pub fn max_cycles(&self) -> usize {
        self.max_cycles
    }

    /// Returns the bisection config used for each equation.
    #[must_use]
    pub fn root(&self) -> &bisection::Config {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn default_tolerance_is_scaled_machine_epsilon() {
        let config = Config::default();
        assert_relative_eq!(config.tolerance().value(), 2.0_f64.powi(-33));
        assert_eq!(config.max_cycles(), 200);
    }

    #[test]
    fn rejects_zero_cycles() {
        let result = Config::new(Tolerance::machine(), 0, bisection::Config::default());
        assert_eq!(result, Err(ConfigError::MaxCycles));
    }
}
