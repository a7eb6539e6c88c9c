/// Summary of a converged cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Number of single-equation solves per equation, in priority order.
    pub solves: Vec<usize>,
    /// Number of cycles each stage needed, one entry per admitted equation.
    pub stage_cycles: Vec<usize>,
    /// Final residual of each equation, keyed by name.
    pub residuals: Vec<(String, f64)>,
}

impl Report {
    pub(super) fn new(equations: usize) -> Self {
        Self {
            solves: vec![0; equations],
            stage_cycles: Vec::with_capacity(equations),
            residuals: Vec::with_capacity(equations),
        }
    }

    /// Returns the largest final residual magnitude, or zero if empty.
    #[must_use]
    pub fn worst_residual(&self) -> f64 {
        worst(&self.residuals)
    }
}

/// Largest residual magnitude in a named residual list.
pub(super) fn worst(residuals: &[(String, f64)]) -> f64 {
    residuals
        .iter()
        .map(|(_, residual)| residual.abs())
        .fold(0.0, f64::max)
}
