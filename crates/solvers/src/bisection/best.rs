use super::{Solution, Status};

/// Tracks the best point evaluated so far.
///
/// The best point is defined by minimum residual magnitude.
#[derive(Debug, Clone, Copy)]
pub(super) struct Best {
    x: f64,
    residual: f64,
}

impl Best {
    pub(super) fn new(x: f64, residual: f64) -> Self {
        Self { x, residual }
    }

    /// Updates the best point if the residual magnitude improves.
    pub(super) fn update(&mut self, x: f64, residual: f64) {
        if residual.abs() < self.residual.abs() {
            self.x = x;
            self.residual = residual;
        }
    }

    pub(super) fn x(&self) -> f64 {
        self.x
    }

    pub(super) fn residual(&self) -> f64 {
        self.residual
    }

    pub(super) fn finish(self, status: Status, iters: usize) -> Solution {
        Solution {
            status,
            x: self.x,
            residual: self.residual,
            iters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn update_keeps_best_residual() {
        let mut best = Best::new(1.0, 2.0);
        best.update(2.0, -1.5);
        best.update(3.0, 1.0);

        assert_relative_eq!(best.x(), 3.0);
        assert_relative_eq!(best.residual(), 1.0);
    }

    #[test]
    fn update_ignores_worse_residual() {
        let mut best = Best::new(1.0, -0.5);
        best.update(2.0, 2.0);
        best.update(3.0, 0.5);

        assert_relative_eq!(best.x(), 1.0);
        assert_relative_eq!(best.residual(), -0.5);
    }

    #[test]
    fn finish_builds_solution() {
        let solution = Best::new(2.0, -1.25).finish(Status::StoppedByObserver, 4);

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.iters, 4);
        assert_relative_eq!(solution.x, 2.0);
        assert_relative_eq!(solution.residual, -1.25);
    }
}
