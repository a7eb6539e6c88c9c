/// Iteration event emitted by the bisection solver for each midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Iteration counter (1-based within the bisection loop).
    pub iter: usize,
    /// The midpoint that was evaluated.
    pub x: f64,
    /// Residual at the midpoint.
    pub residual: f64,
    /// Search bracket the midpoint was taken from.
    pub bracket: [f64; 2],
}
