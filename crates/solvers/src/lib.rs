//! Solvers for self-consistent scalar equations.
//!
//! # Solvers
//!
//! - [`bisection`]: guaranteed convergence on a bracketed interval
//! - [`cascade`]: drives an ordered set of coupled equations to simultaneous
//!   convergence by re-solving a growing prefix of them with bisection

pub mod bisection;
pub mod cascade;
