//! A small holon model that exercises the grid engine and the cascade together.
//!
//! The holon band is
//!
//! ```text
//! ε(k) = 2 th (cos kx + cos ky) + 4 d1 th cos kx cos ky + 2 thp (cos 2kx + cos 2ky)
//! ```
//!
//! with a thermally smeared occupation. Three equations fix `mu` (holon
//! density equals the doping), `d1`, and `f0`, in that priority order.

use brillouin_core::{Environment, Point2, PointSource, SquareLattice};
use brillouin_grid::{GridError, average, minimum};
use brillouin_solvers::cascade::{BracketRule, Equation, Scalar};

/// Energy width of the occupation step.
pub const SMEARING: f64 = 0.25;

pub const D1_COUPLING: f64 = 0.2;
pub const F0_COUPLING: f64 = 0.25;

/// A model equation borrowing the lattice it reduces over.
pub type ModelEquation<'a> = Box<dyn Equation<Environment, Error = GridError> + 'a>;

/// Holon band energy at `k`.
#[must_use]
pub fn holon_energy([kx, ky]: &Point2, env: &Environment) -> f64 {
    let th = env.th();
    let (cx, cy) = (kx.cos(), ky.cos());
    2.0 * th * (cx + cy)
        + 4.0 * env.d1() * th * cx * cy
        + 2.0 * env.thp * ((2.0 * kx).cos() + (2.0 * ky).cos())
}

/// Smeared occupation of the holon state at `k`.
#[must_use]
pub fn occupation(k: &Point2, env: &Environment) -> f64 {
    let shifted = (holon_energy(k, env) - env.mu()) / (2.0 * SMEARING);
    0.5 * (1.0 - shifted.tanh())
}

/// Grid minimum of the holon band, suitable for refreshing `epsilon_min`.
///
/// # Errors
///
/// Returns an error if the reduction fails.
pub fn band_minimum<S>(lattice: &S, env: &Environment) -> Result<f64, GridError>
where
    S: PointSource<Point = Point2> + ?Sized,
{
    minimum(lattice, |k| holon_energy(k, env), env.workers())
}

/// Builds the `mu`, `d1`, `f0` equations over `lattice`, in priority order.
#[must_use]
pub fn equations(lattice: &SquareLattice) -> Vec<ModelEquation<'_>> {
    let mu = Scalar::new(
        "mu",
        move |env: &Environment| {
            average(lattice, |k| occupation(k, env), env.workers()).map(|density| density - env.x)
        },
        Environment::mu,
        Environment::set_mu,
        BracketRule::Fixed([-12.0, 12.0]),
    );

    let d1 = Scalar::new(
        "d1",
        move |env: &Environment| {
            let hopping = average(
                lattice,
                |k: &Point2| k[0].cos() * k[1].cos() * occupation(k, env),
                env.workers(),
            )?;
            Ok(env.d1() - D1_COUPLING * hopping)
        },
        Environment::d1,
        Environment::set_d1,
        BracketRule::Fixed([-1.0, 1.0]),
    );

    let f0 = Scalar::new(
        "f0",
        move |env: &Environment| {
            let pairing = average(
                lattice,
                |k: &Point2| (k[0].cos() - k[1].cos()).powi(2) * occupation(k, env),
                env.workers(),
            )?;
            Ok(env.f0() - F0_COUPLING * pairing)
        },
        Environment::f0,
        Environment::set_f0,
        BracketRule::Around { step: 1.0 },
    );

    vec![
        Box::new(mu) as ModelEquation<'_>,
        Box::new(d1) as ModelEquation<'_>,
        Box::new(f0) as ModelEquation<'_>,
    ]
}
