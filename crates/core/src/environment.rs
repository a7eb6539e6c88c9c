//! The shared parameter state for a self-consistent run.
//!
//! An [`Environment`] carries the run configuration, the fixed physical
//! constants, the self-consistent scalars the solver adjusts (`d1`, `mu`,
//! `f0`), and the cached band minimum `epsilon_min`, which depends on `d1`.
//!
//! # Cache invariant
//!
//! `epsilon_min` is stored as an `Option`. Every call to [`Environment::set_d1`]
//! clears it, and [`Environment::epsilon_min`] returns `None` until
//! [`Environment::refresh_epsilon_min`] recomputes it. A stale value can never
//! be read.
//!
//! # Persistence
//!
//! Snapshots are flat JSON objects keyed by PascalCase field names
//! (`GridLength`, `NumProcs`, `DeltaS`, `CS`, ...). Loading is strict: unknown
//! keys and missing keys are both errors. Integer fields accept integral
//! numbers written as floats. The cached `epsilon_min` is never persisted.

mod coerce;

use std::{fs, io, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::points::{RangeError, SquareLattice};

/// Errors that can occur when loading, validating, or saving an [`Environment`].
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed environment snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid environment: {reason}")]
    Invalid { reason: &'static str },
}

/// Configuration, constants, and self-consistent parameters of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Environment {
    /// Points per side of the Brillouin-zone lattice.
    #[serde(deserialize_with = "coerce::integer")]
    pub grid_length: u32,
    /// Bins used for the imaginary part of the electron Green's function.
    #[serde(deserialize_with = "coerce::integer")]
    pub im_gc0_bins: u32,
    /// Points on each side of the `1/x` singularity for the real part.
    #[serde(deserialize_with = "coerce::integer")]
    pub re_gc0_points: u32,
    /// Distance from the singularity for the real part.
    #[serde(rename = "ReGc0dw")]
    pub re_gc0_dw: f64,
    /// Workers used by grid reductions.
    #[serde(deserialize_with = "coerce::integer")]
    pub num_procs: u16,

    pub init_d1: f64,
    pub init_mu: f64,
    pub init_f0: f64,

    /// Pairing symmetry: `-1` for d-wave, `+1` for s-wave.
    #[serde(deserialize_with = "coerce::integer")]
    pub alpha: i8,
    /// Hopping energy of the physical electron.
    pub t: f64,
    /// Overall energy scale.
    pub t0: f64,
    /// Interlayer hopping.
    pub tz: f64,
    /// Next-nearest-neighbor hopping.
    pub thp: f64,
    /// Doping (holon excess).
    pub x: f64,
    /// Spin gap.
    pub delta_s: f64,
    /// Coefficient of the momentum deviation in the spinon dispersion.
    #[serde(rename = "CS")]
    pub cs: f64,

    d1: f64,
    mu: f64,
    f0: f64,

    #[serde(skip)]
    epsilon_min: Option<f64>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            grid_length: 64,
            im_gc0_bins: 128,
            re_gc0_points: 64,
            re_gc0_dw: 1e-4,
            num_procs: 1,
            init_d1: 0.05,
            init_mu: 0.0,
            init_f0: 0.1,
            alpha: -1,
            t: 1.0,
            t0: 1.0,
            tz: 0.1,
            thp: 0.1,
            x: 0.1,
            delta_s: 0.1,
            cs: 0.1,
            d1: 0.05,
            mu: 0.0,
            f0: 0.1,
            epsilon_min: None,
        }
    }
}

impl Environment {
    /// Loads an environment from the JSON file at `path`.
    ///
    /// Self-consistent parameters take the values stored in the file, not the
    /// `Init*` values. Call [`Environment::initialize`] to reset them.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the JSON is malformed, or
    /// the decoded environment fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EnvError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| EnvError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading environment");
        Self::from_json(&contents)
    }

    /// Decodes an environment from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, has unknown or missing keys,
    /// or the decoded environment fails validation.
    pub fn from_json(json: &str) -> Result<Self, EnvError> {
        let env: Self = serde_json::from_str(json)?;
        env.validate()?;
        Ok(env)
    }

    /// Encodes the environment as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be encoded.
    pub fn to_json(&self) -> Result<String, EnvError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the environment as JSON to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), EnvError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| EnvError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "wrote environment");
        Ok(())
    }

    /// Checks that the configuration describes a runnable calculation.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Invalid`] describing the first violated constraint.
    pub fn validate(&self) -> Result<(), EnvError> {
        let invalid = |reason| Err(EnvError::Invalid { reason });

        if self.grid_length < 2 {
            return invalid("GridLength must be at least 2");
        }
        if self.im_gc0_bins == 0 {
            return invalid("ImGc0Bins must be positive");
        }
        if self.alpha != -1 && self.alpha != 1 {
            return invalid("Alpha must be -1 (d-wave) or +1 (s-wave)");
        }

        let values = [
            self.re_gc0_dw,
            self.init_d1,
            self.init_mu,
            self.init_f0,
            self.t,
            self.t0,
            self.tz,
            self.thp,
            self.x,
            self.delta_s,
            self.cs,
            self.d1,
            self.mu,
            self.f0,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return invalid("all real-valued parameters must be finite");
        }

        Ok(())
    }

    /// Resets the self-consistent parameters to their configured initial values.
    ///
    /// A zero worker count is normalized to one.
    pub fn initialize(&mut self) {
        if self.num_procs == 0 {
            warn!("NumProcs is 0, using a single worker");
            self.num_procs = 1;
        }
        self.set_d1(self.init_d1);
        self.mu = self.init_mu;
        self.f0 = self.init_f0;
    }

    /// Returns the lattice the grid reductions run over.
    ///
    /// # Errors
    ///
    /// Returns an error if `grid_length < 2`.
    pub fn lattice(&self) -> Result<SquareLattice, RangeError> {
        SquareLattice::brillouin_zone(self.grid_length as usize)
    }

    /// Returns the number of workers to use for grid reductions.
    #[must_use]
    pub fn workers(&self) -> usize {
        usize::from(self.num_procs)
    }

    /// One-holon hopping energy, `t0 · (1 - x)`.
    #[must_use]
    pub fn th(&self) -> f64 {
        self.t0 * (1.0 - self.x)
    }

    /// Spinon chemical potential, `√(Δs² + cs²)`.
    #[must_use]
    pub fn lambda(&self) -> f64 {
        self.delta_s.hypot(self.cs)
    }

    /// Diagonal hopping generated by the two-hole process.
    #[must_use]
    pub fn d1(&self) -> f64 {
        self.d1
    }

    /// Sets `d1` and invalidates the cached `epsilon_min`.
    pub fn set_d1(&mut self, d1: f64) {
        self.d1 = d1;
        self.epsilon_min = None;
    }

    /// Holon chemical potential.
    #[must_use]
    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn set_mu(&mut self, mu: f64) {
        self.mu = mu;
    }

    /// Superconducting order parameter.
    #[must_use]
    pub fn f0(&self) -> f64 {
        self.f0
    }

    pub fn set_f0(&mut self, f0: f64) {
        self.f0 = f0;
    }

    /// Returns the cached band minimum, or `None` if `d1` changed since the
    /// last refresh.
    #[must_use]
    pub fn epsilon_min(&self) -> Option<f64> {
        self.epsilon_min
    }

    /// Recomputes and caches the band minimum.
    ///
    /// `compute` receives the environment with the current `d1`; it is usually
    /// a grid minimum of the holon dispersion.
    ///
    /// # Errors
    ///
    /// Returns the error from `compute`, leaving the cache empty.
    pub fn refresh_epsilon_min<E>(
        &mut self,
        compute: impl FnOnce(&Self) -> Result<f64, E>,
    ) -> Result<f64, E> {
        let value = compute(self)?;
        self.epsilon_min = Some(value);
        Ok(value)
    }
}
