//! Bracketing root finder.
//!
//! Bisection is used wherever the engine solves for a rate. It needs no
//! derivative and always terminates: the loop stops when `|f(mid)|` drops
//! below the tolerance or after a fixed number of iterations, whichever comes
//! first.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Maximum bisection iterations.
pub const MAX_ITERATIONS: usize = 100;

/// Absolute tolerance on `|f(mid)|`.
pub const TOLERANCE: f64 = 1e-9;

/// Configuration for the bisection solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// The solver stops when `|f(mid)| < tolerance`.
    pub tolerance: f64,
    /// Iteration budget.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: TOLERANCE,
            max_iterations: MAX_ITERATIONS,
        }
    }
}

/// Outcome of a root search.
///
/// A search that runs out of iterations still returns its last midpoint as a
/// best estimate, with `converged == false`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootResult {
    /// Last evaluated midpoint.
    pub root: f64,
    /// `f(root)`.
    pub residual: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether `|residual| < tolerance`.
    pub converged: bool,
}

/// Bisection root finder.
///
/// # Example
///
/// ```
/// use valora_engine::solver::BisectionSolver;
///
/// let solver = BisectionSolver::default();
/// let result = solver.find_root(|x| x * x - 2.0, 0.0, 2.0);
///
/// assert!(result.converged);
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BisectionSolver {
    config: SolverConfig,
}

impl BisectionSolver {
    /// Create a solver with the given configuration.
    #[must_use]
    pub const fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The solver's configuration.
    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Search `[low, high]` for a root of `f`.
    ///
    /// Each step keeps the half whose endpoints straddle a sign change. If the
    /// bracket holds no sign change the search drifts to one end and reports
    /// `converged == false`.
    pub fn find_root<F>(&self, f: F, low: f64, high: f64) -> RootResult
    where
        F: Fn(f64) -> f64,
    {
        let mut low = low;
        let mut high = high;
        let mut f_low = f(low);
        let mut mid = 0.5 * (low + high);
        let mut f_mid = f64::NAN;

        for iteration in 1..=self.config.max_iterations {
            mid = 0.5 * (low + high);
            f_mid = f(mid);

            if f_mid.abs() < self.config.tolerance {
                return RootResult {
                    root: mid,
                    residual: f_mid,
                    iterations: iteration,
                    converged: true,
                };
            }

            if (f_low < 0.0) == (f_mid < 0.0) {
                low = mid;
                f_low = f_mid;
            } else {
                high = mid;
            }
        }

        warn!(
            root = mid,
            residual = f_mid,
            iterations = self.config.max_iterations,
            "bisection exhausted its iteration budget"
        );
        RootResult {
            root: mid,
            residual: f_mid,
            iterations: self.config.max_iterations,
            converged: false,
        }
    }
}
