//! Finite difference methods for the Black-Scholes PDE.
//!
//! `∂V/∂t + ½σ²S²·∂²V/∂S² + (r−q)S·∂V/∂S − rV = 0`
//!
//! solved backward in time from the terminal payoff on one of four grids:
//!
//! | [`FdScheme`] | space | time stepping |
//! |---|---|---|
//! | `Explicit` | price | explicit, step size set by the stability bound |
//! | `Implicit` | price | fully implicit, Thomas solve per step |
//! | `ExplicitLogPrice` | `ln S` | explicit, `dx = σ√(3Δt)` |
//! | `CrankNicolson` | `ln S` | Crank-Nicolson with Neumann boundaries |
//!
//! Explicit schemes keep the whole `(time, node)` grid in a [`Matrix`];
//! the others only keep the current layer. The price is read at the node
//! sitting on the spot.

mod crank_nicolson;
mod explicit;
mod explicit_log;
mod implicit;

use om_core::{ensure, ensure_stable, ExerciseStyle, OptionType, Real, Result, Size, Time};
use tracing::debug;

use crate::process::BlackScholesProcess;

/// Smallest pivot magnitude accepted by the tridiagonal solvers.
pub const PIVOT_TOLERANCE: Real = 1e-12;

// ─── FD scheme selection ──────────────────────────────────────────────────────

/// Finite difference discretisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FdScheme {
    /// Explicit in price: `V^n = A · V^{n+1}`, conditionally stable.
    Explicit,
    /// Fully implicit in price: `A · V^n = V^{n+1}`.
    Implicit,
    /// Explicit in log-price with `dx = σ√(3Δt)`.
    ExplicitLogPrice,
    /// Crank-Nicolson in log-price.
    CrankNicolson,
}

impl FdScheme {
    /// Short name used in log events.
    pub fn name(self) -> &'static str {
        match self {
            FdScheme::Explicit => "explicit",
            FdScheme::Implicit => "implicit",
            FdScheme::ExplicitLogPrice => "explicit-log",
            FdScheme::CrankNicolson => "crank-nicolson",
        }
    }
}

// ─── Tridiagonal operator ─────────────────────────────────────────────────────

/// A tridiagonal matrix operator.
///
/// Stores the lower, diagonal, and upper bands.
#[derive(Debug, Clone)]
pub struct TridiagonalOperator {
    /// Lower diagonal (index 0 unused, starts from row 1).
    pub lower: Vec<Real>,
    /// Main diagonal.
    pub diag: Vec<Real>,
    /// Upper diagonal (last index unused, ends at row n−2).
    pub upper: Vec<Real>,
}

impl TridiagonalOperator {
    /// Create a zero tridiagonal operator of size `n`.
    pub fn new(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
        }
    }

    /// Size (number of rows/columns).
    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// Apply the operator: `y = A · x`.
    pub fn apply(&self, x: &[Real]) -> Vec<Real> {
        let n = self.size();
        debug_assert_eq!(x.len(), n);
        let mut y = vec![0.0; n];
        y[0] = self.diag[0] * x[0] + self.upper[0] * x[1];
        for i in 1..n - 1 {
            y[i] = self.lower[i] * x[i - 1] + self.diag[i] * x[i] + self.upper[i] * x[i + 1];
        }
        y[n - 1] = self.lower[n - 1] * x[n - 2] + self.diag[n - 1] * x[n - 1];
        y
    }

    /// Thomas forward sweep, done once and reused for every right-hand side.
    ///
    /// Fails with `NumericInstability` on a pivot below [`PIVOT_TOLERANCE`].
    pub fn factorize(&self) -> Result<ThomasFactorization> {
        let n = self.size();
        ensure!(n >= 2, "tridiagonal system needs at least 2 rows, got {n}");
        let mut c_prime = vec![0.0; n];
        let mut pivots = vec![0.0; n];

        pivots[0] = self.diag[0];
        ensure_stable!(
            pivots[0].abs() >= PIVOT_TOLERANCE,
            "zero pivot in row 0"
        );
        c_prime[0] = self.upper[0] / pivots[0];

        for i in 1..n {
            let m = self.diag[i] - self.lower[i] * c_prime[i - 1];
            ensure_stable!(m.abs() >= PIVOT_TOLERANCE, "pivot {m} in row {i} is too small");
            pivots[i] = m;
            if i < n - 1 {
                c_prime[i] = self.upper[i] / m;
            }
        }

        Ok(ThomasFactorization {
            lower: self.lower.clone(),
            c_prime,
            pivots,
        })
    }

    /// Solve `A · x = rhs` using the Thomas algorithm.
    pub fn solve(&self, rhs: &[Real]) -> Result<Vec<Real>> {
        Ok(self.factorize()?.solve(rhs))
    }
}

/// LU factors of a [`TridiagonalOperator`].
#[derive(Debug, Clone)]
pub struct ThomasFactorization {
    lower: Vec<Real>,
    c_prime: Vec<Real>,
    pivots: Vec<Real>,
}

impl ThomasFactorization {
    /// Solve `A · x = rhs` against the stored factors.
    pub fn solve(&self, rhs: &[Real]) -> Vec<Real> {
        let n = self.pivots.len();
        debug_assert_eq!(rhs.len(), n);

        let mut d_prime = vec![0.0; n];
        d_prime[0] = rhs[0] / self.pivots[0];
        for i in 1..n {
            d_prime[i] = (rhs[i] - self.lower[i] * d_prime[i - 1]) / self.pivots[i];
        }

        let mut x = vec![0.0; n];
        x[n - 1] = d_prime[n - 1];
        for i in (0..n - 1).rev() {
            x[i] = d_prime[i] - self.c_prime[i] * x[i + 1];
        }
        x
    }
}

// ─── Problem & solver ─────────────────────────────────────────────────────────

/// A vanilla option under a [`BlackScholesProcess`].
#[derive(Debug, Clone, Copy)]
pub struct FdProblem {
    /// Market process.
    pub process: BlackScholesProcess,
    /// Strike.
    pub strike: Real,
    /// Time to expiry.
    pub maturity: Time,
    /// Call or put.
    pub option_type: OptionType,
    /// European or American.
    pub exercise: ExerciseStyle,
}

impl FdProblem {
    fn payoff(&self, spot: Real) -> Real {
        self.option_type.intrinsic(spot, self.strike)
    }

    /// Floor `continuation` at the payoff for American exercise.
    fn exercise_floor(&self, continuation: Real, spot: Real) -> Real {
        if self.exercise.is_american() {
            self.exercise.floor(continuation, self.payoff(spot))
        } else {
            continuation
        }
    }
}

/// Result of a finite difference sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FdSolution {
    /// Option value at the spot node at time zero.
    pub price: Real,
    /// Number of time steps taken.
    pub time_steps: Size,
    /// Number of space intervals.
    pub space_intervals: Size,
}

/// Dispatches a [`FdProblem`] to one of the four schemes.
#[derive(Debug, Clone, Copy)]
pub struct FdSolver {
    scheme: FdScheme,
    nodes: Size,
    steps: Size,
}

impl FdSolver {
    /// Create a solver.
    ///
    /// `steps` is ignored by [`FdScheme::Explicit`], whose time step is
    /// fixed by the stability bound.
    pub fn new(scheme: FdScheme, nodes: Size, steps: Size) -> Self {
        Self {
            scheme,
            nodes,
            steps,
        }
    }

    /// The scheme this solver runs.
    pub fn scheme(&self) -> FdScheme {
        self.scheme
    }

    /// Run the sweep and return the value at the spot.
    pub fn solve(&self, problem: &FdProblem) -> Result<FdSolution> {
        ensure!(self.nodes >= 2, "nodes must be >= 2, got {}", self.nodes);
        ensure!(self.steps >= 1, "steps must be >= 1, got {}", self.steps);
        ensure!(
            problem.maturity > 0.0,
            "maturity must be positive, got {}",
            problem.maturity
        );
        ensure!(
            problem.strike > 0.0,
            "strike must be positive, got {}",
            problem.strike
        );
        ensure!(
            problem.process.volatility() > 0.0,
            "volatility must be positive, got {}",
            problem.process.volatility()
        );

        let solution = match self.scheme {
            FdScheme::Explicit => explicit::solve(problem, self.nodes)?,
            FdScheme::Implicit => implicit::solve(problem, self.nodes, self.steps)?,
            FdScheme::ExplicitLogPrice => explicit_log::solve(problem, self.nodes, self.steps)?,
            FdScheme::CrankNicolson => crank_nicolson::solve(problem, self.nodes, self.steps)?,
        };

        ensure_stable!(
            solution.price.is_finite(),
            "{} scheme produced a non-finite price",
            self.scheme.name()
        );
        debug!(
            scheme = self.scheme.name(),
            time_steps = solution.time_steps,
            space_intervals = solution.space_intervals,
            price = solution.price,
            "finite difference sweep done"
        );
        Ok(solution)
    }
}

/// Neumann boundary increments `(V₁ − V₀, V_M − V_{M−1})` on a log grid.
fn neumann_slopes(option_type: OptionType, levels: &[Real]) -> (Real, Real) {
    let m = levels.len() - 1;
    match option_type {
        OptionType::Call => (0.0, levels[m] - levels[m - 1]),
        OptionType::Put => (-(levels[1] - levels[0]), 0.0),
    }
}

/// Log-price grid `S·exp((i − nodes/2)·dx)`, `i = 0..=nodes`.
fn log_levels(spot: Real, nodes: Size, dx: Real) -> Vec<Real> {
    let centre = (nodes / 2) as Real;
    (0..=nodes)
        .map(|i| spot * ((i as Real - centre) * dx).exp())
        .collect()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn thomas_algorithm_solves_identity() {
        let mut op = TridiagonalOperator::new(4);
        for i in 0..4 {
            op.diag[i] = 1.0;
        }
        let rhs = vec![1.0, 2.0, 3.0, 4.0];
        let x = op.solve(&rhs).unwrap();
        for i in 0..4 {
            assert_abs_diff_eq!(x[i], rhs[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn thomas_algorithm_solves_tridiagonal() {
        // A = [[2, -1, 0], [-1, 2, -1], [0, -1, 2]], x = [1, 2, 3]
        let mut op = TridiagonalOperator::new(3);
        op.diag = vec![2.0, 2.0, 2.0];
        op.lower = vec![0.0, -1.0, -1.0];
        op.upper = vec![-1.0, -1.0, 0.0];
        let x = op.solve(&[0.0, 0.0, 4.0]).unwrap();
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn factorization_is_reusable() {
        let mut op = TridiagonalOperator::new(3);
        op.diag = vec![2.0, 2.0, 2.0];
        op.lower = vec![0.0, -1.0, -1.0];
        op.upper = vec![-1.0, -1.0, 0.0];
        let lu = op.factorize().unwrap();
        let x = vec![3.0, -1.0, 0.5];
        let back = lu.solve(&op.apply(&x));
        for i in 0..3 {
            assert_abs_diff_eq!(back[i], x[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn singular_system_is_reported() {
        // second pivot: 1 − 1·1 = 0
        let mut op = TridiagonalOperator::new(3);
        op.diag = vec![1.0, 1.0, 1.0];
        op.lower = vec![0.0, 1.0, 0.0];
        op.upper = vec![1.0, 0.0, 0.0];
        let err = op.solve(&[1.0, 1.0, 1.0]).unwrap_err();
        assert!(matches!(err, om_core::Error::NumericInstability(_)));
    }

    #[test]
    fn log_levels_put_spot_in_the_middle() {
        let levels = log_levels(100.0, 10, 0.1);
        assert_eq!(levels.len(), 11);
        assert_abs_diff_eq!(levels[5], 100.0, epsilon = 1e-12);
        assert_abs_diff_eq!(levels[6] / levels[5], 0.1_f64.exp(), epsilon = 1e-12);
    }

    #[test]
    fn too_few_nodes_is_invalid() {
        let problem = FdProblem {
            process: BlackScholesProcess::new(100.0, 0.05, 0.0, 0.2),
            strike: 100.0,
            maturity: 1.0,
            option_type: OptionType::Call,
            exercise: ExerciseStyle::European,
        };
        let err = FdSolver::new(FdScheme::CrankNicolson, 1, 10)
            .solve(&problem)
            .unwrap_err();
        assert!(matches!(err, om_core::Error::InvalidParameter(_)));
        let err = FdSolver::new(FdScheme::Implicit, 10, 0)
            .solve(&problem)
            .unwrap_err();
        assert!(matches!(err, om_core::Error::InvalidParameter(_)));
    }
}
