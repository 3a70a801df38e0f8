//! # om-methods
//!
//! Numerical methods: the Black-Scholes process, lattice builders and
//! finite-difference grids.
//!
//! # Modules
//!
//! * [`process`] — flat-parameter Black-Scholes-Merton process
//! * [`lattice`] — binomial, trinomial and implied trinomial trees with
//!   backward induction
//! * [`finite_differences`] — tridiagonal solver and the four PDE schemes

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Black-Scholes-Merton process with flat parameters.
pub mod process;

/// Lattice methods: binomial trees, trinomial trees, backward induction.
pub mod lattice;

/// Finite difference methods: tridiagonal solver, 1-D PDE schemes.
pub mod finite_differences;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use finite_differences::{
    FdProblem, FdScheme, FdSolution, FdSolver, ThomasFactorization, TridiagonalOperator,
};
pub use lattice::{BinomialScheme, BinomialTree, ImpliedTrinomialTree, Rollback, TrinomialTree};
pub use process::BlackScholesProcess;
