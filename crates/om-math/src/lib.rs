//! # om-math
//!
//! Mathematical utilities: a dense matrix newtype over nalgebra used for
//! value grids and calibrated lattice tables, and the normal and binomial
//! distributions (via statrs).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Probability distributions.
pub mod distributions;

/// Dense two-dimensional matrix.
pub mod matrix;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{normal_cdf, normal_pdf, BinomialDistribution};
pub use matrix::Matrix;
