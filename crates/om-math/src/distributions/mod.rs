//! Probability distributions.
//!
//! Normal and binomial distributions, delegating to the `statrs` crate.

pub mod binomial;
pub mod normal;

pub use binomial::BinomialDistribution;
pub use normal::{normal_cdf, normal_pdf};
