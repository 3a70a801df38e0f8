//! Binomial distribution.
//!
//! Wraps the `statrs` crate's binomial implementation. Its probability mass
//! function works through log-gamma, so terminal weights of lattices with
//! thousands of steps are computed without overflowing the binomial
//! coefficient.

use om_core::{ensure, Real, Result};
use statrs::distribution::{Binomial, Discrete};

/// Binomial distribution with `n` trials and success probability `p`.
#[derive(Debug, Clone)]
pub struct BinomialDistribution {
    dist: Binomial,
}

impl BinomialDistribution {
    /// Create a binomial distribution with `n` trials and probability `p`.
    ///
    /// Fails with `InvalidParameter` if `p` is not in `[0, 1]` or `n` is 0.
    pub fn new(p: Real, n: u64) -> Result<Self> {
        ensure!((0.0..=1.0).contains(&p), "p must be in [0, 1], got {p}");
        ensure!(n > 0, "n must be positive");
        let dist = Binomial::new(p, n).map_err(|e| {
            om_core::Error::InvalidParameter(format!("binomial(p={p}, n={n}): {e}"))
        })?;
        Ok(Self { dist })
    }

    /// Probability mass function P(X = k).
    pub fn pmf(&self, k: u64) -> Real {
        self.dist.pmf(k)
    }
}
