//! Closed-form European binomial price.
//!
//! Sums the discounted payoff over the terminal layer of a CRR tree,
//! weighted by binomial probabilities. Only states on the money side of the
//! strike are visited: `a` is the lowest up-move count finishing above `K`.

use om_core::{
    ensure, ensure_stable, OptionType, PricingEngine, PricingInputs, PricingResults, Real, Result,
};
use om_math::BinomialDistribution;
use om_methods::{BinomialTree, BlackScholesProcess};
use tracing::debug;

/// Closed-form binomial engine for European options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EuropeanBinomialEngine;

impl EuropeanBinomialEngine {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }
}

impl PricingEngine for EuropeanBinomialEngine {
    fn calculate(&self, inputs: &PricingInputs) -> Result<PricingResults> {
        inputs.validate()?;
        ensure!(
            !inputs.exercise.is_american(),
            "the closed-form binomial engine prices European exercise only"
        );

        let process = BlackScholesProcess::from_inputs(inputs);
        let tree = BinomialTree::cox_ross_rubinstein(&process, inputs.maturity, inputs.steps)?;
        let n = tree.steps();
        let (up, down) = (tree.up(), tree.down());
        let strike = inputs.strike;

        let raw = ((strike / (process.spot() * down.powi(n as i32))).ln() / (up / down).ln())
            .floor()
            + 1.0;
        let a = raw.clamp(0.0, (n + 1) as Real) as usize;

        let dist = BinomialDistribution::new(tree.probability(), n as u64)?;
        let expected: Real = match inputs.option_type {
            OptionType::Call => (a..=n)
                .map(|j| dist.pmf(j as u64) * (tree.underlying(n, j) - strike))
                .sum(),
            OptionType::Put => (0..a)
                .map(|j| dist.pmf(j as u64) * (strike - tree.underlying(n, j)))
                .sum(),
        };
        let price = process.discount(inputs.maturity) * expected;

        ensure_stable!(price.is_finite(), "closed-form binomial sum is not finite");
        debug!(engine = "euro_bin", steps = n, first_in_the_money = a, price, "binomial sum done");
        Ok(PricingResults::from_price(price))
    }
}
