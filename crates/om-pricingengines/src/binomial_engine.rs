//! Binomial lattice engine (Cox-Ross-Rubinstein or Leisen-Reimer).
//!
//! Prices European or American vanilla options by backward induction and
//! reads delta, gamma and theta off the first two depths of the tree:
//!
//! ```text
//! delta = (V₁₁ − V₁₀) / (S·u − S·d)
//! gamma = ((V₂₂ − V₂₁)/(S·u² − S·u·d) − (V₂₁ − V₂₀)/(S·u·d − S·d²)) / (½(S·u² − S·d²))
//! theta = (V₂₁ − V₀₀) / (2Δt) / 365
//! ```

use om_core::{
    ensure, ensure_stable, PricingEngine, PricingInputs, PricingResults, Real, Result,
};
use om_methods::{BinomialScheme, BinomialTree, BlackScholesProcess, Rollback};
use tracing::debug;

/// Binomial lattice engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinomialEngine {
    scheme: BinomialScheme,
}

impl BinomialEngine {
    /// Engine on the given parameterisation.
    pub fn new(scheme: BinomialScheme) -> Self {
        Self { scheme }
    }

    /// Cox-Ross-Rubinstein engine.
    pub fn cox_ross_rubinstein() -> Self {
        Self::new(BinomialScheme::CoxRossRubinstein)
    }

    /// Leisen-Reimer engine.
    pub fn leisen_reimer() -> Self {
        Self::new(BinomialScheme::LeisenReimer)
    }

    /// The tree parameterisation.
    pub fn scheme(&self) -> BinomialScheme {
        self.scheme
    }

    fn name(&self) -> &'static str {
        match self.scheme {
            BinomialScheme::CoxRossRubinstein => "crr_bin",
            BinomialScheme::LeisenReimer => "lr_bin",
        }
    }
}

impl PricingEngine for BinomialEngine {
    fn calculate(&self, inputs: &PricingInputs) -> Result<PricingResults> {
        inputs.validate()?;
        if inputs.output.needs_greeks() {
            ensure!(
                inputs.steps >= 2,
                "binomial Greeks need at least 2 steps, got {}",
                inputs.steps
            );
        }

        let process = BlackScholesProcess::from_inputs(inputs);
        let tree = BinomialTree::new(
            self.scheme,
            &process,
            inputs.maturity,
            inputs.steps,
            inputs.strike,
        )?;
        let rollback = tree.roll_back(
            inputs.option_type,
            inputs.strike,
            inputs.exercise,
            process.discount(tree.dt()),
        );
        ensure_stable!(
            rollback.value.is_finite(),
            "{} produced a non-finite price",
            self.name()
        );
        debug!(
            engine = self.name(),
            steps = tree.steps(),
            price = rollback.value,
            "binomial rollback done"
        );

        let results = PricingResults::from_price(rollback.value);
        if tree.steps() < 2 {
            return Ok(results);
        }
        let (delta, gamma, theta) = sensitivities(&tree, &rollback);
        Ok(results.with_delta(delta).with_gamma(gamma).with_theta(theta))
    }
}

fn sensitivities(tree: &BinomialTree, rb: &Rollback) -> (Real, Real, Real) {
    let (v10, v11) = (rb.depth1[0], rb.depth1[1]);
    let (v20, v21, v22) = (rb.depth2[0], rb.depth2[1], rb.depth2[2]);
    let (s_d, s_u) = (tree.underlying(1, 0), tree.underlying(1, 1));
    let (s_dd, s_ud, s_uu) = (
        tree.underlying(2, 0),
        tree.underlying(2, 1),
        tree.underlying(2, 2),
    );

    let delta = (v11 - v10) / (s_u - s_d);
    let gamma = ((v22 - v21) / (s_uu - s_ud) - (v21 - v20) / (s_ud - s_dd)) / (0.5 * (s_uu - s_dd));
    let theta = (v21 - rb.value) / (2.0 * tree.dt()) / 365.0;
    (delta, gamma, theta)
}
