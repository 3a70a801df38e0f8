//! Trinomial lattice engine.
//!
//! Greeks come from the three depth-1 nodes:
//!
//! ```text
//! delta = (V₁₂ − V₁₀) / (S·u − S·d)
//! gamma = ((V₁₂ − V₁₁)/(S·u − S) − (V₁₁ − V₁₀)/(S − S·d)) / (½(S·u − S·d))
//! theta = (V₁₁ − V₀₀) / Δt / 365
//! ```

use om_core::{ensure_stable, PricingEngine, PricingInputs, PricingResults, Result};
use om_methods::{BlackScholesProcess, TrinomialTree};
use tracing::debug;

/// Trinomial lattice engine for European and American options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrinomialEngine;

impl TrinomialEngine {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }
}

impl PricingEngine for TrinomialEngine {
    fn calculate(&self, inputs: &PricingInputs) -> Result<PricingResults> {
        inputs.validate()?;
        let process = BlackScholesProcess::from_inputs(inputs);
        let tree = TrinomialTree::new(&process, inputs.maturity, inputs.steps)?;
        let rb = tree.roll_back(
            inputs.option_type,
            inputs.strike,
            inputs.exercise,
            process.discount(tree.dt()),
        );
        ensure_stable!(rb.value.is_finite(), "trinomial tree produced a non-finite price");
        debug!(engine = "tt", steps = tree.steps(), price = rb.value, "trinomial rollback done");

        let (v10, v11, v12) = (rb.depth1[0], rb.depth1[1], rb.depth1[2]);
        let s = process.spot();
        let s_u = tree.underlying(1, 2);
        let s_d = tree.underlying(1, 0);

        let delta = (v12 - v10) / (s_u - s_d);
        let gamma = ((v12 - v11) / (s_u - s) - (v11 - v10) / (s - s_d)) / (0.5 * (s_u - s_d));
        let theta = (v11 - rb.value) / tree.dt() / 365.0;

        Ok(PricingResults::from_price(rb.value)
            .with_delta(delta)
            .with_gamma(gamma)
            .with_theta(theta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic_european_engine::black_scholes_merton;
    use approx::assert_abs_diff_eq;
    use om_core::{ExerciseStyle, OptionType};

    #[test]
    fn converges_to_black_scholes() {
        let inputs = PricingInputs {
            steps: 2000,
            ..Default::default()
        };
        let bs = black_scholes_merton(OptionType::Call, 100.0, 100.0, 0.005, 0.0, 0.2, 0.25);
        let res = TrinomialEngine::new().calculate(&inputs).unwrap();
        assert_abs_diff_eq!(res.price, bs.price, epsilon = 1e-2);
        assert_abs_diff_eq!(res.delta.unwrap(), bs.delta.unwrap(), epsilon = 1e-2);
        assert_abs_diff_eq!(res.gamma.unwrap(), bs.gamma.unwrap(), epsilon = 1e-3);
    }

    #[test]
    fn american_put_delta_in_range() {
        let inputs = PricingInputs {
            spot: 50.0,
            strike: 55.0,
            maturity: 1.0,
            rate: 0.05,
            dividend_yield: 0.01,
            volatility: 0.3,
            option_type: OptionType::Put,
            exercise: ExerciseStyle::American,
            steps: 300,
            ..Default::default()
        };
        let res = TrinomialEngine::new().calculate(&inputs).unwrap();
        let delta = res.delta.unwrap();
        assert!((-1.0..=0.0).contains(&delta), "delta = {delta}");
        assert!(res.price >= 5.0);
    }

    #[test]
    fn single_step_still_has_greeks() {
        let inputs = PricingInputs {
            steps: 1,
            ..Default::default()
        };
        let res = TrinomialEngine::new().calculate(&inputs).unwrap();
        assert!(res.delta.is_some() && res.theta.is_some());
    }
}
