//! Finite-difference engine over the four grid schemes.

use om_core::{PricingEngine, PricingInputs, PricingResults, Result};
use om_methods::{BlackScholesProcess, FdProblem, FdScheme, FdSolver};

/// Finite-difference pricing engine for European and American options.
///
/// Uses `inputs.nodes` space intervals and `inputs.steps` time steps (the
/// explicit price scheme picks its own step count). Produces a price only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiniteDifferenceEngine {
    scheme: FdScheme,
}

impl FiniteDifferenceEngine {
    /// Engine on the given scheme.
    pub fn new(scheme: FdScheme) -> Self {
        Self { scheme }
    }

    /// The discretisation.
    pub fn scheme(&self) -> FdScheme {
        self.scheme
    }
}

impl PricingEngine for FiniteDifferenceEngine {
    fn calculate(&self, inputs: &PricingInputs) -> Result<PricingResults> {
        inputs.validate()?;
        let problem = FdProblem {
            process: BlackScholesProcess::from_inputs(inputs),
            strike: inputs.strike,
            maturity: inputs.maturity,
            option_type: inputs.option_type,
            exercise: inputs.exercise,
        };
        let solution = FdSolver::new(self.scheme, inputs.nodes, inputs.steps).solve(&problem)?;
        Ok(PricingResults::from_price(solution.price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic_european_engine::black_scholes_merton;
    use om_core::{Error, ExerciseStyle, OptionType, OutputFlag};

    const SCHEMES: [FdScheme; 4] = [
        FdScheme::Explicit,
        FdScheme::Implicit,
        FdScheme::ExplicitLogPrice,
        FdScheme::CrankNicolson,
    ];

    #[test]
    fn every_scheme_is_near_black_scholes() {
        let bs = black_scholes_merton(OptionType::Put, 100.0, 100.0, 0.005, 0.0, 0.2, 0.25).price;
        let inputs = PricingInputs {
            option_type: OptionType::Put,
            ..Default::default()
        };
        for scheme in SCHEMES {
            let price = FiniteDifferenceEngine::new(scheme)
                .calculate(&inputs)
                .unwrap()
                .price;
            assert!((price - bs).abs() < 0.05, "{scheme:?}: {price} vs {bs}");
        }
    }

    #[test]
    fn american_not_below_european() {
        for scheme in SCHEMES {
            let eu = PricingInputs {
                option_type: OptionType::Put,
                steps: 200,
                ..Default::default()
            };
            let am = PricingInputs {
                exercise: ExerciseStyle::American,
                ..eu
            };
            let engine = FiniteDifferenceEngine::new(scheme);
            let pe = engine.calculate(&eu).unwrap().price;
            let pa = engine.calculate(&am).unwrap().price;
            assert!(pa >= pe - 1e-12, "{scheme:?}: american {pa} < european {pe}");
        }
    }

    #[test]
    fn greeks_are_unsupported() {
        let inputs = PricingInputs {
            output: OutputFlag::Theta,
            steps: 50,
            ..Default::default()
        };
        let err = FiniteDifferenceEngine::new(FdScheme::CrankNicolson)
            .evaluate(&inputs)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOutputFlag(_)));
    }
}
