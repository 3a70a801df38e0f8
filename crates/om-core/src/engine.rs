//! Pricing results and the engine trait.

use crate::errors::{Error, Result};
use crate::inputs::PricingInputs;
use crate::output::OutputFlag;
use crate::Real;

/// Price and the sensitivities an engine could read off its grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingResults {
    /// Option value.
    pub price: Real,
    /// ∂V/∂S, when the engine produces it.
    pub delta: Option<Real>,
    /// ∂²V/∂S², when the engine produces it.
    pub gamma: Option<Real>,
    /// Value change per calendar day, when the engine produces it.
    pub theta: Option<Real>,
}

impl PricingResults {
    /// Results holding only a price.
    pub fn from_price(price: Real) -> Self {
        Self {
            price,
            delta: None,
            gamma: None,
            theta: None,
        }
    }

    /// Attach delta.
    pub fn with_delta(mut self, delta: Real) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Attach gamma.
    pub fn with_gamma(mut self, gamma: Real) -> Self {
        self.gamma = Some(gamma);
        self
    }

    /// Attach theta.
    pub fn with_theta(mut self, theta: Real) -> Self {
        self.theta = Some(theta);
        self
    }

    /// Pick the quantity named by `flag`.
    ///
    /// Asking for a sensitivity the engine did not produce is reported as
    /// [`Error::UnsupportedOutputFlag`].
    pub fn select(&self, flag: OutputFlag) -> Result<Selected> {
        let pick = |v: Option<Real>| {
            v.map(Selected::Value)
                .ok_or_else(|| Error::UnsupportedOutputFlag(flag.to_string()))
        };
        match flag {
            OutputFlag::Price => Ok(Selected::Value(self.price)),
            OutputFlag::Delta => pick(self.delta),
            OutputFlag::Gamma => pick(self.gamma),
            OutputFlag::Theta => pick(self.theta),
            OutputFlag::All => Ok(Selected::All(*self)),
        }
    }
}

/// A selected engine output: one number, or the full labelled set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selected {
    /// A single scalar.
    Value(Real),
    /// Price, delta, gamma and theta together.
    All(PricingResults),
}

impl Selected {
    /// The scalar, if this is a single value.
    pub fn value(&self) -> Option<Real> {
        match self {
            Selected::Value(v) => Some(*v),
            Selected::All(_) => None,
        }
    }
}

/// A pricing engine: a pure function of [`PricingInputs`].
///
/// Engines hold only their scheme choice, never grids or market state, so a
/// single engine value can be shared freely across threads.
pub trait PricingEngine: std::fmt::Debug + Send + Sync {
    /// Price the contract described by `inputs`.
    fn calculate(&self, inputs: &PricingInputs) -> Result<PricingResults>;

    /// Price and return the output named by `inputs.output`.
    fn evaluate(&self, inputs: &PricingInputs) -> Result<Selected> {
        self.calculate(inputs)?.select(inputs.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_builder() {
        let r = PricingResults::from_price(42.0)
            .with_delta(0.55)
            .with_gamma(0.02);
        assert_eq!(r.select(OutputFlag::Price).unwrap().value(), Some(42.0));
        assert_eq!(r.select(OutputFlag::Delta).unwrap().value(), Some(0.55));
        assert_eq!(r.select(OutputFlag::Gamma).unwrap().value(), Some(0.02));
    }

    #[test]
    fn missing_sensitivity_is_an_error() {
        let r = PricingResults::from_price(1.0);
        assert_eq!(
            r.select(OutputFlag::Theta),
            Err(Error::UnsupportedOutputFlag("theta".into()))
        );
    }

    #[test]
    fn all_returns_labelled_set() {
        let r = PricingResults::from_price(1.0).with_theta(-0.01);
        assert_eq!(r.select(OutputFlag::All).unwrap(), Selected::All(r));
    }
}
