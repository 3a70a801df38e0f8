//! Constant-parameter Black-Scholes-Merton process.
//!
//! `dS/S = (r − q) dt + σ dW`
//!
//! Lattice and grid builders discretise this process. Rates and volatility
//! are flat; the implied trinomial tree varies volatility per node by
//! building shifted copies with [`BlackScholesProcess::with_volatility`].

use om_core::{DiscountFactor, PricingInputs, Rate, Real, Time, Volatility};

/// A Black-Scholes-Merton process with flat rate, dividend yield and
/// volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholesProcess {
    spot: Real,
    rate: Rate,
    dividend_yield: Rate,
    volatility: Volatility,
}

impl BlackScholesProcess {
    /// Create a new process.
    pub fn new(spot: Real, rate: Rate, dividend_yield: Rate, volatility: Volatility) -> Self {
        Self {
            spot,
            rate,
            dividend_yield,
            volatility,
        }
    }

    /// The market part of a set of pricing inputs.
    pub fn from_inputs(inputs: &PricingInputs) -> Self {
        Self::new(
            inputs.spot,
            inputs.rate,
            inputs.dividend_yield,
            inputs.volatility,
        )
    }

    /// The same process with a different volatility.
    pub fn with_volatility(&self, volatility: Volatility) -> Self {
        Self { volatility, ..*self }
    }

    /// The spot price.
    pub fn spot(&self) -> Real {
        self.spot
    }

    /// Risk-free rate `r`.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Volatility `σ`.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// Cost of carry `b = r − q`.
    pub fn carry(&self) -> Rate {
        self.rate - self.dividend_yield
    }

    /// Drift of `ln S`: `r − q − σ²/2`.
    pub fn log_drift(&self) -> Rate {
        self.carry() - 0.5 * self.volatility * self.volatility
    }

    /// Discount factor `exp(−r·t)`.
    pub fn discount(&self, t: Time) -> DiscountFactor {
        (-self.rate * t).exp()
    }

    /// Forward growth factor `exp((r − q)·t)`.
    pub fn growth(&self, t: Time) -> Real {
        (self.carry() * t).exp()
    }
}
