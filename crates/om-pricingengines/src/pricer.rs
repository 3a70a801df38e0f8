//! Keyed access to every engine.
//!
//! [`Pricer`] holds a default [`PricingInputs`], applies per-call
//! [`InputOverrides`] on top of it and dispatches to the engine named by a
//! [`PricingMethod`]. Method keys parse from their short names:
//!
//! | key | engine |
//! |---|---|
//! | `euro_bin` | [`EuropeanBinomialEngine`] |
//! | `crr_bin` | [`BinomialEngine`], Cox-Ross-Rubinstein |
//! | `lr_bin` | [`BinomialEngine`], Leisen-Reimer |
//! | `tt` | [`TrinomialEngine`] |
//! | `itt` | [`ImpliedTrinomialEngine`] |
//! | `efd` | [`FiniteDifferenceEngine`], explicit in price |
//! | `ifd` | [`FiniteDifferenceEngine`], implicit in price |
//! | `efd_lns` | [`FiniteDifferenceEngine`], explicit in log-price |
//! | `cn` | [`FiniteDifferenceEngine`], Crank-Nicolson |

use std::fmt;
use std::str::FromStr;

use om_core::{
    Error, InputOverrides, PricingEngine, PricingInputs, PricingResults, Real, Result, Selected,
};
use om_math::Matrix;
use om_methods::{BinomialScheme, FdScheme};

use crate::binomial_engine::BinomialEngine;
use crate::european_binomial_engine::EuropeanBinomialEngine;
use crate::finite_difference_engine::FiniteDifferenceEngine;
use crate::implied_trinomial_engine::{ImpliedTreeValue, ImpliedTrinomialEngine};
use crate::trinomial_engine::TrinomialEngine;

/// A pricing method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PricingMethod {
    /// Closed-form European binomial sum (`euro_bin`).
    EuropeanBinomial,
    /// Cox-Ross-Rubinstein tree (`crr_bin`).
    CoxRossRubinstein,
    /// Leisen-Reimer tree (`lr_bin`).
    LeisenReimer,
    /// Trinomial tree (`tt`).
    Trinomial,
    /// Implied trinomial tree (`itt`).
    ImpliedTrinomial,
    /// Explicit finite differences in price (`efd`).
    ExplicitFd,
    /// Implicit finite differences in price (`ifd`).
    ImplicitFd,
    /// Explicit finite differences in log-price (`efd_lns`).
    ExplicitLogFd,
    /// Crank-Nicolson in log-price (`cn`).
    CrankNicolson,
}

impl PricingMethod {
    /// Every method, in key order.
    pub const ALL: [PricingMethod; 9] = [
        PricingMethod::EuropeanBinomial,
        PricingMethod::CoxRossRubinstein,
        PricingMethod::LeisenReimer,
        PricingMethod::Trinomial,
        PricingMethod::ImpliedTrinomial,
        PricingMethod::ExplicitFd,
        PricingMethod::ImplicitFd,
        PricingMethod::ExplicitLogFd,
        PricingMethod::CrankNicolson,
    ];

    /// Short key of the method.
    pub fn key(self) -> &'static str {
        match self {
            PricingMethod::EuropeanBinomial => "euro_bin",
            PricingMethod::CoxRossRubinstein => "crr_bin",
            PricingMethod::LeisenReimer => "lr_bin",
            PricingMethod::Trinomial => "tt",
            PricingMethod::ImpliedTrinomial => "itt",
            PricingMethod::ExplicitFd => "efd",
            PricingMethod::ImplicitFd => "ifd",
            PricingMethod::ExplicitLogFd => "efd_lns",
            PricingMethod::CrankNicolson => "cn",
        }
    }

    /// The engine behind this method.
    pub fn engine(self) -> Box<dyn PricingEngine> {
        match self {
            PricingMethod::EuropeanBinomial => Box::new(EuropeanBinomialEngine::new()),
            PricingMethod::CoxRossRubinstein => {
                Box::new(BinomialEngine::new(BinomialScheme::CoxRossRubinstein))
            }
            PricingMethod::LeisenReimer => {
                Box::new(BinomialEngine::new(BinomialScheme::LeisenReimer))
            }
            PricingMethod::Trinomial => Box::new(TrinomialEngine::new()),
            PricingMethod::ImpliedTrinomial => Box::new(ImpliedTrinomialEngine::new()),
            PricingMethod::ExplicitFd => Box::new(FiniteDifferenceEngine::new(FdScheme::Explicit)),
            PricingMethod::ImplicitFd => Box::new(FiniteDifferenceEngine::new(FdScheme::Implicit)),
            PricingMethod::ExplicitLogFd => {
                Box::new(FiniteDifferenceEngine::new(FdScheme::ExplicitLogPrice))
            }
            PricingMethod::CrankNicolson => {
                Box::new(FiniteDifferenceEngine::new(FdScheme::CrankNicolson))
            }
        }
    }
}

impl fmt::Display for PricingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PricingMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PricingMethod::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| Error::UnknownMethod(s.to_string()))
    }
}

/// What a [`Pricer`] call returns.
#[derive(Debug, Clone, PartialEq)]
pub enum PricerOutput {
    /// A single number (price, one Greek, or one implied-tree entry).
    Value(Real),
    /// Price and all Greeks.
    Results(PricingResults),
    /// A calibrated implied-tree table.
    Matrix(Matrix),
}

impl PricerOutput {
    /// The number, if this is a single value.
    pub fn value(&self) -> Option<Real> {
        match self {
            PricerOutput::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// Default inputs plus dispatch by method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pricer {
    defaults: PricingInputs,
}

impl Pricer {
    /// A pricer on top of `defaults`.
    pub fn new(defaults: PricingInputs) -> Self {
        Self { defaults }
    }

    /// The inputs used when no override is given.
    pub fn defaults(&self) -> &PricingInputs {
        &self.defaults
    }

    /// Price with `method` after applying `overrides` to the defaults.
    pub fn price(&self, method: PricingMethod, overrides: &InputOverrides) -> Result<PricerOutput> {
        let inputs = self.defaults.overridden(overrides);
        if method == PricingMethod::ImpliedTrinomial {
            return Ok(match ImpliedTrinomialEngine::new().output(&inputs)? {
                ImpliedTreeValue::Matrix(m) => PricerOutput::Matrix(m),
                ImpliedTreeValue::Scalar(v) => PricerOutput::Value(v),
            });
        }
        Ok(match method.engine().evaluate(&inputs)? {
            Selected::Value(v) => PricerOutput::Value(v),
            Selected::All(r) => PricerOutput::Results(r),
        })
    }

    /// Price with a method given by its key.
    pub fn price_by_key(&self, key: &str, overrides: &InputOverrides) -> Result<PricerOutput> {
        self.price(key.parse()?, overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use om_core::{ImpliedTreeOutput, OptionType, OutputFlag};

    #[test]
    fn keys_round_trip() {
        for m in PricingMethod::ALL {
            assert_eq!(m.key().parse::<PricingMethod>().unwrap(), m);
        }
    }

    #[test]
    fn unknown_key_is_reported() {
        let err = "monte_carlo".parse::<PricingMethod>().unwrap_err();
        assert_eq!(err, Error::UnknownMethod("monte_carlo".into()));
        let err = Pricer::default()
            .price_by_key("bs", &InputOverrides::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownMethod(_)));
    }

    #[test]
    fn every_method_prices_the_defaults() {
        let pricer = Pricer::default();
        let overrides = InputOverrides {
            steps: Some(200),
            ..Default::default()
        };
        for m in PricingMethod::ALL {
            let out = pricer.price(m, &overrides).unwrap();
            let v = out.value().unwrap();
            assert!(v > 3.0 && v < 5.0, "{m}: {v}");
        }
    }

    #[test]
    fn all_flag_returns_results() {
        let overrides = InputOverrides {
            steps: Some(100),
            output: Some(OutputFlag::All),
            option_type: Some(OptionType::Put),
            ..Default::default()
        };
        let out = Pricer::default()
            .price(PricingMethod::CoxRossRubinstein, &overrides)
            .unwrap();
        match out {
            PricerOutput::Results(r) => assert!(r.delta.unwrap() < 0.0),
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[test]
    fn implied_tree_matrix_output() {
        let overrides = InputOverrides {
            implied_output: Some(ImpliedTreeOutput::LocalVolMatrix),
            ..Default::default()
        };
        let out = Pricer::default()
            .price(PricingMethod::ImpliedTrinomial, &overrides)
            .unwrap();
        match out {
            PricerOutput::Matrix(m) => assert_eq!((m.rows(), m.cols()), (10, 19)),
            other => panic!("expected a matrix, got {other:?}"),
        }
    }
}
