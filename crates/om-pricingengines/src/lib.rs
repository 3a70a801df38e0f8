//! # om-pricingengines
//!
//! Pricing engines for vanilla options: lattice and finite-difference
//! implementations over [`om_core::PricingInputs`], plus the keyed
//! [`Pricer`] front end.
//!
//! ## Engines
//!
//! - [`BinomialEngine`] — Cox-Ross-Rubinstein or Leisen-Reimer tree, with Greeks
//! - [`EuropeanBinomialEngine`] — closed-form binomial sum for European options
//! - [`TrinomialEngine`] — trinomial tree, with Greeks
//! - [`ImpliedTrinomialEngine`] — skew-calibrated implied trinomial tree
//! - [`FiniteDifferenceEngine`] — explicit, implicit, log-price explicit and
//!   Crank-Nicolson grids
//!
//! [`black_scholes_merton`] is the closed-form reference the engines are
//! tested and benchmarked against.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytic_european_engine;
pub mod binomial_engine;
pub mod european_binomial_engine;
pub mod finite_difference_engine;
pub mod implied_trinomial_engine;
pub mod pricer;
pub mod trinomial_engine;

pub use analytic_european_engine::black_scholes_merton;
pub use binomial_engine::BinomialEngine;
pub use european_binomial_engine::EuropeanBinomialEngine;
pub use finite_difference_engine::FiniteDifferenceEngine;
pub use implied_trinomial_engine::{ImpliedTreeValue, ImpliedTrinomialEngine};
pub use pricer::{Pricer, PricerOutput, PricingMethod};
pub use trinomial_engine::TrinomialEngine;
