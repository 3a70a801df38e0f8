//! # optionmodels
//!
//! Lattice and finite-difference pricing of European and American vanilla
//! options.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `om-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use optionmodels::{InputOverrides, OptionType, Pricer, PricingMethod};
//!
//! let pricer = Pricer::default();
//! let put = InputOverrides {
//!     option_type: Some(OptionType::Put),
//!     steps: Some(200),
//!     ..Default::default()
//! };
//! let value = pricer
//!     .price(PricingMethod::CoxRossRubinstein, &put)
//!     .unwrap()
//!     .value()
//!     .unwrap();
//! assert!(value > 3.0 && value < 5.0);
//! ```
//!
//! Engines can also be used directly through the
//! [`PricingEngine`](core::PricingEngine) trait:
//!
//! ```rust
//! use optionmodels::core::{PricingEngine, PricingInputs};
//! use optionmodels::pricingengines::TrinomialEngine;
//!
//! let inputs = PricingInputs { steps: 100, ..Default::default() };
//! let results = TrinomialEngine::new().calculate(&inputs).unwrap();
//! assert!(results.delta.is_some());
//! ```
//!
//! Engines emit `tracing` events at `debug` and `trace` level; install a
//! subscriber to see grid sizes, prices and implied-tree fallbacks.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, inputs, errors, and the engine trait.
pub use om_core as core;

/// Dense matrices and probability distributions.
pub use om_math as math;

/// Numerical methods (lattices, implied trees, finite differences).
pub use om_methods as methods;

/// Pricing engines and the keyed pricer.
pub use om_pricingengines as pricingengines;

pub use om_core::{
    Error, ExerciseStyle, ImpliedTreeOutput, ImpliedTreeParams, InputOverrides, OptionType,
    OutputFlag, PricingEngine, PricingInputs, PricingResults, Result, Selected,
};
pub use om_pricingengines::{Pricer, PricerOutput, PricingMethod};
