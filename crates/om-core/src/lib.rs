//! # om-core
//!
//! Core types, configuration, and error definitions for optionmodels.
//!
//! This crate provides the building blocks shared by the other crates in the
//! workspace: type aliases, the error enum and its macros, option side and
//! exercise style, output selectors, the per-call [`PricingInputs`]
//! configuration, and the [`PricingEngine`] trait.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Pricing results and the `PricingEngine` trait.
pub mod engine;

/// Error types and the `ensure!` / `ensure_stable!` macros.
pub mod errors;

/// Pricing inputs, defaults, and overrides.
pub mod inputs;

/// Option side and exercise style.
pub mod option;

/// Output selectors for lattice and implied-tree engines.
pub mod output;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices / step counts.
pub type Size = usize;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A discount factor in [0, 1].
pub type DiscountFactor = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use engine::{PricingEngine, PricingResults, Selected};
pub use errors::{Error, Result};
pub use inputs::{ImpliedTreeParams, InputOverrides, PricingInputs};
pub use option::{ExerciseStyle, OptionType};
pub use output::{ImpliedTreeOutput, OutputFlag};
