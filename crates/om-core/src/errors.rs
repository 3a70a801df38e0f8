//! Error types for optionmodels.
//!
//! Every engine reports failures through a single `thiserror`-derived enum.
//! Parameter checks go through [`ensure!`](crate::ensure), numerical guards
//! inside a sweep through [`ensure_stable!`](crate::ensure_stable).

use thiserror::Error;

/// The top-level error type used throughout optionmodels.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A pricing input is out of its admissible range (non-positive
    /// maturity, volatility, step count, ...). Raised before any grid is
    /// allocated.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A sweep hit a near-zero pivot or denominator, or produced a
    /// non-finite value.
    #[error("numeric instability: {0}")]
    NumericInstability(String),

    /// The requested output selector is not recognised or cannot be
    /// produced by the engine.
    #[error("unsupported output flag: {0}")]
    UnsupportedOutputFlag(String),

    /// The requested pricing method key is not recognised.
    #[error("unknown pricing method: {0}")]
    UnknownMethod(String),

    /// Index out of range.
    #[error("index ({index}) out of range [0, {size})")]
    IndexOutOfRange {
        /// The index that was out of range.
        index: usize,
        /// The size of the container.
        size: usize,
    },
}

/// Shorthand `Result` type used throughout optionmodels.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::InvalidParameter(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use om_core::{ensure, errors::Error};
/// fn positive(x: f64) -> om_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::InvalidParameter(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidParameter(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::NumericInstability(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use om_core::{ensure_stable, errors::Error};
/// fn divide(a: f64, b: f64) -> om_core::errors::Result<f64> {
///     ensure_stable!(b.abs() > 1e-12, "pivot {b} is too small");
///     Ok(a / b)
/// }
/// assert!(divide(1.0, 2.0).is_ok());
/// assert!(matches!(divide(1.0, 0.0), Err(Error::NumericInstability(_))));
/// ```
#[macro_export]
macro_rules! ensure_stable {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::NumericInstability(
                format!($($msg)*)
            ));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let e = Error::InvalidParameter("steps must be > 0".into());
        assert_eq!(e.to_string(), "invalid parameter: steps must be > 0");

        let e = Error::IndexOutOfRange { index: 7, size: 5 };
        assert_eq!(e.to_string(), "index (7) out of range [0, 5)");
    }

    #[test]
    fn ensure_stable_passes_through_on_success() {
        fn check(x: f64) -> Result<f64> {
            ensure_stable!(x.is_finite(), "value {x} is not finite");
            Ok(x)
        }
        assert_eq!(check(2.0), Ok(2.0));
        assert!(matches!(check(f64::NAN), Err(Error::NumericInstability(_))));
    }
}
