//! Option side and exercise style.

use crate::Real;
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    /// A call option (right to buy).
    Call,
    /// A put option (right to sell).
    Put,
}

impl OptionType {
    /// +1 for Call, −1 for Put.
    pub fn sign(self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Intrinsic value `max(φ(S − K), 0)`.
    #[inline]
    pub fn intrinsic(self, spot: Real, strike: Real) -> Real {
        (self.sign() * (spot - strike)).max(0.0)
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            other => Err(Error::InvalidParameter(format!(
                "option type must be 'call' or 'put', got '{other}'"
            ))),
        }
    }
}

/// When the holder may exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ExerciseStyle {
    /// Exercise at maturity only.
    #[default]
    European,
    /// Exercise at any time up to maturity.
    American,
}

impl ExerciseStyle {
    /// `true` for American exercise.
    pub fn is_american(self) -> bool {
        matches!(self, ExerciseStyle::American)
    }

    /// Apply the early-exercise floor to a continuation value.
    #[inline]
    pub fn floor(self, continuation: Real, exercise: Real) -> Real {
        match self {
            ExerciseStyle::European => continuation,
            ExerciseStyle::American => continuation.max(exercise),
        }
    }
}
