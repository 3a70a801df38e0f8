//! Pricing inputs and their defaults.
//!
//! [`PricingInputs`] is an immutable per-call configuration. Defaults come
//! from [`Default`]; per-call changes are expressed as an [`InputOverrides`]
//! value applied with [`PricingInputs::overridden`], which returns a new
//! configuration and leaves the original untouched.

use crate::errors::Result;
use crate::option::{ExerciseStyle, OptionType};
use crate::output::{ImpliedTreeOutput, OutputFlag};
use crate::{ensure, Rate, Real, Size, Time, Volatility};

/// Parameters specific to the implied trinomial tree.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ImpliedTreeParams {
    /// Number of calibrated time steps.
    pub steps: Size,
    /// Depth index used by the `*ni` selectors.
    pub step: Size,
    /// State index used by the `*ni` selectors.
    pub state: Size,
    /// Volatility added per unit the node level lies below spot.
    pub skew: Real,
    /// Which calibrated quantity to return.
    pub output: ImpliedTreeOutput,
}

impl Default for ImpliedTreeParams {
    fn default() -> Self {
        Self {
            steps: 10,
            step: 5,
            state: 5,
            skew: 0.0004,
            output: ImpliedTreeOutput::Price,
        }
    }
}

/// Inputs for a single pricing call.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PricingInputs {
    /// Spot price of the underlying.
    pub spot: Real,
    /// Strike price.
    pub strike: Real,
    /// Time to maturity in years.
    pub maturity: Time,
    /// Continuously compounded risk-free rate.
    pub rate: Rate,
    /// Continuous dividend (or foreign) rate.
    pub dividend_yield: Rate,
    /// Black-Scholes volatility.
    pub volatility: Volatility,
    /// Call or put.
    pub option_type: OptionType,
    /// European or American.
    pub exercise: ExerciseStyle,
    /// Number of time steps for lattices and the implicit/log-price grids.
    pub steps: Size,
    /// Number of spatial nodes for finite-difference grids.
    pub nodes: Size,
    /// Which lattice output to return.
    pub output: OutputFlag,
    /// Implied trinomial tree settings.
    pub implied: ImpliedTreeParams,
}

impl Default for PricingInputs {
    fn default() -> Self {
        Self {
            spot: 100.0,
            strike: 100.0,
            maturity: 0.25,
            rate: 0.005,
            dividend_yield: 0.0,
            volatility: 0.2,
            option_type: OptionType::Call,
            exercise: ExerciseStyle::European,
            steps: 1000,
            nodes: 100,
            output: OutputFlag::Price,
            implied: ImpliedTreeParams::default(),
        }
    }
}

impl PricingInputs {
    /// Check the market and contract fields.
    ///
    /// Step and node counts are checked by the engines that use them.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.spot > 0.0 && self.spot.is_finite(),
            "spot must be positive, got {}",
            self.spot
        );
        ensure!(
            self.strike > 0.0 && self.strike.is_finite(),
            "strike must be positive, got {}",
            self.strike
        );
        ensure!(
            self.maturity > 0.0 && self.maturity.is_finite(),
            "maturity must be positive, got {}",
            self.maturity
        );
        ensure!(
            self.volatility > 0.0 && self.volatility.is_finite(),
            "volatility must be positive, got {}",
            self.volatility
        );
        ensure!(
            self.rate.is_finite() && self.dividend_yield.is_finite(),
            "rates must be finite, got r={} q={}",
            self.rate,
            self.dividend_yield
        );
        Ok(())
    }

    /// A copy of `self` with every field set in `overrides` replaced.
    pub fn overridden(&self, overrides: &InputOverrides) -> Self {
        let mut out = *self;
        macro_rules! apply {
            ($($field:ident),* ; $($implied:ident => $target:ident),*) => {
                $(if let Some(v) = overrides.$field { out.$field = v; })*
                $(if let Some(v) = overrides.$implied { out.implied.$target = v; })*
            };
        }
        apply!(
            spot, strike, maturity, rate, dividend_yield, volatility,
            option_type, exercise, steps, nodes, output;
            steps_itt => steps, step => step, state => state,
            skew => skew, implied_output => output
        );
        out
    }
}

/// Optional replacements for any [`PricingInputs`] field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(missing_docs)]
pub struct InputOverrides {
    pub spot: Option<Real>,
    pub strike: Option<Real>,
    pub maturity: Option<Time>,
    pub rate: Option<Rate>,
    pub dividend_yield: Option<Rate>,
    pub volatility: Option<Volatility>,
    pub option_type: Option<OptionType>,
    pub exercise: Option<ExerciseStyle>,
    pub steps: Option<Size>,
    pub nodes: Option<Size>,
    pub output: Option<OutputFlag>,
    pub steps_itt: Option<Size>,
    pub step: Option<Size>,
    pub state: Option<Size>,
    pub skew: Option<Real>,
    pub implied_output: Option<ImpliedTreeOutput>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use proptest::prelude::*;

    #[test]
    fn defaults_match_parameter_table() {
        let p = PricingInputs::default();
        assert_eq!(p.spot, 100.0);
        assert_eq!(p.strike, 100.0);
        assert_eq!(p.maturity, 0.25);
        assert_eq!(p.rate, 0.005);
        assert_eq!(p.steps, 1000);
        assert_eq!(p.nodes, 100);
        assert_eq!(p.implied.steps, 10);
        assert_eq!(p.implied.skew, 0.0004);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn overrides_leave_unset_fields_alone() {
        let base = PricingInputs::default();
        let o = InputOverrides {
            spot: Some(50.0),
            option_type: Some(OptionType::Put),
            steps_itt: Some(5),
            ..Default::default()
        };
        let p = base.overridden(&o);
        assert_eq!(p.spot, 50.0);
        assert_eq!(p.option_type, OptionType::Put);
        assert_eq!(p.implied.steps, 5);
        assert_eq!(p.strike, base.strike);
        assert_eq!(p.implied.skew, base.implied.skew);
        // base is untouched
        assert_eq!(base.spot, 100.0);
    }

    #[test]
    fn non_positive_inputs_are_rejected() {
        let bad = [
            PricingInputs {
                maturity: 0.0,
                ..Default::default()
            },
            PricingInputs {
                volatility: -0.1,
                ..Default::default()
            },
            PricingInputs {
                spot: 0.0,
                ..Default::default()
            },
            PricingInputs {
                strike: f64::NAN,
                ..Default::default()
            },
            PricingInputs {
                rate: f64::INFINITY,
                ..Default::default()
            },
        ];
        for p in bad {
            assert!(matches!(p.validate(), Err(Error::InvalidParameter(_))), "{p:?}");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn empty_overrides_are_identity(
            spot in 1.0f64..500.0,
            strike in 1.0f64..500.0,
            rate in -0.05f64..0.2,
            volatility in 0.01f64..1.0,
            steps in 1usize..5000,
        ) {
            let p = PricingInputs {
                spot,
                strike,
                rate,
                volatility,
                steps,
                ..Default::default()
            };
            prop_assert_eq!(p.overridden(&InputOverrides::default()), p);
        }

        #[test]
        fn overriding_spot_changes_only_spot(base in 1.0f64..500.0, spot in 1.0f64..500.0) {
            let p = PricingInputs {
                spot: base,
                ..Default::default()
            };
            let o = InputOverrides {
                spot: Some(spot),
                ..Default::default()
            };
            let q = p.overridden(&o);
            prop_assert_eq!(q.spot, spot);
            prop_assert_eq!(PricingInputs { spot: base, ..q }, p);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn overrides_deserialize_from_partial_json() {
        let o: InputOverrides =
            serde_json::from_str(r#"{"spot": 50.0, "option_type": "put", "implied_output": "ADni"}"#)
                .unwrap();
        assert_eq!(o.spot, Some(50.0));
        assert_eq!(o.option_type, Some(OptionType::Put));
        assert_eq!(o.implied_output, Some(ImpliedTreeOutput::ArrowDebreuNode));
        assert_eq!(o.strike, None);
    }
}
