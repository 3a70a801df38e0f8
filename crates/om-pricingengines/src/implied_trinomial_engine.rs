//! Implied trinomial tree engine.
//!
//! Calibrates an [`ImpliedTrinomialTree`] from the implied-tree parameters
//! of [`PricingInputs`] and returns either a calibrated table, one entry of
//! it, or the European value on the calibrated tree. The tree has no early
//! exercise: the exercise style of the inputs is not consulted.

use om_core::{ImpliedTreeOutput, PricingEngine, PricingInputs, PricingResults, Real, Result};
use om_math::Matrix;
use om_methods::{BlackScholesProcess, ImpliedTrinomialTree};
use tracing::debug;

/// A value returned by [`ImpliedTrinomialEngine::output`].
#[derive(Debug, Clone, PartialEq)]
pub enum ImpliedTreeValue {
    /// A full `(depth, state)` table.
    Matrix(Matrix),
    /// A single number.
    Scalar(Real),
}

impl ImpliedTreeValue {
    /// The number, if this is a scalar.
    pub fn scalar(&self) -> Option<Real> {
        match self {
            ImpliedTreeValue::Scalar(v) => Some(*v),
            ImpliedTreeValue::Matrix(_) => None,
        }
    }

    /// The table, if this is a matrix.
    pub fn matrix(&self) -> Option<&Matrix> {
        match self {
            ImpliedTreeValue::Matrix(m) => Some(m),
            ImpliedTreeValue::Scalar(_) => None,
        }
    }
}

/// Implied trinomial tree engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImpliedTrinomialEngine;

impl ImpliedTrinomialEngine {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }

    /// Calibrate the tree described by `inputs`.
    pub fn calibrate(&self, inputs: &PricingInputs) -> Result<ImpliedTrinomialTree> {
        inputs.validate()?;
        let process = BlackScholesProcess::from_inputs(inputs);
        ImpliedTrinomialTree::calibrate(
            &process,
            inputs.maturity,
            inputs.implied.steps,
            inputs.implied.skew,
        )
    }

    /// Calibrate and return the quantity named by `inputs.implied.output`.
    ///
    /// Node selectors read `[step][state]`; indices outside the table are
    /// [`om_core::Error::IndexOutOfRange`].
    pub fn output(&self, inputs: &PricingInputs) -> Result<ImpliedTreeValue> {
        let tree = self.calibrate(inputs)?;
        let (step, state) = (inputs.implied.step, inputs.implied.state);

        let value = match inputs.implied.output {
            ImpliedTreeOutput::UpMatrix => ImpliedTreeValue::Matrix(tree.up_probabilities().clone()),
            ImpliedTreeOutput::UpNode => {
                ImpliedTreeValue::Scalar(tree.up_probabilities().get(step, state)?)
            }
            ImpliedTreeOutput::DownMatrix => {
                ImpliedTreeValue::Matrix(tree.down_probabilities().clone())
            }
            ImpliedTreeOutput::DownNode => {
                ImpliedTreeValue::Scalar(tree.down_probabilities().get(step, state)?)
            }
            ImpliedTreeOutput::LocalVolMatrix => {
                ImpliedTreeValue::Matrix(tree.local_volatility().clone())
            }
            ImpliedTreeOutput::LocalVolNode => {
                ImpliedTreeValue::Scalar(tree.local_volatility().get(step, state)?)
            }
            ImpliedTreeOutput::ArrowDebreuMatrix => {
                ImpliedTreeValue::Matrix(tree.arrow_debreu().clone())
            }
            ImpliedTreeOutput::ArrowDebreuNode => {
                ImpliedTreeValue::Scalar(tree.arrow_debreu().get(step, state)?)
            }
            ImpliedTreeOutput::Price => {
                ImpliedTreeValue::Scalar(tree.price(inputs.option_type, inputs.strike))
            }
        };
        debug!(
            engine = "itt",
            output = %inputs.implied.output,
            replacements = tree.replacements(),
            "implied tree output selected"
        );
        Ok(value)
    }
}

impl PricingEngine for ImpliedTrinomialEngine {
    fn calculate(&self, inputs: &PricingInputs) -> Result<PricingResults> {
        let tree = self.calibrate(inputs)?;
        let price = tree.price(inputs.option_type, inputs.strike);
        debug!(engine = "itt", steps = tree.steps(), price, "implied tree priced");
        Ok(PricingResults::from_price(price))
    }
}
