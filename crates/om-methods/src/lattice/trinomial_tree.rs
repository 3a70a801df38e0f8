//! Recombining trinomial tree for option pricing.
//!
//! Jumps are `u = exp(σ√(2Δt))`, `d = 1/u` with a middle branch that keeps
//! the level. The probabilities match the first two moments of the
//! lognormal step (Boyle, 1986, as in Haug's formulation):
//!
//! ```text
//! pu = ((e^{bΔt/2} − e^{−σ√(Δt/2)}) / (e^{σ√(Δt/2)} − e^{−σ√(Δt/2)}))²
//! pd = ((e^{σ√(Δt/2)} − e^{bΔt/2}) / (e^{σ√(Δt/2)} − e^{−σ√(Δt/2)}))²
//! pm = 1 − pu − pd
//! ```
//!
//! Depth `i` holds `2i + 1` states; node `(i, j)` sits at `S · u^(j−i)`.

use om_core::{
    ensure, ensure_stable, DiscountFactor, ExerciseStyle, OptionType, Real, Result, Size, Time,
};

use super::Rollback;
use crate::process::BlackScholesProcess;

/// A recombining trinomial tree with constant probabilities.
#[derive(Debug, Clone)]
pub struct TrinomialTree {
    x0: Real,
    dt: Time,
    steps: Size,
    up: Real,
    pu: Real,
    pm: Real,
    pd: Real,
}

impl TrinomialTree {
    /// Build a tree for `process` over `[0, end]` with `steps` steps.
    pub fn new(process: &BlackScholesProcess, end: Time, steps: Size) -> Result<Self> {
        ensure!(steps > 0, "steps must be > 0");
        ensure!(end > 0.0, "maturity must be positive, got {end}");
        let sigma = process.volatility();
        ensure!(sigma > 0.0, "volatility must be positive, got {sigma}");

        let dt = end / steps as Real;
        let up = (sigma * (2.0 * dt).sqrt()).exp();

        let half_growth = process.growth(0.5 * dt);
        let e_plus = (sigma * (0.5 * dt).sqrt()).exp();
        let e_minus = 1.0 / e_plus;
        let spread = e_plus - e_minus;
        let pu = ((half_growth - e_minus) / spread).powi(2);
        let pd = ((e_plus - half_growth) / spread).powi(2);
        let pm = 1.0 - pu - pd;

        ensure_stable!(
            pu.is_finite() && pd.is_finite() && (0.0..=1.0).contains(&pm),
            "trinomial probabilities pu={pu}, pm={pm}, pd={pd} are not a distribution"
        );

        Ok(Self {
            x0: process.spot(),
            dt,
            steps,
            up,
            pu,
            pm,
            pd,
        })
    }

    /// Price a European option with a fresh tree.
    ///
    /// This is the building block the implied tree calibrates against.
    pub fn european_price(
        process: &BlackScholesProcess,
        option_type: OptionType,
        strike: Real,
        end: Time,
        steps: Size,
    ) -> Result<Real> {
        let tree = Self::new(process, end, steps)?;
        let discount = process.discount(tree.dt);
        let rollback = tree.roll_back(option_type, strike, ExerciseStyle::European, discount);
        Ok(rollback.value)
    }

    /// Number of time steps.
    pub fn steps(&self) -> Size {
        self.steps
    }

    /// Time increment per step.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Up factor; the down factor is its reciprocal.
    pub fn up(&self) -> Real {
        self.up
    }

    /// `(pu, pm, pd)`.
    pub fn probabilities(&self) -> (Real, Real, Real) {
        (self.pu, self.pm, self.pd)
    }

    /// Number of nodes at depth `i`.
    pub fn size(&self, i: usize) -> usize {
        2 * i + 1
    }

    /// Underlying value at node `(i, j)`.
    pub fn underlying(&self, i: usize, j: usize) -> Real {
        self.x0 * self.up.powi(j as i32 - i as i32)
    }

    /// Roll a vanilla payoff back to the root.
    pub fn roll_back(
        &self,
        option_type: OptionType,
        strike: Real,
        exercise: ExerciseStyle,
        discount: DiscountFactor,
    ) -> Rollback {
        let n = self.steps;
        let mut values: Vec<Real> = (0..self.size(n))
            .map(|j| option_type.intrinsic(self.underlying(n, j), strike))
            .collect();

        let mut rollback = Rollback::default();
        rollback.record(n, &values);

        for i in (0..n).rev() {
            for j in 0..self.size(i) {
                let hold = discount
                    * (self.pu * values[j + 2] + self.pm * values[j + 1] + self.pd * values[j]);
                values[j] = if exercise.is_american() {
                    hold.max(option_type.intrinsic(self.underlying(i, j), strike))
                } else {
                    hold
                };
            }
            rollback.record(i, &values[..self.size(i)]);
        }

        rollback.value = values[0];
        rollback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn test_process() -> BlackScholesProcess {
        BlackScholesProcess::new(100.0, 0.05, 0.02, 0.25)
    }

    #[test]
    fn probabilities_sum_to_one_and_match_forward() {
        let process = test_process();
        let tree = TrinomialTree::new(&process, 1.0, 100).unwrap();
        let (pu, pm, pd) = tree.probabilities();
        assert_abs_diff_eq!(pu + pm + pd, 1.0, epsilon = 1e-14);
        let mean = pu * tree.up() + pm + pd / tree.up();
        assert_abs_diff_eq!(mean, process.growth(tree.dt()), epsilon = 1e-10);
    }

    #[test]
    fn levels_are_centred_on_spot() {
        let tree = TrinomialTree::new(&test_process(), 1.0, 10).unwrap();
        assert_eq!(tree.size(3), 7);
        assert_abs_diff_eq!(tree.underlying(3, 3), 100.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            tree.underlying(3, 4) * tree.underlying(3, 2),
            100.0 * 100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn rollback_depth_one_has_three_states() {
        let process = test_process();
        let tree = TrinomialTree::new(&process, 1.0, 50).unwrap();
        let rb = tree.roll_back(
            OptionType::Put,
            100.0,
            ExerciseStyle::American,
            process.discount(tree.dt()),
        );
        assert_eq!(rb.depth1.len(), 3);
        assert_eq!(rb.depth2.len(), 5);
        // put values fall as the state rises
        assert!(rb.depth1[0] > rb.depth1[1] && rb.depth1[1] > rb.depth1[2]);
    }

    #[test]
    fn european_price_is_positive_for_atm() {
        let p = TrinomialTree::european_price(&test_process(), OptionType::Call, 100.0, 1.0, 200)
            .unwrap();
        assert!(p > 5.0 && p < 20.0, "call = {p}");
    }

    #[test]
    fn huge_carry_breaks_the_distribution() {
        let process = BlackScholesProcess::new(100.0, 2.0, 0.0, 0.01);
        let err = TrinomialTree::new(&process, 1.0, 1).unwrap_err();
        assert!(matches!(err, om_core::Error::NumericInstability(_)));
    }
}
