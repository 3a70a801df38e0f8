//! Implied trinomial tree (Derman, Kani & Chriss, 1996).
//!
//! The tree keeps the level grid of a standard trinomial tree
//! (`u = exp(σ√(2Δt))`) but calibrates the up and down probabilities of
//! every node so that the tree reprices European options struck at that
//! node under a skewed volatility `σᵢ = σ + (S − Sᵢ)·skew`.
//!
//! Calibration walks forward one depth at a time. At depth `n` it needs the
//! Arrow-Debreu prices `ad[n][·]` (filled by the previous depth) and
//! produces the probabilities and local volatility of depth `n` plus the
//! Arrow-Debreu prices of depth `n + 1`:
//!
//! * nodes at or below the centre are fitted to a put, nodes above it to a
//!   call (each priced with an `(n+1)`-step [`TrinomialTree`]);
//! * a probability outside `[0, 1]` is replaced by a forward-matching
//!   fallback that only depends on where the forward lies between the
//!   successor levels;
//! * `Σᵢ ad[n][i] = exp(−r·nΔt)` holds at every depth by construction.
//!
//! Tables are dense [`Matrix`] values indexed `(depth, state)`:
//! probabilities and local volatilities are `steps × (2·steps − 1)`,
//! Arrow-Debreu prices `(steps + 1) × (2·steps + 1)`.

use om_core::{ensure, ensure_stable, DiscountFactor, Error, OptionType, Real, Result, Size, Time};
use om_math::Matrix;
use tracing::{debug, trace};

use super::TrinomialTree;
use crate::process::BlackScholesProcess;

/// Smallest Arrow-Debreu price a node may be calibrated against.
const MIN_STATE_PRICE: Real = 1e-300;

/// A calibrated implied trinomial tree.
#[derive(Debug, Clone)]
pub struct ImpliedTrinomialTree {
    x0: Real,
    steps: Size,
    dt: Time,
    up: Real,
    discount: DiscountFactor,
    up_probabilities: Matrix,
    down_probabilities: Matrix,
    local_volatility: Matrix,
    arrow_debreu: Matrix,
    replacements: usize,
}

impl ImpliedTrinomialTree {
    /// Calibrate a tree over `[0, end]` with `steps` steps.
    ///
    /// `process` supplies spot, rates and the at-the-money volatility;
    /// `skew` is the volatility change per unit of spot below `S`.
    pub fn calibrate(
        process: &BlackScholesProcess,
        end: Time,
        steps: Size,
        skew: Real,
    ) -> Result<Self> {
        ensure!(steps > 0, "implied tree steps must be > 0");
        ensure!(end > 0.0, "maturity must be positive, got {end}");
        ensure!(skew.is_finite(), "skew must be finite, got {skew}");
        let sigma = process.volatility();
        ensure!(sigma > 0.0, "volatility must be positive, got {sigma}");

        let x0 = process.spot();
        let dt = end / steps as Real;
        let up = (sigma * (2.0 * dt).sqrt()).exp();
        let down = 1.0 / up;
        let discount = process.discount(dt);
        let compound = 1.0 / discount;
        let growth = process.growth(dt);
        let level = |n: usize, i: usize| x0 * up.powi(i as i32 - n as i32);

        let width = 2 * steps - 1;
        let mut pu = Matrix::zeros(steps, width);
        let mut pd = Matrix::zeros(steps, width);
        let mut lv = Matrix::zeros(steps, width);
        let mut ad = Matrix::zeros(steps + 1, 2 * steps + 1);
        ad[(0, 0)] = 1.0;
        let mut replacements = 0;

        for n in 0..steps {
            let sub_maturity = (n + 1) as Real * dt;
            for i in 0..=2 * n {
                let s_mid = level(n, i);
                let s_down = s_mid * down;
                let s_up = s_mid * up;
                let forward = s_mid * growth;

                let sigma_i = sigma + (x0 - s_mid) * skew;
                ensure!(
                    sigma_i > 0.0,
                    "skewed volatility {sigma_i} at node ({n}, {i}) is not positive"
                );
                let node_process = process.with_volatility(sigma_i);

                let weight = ad[(n, i)];
                ensure_stable!(
                    weight > MIN_STATE_PRICE,
                    "Arrow-Debreu price {weight} at node ({n}, {i}) is too small to calibrate against"
                );

                let (raw_p, raw_q) = if i <= n {
                    let put = TrinomialTree::european_price(
                        &node_process,
                        OptionType::Put,
                        s_mid,
                        sub_maturity,
                        n + 1,
                    )?;
                    let below: Real = (0..i)
                        .map(|j| ad[(n, j)] * (s_mid - level(n, j) * growth))
                        .sum();
                    let q = (compound * put - below) / (weight * (s_mid - s_down));
                    let p = (forward + q * (s_mid - s_down) - s_mid) / (s_up - s_mid);
                    (p, q)
                } else {
                    let call = TrinomialTree::european_price(
                        &node_process,
                        OptionType::Call,
                        s_mid,
                        sub_maturity,
                        n + 1,
                    )?;
                    let above: Real = (i + 1..=2 * n)
                        .map(|j| ad[(n, j)] * (level(n, j) * growth - s_mid))
                        .sum();
                    let p = (compound * call - above) / (weight * (s_up - s_mid));
                    let q = (forward - p * (s_up - s_mid) - s_mid) / (s_down - s_mid);
                    (p, q)
                };

                let (p, q) = if is_distribution(raw_p, raw_q) {
                    (raw_p, raw_q)
                } else {
                    let replaced = replacement_probabilities(s_down, s_mid, s_up, forward)
                        .ok_or_else(|| {
                            Error::NumericInstability(format!(
                                "forward {forward} at node ({n}, {i}) lies outside ({s_down}, {s_up})"
                            ))
                        })?;
                    debug!(
                        depth = n,
                        state = i,
                        raw_up = raw_p,
                        raw_down = raw_q,
                        up = replaced.0,
                        down = replaced.1,
                        "implied tree: replaced out-of-range probabilities"
                    );
                    replacements += 1;
                    replaced
                };

                let pm = 1.0 - p - q;
                pu[(n, i)] = p;
                pd[(n, i)] = q;

                let fo = p * s_up + q * s_down + pm * s_mid;
                let variance = p * (s_up - fo).powi(2)
                    + pm * (s_mid - fo).powi(2)
                    + q * (s_down - fo).powi(2);
                lv[(n, i)] = (variance / (fo * fo * dt)).sqrt();

                trace!(
                    depth = n,
                    state = i,
                    up = p,
                    down = q,
                    local_vol = lv[(n, i)],
                    "implied tree node"
                );

                // Arrow-Debreu prices one depth ahead
                let carried = weight * discount;
                if n == 0 {
                    ad[(1, 0)] = q * carried;
                    ad[(1, 1)] = pm * carried;
                    ad[(1, 2)] = p * carried;
                } else if i == 0 {
                    ad[(n + 1, 0)] = q * carried;
                } else if i == 1 {
                    let mid_prev = 1.0 - pu[(n, 0)] - pd[(n, 0)];
                    ad[(n + 1, 1)] = mid_prev * ad[(n, 0)] * discount + q * carried;
                } else {
                    let mid_prev = 1.0 - pu[(n, i - 1)] - pd[(n, i - 1)];
                    ad[(n + 1, i)] = pu[(n, i - 2)] * ad[(n, i - 2)] * discount
                        + mid_prev * ad[(n, i - 1)] * discount
                        + q * carried;
                    if i == 2 * n {
                        ad[(n + 1, i + 1)] =
                            pu[(n, i - 1)] * ad[(n, i - 1)] * discount + pm * carried;
                        ad[(n + 1, i + 2)] = p * carried;
                    }
                }
            }
        }

        ensure_stable!(
            ad.is_finite() && lv.is_finite(),
            "implied tree calibration produced non-finite values"
        );
        debug!(
            steps,
            dt,
            replacements,
            "implied trinomial tree calibrated"
        );

        Ok(Self {
            x0,
            steps,
            dt,
            up,
            discount,
            up_probabilities: pu,
            down_probabilities: pd,
            local_volatility: lv,
            arrow_debreu: ad,
            replacements,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Number of time steps.
    pub fn steps(&self) -> Size {
        self.steps
    }

    /// Time increment per step.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// One-step discount factor `exp(−rΔt)`.
    pub fn discount(&self) -> DiscountFactor {
        self.discount
    }

    /// Underlying value at node `(n, i)`.
    pub fn underlying(&self, n: usize, i: usize) -> Real {
        self.x0 * self.up.powi(i as i32 - n as i32)
    }

    /// Calibrated up probabilities, `steps × (2·steps − 1)`.
    pub fn up_probabilities(&self) -> &Matrix {
        &self.up_probabilities
    }

    /// Calibrated down probabilities, `steps × (2·steps − 1)`.
    pub fn down_probabilities(&self) -> &Matrix {
        &self.down_probabilities
    }

    /// Local volatilities, `steps × (2·steps − 1)`.
    pub fn local_volatility(&self) -> &Matrix {
        &self.local_volatility
    }

    /// Arrow-Debreu prices, `(steps + 1) × (2·steps + 1)`.
    pub fn arrow_debreu(&self) -> &Matrix {
        &self.arrow_debreu
    }

    /// How many nodes fell back to the forward-matching probabilities.
    pub fn replacements(&self) -> usize {
        self.replacements
    }

    /// `Σᵢ ad[n][i] / discountⁿ`; one for a consistent tree.
    pub fn normalised_state_price_sum(&self, depth: usize) -> Real {
        self.arrow_debreu.row_sum(depth, 2 * depth + 1) / self.discount.powi(depth as i32)
    }

    /// Price a European option on the calibrated tree.
    pub fn price(&self, option_type: OptionType, strike: Real) -> Real {
        let n = self.steps;
        let mut values: Vec<Real> = (0..=2 * n)
            .map(|j| option_type.intrinsic(self.underlying(n, j), strike))
            .collect();

        for k in (0..n).rev() {
            for i in 0..=2 * k {
                let p = self.up_probabilities[(k, i)];
                let q = self.down_probabilities[(k, i)];
                values[i] = self.discount
                    * (p * values[i + 2] + (1.0 - p - q) * values[i + 1] + q * values[i]);
            }
        }
        values[0]
    }
}

// ─── Helper functions ─────────────────────────────────────────────────────────

fn is_distribution(p: Real, q: Real) -> bool {
    (0.0..=1.0).contains(&p) && (0.0..=1.0).contains(&q) && p + q <= 1.0
}

/// Forward-matching probabilities used when calibration leaves `[0, 1]`.
///
/// Returns `None` when the forward is outside `(s_down, s_up)`.
fn replacement_probabilities(
    s_down: Real,
    s_mid: Real,
    s_up: Real,
    forward: Real,
) -> Option<(Real, Real)> {
    if s_mid <= forward && forward < s_up {
        let p = 0.5 * ((forward - s_mid) / (s_up - s_mid) + (forward - s_down) / (s_up - s_down));
        let q = 0.5 * (s_up - forward) / (s_up - s_down);
        Some((p, q))
    } else if s_down < forward && forward < s_mid {
        let p = 0.5 * (forward - s_down) / (s_up - s_down);
        let q = 0.5 * ((s_up - forward) / (s_up - s_mid) + (s_mid - forward) / (s_mid - s_down));
        Some((p, q))
    } else {
        None
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
