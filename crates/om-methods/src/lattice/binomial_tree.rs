//! Recombining binomial trees for option pricing.
//!
//! | Variant | Reference |
//! |---|---|
//! | [`BinomialTree::cox_ross_rubinstein`] | Cox, Ross & Rubinstein (1979) |
//! | [`BinomialTree::leisen_reimer`] | Leisen & Reimer (1996) |
//!
//! Node `(i, j)` is the state after `j` up-moves and `i − j` down-moves:
//! `S · u^j · d^(i−j)`.

use om_core::{
    ensure, ensure_stable, DiscountFactor, ExerciseStyle, OptionType, Real, Result, Size, Time,
};

use super::Rollback;
use crate::process::BlackScholesProcess;

/// Parameterisation of the up/down factors and probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinomialScheme {
    /// Equal jumps `u = exp(σ√Δt)`, `d = 1/u`.
    CoxRossRubinstein,
    /// Strike-centred tree built from the Peizer-Pratt inversion.
    LeisenReimer,
}

/// A recombining binomial tree with constant factors.
#[derive(Debug, Clone)]
pub struct BinomialTree {
    x0: Real,
    dt: Time,
    steps: Size,
    up: Real,
    down: Real,
    pu: Real,
}

impl BinomialTree {
    /// Build a tree of the given scheme.
    ///
    /// `strike` is only used by strike-dependent schemes.
    pub fn new(
        scheme: BinomialScheme,
        process: &BlackScholesProcess,
        end: Time,
        steps: Size,
        strike: Real,
    ) -> Result<Self> {
        match scheme {
            BinomialScheme::CoxRossRubinstein => Self::cox_ross_rubinstein(process, end, steps),
            BinomialScheme::LeisenReimer => Self::leisen_reimer(process, end, steps, strike),
        }
    }

    /// Cox-Ross-Rubinstein tree.
    ///
    /// `u = exp(σ√Δt)`, `d = 1/u`, `p = (exp(bΔt) − d) / (u − d)`.
    pub fn cox_ross_rubinstein(
        process: &BlackScholesProcess,
        end: Time,
        steps: Size,
    ) -> Result<Self> {
        ensure!(steps > 0, "steps must be > 0");
        ensure!(end > 0.0, "maturity must be positive, got {end}");
        let dt = end / steps as Real;
        let up = (process.volatility() * dt.sqrt()).exp();
        let down = 1.0 / up;
        let pu = (process.growth(dt) - down) / (up - down);
        Self::checked(process.spot(), dt, steps, up, down, pu)
    }

    /// Leisen-Reimer tree.
    ///
    /// `p = h(d₂)`, `u = exp(bΔt)·h(d₁)/h(d₂)`, `d = (exp(bΔt) − p·u)/(1 − p)`
    /// with `h` the Peizer-Pratt method 2 inversion. An even step count is
    /// bumped to the next odd number.
    pub fn leisen_reimer(
        process: &BlackScholesProcess,
        end: Time,
        steps: Size,
        strike: Real,
    ) -> Result<Self> {
        ensure!(steps > 0, "steps must be > 0");
        ensure!(end > 0.0, "maturity must be positive, got {end}");
        ensure!(strike > 0.0, "strike must be positive, got {strike}");
        let odd_steps = if steps % 2 != 0 { steps } else { steps + 1 };
        let dt = end / odd_steps as Real;
        let sigma = process.volatility();
        let std_dev = sigma * end.sqrt();
        let d1 = ((process.spot() / strike).ln() + (process.carry() + 0.5 * sigma * sigma) * end)
            / std_dev;
        let d2 = d1 - std_dev;

        let pu = peizer_pratt_2(d2, odd_steps);
        let pdash = peizer_pratt_2(d1, odd_steps);
        ensure_stable!(
            pu > 0.0 && pu < 1.0,
            "Leisen-Reimer: degenerate probability {pu}"
        );
        let growth = process.growth(dt);
        let up = growth * pdash / pu;
        let down = (growth - pu * up) / (1.0 - pu);
        Self::checked(process.spot(), dt, odd_steps, up, down, pu)
    }

    fn checked(x0: Real, dt: Time, steps: Size, up: Real, down: Real, pu: Real) -> Result<Self> {
        ensure_stable!(
            pu.is_finite() && (0.0..=1.0).contains(&pu),
            "risk-neutral probability {pu} outside [0, 1] (try more steps)"
        );
        ensure_stable!(
            down > 0.0 && up > down,
            "degenerate factors u={up}, d={down}"
        );
        Ok(Self {
            x0,
            dt,
            steps,
            up,
            down,
            pu,
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

    /// Up factor.
    pub fn up(&self) -> Real {
        self.up
    }

    /// Down factor.
    pub fn down(&self) -> Real {
        self.down
    }

    /// Up probability (the down probability is `1 − p`).
    pub fn probability(&self) -> Real {
        self.pu
    }

    /// Number of nodes at depth `i`.
    pub fn size(&self, i: usize) -> usize {
        i + 1
    }

    /// Underlying value at node `(i, j)`.
    pub fn underlying(&self, i: usize, j: usize) -> Real {
        self.x0 * self.up.powi(j as i32) * self.down.powi((i - j) as i32)
    }

    // ── Backward induction ───────────────────────────────────────────────

    /// Roll a vanilla payoff back to the root.
    ///
    /// `discount` is the one-step discount factor. With American exercise
    /// every node is floored at its intrinsic value.
    pub fn roll_back(
        &self,
        option_type: OptionType,
        strike: Real,
        exercise: ExerciseStyle,
        discount: DiscountFactor,
    ) -> Rollback {
        let n = self.steps;
        let pu = self.pu;
        let pd = 1.0 - pu;
        let mut values: Vec<Real> = (0..=n)
            .map(|j| option_type.intrinsic(self.underlying(n, j), strike))
            .collect();

        let mut rollback = Rollback::default();
        rollback.record(n, &values);

        for i in (0..n).rev() {
            for j in 0..=i {
                let hold = discount * (pu * values[j + 1] + pd * values[j]);
                values[j] = if exercise.is_american() {
                    hold.max(option_type.intrinsic(self.underlying(i, j), strike))
                } else {
                    hold
                };
            }
            rollback.record(i, &values[..=i]);
        }

        rollback.value = values[0];
        rollback
    }
}

// ─── Helper functions ─────────────────────────────────────────────────────────

/// Peizer-Pratt Method 2 inversion.
///
/// Maps a normal quantile `z` to a probability for an `n`-step binomial
/// approximation. Requires `n` to be odd.
fn peizer_pratt_2(z: Real, n: usize) -> Real {
    let nf = n as Real;
    let r = z / (nf + 1.0 / 3.0 + 0.1 / (nf + 1.0));
    let ex = (-r * r * (nf + 1.0 / 6.0)).exp();
    0.5 + z.signum() * 0.5 * (1.0 - ex).sqrt()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
