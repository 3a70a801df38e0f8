//! Black-Scholes-Merton closed form for European options.
//!
//! Not one of the lattice or grid engines: it is the reference every
//! engine converges to, used by the convergence tests and the benches.

use om_core::{OptionType, PricingResults, Real};
use om_math::{normal_cdf, normal_pdf};

/// Black-Scholes-Merton price and Greeks for a European option.
///
/// $$C = S e^{-qT} N(d_1) - K e^{-rT} N(d_2)$$
/// $$P = K e^{-rT} N(-d_2) - S e^{-qT} N(-d_1)$$
///
/// Theta is reported per calendar day, the convention of the lattice
/// engines.
pub fn black_scholes_merton(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    risk_free_rate: Real,
    dividend_yield: Real,
    volatility: Real,
    time_to_expiry: Real,
) -> PricingResults {
    let phi = option_type.sign();
    let t = time_to_expiry;

    if t <= 0.0 {
        return PricingResults::from_price(option_type.intrinsic(spot, strike))
            .with_delta(0.0)
            .with_gamma(0.0)
            .with_theta(0.0);
    }

    let r = risk_free_rate;
    let q = dividend_yield;
    let sigma = volatility;
    let sqrt_t = t.sqrt();
    let std_dev = sigma * sqrt_t;
    let df_r = (-r * t).exp();
    let df_q = (-q * t).exp();
    let fwd = spot * ((r - q) * t).exp();

    let (d1, d2) = if std_dev > 1e-15 {
        let d1 = ((spot / strike).ln() + (r - q + 0.5 * sigma * sigma) * t) / std_dev;
        (d1, d1 - std_dev)
    } else {
        let big = if fwd > strike { 1e15 } else { -1e15 };
        (big, big)
    };

    let nd1 = normal_cdf(phi * d1);
    let nd2 = normal_cdf(phi * d2);
    let npd1 = normal_pdf(d1);

    let price = phi * (spot * df_q * nd1 - strike * df_r * nd2);
    let delta = phi * df_q * nd1;
    let gamma = if std_dev > 1e-15 {
        df_q * npd1 / (spot * std_dev)
    } else {
        0.0
    };
    let theta_per_year = -(spot * df_q * npd1 * sigma) / (2.0 * sqrt_t)
        - phi * r * strike * df_r * nd2
        + phi * q * spot * df_q * nd1;

    PricingResults::from_price(price)
        .with_delta(delta)
        .with_gamma(gamma)
        .with_theta(theta_per_year / 365.0)
}
