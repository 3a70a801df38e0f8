//! End-to-end pricing scenarios on a shared contract.
//!
//! Contract: `S=50, K=55, T=1, r=5%, q=1%, σ=30%`, put.

use approx::assert_abs_diff_eq;
use optionmodels::core::ImpliedTreeParams;
use optionmodels::pricingengines::ImpliedTrinomialEngine;
use optionmodels::{
    ExerciseStyle, ImpliedTreeOutput, InputOverrides, OptionType, OutputFlag, Pricer,
    PricerOutput, PricingInputs, PricingMethod,
};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

fn contract() -> PricingInputs {
    PricingInputs {
        spot: 50.0,
        strike: 55.0,
        maturity: 1.0,
        rate: 0.05,
        dividend_yield: 0.01,
        volatility: 0.3,
        option_type: OptionType::Put,
        exercise: ExerciseStyle::American,
        ..Default::default()
    }
}

fn scenario_a() -> (f64, f64) {
    let pricer = Pricer::new(contract());
    let overrides = InputOverrides {
        steps: Some(500),
        output: Some(OutputFlag::All),
        ..Default::default()
    };
    match pricer.price(PricingMethod::CoxRossRubinstein, &overrides).unwrap() {
        PricerOutput::Results(r) => (r.price, r.delta.unwrap()),
        other => panic!("expected full results, got {other:?}"),
    }
}

#[test]
fn scenario_a_crr_american_put() {
    init_logging();
    let _span = tracing::info_span!("scenario", name = "A").entered();
    let (price, delta) = scenario_a();
    assert!(price.is_finite() && price > 0.0, "price = {price}");
    // never below immediate exercise
    assert!(price >= 5.0);
    assert!((-1.0..=0.0).contains(&delta), "delta = {delta}");
}

#[test]
fn scenario_b_crank_nicolson_matches_crr() {
    init_logging();
    let _span = tracing::info_span!("scenario", name = "B").entered();
    let (reference, _) = scenario_a();
    let overrides = InputOverrides {
        nodes: Some(50),
        steps: Some(500),
        ..Default::default()
    };
    let cn = Pricer::new(contract())
        .price(PricingMethod::CrankNicolson, &overrides)
        .unwrap()
        .value()
        .unwrap();
    let rel = (cn - reference).abs() / reference;
    assert!(rel < 0.05, "CN {cn} vs CRR {reference} ({:.2}%)", rel * 100.0);
}

#[test]
fn scenario_c_implied_tree() {
    init_logging();
    let _span = tracing::info_span!("scenario", name = "C").entered();
    let mut inputs = contract();
    inputs.implied = ImpliedTreeParams {
        steps: 5,
        step: 4,
        state: 4,
        skew: 0.0005,
        output: ImpliedTreeOutput::Price,
    };
    let engine = ImpliedTrinomialEngine::new();

    let price = engine.output(&inputs).unwrap().scalar().unwrap();
    assert!(price.is_finite() && price > 0.0, "price = {price}");

    inputs.implied.output = ImpliedTreeOutput::ArrowDebreuNode;
    let ad = engine.output(&inputs).unwrap().scalar().unwrap();
    assert!((0.0..=1.0).contains(&ad), "ADni(4, 4) = {ad}");

    let tree = engine.calibrate(&inputs).unwrap();
    assert_abs_diff_eq!(tree.arrow_debreu()[(4, 4)], ad, epsilon = 0.0);
}

#[test]
fn selectors_parse_from_their_keys() {
    let overrides = InputOverrides {
        steps: Some(300),
        output: Some("delta".parse().unwrap()),
        implied_output: Some("LVni".parse().unwrap()),
        ..Default::default()
    };
    let pricer = Pricer::new(contract());
    let delta = pricer
        .price_by_key("tt", &overrides)
        .unwrap()
        .value()
        .unwrap();
    assert!(delta < 0.0);
    let lv = pricer
        .price_by_key("itt", &overrides)
        .unwrap()
        .value()
        .unwrap();
    assert!(lv > 0.0 && lv < 1.0, "local vol = {lv}");
}
