//! Explicit scheme on a uniform price grid (Hull's formulation).
//!
//! `S_i = i·dS` with `dS = S/nodes`, so the spot sits on node `nodes`. The
//! grid reaches at least `2K` and `2S`. The time step is the largest one
//! keeping every middle weight `1 − σ²i²Δt` non-negative.

use om_core::{OptionType, Real, Result, Size};
use om_math::Matrix;

use super::{FdProblem, FdSolution, TridiagonalOperator};

pub(super) fn solve(problem: &FdProblem, nodes: Size) -> Result<FdSolution> {
    let process = &problem.process;
    let spot = process.spot();
    let strike = problem.strike;
    let sigma2 = process.volatility().powi(2);
    let b = process.carry();
    let r = process.rate();

    let ds = spot / nodes as Real;
    let spot_index = nodes;
    let m = (2 * (strike / ds).floor() as usize).max(2 * spot_index);

    let dt_max = (ds * ds / (4.0 * sigma2 * strike * strike)).min(1.0 / (sigma2 * (m * m) as Real));
    let n = (problem.maturity / dt_max).floor() as usize + 1;
    let dt = problem.maturity / n as Real;
    let df = 1.0 / (1.0 + r * dt);

    let levels: Vec<Real> = (0..=m).map(|i| i as Real * ds).collect();

    let mut op = TridiagonalOperator::new(m + 1);
    for i in 1..m {
        let fi = i as Real;
        let diffusion = sigma2 * fi * fi;
        op.lower[i] = df * 0.5 * (diffusion - b * fi) * dt;
        op.diag[i] = df * (1.0 - diffusion * dt);
        op.upper[i] = df * 0.5 * (diffusion + b * fi) * dt;
    }

    let mut grid = Matrix::zeros(n + 1, m + 1);
    let mut layer: Vec<Real> = levels.iter().map(|&s| problem.payoff(s)).collect();
    grid.set_row(n, &layer);

    let mut accumulated = 1.0;
    for j in (0..n).rev() {
        accumulated *= df;
        layer = op.apply(&layer);
        for i in 1..m {
            layer[i] = problem.exercise_floor(layer[i], levels[i]);
        }

        let strike_discount = if problem.exercise.is_american() {
            1.0
        } else {
            accumulated
        };
        match problem.option_type {
            OptionType::Call => {
                layer[0] = 0.0;
                layer[m] = levels[m] - strike * strike_discount;
            }
            OptionType::Put => {
                layer[0] = strike * strike_discount;
                layer[m] = 0.0;
            }
        }
        grid.set_row(j, &layer);
    }

    Ok(FdSolution {
        price: grid[(0, spot_index)],
        time_steps: n,
        space_intervals: m,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::BlackScholesProcess;
    use om_core::ExerciseStyle;

    fn problem(option_type: OptionType, exercise: ExerciseStyle) -> FdProblem {
        FdProblem {
            process: BlackScholesProcess::new(100.0, 0.005, 0.0, 0.2),
            strike: 100.0,
            maturity: 0.25,
            option_type,
            exercise,
        }
    }

    #[test]
    fn european_call_near_black_scholes() {
        // Black-Scholes: 4.0480
        let sol = solve(&problem(OptionType::Call, ExerciseStyle::European), 100).unwrap();
        assert!((sol.price - 4.0480).abs() < 0.02, "explicit call = {}", sol.price);
        assert_eq!(sol.space_intervals, 200);
    }

    #[test]
    fn american_put_not_below_european() {
        let eu = solve(&problem(OptionType::Put, ExerciseStyle::European), 100).unwrap();
        let am = solve(&problem(OptionType::Put, ExerciseStyle::American), 100).unwrap();
        assert!(am.price >= eu.price - 1e-12);
    }

    #[test]
    fn grid_covers_spot_when_strike_is_low() {
        let mut p = problem(OptionType::Call, ExerciseStyle::European);
        p.strike = 40.0;
        let sol = solve(&p, 20).unwrap();
        assert_eq!(sol.space_intervals, 40);
        assert!(sol.price > 59.0, "deep ITM call = {}", sol.price);
    }

    #[test]
    fn step_count_comes_from_the_stability_bound() {
        let mut p = problem(OptionType::Put, ExerciseStyle::European);
        p.maturity = 0.1234;
        let sol = solve(&p, 100).unwrap();
        // dS = 1, M = 200: dt_max = min(1/(4·0.04·100²), 1/(0.04·200²)) = 6.25e-4
        assert_eq!(sol.space_intervals, 200);
        assert_eq!(sol.time_steps, 198);
        let dt = p.maturity / sol.time_steps as Real;
        let sigma2 = 0.2 * 0.2;
        assert!(sigma2 * 200.0 * 200.0 * dt <= 1.0);
    }
}
