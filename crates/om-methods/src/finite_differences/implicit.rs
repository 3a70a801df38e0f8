//! Fully implicit scheme on a uniform price grid.
//!
//! `dS = 2S/nodes` with an odd node count bumped to the next even one, so
//! spot sits on node `nodes/2`. The operator is constant in time, so it is factorised
//! once and every step is a single Thomas back-substitution. The first and
//! last rows are identity rows, which keeps both boundaries at their
//! terminal payoff.

use om_core::{Real, Result, Size};

use super::{FdProblem, FdSolution, TridiagonalOperator};

pub(super) fn solve(problem: &FdProblem, nodes: Size, steps: Size) -> Result<FdSolution> {
    let process = &problem.process;
    let spot = process.spot();
    let sigma2 = process.volatility().powi(2);
    let b = process.carry();
    let r = process.rate();

    let nodes = if nodes % 2 == 0 { nodes } else { nodes + 1 };
    let ds = 2.0 * spot / nodes as Real;
    let spot_index = nodes / 2;
    let m = (2 * (problem.strike / ds).floor() as usize).max(2 * spot_index);
    let dt = problem.maturity / steps as Real;

    let levels: Vec<Real> = (0..=m).map(|i| i as Real * ds).collect();

    let mut op = TridiagonalOperator::new(m + 1);
    op.diag[0] = 1.0;
    op.diag[m] = 1.0;
    for i in 1..m {
        let fi = i as Real;
        op.lower[i] = 0.5 * fi * (b - sigma2 * fi) * dt;
        op.diag[i] = 1.0 + (r + sigma2 * fi * fi) * dt;
        op.upper[i] = 0.5 * fi * (-b - sigma2 * fi) * dt;
    }
    let lu = op.factorize()?;

    let mut values: Vec<Real> = levels.iter().map(|&s| problem.payoff(s)).collect();
    for _ in 0..steps {
        values = lu.solve(&values);
        if problem.exercise.is_american() {
            for (v, &s) in values.iter_mut().zip(&levels) {
                *v = problem.exercise_floor(*v, s);
            }
        }
    }

    Ok(FdSolution {
        price: values[spot_index],
        time_steps: steps,
        space_intervals: m,
    })
}
