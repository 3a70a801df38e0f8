//! Crank-Nicolson scheme in `x = ln S` (Clewlow & Strickland, ch. 5).
//!
//! Each step solves
//!
//! ```text
//! pd·V[i−1] + pm·V[i] + pu·V[i+1] = −pu·W[i+1] − (pm − 2)·W[i] − pd·W[i−1]
//! ```
//!
//! for the new layer `V` given the old layer `W`, with the Neumann
//! conditions `V[1] − V[0] = λ_L` and `V[M] − V[M−1] = λ_U` folded into the
//! first and last rows. Early exercise is applied while back-substituting,
//! so every node sees already-floored neighbours above it.

use om_core::{ensure_stable, Real, Result, Size};

use super::{log_levels, neumann_slopes, FdProblem, FdSolution, PIVOT_TOLERANCE};

pub(super) fn solve(problem: &FdProblem, nodes: Size, steps: Size) -> Result<FdSolution> {
    let process = &problem.process;
    let sigma = process.volatility();
    let r = process.rate();
    let nu = process.log_drift();

    let dt = problem.maturity / steps as Real;
    let dx = sigma * (3.0 * dt).sqrt();
    let a = sigma * sigma / (dx * dx);
    let pu = -0.25 * dt * (a + nu / dx);
    let pm = 1.0 + 0.5 * dt * a + 0.5 * r * dt;
    let pd = -0.25 * dt * (a - nu / dx);

    let m = nodes;
    let levels = log_levels(process.spot(), nodes, dx);
    let (lower_slope, upper_slope) = neumann_slopes(problem.option_type, &levels);

    let mut values: Vec<Real> = levels.iter().map(|&s| problem.payoff(s)).collect();
    let mut next = vec![0.0; m + 1];
    let mut pmd = vec![0.0; m];
    let mut rhs = vec![0.0; m];

    for _ in 0..steps {
        // forward elimination
        pmd[1] = pm + pd;
        rhs[1] = -pu * values[2] - (pm - 2.0) * values[1] - pd * values[0] + pd * lower_slope;
        for i in 2..m {
            ensure_stable!(
                pmd[i - 1].abs() >= PIVOT_TOLERANCE,
                "Crank-Nicolson pivot {} at node {} is too small",
                pmd[i - 1],
                i - 1
            );
            let ratio = pd / pmd[i - 1];
            pmd[i] = pm - pu * ratio;
            rhs[i] = -pu * values[i + 1] - (pm - 2.0) * values[i] - pd * values[i - 1]
                - rhs[i - 1] * ratio;
        }

        // back substitution
        let last = pu + pmd[m - 1];
        ensure_stable!(
            last.abs() >= PIVOT_TOLERANCE && pmd[m - 1].abs() >= PIVOT_TOLERANCE,
            "Crank-Nicolson boundary pivot {last} is too small"
        );
        next[m] = (rhs[m - 1] + pmd[m - 1] * upper_slope) / last;
        next[m - 1] = next[m] - upper_slope;
        next[m] = problem.exercise_floor(next[m], levels[m]);
        next[m - 1] = problem.exercise_floor(next[m - 1], levels[m - 1]);
        for i in (1..m - 1).rev() {
            let v = (rhs[i] - pu * next[i + 1]) / pmd[i];
            next[i] = problem.exercise_floor(v, levels[i]);
        }
        next[0] = problem.exercise_floor(next[1] - lower_slope, levels[0]);

        std::mem::swap(&mut values, &mut next);
    }

    Ok(FdSolution {
        price: values[nodes / 2],
        time_steps: steps,
        space_intervals: m,
    })
}
