//! Explicit scheme in `x = ln S` (Clewlow & Strickland, ch. 5).
//!
//! With `dx = σ√(3Δt)` the middle weight is `2/3 − rΔt`, so the scheme is
//! stable for any step count. Boundaries are Neumann: the slope at each end
//! equals that of the payoff.

use om_core::{Real, Result, Size};
use om_math::Matrix;

use super::{log_levels, neumann_slopes, FdProblem, FdSolution, TridiagonalOperator};

pub(super) fn solve(problem: &FdProblem, nodes: Size, steps: Size) -> Result<FdSolution> {
    let process = &problem.process;
    let sigma = process.volatility();
    let r = process.rate();
    let nu = process.log_drift();

    let dt = problem.maturity / steps as Real;
    let dx = sigma * (3.0 * dt).sqrt();
    let a = sigma * sigma / (dx * dx);
    let pu = 0.5 * dt * (a + nu / dx);
    let pm = 1.0 - dt * a - r * dt;
    let pd = 0.5 * dt * (a - nu / dx);

    let m = nodes;
    let levels = log_levels(process.spot(), nodes, dx);
    let (lower_slope, upper_slope) = neumann_slopes(problem.option_type, &levels);

    let mut op = TridiagonalOperator::new(m + 1);
    for i in 1..m {
        op.lower[i] = pd;
        op.diag[i] = pm;
        op.upper[i] = pu;
    }

    let mut grid = Matrix::zeros(steps + 1, m + 1);
    let mut layer: Vec<Real> = levels.iter().map(|&s| problem.payoff(s)).collect();
    grid.set_row(steps, &layer);

    for j in (0..steps).rev() {
        layer = op.apply(&layer);
        for i in 1..m {
            layer[i] = problem.exercise_floor(layer[i], levels[i]);
        }
        layer[0] = layer[1] - lower_slope;
        layer[m] = layer[m - 1] + upper_slope;
        grid.set_row(j, &layer);
    }

    Ok(FdSolution {
        price: grid[(0, nodes / 2)],
        time_steps: steps,
        space_intervals: m,
    })
}
