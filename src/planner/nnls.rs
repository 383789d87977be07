//! Non-negative least squares over food quantities.
//!
//! Solves
//!
//! ```text
//! minimize ||A x - b||²  subject to  x >= 0
//! ```
//!
//! where column `j` of `A` holds the grams of each tracked nutrient supplied by
//! one gram of food `j`, and `b` holds the target grams. The method is the
//! active-set algorithm of Lawson and Hanson: indices are split into a passive
//! set (free) and an active set (pinned at zero). Each outer step frees the
//! active index with the largest positive gradient; each inner step solves the
//! unconstrained problem over the passive set and, if that leaves a passive
//! coefficient non-positive, walks back toward the last feasible point and pins
//! the offending indices.
//!
//! The passive-set subproblem is tiny (three rows), so it is solved by SVD,
//! which also yields the minimum-norm solution when there are more passive
//! foods than nutrients.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use tracing::debug;

use crate::error::{RationError, Result};
use crate::models::{FeedingPlan, FoodProfile, MacroSplit};
use crate::planner::constants::{MAX_ITERATIONS_PER_FOOD, MIN_ITERATIONS, SVD_TOLERANCES};

/// Solver knobs. `None` picks the default.
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Bound on passive-set solves. Default: `max(3 * N, 30)`.
    pub max_iterations: Option<usize>,
    /// Gradient tolerance. Default: `10 * eps * ||A||_1 * max(rows, cols) * max(||b||_inf, 1)`.
    pub tolerance: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStatus {
    /// Optimality conditions hold within tolerance.
    Optimal,
    /// No candidates, or no candidate supplies anything; `x` is all zero.
    Degenerate,
}

#[derive(Debug, Clone, Serialize)]
pub struct MixSolution {
    /// Grams per food, aligned with the columns of `A`. Never negative.
    pub grams: Vec<f64>,
    /// `||A x - b||`.
    pub residual: f64,
    pub iterations: usize,
    pub status: SolveStatus,
}

impl MixSolution {
    /// Nutrient grams actually delivered, `A x`.
    pub fn achieved(&self, a: &DMatrix<f64>) -> Vec<f64> {
        let x = DVector::from_column_slice(&self.grams);
        (a * x).iter().copied().collect()
    }
}

/// Build the 3 x N matrix of (protein, fat, carb) grams per gram of food.
pub fn macro_matrix(foods: &[&FoodProfile]) -> DMatrix<f64> {
    DMatrix::from_fn(3, foods.len(), |i, j| foods[j].macros_per_gram()[i])
}

/// Lawson-Hanson tolerance, scaled by the target magnitude so that rounding
/// in the residual of large targets does not read as a positive gradient.
fn default_tolerance(a: &DMatrix<f64>, b: &DVector<f64>) -> f64 {
    let norm1 = a
        .column_iter()
        .map(|c| c.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max);
    let scale = b.amax().max(1.0);
    10.0 * f64::EPSILON * norm1 * a.nrows().max(a.ncols()) as f64 * scale
}

fn validate(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<()> {
    if a.nrows() != b.len() {
        return Err(RationError::invalid(format!(
            "coefficient matrix has {} rows but target has {} components",
            a.nrows(),
            b.len()
        )));
    }
    if let Some(v) = b.iter().find(|v| !v.is_finite() || **v < 0.0) {
        return Err(RationError::invalid(format!(
            "target components must be finite and non-negative, got {}",
            v
        )));
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(RationError::invalid("coefficient matrix must be finite"));
    }
    Ok(())
}

/// Gradient of `-½||Ax - b||²`, i.e. `Aᵀ(b - Ax)`.
fn gradient(a: &DMatrix<f64>, b: &DVector<f64>, x: &DVector<f64>) -> DVector<f64> {
    a.tr_mul(&(b - a * x))
}

/// Unconstrained least squares over the passive columns, scattered back into
/// a full-length vector with zeros elsewhere.
///
/// Returns `None` if SVD fails at every cutoff.
fn solve_passive(a: &DMatrix<f64>, b: &DVector<f64>, passive: &[bool]) -> Option<DVector<f64>> {
    let cols: Vec<usize> = (0..passive.len()).filter(|&j| passive[j]).collect();
    let mut full = DVector::zeros(passive.len());
    if cols.is_empty() {
        return Some(full);
    }

    let svd = a.select_columns(cols.iter()).svd(true, true);
    let z = SVD_TOLERANCES.iter().find_map(|&tol| {
        svd.solve(b, tol)
            .ok()
            .filter(|z| z.iter().all(|v| v.is_finite()))
    })?;

    for (k, &j) in cols.iter().enumerate() {
        full[j] = z[k];
    }
    Some(full)
}

fn residual_norm(a: &DMatrix<f64>, b: &DVector<f64>, x: &DVector<f64>) -> f64 {
    (a * x - b).norm()
}

/// Find non-negative food quantities minimizing `||A x - b||`.
///
/// Fails with `InvalidInput` for negative or non-finite targets and with
/// `NonConvergence` (carrying the best feasible iterate) when the iteration
/// bound is exhausted.
pub fn solve_mix(a: &DMatrix<f64>, b: &DVector<f64>, config: &SolverConfig) -> Result<MixSolution> {
    validate(a, b)?;

    let n = a.ncols();
    if n == 0 || a.iter().all(|v| *v == 0.0) {
        return Ok(MixSolution {
            grams: vec![0.0; n],
            residual: b.norm(),
            iterations: 0,
            status: SolveStatus::Degenerate,
        });
    }

    let tol = config.tolerance.unwrap_or_else(|| default_tolerance(a, b));
    let max_iterations = config
        .max_iterations
        .unwrap_or((MAX_ITERATIONS_PER_FOOD * n).max(MIN_ITERATIONS));

    let mut x = DVector::zeros(n);
    let mut passive = vec![false; n];
    let mut iterations = 0;

    let bail = |x: &DVector<f64>, iterations: usize| {
        let residual = residual_norm(a, b, x);
        RationError::NonConvergence {
            iterations,
            residual,
            best: Box::new(MixSolution {
                grams: x.iter().map(|v| v.max(0.0)).collect(),
                residual,
                iterations,
                status: SolveStatus::Optimal,
            }),
        }
    };

    let mut w = gradient(a, b, &x);
    loop {
        // Free the pinned index whose gradient points most uphill.
        let candidate = (0..n)
            .filter(|&j| !passive[j] && w[j] > tol)
            .max_by(|&i, &j| w[i].total_cmp(&w[j]));
        let Some(t) = candidate else {
            break;
        };

        if iterations >= max_iterations {
            return Err(bail(&x, iterations));
        }
        iterations += 1;

        passive[t] = true;
        let mut s = solve_passive(a, b, &passive).ok_or_else(|| bail(&x, iterations))?;

        // Rounding can make the freed coefficient non-positive; pin it and try
        // the next candidate.
        if s[t] <= 0.0 {
            passive[t] = false;
            w[t] = 0.0;
            continue;
        }

        loop {
            let blocking: Vec<usize> = (0..n).filter(|&j| passive[j] && s[j] <= 0.0).collect();
            if blocking.is_empty() {
                break;
            }

            if iterations >= max_iterations {
                return Err(bail(&x, iterations));
            }
            iterations += 1;

            // Longest step from x toward s that stays feasible.
            let (alpha, pinned) = blocking
                .iter()
                .map(|&j| {
                    let denom = x[j] - s[j];
                    let ratio = if denom > 0.0 { x[j] / denom } else { 0.0 };
                    (ratio, j)
                })
                .fold((f64::INFINITY, t), |best, cur| {
                    if cur.0 < best.0 { cur } else { best }
                });

            let step = (&s - &x) * alpha;
            x += step;
            passive[pinned] = false;
            x[pinned] = 0.0;
            for j in 0..n {
                if passive[j] && x[j] <= tol {
                    passive[j] = false;
                    x[j] = 0.0;
                }
            }

            debug!(iterations, alpha, pinned, "nnls: pinned blocking coefficient");
            s = solve_passive(a, b, &passive).ok_or_else(|| bail(&x, iterations))?;
        }

        x = s;
        w = gradient(a, b, &x);
        debug!(
            iterations,
            freed = t,
            residual = residual_norm(a, b, &x),
            "nnls: outer step"
        );
    }

    let grams: Vec<f64> = x.iter().map(|v| v.max(0.0)).collect();
    let residual = residual_norm(a, b, &DVector::from_column_slice(&grams));

    Ok(MixSolution {
        grams,
        residual,
        iterations,
        status: SolveStatus::Optimal,
    })
}

/// Solve for fresh-food grams meeting macro targets (protein, fat, carb).
pub fn plan_by_least_squares(
    foods: &[&FoodProfile],
    macro_target: [f64; 3],
    config: &SolverConfig,
) -> Result<(FeedingPlan, MixSolution)> {
    let a = macro_matrix(foods);
    let b = DVector::from_column_slice(&macro_target);
    let solution = solve_mix(&a, &b, config)?;
    Ok((plan_from_solution(foods, &solution), solution))
}

pub fn plan_from_solution(foods: &[&FoodProfile], solution: &MixSolution) -> FeedingPlan {
    FeedingPlan::from_grams(foods.iter().copied().zip(solution.grams.iter().copied()))
}

/// Achieved calorie split of `A x`, for reporting.
pub fn achieved_split(a: &DMatrix<f64>, solution: &MixSolution) -> MacroSplit {
    match solution.achieved(a).as_slice() {
        [protein, fat, carb] => MacroSplit::from_macros(*protein, *fat, *carb),
        _ => MacroSplit::from_macros(0.0, 0.0, 0.0),
    }
}
