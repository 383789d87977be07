use serde::Serialize;
use tracing::{info, warn};

use crate::error::{RationError, Result};
use crate::models::{FeedingPlan, FoodProfile, MacroSplit, NutrientTarget};
use crate::planner::allocation::{allocate_by_ratio, allocate_fixed};
use crate::planner::nnls::{plan_by_least_squares, plan_from_solution, MixSolution, SolverConfig};
use crate::planner::requirements::EnergyRequirement;
use crate::planner::weighting::plan_by_macro_fit;

/// How the fresh portion is composed.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// User ratios, aligned with the fresh foods.
    Ratio(Vec<f64>),
    /// Heuristic single-composition mix weighted by macro fit.
    MacroFit,
    /// Non-negative least squares on the remaining macro grams.
    LeastSquares,
}

#[derive(Debug, Clone)]
pub struct FormulationConfig {
    /// Calorie split used to turn MER into macro targets.
    pub split: MacroSplit,
    pub solver: SolverConfig,
    /// Use the best iterate when the solver hits its iteration bound.
    pub accept_approximate: bool,
}

impl Default for FormulationConfig {
    fn default() -> Self {
        Self {
            split: MacroSplit::canonical(),
            solver: SolverConfig::default(),
            accept_approximate: true,
        }
    }
}

/// Full result of one feeding computation.
#[derive(Debug, Clone, Serialize)]
pub struct Formulation {
    pub requirement: EnergyRequirement,
    pub baseline: NutrientTarget,
    pub dry_plan: FeedingPlan,
    pub consumed: NutrientTarget,
    pub remaining: NutrientTarget,
    pub fresh_plan: FeedingPlan,
    /// Present for the least-squares strategy.
    pub solution: Option<MixSolution>,
    /// Whether `solution` hit the iteration bound.
    pub approximate: bool,
}

impl Formulation {
    /// Dry and fresh contributions combined.
    pub fn total(&self) -> NutrientTarget {
        self.dry_plan.totals().add(&self.fresh_plan.totals())
    }
}

/// Baseline from MER, subtract the fixed dry portion, then fill the rest with
/// fresh foods using `strategy`.
pub fn formulate(
    requirement: &EnergyRequirement,
    dry: &[(&FoodProfile, f64)],
    fresh: &[&FoodProfile],
    strategy: &Strategy,
    config: &FormulationConfig,
) -> Result<Formulation> {
    config.split.validate()?;

    let baseline = requirement.baseline_target(&config.split);
    let allocation = allocate_fixed(dry, &baseline)?;
    let remaining = allocation.remaining;

    info!(
        mer = requirement.mer,
        dry_kcal = allocation.consumed.calories,
        remaining_kcal = remaining.calories,
        fresh_foods = fresh.len(),
        "formulating ration"
    );

    let mut solution = None;
    let mut approximate = false;

    let fresh_plan = match strategy {
        Strategy::Ratio(ratios) => {
            if ratios.len() != fresh.len() {
                return Err(RationError::invalid(format!(
                    "{} ratios given for {} fresh foods",
                    ratios.len(),
                    fresh.len()
                )));
            }
            let pairs: Vec<(&FoodProfile, f64)> =
                fresh.iter().copied().zip(ratios.iter().copied()).collect();
            allocate_by_ratio(&pairs, remaining.calories)?
        }
        Strategy::MacroFit => plan_by_macro_fit(fresh, &config.split, remaining.calories)?,
        Strategy::LeastSquares => {
            match plan_by_least_squares(fresh, remaining.macro_vector(), &config.solver) {
                Ok((plan, sol)) => {
                    solution = Some(sol);
                    plan
                }
                Err(RationError::NonConvergence {
                    iterations,
                    residual,
                    best,
                }) if config.accept_approximate => {
                    warn!(
                        iterations,
                        residual, "solver hit its iteration bound, using best iterate"
                    );
                    approximate = true;
                    let plan = plan_from_solution(fresh, &best);
                    solution = Some(*best);
                    plan
                }
                Err(e) => return Err(e),
            }
        }
    };

    Ok(Formulation {
        requirement: requirement.clone(),
        baseline,
        dry_plan: allocation.plan,
        consumed: allocation.consumed,
        remaining,
        fresh_plan,
        solution,
        approximate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodCategory;
    use crate::planner::requirements::{compute_requirement, ActivityLevel, LifeStage};

    fn requirement() -> EnergyRequirement {
        compute_requirement(4.0, LifeStage::NeuteredAdult, ActivityLevel::Medium).unwrap()
    }

    fn kibble() -> FoodProfile {
        FoodProfile::new("Kibble", FoodCategory::Dry, 8.0, 40.0, 18.0, 20.0, Some(4.0)).unwrap()
    }

    fn chicken() -> FoodProfile {
        FoodProfile::new("Chicken", FoodCategory::Fresh, 73.0, 23.0, 2.0, 0.0, Some(1.2)).unwrap()
    }

    fn liver() -> FoodProfile {
        FoodProfile::new("Liver", FoodCategory::Fresh, 70.0, 18.0, 6.0, 1.0, Some(1.3)).unwrap()
    }

    #[test]
    fn test_ratio_strategy_covers_remaining_calories() {
        let req = requirement();
        let k = kibble();
        let c = chicken();
        let l = liver();
        let f = formulate(
            &req,
            &[(&k, 30.0)],
            &[&c, &l],
            &Strategy::Ratio(vec![70.0, 30.0]),
            &FormulationConfig::default(),
        )
        .unwrap();

        assert!((f.consumed.calories - 120.0).abs() < 1e-9);
        assert!((f.remaining.calories - (req.mer - 120.0)).abs() < 1e-9);
        assert!((f.fresh_plan.totals().calories - f.remaining.calories).abs() < 1e-9);
        assert!((f.total().calories - req.mer).abs() < 1e-9);
        assert!(f.solution.is_none());
    }

    #[test]
    fn test_ratio_length_mismatch() {
        let req = requirement();
        let c = chicken();
        let result = formulate(
            &req,
            &[],
            &[&c],
            &Strategy::Ratio(vec![1.0, 2.0]),
            &FormulationConfig::default(),
        );
        assert!(matches!(result, Err(RationError::InvalidInput(_))));
    }

    #[test]
    fn test_least_squares_strategy_reports_solution() {
        let req = requirement();
        let c = chicken();
        let l = liver();
        let f = formulate(
            &req,
            &[],
            &[&c, &l],
            &Strategy::LeastSquares,
            &FormulationConfig::default(),
        )
        .unwrap();
        let sol = f.solution.as_ref().unwrap();
        assert_eq!(sol.grams.len(), 2);
        assert!(f.fresh_plan.items.iter().all(|i| i.grams >= 0.0));
        assert!(!f.approximate);
    }

    #[test]
    fn test_dry_over_target_leaves_nothing_to_fill() {
        let req = requirement();
        let k = kibble();
        let c = chicken();
        let f = formulate(
            &req,
            &[(&k, 500.0)],
            &[&c],
            &Strategy::MacroFit,
            &FormulationConfig::default(),
        )
        .unwrap();
        assert_eq!(f.remaining.calories, 0.0);
        assert_eq!(f.fresh_plan.total_grams(), 0.0);
    }

    #[test]
    fn test_strict_mode_propagates_non_convergence() {
        let req = requirement();
        let c = chicken();
        let l = liver();
        let config = FormulationConfig {
            solver: SolverConfig {
                max_iterations: Some(0),
                ..Default::default()
            },
            accept_approximate: false,
            ..Default::default()
        };
        let result = formulate(&req, &[], &[&c, &l], &Strategy::LeastSquares, &config);
        assert!(matches!(result, Err(RationError::NonConvergence { .. })));
    }

    #[test]
    fn test_approximate_mode_accepts_best_iterate() {
        let req = requirement();
        let c = chicken();
        let config = FormulationConfig {
            solver: SolverConfig {
                max_iterations: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        let f = formulate(&req, &[], &[&c], &Strategy::LeastSquares, &config).unwrap();
        assert!(f.approximate);
        assert_eq!(f.fresh_plan.len(), 1);
    }
}
