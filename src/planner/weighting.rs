use crate::error::Result;
use crate::models::{FeedingPlan, FoodProfile, MacroSplit};
use crate::planner::allocation::allocate_by_ratio;
use crate::planner::constants::*;

/// Grams of macronutrient per kcal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroDensity {
    pub protein: f64,
    pub fat: f64,
    pub carb: f64,
}

impl MacroDensity {
    /// Density implied by a calorie split.
    pub fn from_split(split: &MacroSplit) -> Self {
        Self {
            protein: split.protein / KCAL_PER_G_PROTEIN,
            fat: split.fat / KCAL_PER_G_FAT,
            carb: split.carb / KCAL_PER_G_CARB,
        }
    }

    /// A food's density, or `None` when it carries no energy.
    pub fn of_food(food: &FoodProfile) -> Option<Self> {
        let kcal = food.kcal_per_gram();
        if kcal <= 0.0 {
            return None;
        }
        let [protein, fat, carb] = food.macros_per_gram();
        Some(Self {
            protein: protein / kcal,
            fat: fat / kcal,
            carb: carb / kcal,
        })
    }

    pub fn distance(&self, other: &MacroDensity) -> f64 {
        ((self.protein - other.protein).powi(2)
            + (self.fat - other.fat).powi(2)
            + (self.carb - other.carb).powi(2))
        .sqrt()
    }
}

/// Score each food by how closely its macro density matches `target`.
///
/// Weight is `1 / (distance + 1e-6)`. Foods without energy keep a token weight
/// so they stay in the mix without contributing. Weights are not normalized.
pub fn weight_by_macro_fit<'a>(
    foods: &[&'a FoodProfile],
    target: &MacroDensity,
) -> Vec<(&'a FoodProfile, f64)> {
    foods
        .iter()
        .map(|food| {
            let weight = match MacroDensity::of_food(food) {
                Some(density) => 1.0 / (density.distance(target) + FIT_EPSILON),
                None => ZERO_ENERGY_WEIGHT,
            };
            (*food, weight)
        })
        .collect()
}

/// Single-composition mix: weight by macro fit, then close the calorie gap.
pub fn plan_by_macro_fit(
    foods: &[&FoodProfile],
    split: &MacroSplit,
    remaining_kcal: f64,
) -> Result<FeedingPlan> {
    let weights = weight_by_macro_fit(foods, &MacroDensity::from_split(split));
    allocate_by_ratio(&weights, remaining_kcal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodCategory;
    use crate::planner::allocation::normalize_weights;

    fn food(name: &str, p: f64, f: f64, c: f64, kcal: f64) -> FoodProfile {
        FoodProfile::new(name, FoodCategory::Fresh, 70.0, p, f, c, Some(kcal)).unwrap()
    }

    #[test]
    fn test_canonical_density() {
        let d = MacroDensity::from_split(&MacroSplit::canonical());
        assert!((d.protein - 0.1625).abs() < 1e-12);
        assert!((d.fat - 0.025).abs() < 1e-12);
        assert!((d.carb - 0.03125).abs() < 1e-12);
    }

    #[test]
    fn test_closer_food_gets_more_weight() {
        // Per kcal: 0.16 protein / 0.025 fat / 0.03 carb, nearly canonical.
        let close = food("Close", 16.0, 2.5, 3.0, 1.0);
        let fatty = food("Fatty", 10.0, 30.0, 0.0, 3.2);
        let target = MacroDensity::from_split(&MacroSplit::canonical());
        let weights = weight_by_macro_fit(&[&close, &fatty], &target);
        assert!(weights[0].1 > weights[1].1);
    }

    #[test]
    fn test_exact_match_weight_is_bounded() {
        // Exactly canonical density: weight is 1 / epsilon, not infinite.
        let exact = food("Exact", 16.25, 2.5, 3.125, 1.0);
        let target = MacroDensity::from_split(&MacroSplit::canonical());
        let weights = weight_by_macro_fit(&[&exact], &target);
        assert!(weights[0].1.is_finite());
        assert!(weights[0].1 > 1e5);
    }

    #[test]
    fn test_zero_energy_food_gets_token_weight() {
        let water = food("Broth", 0.0, 0.0, 0.0, 0.0);
        let target = MacroDensity::from_split(&MacroSplit::canonical());
        let weights = weight_by_macro_fit(&[&water], &target);
        assert_eq!(weights[0].1, ZERO_ENERGY_WEIGHT);
    }

    #[test]
    fn test_normalized_weights_sum_to_one() {
        let a = food("A", 20.0, 5.0, 1.0, 1.3);
        let b = food("B", 12.0, 10.0, 1.0, 1.4);
        let c = food("C", 0.0, 0.0, 0.0, 0.0);
        let target = MacroDensity::from_split(&MacroSplit::canonical());
        let weights: Vec<f64> = weight_by_macro_fit(&[&a, &b, &c], &target)
            .into_iter()
            .map(|(_, w)| w)
            .collect();
        let sum: f64 = normalize_weights(&weights).iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_plan_by_macro_fit_meets_calories() {
        let a = food("A", 20.0, 5.0, 1.0, 1.3);
        let b = food("B", 12.0, 10.0, 1.0, 1.4);
        let plan = plan_by_macro_fit(&[&a, &b], &MacroSplit::canonical(), 150.0).unwrap();
        assert!((plan.totals().calories - 150.0).abs() < 1e-9);
        assert!(plan.items.iter().all(|i| i.grams >= 0.0));
    }
}
