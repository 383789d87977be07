use serde::Serialize;
use tracing::debug;

use crate::error::{RationError, Result};
use crate::models::{FeedingPlan, FoodProfile, NutrientTarget};

/// Outcome of subtracting fixed feeding amounts from a target.
#[derive(Debug, Clone, Serialize)]
pub struct Allocation {
    /// Per-food breakdown of the fixed amounts.
    pub plan: FeedingPlan,
    pub consumed: NutrientTarget,
    /// `max(target - consumed, 0)` per component.
    pub remaining: NutrientTarget,
}

fn check_amount(food: &FoodProfile, label: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(RationError::invalid(format!(
            "{} for {} must be finite and non-negative, got {}",
            label,
            food.name(),
            value
        )));
    }
    Ok(())
}

/// Sum the contribution of fixed gram amounts and what is left to feed.
pub fn allocate_fixed(foods: &[(&FoodProfile, f64)], target: &NutrientTarget) -> Result<Allocation> {
    target.validate()?;
    for (food, grams) in foods {
        check_amount(food, "grams", *grams)?;
    }

    let plan = FeedingPlan::from_grams(foods.iter().map(|(f, g)| (*f, *g)));
    let consumed = plan.totals();
    let remaining = target.saturating_sub(&consumed);

    debug!(
        foods = foods.len(),
        consumed_kcal = consumed.calories,
        remaining_kcal = remaining.calories,
        "allocated fixed portion"
    );

    Ok(Allocation {
        plan,
        consumed,
        remaining,
    })
}

/// Scale weights so they sum to 1.
///
/// Returns all zeros when the weights sum to zero.
pub fn normalize_weights(weights: &[f64]) -> Vec<f64> {
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return vec![0.0; weights.len()];
    }
    weights.iter().map(|w| w / sum).collect()
}

/// Cover a calorie deficit with a fixed-ratio mix of foods.
///
/// Ratios need not sum to 100; they are normalized. Total grams is
/// `remaining_kcal / mix_kcal_per_gram`, split by the normalized ratios. A mix
/// with no energy (zero ratio sum or zero density) yields zero grams.
pub fn allocate_by_ratio(foods: &[(&FoodProfile, f64)], remaining_kcal: f64) -> Result<FeedingPlan> {
    if !remaining_kcal.is_finite() || remaining_kcal < 0.0 {
        return Err(RationError::invalid(format!(
            "calorie deficit must be finite and non-negative, got {}",
            remaining_kcal
        )));
    }
    for (food, ratio) in foods {
        check_amount(food, "ratio", *ratio)?;
    }

    let ratios: Vec<f64> = foods.iter().map(|(_, r)| *r).collect();
    let fractions = normalize_weights(&ratios);

    let mix_kcal_per_gram: f64 = foods
        .iter()
        .zip(&fractions)
        .map(|((food, _), frac)| frac * food.kcal_per_gram())
        .sum();

    let total_grams = if mix_kcal_per_gram > 0.0 {
        remaining_kcal / mix_kcal_per_gram
    } else {
        0.0
    };

    debug!(mix_kcal_per_gram, total_grams, "ratio mix");

    Ok(FeedingPlan::from_grams(
        foods
            .iter()
            .zip(&fractions)
            .map(|((food, _), frac)| (*food, total_grams * frac)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodCategory;

    fn kibble() -> FoodProfile {
        FoodProfile::new("Kibble", FoodCategory::Dry, 8.0, 40.0, 18.0, 20.0, Some(4.0)).unwrap()
    }

    fn chicken() -> FoodProfile {
        FoodProfile::new("Chicken", FoodCategory::Fresh, 73.0, 23.0, 2.0, 0.0, Some(1.2)).unwrap()
    }

    fn egg() -> FoodProfile {
        FoodProfile::new("Egg", FoodCategory::Fresh, 75.0, 12.0, 10.0, 1.0, Some(1.4)).unwrap()
    }

    #[test]
    fn test_allocate_fixed_rejects_negative_grams() {
        let k = kibble();
        let target = NutrientTarget::default();
        let result = allocate_fixed(&[(&k, -5.0)], &target);
        assert!(matches!(result, Err(RationError::InvalidInput(_))));
    }

    #[test]
    fn test_allocate_fixed_empty() {
        let target = NutrientTarget {
            calories: 300.0,
            protein_g: 30.0,
            fat_g: 7.0,
            carb_g: 9.0,
        };
        let alloc = allocate_fixed(&[], &target).unwrap();
        assert_eq!(alloc.consumed, NutrientTarget::default());
        assert_eq!(alloc.remaining, target);
    }

    #[test]
    fn test_normalize_weights() {
        let w = normalize_weights(&[1.0, 3.0]);
        assert!((w[0] - 0.25).abs() < 1e-12);
        assert!((w[1] - 0.75).abs() < 1e-12);
        assert_eq!(normalize_weights(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_allocate_by_ratio_closes_gap() {
        let c = chicken();
        let e = egg();
        let plan = allocate_by_ratio(&[(&c, 60.0), (&e, 40.0)], 200.0).unwrap();
        // mix = 0.6 * 1.2 + 0.4 * 1.4 = 1.28 kcal/g
        assert!((plan.total_grams() - 200.0 / 1.28).abs() < 1e-9);
        assert!((plan.totals().calories - 200.0).abs() < 1e-9);
        let chicken_g = plan.grams_for("chicken").unwrap();
        assert!((chicken_g / plan.total_grams() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_allocate_by_ratio_zero_ratios() {
        let c = chicken();
        let plan = allocate_by_ratio(&[(&c, 0.0)], 200.0).unwrap();
        assert_eq!(plan.total_grams(), 0.0);
    }

    #[test]
    fn test_allocate_by_ratio_rejects_negative_ratio() {
        let c = chicken();
        assert!(allocate_by_ratio(&[(&c, -1.0)], 200.0).is_err());
    }
}
