use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RationError, Result};
use crate::models::NutrientTarget;
use crate::planner::constants::{ATWATER_CARB, ATWATER_FAT, ATWATER_PROTEIN};

/// Which pool a food is eligible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Dry,
    Fresh,
}

impl FromStr for FoodCategory {
    type Err = RationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dry" | "kibble" => Ok(FoodCategory::Dry),
            "fresh" | "raw" | "wet" => Ok(FoodCategory::Fresh),
            other => Err(RationError::invalid(format!(
                "unknown food category '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoodCategory::Dry => write!(f, "dry"),
            FoodCategory::Fresh => write!(f, "fresh"),
        }
    }
}

/// Normalized per-food nutrient profile.
///
/// Percentages are of wet weight. Constructed once through [`FoodProfile::new`]
/// and immutable afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct FoodProfile {
    name: String,
    category: FoodCategory,
    moisture_pct: f64,
    protein_pct: f64,
    fat_pct: f64,
    carb_pct: f64,
    kcal_per_gram: f64,
}

impl FoodProfile {
    /// Build a profile, estimating energy from Atwater factors when no
    /// declared kcal/g is given.
    pub fn new(
        name: impl Into<String>,
        category: FoodCategory,
        moisture_pct: f64,
        protein_pct: f64,
        fat_pct: f64,
        carb_pct: f64,
        declared_kcal_per_gram: Option<f64>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RationError::invalid("food name must not be empty"));
        }

        for (label, value) in [
            ("moisture", moisture_pct),
            ("protein", protein_pct),
            ("fat", fat_pct),
            ("carb", carb_pct),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(RationError::invalid(format!(
                    "{}: {} percentage {} is outside [0, 100]",
                    name, label, value
                )));
            }
        }

        let kcal_per_gram = match declared_kcal_per_gram {
            Some(kcal) if !kcal.is_finite() || kcal < 0.0 => {
                return Err(RationError::invalid(format!(
                    "{}: declared energy {} kcal/g must be finite and non-negative",
                    name, kcal
                )));
            }
            Some(kcal) => kcal,
            None => atwater_kcal_per_gram(protein_pct, fat_pct, carb_pct),
        };

        Ok(Self {
            name,
            category,
            moisture_pct,
            protein_pct,
            fat_pct,
            carb_pct,
            kcal_per_gram,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> FoodCategory {
        self.category
    }

    pub fn moisture_pct(&self) -> f64 {
        self.moisture_pct
    }

    pub fn protein_pct(&self) -> f64 {
        self.protein_pct
    }

    pub fn fat_pct(&self) -> f64 {
        self.fat_pct
    }

    pub fn carb_pct(&self) -> f64 {
        self.carb_pct
    }

    pub fn kcal_per_gram(&self) -> f64 {
        self.kcal_per_gram
    }

    /// Grams of (protein, fat, carb) supplied by one gram of this food.
    #[inline]
    pub fn macros_per_gram(&self) -> [f64; 3] {
        [
            self.protein_pct / 100.0,
            self.fat_pct / 100.0,
            self.carb_pct / 100.0,
        ]
    }

    /// Nutrients supplied by `grams` of this food. Caller validates `grams`.
    pub fn contribution(&self, grams: f64) -> NutrientTarget {
        let [protein, fat, carb] = self.macros_per_gram();
        NutrientTarget {
            calories: grams * self.kcal_per_gram,
            protein_g: grams * protein,
            fat_g: grams * fat,
            carb_g: grams * carb,
        }
    }

    /// Canonical key for lookups (lowercase name).
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Energy estimate in kcal/g from wet-weight macro percentages.
pub fn atwater_kcal_per_gram(protein_pct: f64, fat_pct: f64, carb_pct: f64) -> f64 {
    (protein_pct * ATWATER_PROTEIN + fat_pct * ATWATER_FAT + carb_pct * ATWATER_CARB) / 100.0
}

impl PartialEq for FoodProfile {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for FoodProfile {}

#[cfg(test)]
mod tests {
    use super::*;

    fn chicken(declared: Option<f64>) -> Result<FoodProfile> {
        FoodProfile::new("Chicken Breast", FoodCategory::Fresh, 73.0, 23.0, 2.0, 0.0, declared)
    }

    #[test]
    fn test_declared_energy_wins() {
        let food = chicken(Some(1.2)).unwrap();
        assert!((food.kcal_per_gram() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_atwater_estimate_when_missing() {
        let food = chicken(None).unwrap();
        // (23 * 3.5 + 2 * 8.5) / 100
        assert!((food.kcal_per_gram() - 0.975).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_negative_percentage() {
        let result = FoodProfile::new("Bad", FoodCategory::Dry, 10.0, -1.0, 5.0, 5.0, None);
        assert!(matches!(result, Err(RationError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_negative_declared_energy() {
        assert!(matches!(chicken(Some(-0.5)), Err(RationError::InvalidInput(_))));
        assert!(matches!(chicken(Some(f64::NAN)), Err(RationError::InvalidInput(_))));
    }

    #[test]
    fn test_incomplete_composition_allowed() {
        // Percentages summing over 100 are not rejected.
        let food = FoodProfile::new("Odd", FoodCategory::Dry, 60.0, 40.0, 20.0, 10.0, None);
        assert!(food.is_ok());
    }

    #[test]
    fn test_contribution() {
        let food = chicken(Some(1.2)).unwrap();
        let c = food.contribution(100.0);
        assert!((c.calories - 120.0).abs() < 1e-9);
        assert!((c.protein_g - 23.0).abs() < 1e-9);
        assert!((c.fat_g - 2.0).abs() < 1e-9);
        assert_eq!(c.carb_g, 0.0);
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Dry".parse::<FoodCategory>().unwrap(), FoodCategory::Dry);
        assert_eq!(" fresh ".parse::<FoodCategory>().unwrap(), FoodCategory::Fresh);
        assert!("canned".parse::<FoodCategory>().is_err());
    }

    #[test]
    fn test_equality_case_insensitive() {
        let a = chicken(None).unwrap();
        let b = FoodProfile::new("CHICKEN BREAST", FoodCategory::Fresh, 0.0, 0.0, 0.0, 0.0, None)
            .unwrap();
        assert_eq!(a, b);
    }
}
