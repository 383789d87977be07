use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{RationError, Result};
use crate::models::{MacroSplit, NutrientTarget};
use crate::planner::constants::*;

/// Physiological stage, each with a fixed energy multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifeStage {
    KittenUpTo4Months,
    Kitten4To6Months,
    IntactAdult,
    NeuteredAdult,
    Senior,
    WeightLoss,
}

impl LifeStage {
    pub const ALL: [LifeStage; 6] = [
        LifeStage::KittenUpTo4Months,
        LifeStage::Kitten4To6Months,
        LifeStage::IntactAdult,
        LifeStage::NeuteredAdult,
        LifeStage::Senior,
        LifeStage::WeightLoss,
    ];

    pub fn factor(self) -> f64 {
        match self {
            LifeStage::KittenUpTo4Months => 3.0,
            LifeStage::Kitten4To6Months => 2.5,
            LifeStage::IntactAdult => 1.5,
            LifeStage::NeuteredAdult => 1.3,
            LifeStage::Senior => 1.0,
            LifeStage::WeightLoss => 0.8,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LifeStage::KittenUpTo4Months => "kitten 0-4 months",
            LifeStage::Kitten4To6Months => "kitten 4-6 months",
            LifeStage::IntactAdult => "intact adult",
            LifeStage::NeuteredAdult => "neutered adult",
            LifeStage::Senior => "senior",
            LifeStage::WeightLoss => "weight loss",
        }
    }
}

/// Lowercase and fold `-`/`_` into spaces so "neutered-adult" matches.
fn normalize_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl FromStr for LifeStage {
    type Err = RationError;

    fn from_str(s: &str) -> Result<Self> {
        let key = normalize_key(s);
        let stage = match key.as_str() {
            "kitten 0 4 months" | "kitten" | "young kitten" => LifeStage::KittenUpTo4Months,
            "kitten 4 6 months" | "older kitten" => LifeStage::Kitten4To6Months,
            "intact adult" | "intact" => LifeStage::IntactAdult,
            "neutered adult" | "neutered" | "spayed adult" | "spayed" => LifeStage::NeuteredAdult,
            "senior" => LifeStage::Senior,
            "weight loss" => LifeStage::WeightLoss,
            _ => {
                return Err(RationError::invalid(format!(
                    "unknown life stage '{}'",
                    s.trim()
                )));
            }
        };
        Ok(stage)
    }
}

impl fmt::Display for LifeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    Medium,
    High,
}

impl ActivityLevel {
    pub fn factor(self) -> f64 {
        match self {
            ActivityLevel::Low => 1.0,
            ActivityLevel::Medium => 1.2,
            ActivityLevel::High => 1.4,
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = RationError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_key(s).as_str() {
            "low" => Ok(ActivityLevel::Low),
            "medium" => Ok(ActivityLevel::Medium),
            "high" => Ok(ActivityLevel::High),
            _ => Err(RationError::invalid(format!(
                "unknown activity level '{}'",
                s.trim()
            ))),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityLevel::Low => "low",
            ActivityLevel::Medium => "medium",
            ActivityLevel::High => "high",
        };
        write!(f, "{}", label)
    }
}

/// Daily energy and macronutrient requirement.
#[derive(Debug, Clone, Serialize)]
pub struct EnergyRequirement {
    pub weight_kg: f64,
    pub life_stage: LifeStage,
    pub activity: ActivityLevel,
    /// Resting energy requirement, kcal/day.
    pub rer: f64,
    /// Maintenance energy requirement, kcal/day.
    pub mer: f64,
    pub min_protein_g: f64,
    pub min_fat_g: f64,
    pub recommend_protein_g: f64,
    pub recommend_fat_g: f64,
}

impl EnergyRequirement {
    /// MER expressed as a calorie target with macro grams per `split`.
    pub fn baseline_target(&self, split: &MacroSplit) -> NutrientTarget {
        NutrientTarget::from_calories(self.mer, split)
    }
}

/// Resting energy requirement: `70 * weight_kg^0.75`.
pub fn resting_energy(weight_kg: f64) -> Result<f64> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(RationError::invalid(format!(
            "body weight must be a positive number of kg, got {}",
            weight_kg
        )));
    }
    Ok(RER_COEFFICIENT * weight_kg.powf(RER_EXPONENT))
}

/// Compute RER, MER and the protein/fat minimums for one cat.
///
/// The minimums apply the per-1000-kcal coefficients directly as grams; see
/// DESIGN.md for why this is kept as-is.
pub fn compute_requirement(
    weight_kg: f64,
    life_stage: LifeStage,
    activity: ActivityLevel,
) -> Result<EnergyRequirement> {
    let rer = resting_energy(weight_kg)?;
    let mer = rer * life_stage.factor() * activity.factor();

    let min_protein_g = mer / 1000.0 * MIN_PROTEIN_G_PER_1000_KCAL;
    let min_fat_g = mer / 1000.0 * MIN_FAT_G_PER_1000_KCAL;

    Ok(EnergyRequirement {
        weight_kg,
        life_stage,
        activity,
        rer,
        mer,
        min_protein_g,
        min_fat_g,
        recommend_protein_g: min_protein_g * RECOMMEND_MULTIPLIER,
        recommend_fat_g: min_fat_g * RECOMMEND_MULTIPLIER,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resting_energy_rejects_non_positive() {
        assert!(resting_energy(0.0).is_err());
        assert!(resting_energy(-2.0).is_err());
        assert!(resting_energy(f64::NAN).is_err());
        assert!(resting_energy(f64::INFINITY).is_err());
    }

    #[test]
    fn test_resting_energy_one_kg() {
        assert!((resting_energy(1.0).unwrap() - 70.0).abs() < 1e-12);
    }

    #[test]
    fn test_life_stage_aliases() {
        assert_eq!(
            "Neutered-Adult".parse::<LifeStage>().unwrap(),
            LifeStage::NeuteredAdult
        );
        assert_eq!(
            "kitten_4_6_months".parse::<LifeStage>().unwrap(),
            LifeStage::Kitten4To6Months
        );
        assert!("puppy".parse::<LifeStage>().is_err());
    }

    #[test]
    fn test_label_parses_back() {
        for stage in LifeStage::ALL {
            assert_eq!(stage.label().parse::<LifeStage>().unwrap(), stage);
        }
    }

    #[test]
    fn test_factor_range() {
        for stage in LifeStage::ALL {
            assert!((0.8..=3.0).contains(&stage.factor()));
        }
    }

    #[test]
    fn test_activity_parsing() {
        assert_eq!("HIGH".parse::<ActivityLevel>().unwrap(), ActivityLevel::High);
        assert!(matches!(
            "extreme".parse::<ActivityLevel>(),
            Err(RationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_recommend_is_115_percent_of_minimum() {
        let req = compute_requirement(5.0, LifeStage::Senior, ActivityLevel::Low).unwrap();
        assert!((req.recommend_protein_g / req.min_protein_g - 1.15).abs() < 1e-12);
        assert!((req.recommend_fat_g / req.min_fat_g - 1.15).abs() < 1e-12);
    }
}
