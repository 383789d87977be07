use serde::{Deserialize, Serialize};

use crate::error::{RationError, Result};
use crate::planner::constants::{
    CANONICAL_CARB_SHARE, CANONICAL_FAT_SHARE, CANONICAL_PROTEIN_SHARE, KCAL_PER_G_CARB,
    KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN,
};

/// Calorie fractions supplied by protein, fat and carbohydrate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: f64,
    pub fat: f64,
    pub carb: f64,
}

impl MacroSplit {
    /// 65% protein, 22.5% fat, 12.5% carbohydrate.
    pub const fn canonical() -> Self {
        Self {
            protein: CANONICAL_PROTEIN_SHARE,
            fat: CANONICAL_FAT_SHARE,
            carb: CANONICAL_CARB_SHARE,
        }
    }

    /// Achieved split from macro grams (protein, carb at 4 kcal/g; fat at 9).
    ///
    /// All zeros when the grams carry no energy.
    pub fn from_macros(protein_g: f64, fat_g: f64, carb_g: f64) -> Self {
        let protein = protein_g * KCAL_PER_G_PROTEIN;
        let fat = fat_g * KCAL_PER_G_FAT;
        let carb = carb_g * KCAL_PER_G_CARB;
        let total = protein + fat + carb;
        if total <= 0.0 {
            return Self {
                protein: 0.0,
                fat: 0.0,
                carb: 0.0,
            };
        }
        Self {
            protein: protein / total,
            fat: fat / total,
            carb: carb / total,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let parts = [self.protein, self.fat, self.carb];
        if parts.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(RationError::invalid(
                "macro split shares must be finite and non-negative",
            ));
        }
        if parts.iter().sum::<f64>() <= 0.0 {
            return Err(RationError::invalid("macro split must not be all zero"));
        }
        Ok(())
    }
}

impl Default for MacroSplit {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Daily nutrient amounts: either a target or an amount already supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTarget {
    pub calories: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carb_g: f64,
}

impl NutrientTarget {
    /// Split a calorie target into macro grams.
    pub fn from_calories(calories: f64, split: &MacroSplit) -> Self {
        Self {
            calories,
            protein_g: calories * split.protein / KCAL_PER_G_PROTEIN,
            fat_g: calories * split.fat / KCAL_PER_G_FAT,
            carb_g: calories * split.carb / KCAL_PER_G_CARB,
        }
    }

    /// Targets must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (label, value) in self.labelled() {
            if !value.is_finite() || value < 0.0 {
                return Err(RationError::invalid(format!(
                    "{} target {} must be finite and non-negative",
                    label, value
                )));
            }
        }
        Ok(())
    }

    /// Component-wise sum.
    pub fn add(&self, other: &NutrientTarget) -> NutrientTarget {
        NutrientTarget {
            calories: self.calories + other.calories,
            protein_g: self.protein_g + other.protein_g,
            fat_g: self.fat_g + other.fat_g,
            carb_g: self.carb_g + other.carb_g,
        }
    }

    /// Component-wise `max(self - other, 0)`.
    pub fn saturating_sub(&self, other: &NutrientTarget) -> NutrientTarget {
        NutrientTarget {
            calories: (self.calories - other.calories).max(0.0),
            protein_g: (self.protein_g - other.protein_g).max(0.0),
            fat_g: (self.fat_g - other.fat_g).max(0.0),
            carb_g: (self.carb_g - other.carb_g).max(0.0),
        }
    }

    /// (protein, fat, carb) grams, the row order of the solver matrix.
    pub fn macro_vector(&self) -> [f64; 3] {
        [self.protein_g, self.fat_g, self.carb_g]
    }

    fn labelled(&self) -> [(&'static str, f64); 4] {
        [
            ("calorie", self.calories),
            ("protein", self.protein_g),
            ("fat", self.fat_g),
            ("carb", self.carb_g),
        ]
    }
}
