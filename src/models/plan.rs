use serde::Serialize;

use crate::models::{FoodCategory, FoodProfile, MacroSplit, NutrientTarget};

/// One food's share of a feeding plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanItem {
    /// Name of the food.
    pub name: String,

    pub category: FoodCategory,

    /// Grams per day.
    pub grams: f64,

    pub protein_g: f64,
    pub fat_g: f64,
    pub carb_g: f64,
    pub calories: f64,
}

impl PlanItem {
    /// Derive contributed nutrients from grams and the food's density.
    pub fn from_food(food: &FoodProfile, grams: f64) -> Self {
        let c = food.contribution(grams);
        Self {
            name: food.name().to_string(),
            category: food.category(),
            grams,
            protein_g: c.protein_g,
            fat_g: c.fat_g,
            carb_g: c.carb_g,
            calories: c.calories,
        }
    }

    fn amounts(&self) -> NutrientTarget {
        NutrientTarget {
            calories: self.calories,
            protein_g: self.protein_g,
            fat_g: self.fat_g,
            carb_g: self.carb_g,
        }
    }
}

/// Grams per day for each food. No rounding is applied here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedingPlan {
    pub items: Vec<PlanItem>,
}

impl FeedingPlan {
    pub fn from_grams<'a>(entries: impl IntoIterator<Item = (&'a FoodProfile, f64)>) -> Self {
        Self {
            items: entries
                .into_iter()
                .map(|(food, grams)| PlanItem::from_food(food, grams))
                .collect(),
        }
    }

    /// Summed nutrients across all items.
    pub fn totals(&self) -> NutrientTarget {
        self.items
            .iter()
            .fold(NutrientTarget::default(), |acc, item| acc.add(&item.amounts()))
    }

    pub fn total_grams(&self) -> f64 {
        self.items.iter().map(|i| i.grams).sum()
    }

    /// Grams assigned to a food (case-insensitive).
    pub fn grams_for(&self, name: &str) -> Option<f64> {
        let key = name.to_lowercase();
        self.items
            .iter()
            .find(|i| i.name.to_lowercase() == key)
            .map(|i| i.grams)
    }

    /// Achieved calorie split of the plan's macros.
    pub fn macro_split(&self) -> MacroSplit {
        let t = self.totals();
        MacroSplit::from_macros(t.protein_g, t.fat_g, t.carb_g)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
