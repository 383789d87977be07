use std::collections::HashMap;

use strsim::jaro_winkler;

use crate::error::{RationError, Result};
use crate::models::{FoodCategory, FoodProfile};

/// Minimum similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Immutable snapshot of the food catalog, built once by the loader and
/// passed by reference.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Foods in load order.
    foods: Vec<FoodProfile>,
    /// Lowercase name to index into `foods`.
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog. Duplicate names (case-insensitive) keep the last one,
    /// at the position of the first.
    pub fn new(foods: Vec<FoodProfile>) -> Self {
        let mut catalog = Self::default();
        for food in foods {
            match catalog.index.get(&food.key()) {
                Some(&i) => catalog.foods[i] = food,
                None => {
                    catalog.index.insert(food.key(), catalog.foods.len());
                    catalog.foods.push(food);
                }
            }
        }
        catalog
    }

    /// Get a food by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&FoodProfile> {
        self.index
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.foods[i])
    }

    /// Like [`Catalog::get`], but fails with the closest known name as a hint.
    pub fn require(&self, name: &str) -> Result<&FoodProfile> {
        self.get(name).ok_or_else(|| RationError::FoodNotFound {
            name: name.to_string(),
            suggestion: self.suggest(name).map(|f| f.name().to_string()),
        })
    }

    /// Like [`Catalog::require`], and the food must belong to `category`.
    pub fn require_in(&self, name: &str, category: FoodCategory) -> Result<&FoodProfile> {
        let food = self.require(name)?;
        if food.category() != category {
            return Err(RationError::invalid(format!(
                "{} is a {} food, expected {}",
                food.name(),
                food.category(),
                category
            )));
        }
        Ok(food)
    }

    /// Closest name by Jaro-Winkler similarity, if any is close enough.
    pub fn suggest(&self, name: &str) -> Option<&FoodProfile> {
        let query = name.trim().to_lowercase();
        self.foods
            .iter()
            .map(|f| (f, jaro_winkler(&f.key(), &query)))
            .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(f, _)| f)
    }

    pub fn by_category(&self, category: FoodCategory) -> Vec<&FoodProfile> {
        self.foods
            .iter()
            .filter(|f| f.category() == category)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FoodProfile> {
        self.foods.iter()
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}
