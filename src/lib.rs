pub mod catalog;
pub mod cli;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod planner;

pub use catalog::Catalog;
pub use error::{RationError, Result};
pub use models::{FeedingPlan, FoodCategory, FoodProfile, NutrientTarget};
