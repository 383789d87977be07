pub mod food;
pub mod plan;
pub mod target;

pub use food::{atwater_kcal_per_gram, FoodCategory, FoodProfile};
pub use plan::{FeedingPlan, PlanItem};
pub use target::{MacroSplit, NutrientTarget};
