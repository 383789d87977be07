pub mod export;
pub mod render;

pub use export::write_plan_csv;
pub use render::{display_catalog, display_formulation, display_plan, display_requirement};
