mod loader;
mod snapshot;

pub use loader::{load_catalog, parse_csv, parse_json, FoodRecord};
pub use snapshot::Catalog;
