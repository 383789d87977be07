use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::models::{FoodCategory, FoodProfile};

/// One row of a catalog file, already normalized to numbers.
///
/// `kcal_per_gram` may be left empty; the profile then estimates energy from
/// its macros.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodRecord {
    pub name: String,
    pub category: FoodCategory,
    #[serde(default)]
    pub moisture_pct: f64,
    #[serde(default)]
    pub protein_pct: f64,
    #[serde(default)]
    pub fat_pct: f64,
    #[serde(default)]
    pub carb_pct: f64,
    #[serde(default)]
    pub kcal_per_gram: Option<f64>,
}

impl FoodRecord {
    pub fn into_profile(self) -> Result<FoodProfile> {
        FoodProfile::new(
            self.name,
            self.category,
            self.moisture_pct,
            self.protein_pct,
            self.fat_pct,
            self.carb_pct,
            self.kcal_per_gram,
        )
    }
}

fn build(records: Vec<FoodRecord>) -> Result<Catalog> {
    let foods = records
        .into_iter()
        .map(FoodRecord::into_profile)
        .collect::<Result<Vec<_>>>()?;
    Ok(Catalog::new(foods))
}

/// Parse CSV with a header row naming the [`FoodRecord`] fields.
pub fn parse_csv<R: Read>(reader: R) -> Result<Catalog> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let records = rdr
        .deserialize()
        .collect::<std::result::Result<Vec<FoodRecord>, csv::Error>>()?;
    build(records)
}

/// Parse a JSON array of [`FoodRecord`]s.
pub fn parse_json(content: &str) -> Result<Catalog> {
    let records: Vec<FoodRecord> = serde_json::from_str(content)?;
    build(records)
}

/// Load a catalog file: `.json` as JSON, anything else as CSV.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let catalog = if is_json {
        parse_json(&fs::read_to_string(path)?)?
    } else {
        parse_csv(fs::File::open(path)?)?
    };

    info!(path = %path.display(), foods = catalog.len(), "loaded catalog");
    Ok(catalog)
}
