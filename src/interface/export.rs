use std::path::Path;

use crate::error::Result;
use crate::models::FeedingPlan;

/// Write plan rows to a CSV file, one section label per plan.
pub fn write_plan_csv(plans: &[(&str, &FeedingPlan)], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "section", "food", "category", "grams", "calories", "protein_g", "fat_g", "carb_g",
    ])?;

    for (section, plan) in plans {
        for item in &plan.items {
            wtr.write_record([
                section.to_string(),
                item.name.clone(),
                item.category.to_string(),
                format!("{:.1}", item.grams),
                format!("{:.1}", item.calories),
                format!("{:.2}", item.protein_g),
                format!("{:.2}", item.fat_g),
                format!("{:.2}", item.carb_g),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
