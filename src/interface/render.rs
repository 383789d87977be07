use crate::catalog::Catalog;
use crate::models::{FeedingPlan, FoodCategory, MacroSplit, NutrientTarget};
use crate::planner::{EnergyRequirement, Formulation, SolveStatus};

/// Display the energy and macro requirement for one cat.
pub fn display_requirement(req: &EnergyRequirement) {
    println!();
    println!("=== Daily Requirement ===");
    println!();
    println!(
        "Weight: {:.1} kg | Life stage: {} | Activity: {}",
        req.weight_kg, req.life_stage, req.activity
    );
    println!("RER: {:.0} kcal/day", req.rer);
    println!("MER: {:.0} kcal/day", req.mer);
    println!();
    println!(
        "Minimum:     protein >= {:.1} g/day, fat >= {:.1} g/day",
        req.min_protein_g, req.min_fat_g
    );
    println!(
        "Recommended: protein {:.1} g/day, fat {:.1} g/day",
        req.recommend_protein_g, req.recommend_fat_g
    );
    println!();
}

/// Display catalog foods, optionally restricted to one category.
pub fn display_catalog(catalog: &Catalog, category: Option<FoodCategory>) {
    let foods: Vec<_> = catalog
        .iter()
        .filter(|f| category.is_none_or(|c| f.category() == c))
        .collect();

    if foods.is_empty() {
        println!("Catalog: (none)");
        return;
    }

    let width = foods.iter().map(|f| f.name().len()).max().unwrap_or(10);

    println!();
    println!("=== Catalog ({} items) ===", foods.len());
    println!();
    for food in foods {
        println!(
            "  {:<width$}  {:<5}  water {:>5.1}%  P {:>5.1}%  F {:>5.1}%  C {:>5.1}%  {:.3} kcal/g",
            food.name(),
            food.category(),
            food.moisture_pct(),
            food.protein_pct(),
            food.fat_pct(),
            food.carb_pct(),
            food.kcal_per_gram(),
            width = width
        );
    }
    println!();
}

fn display_split(split: &MacroSplit) {
    println!(
        "Calorie split: protein {:.1}%, fat {:.1}%, carb {:.1}%",
        split.protein * 100.0,
        split.fat * 100.0,
        split.carb * 100.0
    );
}

/// Display a feeding plan as a table with a totals row.
pub fn display_plan(plan: &FeedingPlan, title: &str) {
    if plan.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ===", title);
    println!();

    let width = plan
        .items
        .iter()
        .map(|i| i.name.len())
        .max()
        .unwrap_or(10)
        .max("Total".len());

    println!(
        "  {:<width$}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}",
        "Food",
        "g/day",
        "kcal",
        "protein",
        "fat",
        "carb",
        width = width
    );
    for item in &plan.items {
        println!(
            "  {:<width$}  {:>8.1}  {:>8.1}  {:>8.1}  {:>8.1}  {:>8.1}",
            item.name,
            item.grams,
            item.calories,
            item.protein_g,
            item.fat_g,
            item.carb_g,
            width = width
        );
    }

    let t = plan.totals();
    println!(
        "  {:<width$}  {:>8.1}  {:>8.1}  {:>8.1}  {:>8.1}  {:>8.1}",
        "Total",
        plan.total_grams(),
        t.calories,
        t.protein_g,
        t.fat_g,
        t.carb_g,
        width = width
    );
    println!();
    display_split(&plan.macro_split());
    println!();
}

fn display_target(label: &str, t: &NutrientTarget) {
    println!(
        "{:<10} {:>7.0} kcal | protein {:>6.1} g | fat {:>6.1} g | carb {:>6.1} g",
        label, t.calories, t.protein_g, t.fat_g, t.carb_g
    );
}

/// Display a complete formulation: targets, dry deduction, fresh plan.
pub fn display_formulation(f: &Formulation) {
    display_requirement(&f.requirement);

    println!("--- Targets ---");
    display_target("Baseline", &f.baseline);
    display_target("Dry", &f.consumed);
    display_target("Remaining", &f.remaining);

    display_plan(&f.dry_plan, "Dry Food");
    display_plan(&f.fresh_plan, "Fresh Food");

    if let Some(sol) = &f.solution {
        let status = match sol.status {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Degenerate => "degenerate (no usable candidates)",
        };
        println!(
            "Solver: {} after {} iterations, residual {:.3} g",
            status, sol.iterations, sol.residual
        );
        if f.approximate {
            println!("Warning: iteration bound reached; showing best approximate mix.");
        }
        println!();
    }

    println!("--- Summary ---");
    display_target("Fed", &f.total());
    println!();
}
