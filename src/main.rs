use clap::Parser;
use std::path::Path;

use cat_ration_rs::catalog::{load_catalog, Catalog};
use cat_ration_rs::cli::{parse_assignment, CatArgs, Cli, Command, StrategyArg};
use cat_ration_rs::error::Result;
use cat_ration_rs::interface::{
    display_catalog, display_formulation, display_requirement, write_plan_csv,
};
use cat_ration_rs::logging::init_logging;
use cat_ration_rs::models::FoodCategory;
use cat_ration_rs::planner::{
    compute_requirement, formulate, EnergyRequirement, FormulationConfig, SolverConfig, Strategy,
};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Requirement { cat, json } => cmd_requirement(&cat, json),
        Command::Foods { category } => cmd_foods(&cli.catalog, category.as_deref()),
        Command::Plan {
            cat,
            dry,
            fresh,
            ratio,
            strategy,
            max_iterations,
            strict,
            output,
            json,
        } => {
            let catalog = load_catalog(&cli.catalog)?;
            let request = PlanRequest {
                dry,
                fresh,
                ratio,
                strategy,
                max_iterations,
                strict,
            };
            cmd_plan(&catalog, &cat, &request, output.as_deref(), json)
        }
    }
}

fn requirement_for(cat: &CatArgs) -> Result<EnergyRequirement> {
    compute_requirement(cat.weight, cat.life_stage.parse()?, cat.activity.parse()?)
}

/// Show the daily requirement.
fn cmd_requirement(cat: &CatArgs, json: bool) -> Result<()> {
    let req = requirement_for(cat)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&req)?);
    } else {
        display_requirement(&req);
    }
    Ok(())
}

/// List the catalog.
fn cmd_foods(catalog_path: &str, category: Option<&str>) -> Result<()> {
    let category: Option<FoodCategory> = category.map(|c| c.parse()).transpose()?;
    let catalog = load_catalog(catalog_path)?;
    display_catalog(&catalog, category);
    Ok(())
}

struct PlanRequest {
    dry: Vec<String>,
    fresh: Vec<String>,
    ratio: Vec<String>,
    strategy: StrategyArg,
    max_iterations: Option<usize>,
    strict: bool,
}

/// Formulate and show a ration.
fn cmd_plan(
    catalog: &Catalog,
    cat: &CatArgs,
    request: &PlanRequest,
    output: Option<&str>,
    json: bool,
) -> Result<()> {
    let req = requirement_for(cat)?;

    let dry = request
        .dry
        .iter()
        .map(|raw| {
            let (name, grams) = parse_assignment(raw)?;
            Ok((catalog.require_in(&name, FoodCategory::Dry)?, grams))
        })
        .collect::<Result<Vec<_>>>()?;

    // Ratios name their own foods; otherwise --fresh lists the candidates.
    let (fresh, strategy) = if !request.ratio.is_empty() {
        let mut foods = Vec::new();
        let mut ratios = Vec::new();
        for raw in &request.ratio {
            let (name, pct) = parse_assignment(raw)?;
            foods.push(catalog.require_in(&name, FoodCategory::Fresh)?);
            ratios.push(pct);
        }
        (foods, Strategy::Ratio(ratios))
    } else {
        let foods = request
            .fresh
            .iter()
            .map(|name| catalog.require_in(name, FoodCategory::Fresh))
            .collect::<Result<Vec<_>>>()?;
        let strategy = match request.strategy {
            StrategyArg::LeastSquares => Strategy::LeastSquares,
            StrategyArg::MacroFit => Strategy::MacroFit,
            // Equal shares when no percentages were given.
            StrategyArg::Ratio => Strategy::Ratio(vec![1.0; foods.len()]),
        };
        (foods, strategy)
    };

    let config = FormulationConfig {
        solver: SolverConfig {
            max_iterations: request.max_iterations,
            ..Default::default()
        },
        accept_approximate: !request.strict,
        ..Default::default()
    };

    let formulation = formulate(&req, &dry, &fresh, &strategy, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&formulation)?);
    } else {
        display_formulation(&formulation);
    }

    if let Some(path) = output {
        write_plan_csv(
            &[
                ("dry", &formulation.dry_plan),
                ("fresh", &formulation.fresh_plan),
            ],
            Path::new(path),
        )?;
        if !json {
            println!("Plan written to {}", path);
        }
    }

    Ok(())
}
