use clap::{Parser, Subcommand, ValueEnum};

use crate::error::{RationError, Result};

/// CatRation: daily energy requirement and dry/fresh ration calculator for cats.
#[derive(Parser, Debug)]
#[command(name = "cat_ration")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the food catalog (CSV or JSON).
    #[arg(short, long, global = true, default_value = "data/foods.csv")]
    pub catalog: String,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Body weight, life stage and activity of the cat.
#[derive(clap::Args, Debug, Clone)]
pub struct CatArgs {
    /// Body weight in kg.
    #[arg(short, long)]
    pub weight: f64,

    /// Life stage, e.g. "neutered adult", "kitten 0-4 months", "senior".
    #[arg(short, long, default_value = "neutered adult")]
    pub life_stage: String,

    /// Activity level: low, medium or high.
    #[arg(short, long, default_value = "medium")]
    pub activity: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    /// Non-negative least squares on the remaining macro grams.
    LeastSquares,
    /// Weight fresh foods by closeness to the target macro density.
    MacroFit,
    /// Use the --ratio percentages.
    Ratio,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute RER, MER and protein/fat targets.
    Requirement {
        #[command(flatten)]
        cat: CatArgs,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// List catalog foods.
    Foods {
        /// Only show one category (dry or fresh).
        #[arg(long)]
        category: Option<String>,
    },

    /// Formulate a daily ration.
    Plan {
        #[command(flatten)]
        cat: CatArgs,

        /// Fixed dry food amount as NAME=GRAMS (repeatable).
        #[arg(long = "dry", value_name = "NAME=GRAMS")]
        dry: Vec<String>,

        /// Fresh food candidate (repeatable).
        #[arg(long = "fresh", value_name = "NAME")]
        fresh: Vec<String>,

        /// Fresh food ratio as NAME=PERCENT (repeatable, implies --strategy ratio).
        #[arg(long = "ratio", value_name = "NAME=PERCENT")]
        ratio: Vec<String>,

        #[arg(long, value_enum, default_value_t = StrategyArg::LeastSquares)]
        strategy: StrategyArg,

        /// Solver iteration bound.
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Fail instead of accepting an approximate solver result.
        #[arg(long)]
        strict: bool,

        /// Write the plan rows to this CSV file.
        #[arg(short, long)]
        output: Option<String>,

        /// Print JSON instead of tables.
        #[arg(long)]
        json: bool,
    },
}

/// Split `NAME=VALUE` on the last `=` and parse the value.
pub fn parse_assignment(raw: &str) -> Result<(String, f64)> {
    let (name, value) = raw.rsplit_once('=').ok_or_else(|| {
        RationError::invalid(format!("expected NAME=VALUE, got '{}'", raw))
    })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(RationError::invalid(format!("missing food name in '{}'", raw)));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| RationError::invalid(format!("invalid number in '{}'", raw)))?;
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        let (name, grams) = parse_assignment("Indoor Kibble = 30").unwrap();
        assert_eq!(name, "Indoor Kibble");
        assert_eq!(grams, 30.0);
    }

    #[test]
    fn test_parse_assignment_errors() {
        assert!(parse_assignment("Kibble").is_err());
        assert!(parse_assignment("=30").is_err());
        assert!(parse_assignment("Kibble=lots").is_err());
    }

    #[test]
    fn test_cli_parses_plan() {
        let cli = Cli::try_parse_from([
            "cat_ration",
            "plan",
            "--weight",
            "4",
            "--dry",
            "Kibble=30",
            "--fresh",
            "Chicken",
            "--fresh",
            "Egg",
            "--strategy",
            "macro-fit",
        ])
        .unwrap();
        match cli.command {
            Command::Plan {
                cat,
                dry,
                fresh,
                strategy,
                ..
            } => {
                assert_eq!(cat.weight, 4.0);
                assert_eq!(cat.life_stage, "neutered adult");
                assert_eq!(dry, vec!["Kibble=30"]);
                assert_eq!(fresh, vec!["Chicken", "Egg"]);
                assert_eq!(strategy, StrategyArg::MacroFit);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
