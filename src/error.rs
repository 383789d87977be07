use thiserror::Error;

use crate::planner::nnls::MixSolution;

#[derive(Debug, Error)]
pub enum RationError {
    #[error("Food not found: {name}{}", suggestion_hint(.suggestion))]
    FoodNotFound {
        name: String,
        suggestion: Option<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The solver hit its iteration bound. `best` is the last feasible iterate.
    #[error("Solver did not converge after {iterations} iterations (residual {residual:.4})")]
    NonConvergence {
        iterations: usize,
        residual: f64,
        best: Box<MixSolution>,
    },
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

impl RationError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        RationError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RationError>;
