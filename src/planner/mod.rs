pub mod allocation;
pub mod constants;
pub mod formulate;
pub mod nnls;
pub mod requirements;
pub mod weighting;

pub use allocation::{allocate_by_ratio, allocate_fixed, normalize_weights, Allocation};
pub use formulate::{formulate, Formulation, FormulationConfig, Strategy};
pub use nnls::{
    achieved_split, macro_matrix, plan_by_least_squares, solve_mix, MixSolution, SolveStatus,
    SolverConfig,
};
pub use requirements::{compute_requirement, resting_energy, ActivityLevel, EnergyRequirement, LifeStage};
pub use weighting::{plan_by_macro_fit, weight_by_macro_fit, MacroDensity};
