/// Coefficient of the resting energy requirement (kcal/day per kg^0.75).
pub const RER_COEFFICIENT: f64 = 70.0;

/// Metabolic body-weight exponent.
pub const RER_EXPONENT: f64 = 0.75;

/// Empirical protein minimum in grams per 1000 kcal of MER.
///
/// Applied directly as grams, not through an Atwater divisor.
pub const MIN_PROTEIN_G_PER_1000_KCAL: f64 = 65.0;

/// Empirical fat minimum in grams per 1000 kcal of MER.
pub const MIN_FAT_G_PER_1000_KCAL: f64 = 22.5;

/// Recommended intake as a multiple of the minimum.
pub const RECOMMEND_MULTIPLIER: f64 = 1.15;

// ─────────────────────────────────────────────────────────────────────────────
// Energy conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Modified Atwater factors (kcal/g) used to estimate a food's energy when no
/// declared value is available.
pub const ATWATER_PROTEIN: f64 = 3.5;
pub const ATWATER_FAT: f64 = 8.5;
pub const ATWATER_CARB: f64 = 3.5;

/// Divisors converting a calorie share into grams of macronutrient.
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;
pub const KCAL_PER_G_CARB: f64 = 4.0;

/// Canonical calorie split for fresh rations.
pub const CANONICAL_PROTEIN_SHARE: f64 = 0.65;
pub const CANONICAL_FAT_SHARE: f64 = 0.225;
pub const CANONICAL_CARB_SHARE: f64 = 0.125;

// ─────────────────────────────────────────────────────────────────────────────
// Macro-fit weighting
// ─────────────────────────────────────────────────────────────────────────────

/// Added to the density distance before inversion.
pub const FIT_EPSILON: f64 = 1e-6;

/// Weight given to foods without a positive energy density.
pub const ZERO_ENERGY_WEIGHT: f64 = 1e-6;

// ─────────────────────────────────────────────────────────────────────────────
// Solver defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Iteration budget per candidate food when no explicit bound is configured.
pub const MAX_ITERATIONS_PER_FOOD: usize = 3;

/// Singular-value cutoffs tried, in order, for the passive-set subproblem.
pub const SVD_TOLERANCES: [f64; 3] = [1e-12, 1e-10, 1e-8];

/// Lower bound on the default iteration budget.
pub const MIN_ITERATIONS: usize = 30;
