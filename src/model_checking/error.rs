use thiserror::Error;

/// Errors surfaced while synthesising or sampling a polytope strategy.
///
/// LP infeasibility of a single candidate tuple is not represented here; it is
/// an expected outcome of the search and is handled inside the solvers.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("goal not realizable for bound {bound:?}")]
    GoalNotRealizable { bound: Vec<f64> },

    #[error("linear program unbounded; bounds: {bounds:?}, coefficients: {coefficients:?}")]
    Unbounded {
        bounds: Vec<f64>,
        coefficients: Vec<Vec<f64>>,
    },

    #[error("linear program gave a non-finite solution; bounds: {bounds:?}, coefficients: {coefficients:?}")]
    NonFinite {
        bounds: Vec<f64>,
        coefficients: Vec<Vec<f64>>,
    },

    #[error("point generator of state {state}, action {action:?} has divisor {divisor}")]
    InvalidGenerator {
        state: usize,
        action: Option<usize>,
        divisor: i64,
    },

    #[error("distribution invalid at augmented state {state}, choice {action}")]
    SamplingInvalid { state: usize, action: usize },

    #[error("augmented state {0} has no state in the original game")]
    UnmappedState(usize),

    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("no polytope for state {state}, action {action:?}")]
    MissingPolytope { state: usize, action: Option<usize> },

    #[error("synthesis cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl StrategyError {
    pub fn not_realizable(bound: &[f64]) -> StrategyError {
        StrategyError::GoalNotRealizable { bound: bound.to_vec() }
    }

    pub fn is_not_realizable(&self) -> bool {
        matches!(self, StrategyError::GoalNotRealizable { .. })
    }
}
