#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("InvalidPopulationSize: population size should be at least 4 and a multiple of 4, got {0}")]
    InvalidPopulationSize(usize),
    #[error("InvalidProbability: {name} must be between 0.0 and 1.0, got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("InvalidParameter: {name} must be positive and finite, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("BoundsDimensionMismatch: {bound} has {got} entries, the iterate has {expected} variables")]
    BoundsDimensionMismatch {
        bound: &'static str,
        got: usize,
        expected: usize,
    },
    #[error("InvalidBounds: lower bound {lower} is greater than upper bound {upper} at variable {index}")]
    InvalidBounds { index: usize, lower: f64, upper: f64 },
    #[error("NonFiniteBound: {name} is {value} at variable {index}")]
    NonFiniteBound { name: &'static str, index: usize, value: f64 },
    #[error("NoObjectives: at least one objective function is required")]
    NoObjectives,
    #[error("EmptyIterate: the starting point has no decision variables")]
    EmptyIterate,
    #[error("ReferenceDirectionsMismatch: reference directions have {got} components, expected {expected} objectives")]
    ReferenceDirectionsMismatch { expected: usize, got: usize },
    #[error("ConfigParseError: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[cfg(feature = "plot")]
    #[error("PlotError: {0}")]
    Plot(String),
}

impl Error {
    pub(crate) fn invalid_probability(name: &'static str, value: f64) -> Self {
        Self::InvalidProbability { name, value }
    }

    pub(crate) fn invalid_parameter(name: &'static str, value: f64) -> Self {
        Self::InvalidParameter { name, value }
    }
}
