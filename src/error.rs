use std::time::Duration;

use thiserror::Error;

/// Failures an optimisation request can end in.
///
/// A weight-guided compromise rejection is not an error: it is recorded on the
/// outcome as a fallback.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// The hard constraints (energy band, ingredient cap, category balance)
    /// cannot hold simultaneously, or the solver returned unusable numbers.
    #[error("infeasible model: {reason}")]
    InfeasibleModel { reason: String },

    #[error("solver exceeded its time budget of {}ms", .after.as_millis())]
    SolverTimeout { after: Duration },

    /// An ingredient lacks a value some constraint row needs.
    #[error("catalog data error for ingredient '{ingredient}': {detail}")]
    CatalogData { ingredient: String, detail: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no nutrient standard defined for life stage '{0}'")]
    MissingStandard(String),
}

impl EngineError {
    pub fn infeasible(reason: impl Into<String>) -> Self {
        EngineError::InfeasibleModel {
            reason: reason.into(),
        }
    }

    pub fn catalog(ingredient: impl Into<String>, detail: impl Into<String>) -> Self {
        EngineError::CatalogData {
            ingredient: ingredient.into(),
            detail: detail.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
