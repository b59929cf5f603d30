use thiserror::Error;

use crate::types::{Field, StatementKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    /// A required non-optional input (e.g. the fiscal date) is absent from a period.
    #[error("Missing input: {field} at period {position}")]
    MissingInput { field: String, position: usize },

    /// Inputs violate a documented domain rule. Resolves to an unknown metric.
    #[error("Invalid domain for {metric}: {reason}")]
    InvalidDomain { metric: String, reason: String },

    /// A field was requested from a statement whose schema does not contain it.
    #[error("Field {field} is not part of the {statement} schema")]
    FieldNotInSchema { field: Field, statement: StatementKind },

    /// Malformed bands, weights or catalog. Aborts engine construction.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl MetricsError {
    pub fn invalid_domain(metric: impl Into<String>, reason: impl Into<String>) -> Self {
        MetricsError::InvalidDomain {
            metric: metric.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        MetricsError::Configuration(msg.into())
    }
}
