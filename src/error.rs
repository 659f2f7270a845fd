//! Error types for profile validation, projections, and data loading

use thiserror::Error;

/// Errors raised by the projection components
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    /// Rejected before any projection runs (negative age, negative rate, bad enum value)
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// Rejected configuration (allocation fractions, horizon, rates)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Strict rate-table lookup failed. Projection paths fall back instead of raising this.
    #[error("no rate table entry for {0}")]
    MissingRateTableEntry(String),

    /// Two year-indexed columns of different lengths reached a combining step
    #[error("column `{column}` has {actual} rows, expected {expected}")]
    DataAlignment {
        column: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl ProjectionError {
    pub fn invalid_profile(msg: impl Into<String>) -> Self {
        ProjectionError::InvalidProfile(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        ProjectionError::InvalidConfig(msg.into())
    }
}

/// Errors raised while reading rate tables, profiles, or reports from disk
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{file}: could not parse `{value}` as {expected}")]
    Parse {
        file: String,
        value: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Invalid(#[from] ProjectionError),
}

/// Fails with `DataAlignment` unless `actual == expected`
pub fn ensure_aligned(column: &'static str, expected: usize, actual: usize) -> Result<(), ProjectionError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ProjectionError::DataAlignment { column, expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_aligned() {
        assert!(ensure_aligned("income", 10, 10).is_ok());

        let err = ensure_aligned("income", 10, 9).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::DataAlignment { column: "income", expected: 10, actual: 9 }
        );
        assert_eq!(err.to_string(), "column `income` has 9 rows, expected 10");
    }
}
