//! Error types for multi-objective search.
//!
//! Three failure classes exist and none of them is recovered internally:
//!
//! - [`MoeaError::Configuration`]: rejected at construction, before a run starts
//! - [`MoeaError::DimensionMismatch`]: raised by the first comparison or
//!   archive insertion that sees vectors of disagreeing length
//! - [`MoeaError::Numeric`]: a NaN or infinite objective aborts the run

use thiserror::Error;

/// Error type for ranking, archiving, and continuation control.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoeaError {
    /// Invalid configuration (missing archive, non-positive bounds, bad epsilons).
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Two vectors that must share a length do not.
    #[error("Dimension mismatch in {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A non-finite value where a finite one is required.
    #[error("Non-finite {what} at index {index}: {value}")]
    Numeric {
        what: &'static str,
        index: usize,
        value: f64,
    },
}

impl MoeaError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        MoeaError::Configuration(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type MoeaResult<T> = Result<T, MoeaError>;

/// Fails with [`MoeaError::DimensionMismatch`] unless `actual == expected`.
pub(crate) fn ensure_len(what: &'static str, expected: usize, actual: usize) -> MoeaResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(MoeaError::DimensionMismatch {
            what,
            expected,
            actual,
        })
    }
}

/// Fails with [`MoeaError::Numeric`] on the first NaN or infinite value.
pub(crate) fn ensure_finite(what: &'static str, values: &[f64]) -> MoeaResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(MoeaError::Numeric {
            what,
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_len() {
        assert!(ensure_len("objectives", 2, 2).is_ok());
        let err = ensure_len("objectives", 2, 3).unwrap_err();
        assert_eq!(
            err,
            MoeaError::DimensionMismatch {
                what: "objectives",
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_ensure_finite_reports_first_bad_index() {
        assert!(ensure_finite("objectives", &[1.0, -2.0]).is_ok());
        match ensure_finite("objectives", &[1.0, f64::INFINITY, f64::NAN]) {
            Err(MoeaError::Numeric { index, value, .. }) => {
                assert_eq!(index, 1);
                assert!(value.is_infinite());
            }
            other => panic!("expected numeric error, got {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        let err = MoeaError::config("window_size must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: window_size must be positive"
        );
    }
}
