use thiserror::Error;

/// Malformed or out-of-range input. Raised before any ledger is produced.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("{field} must be >= 0, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{phase} allocation must sum to 100, got {total}")]
    AllocationSum { phase: &'static str, total: f64 },

    #[error("{field} {reason}")]
    AgeOrder { field: &'static str, reason: String },
}

/// Errors raised by the result cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache key serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ValidationError {
    /// Input field the error refers to; allocation sums name the phase.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NonFinite { field }
            | ValidationError::Negative { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::AgeOrder { field, .. } => field,
            ValidationError::AllocationSum { phase, .. } => phase,
        }
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { field })
    }
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

pub(crate) fn ensure_in_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    ensure_finite(field, value)?;
    if !(min..=max).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
