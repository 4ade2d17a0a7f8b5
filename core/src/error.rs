use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Experiment '{name}' not found")]
    ExperimentNotFound { name: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name, reason: reason.into() }
    }
}

pub type SimResult<T> = Result<T, SimError>;

/// Reject `value < min` with an `InvalidParameter` error.
pub(crate) fn require_at_least<T>(name: &'static str, value: T, min: T) -> SimResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min {
        return Err(SimError::invalid(name, format!("must be >= {min}, got {value}")));
    }
    Ok(())
}

/// Reject probabilities outside `[0, 1]` (NaN included).
pub(crate) fn require_probability(name: &'static str, value: f64) -> SimResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SimError::invalid(name, format!("must lie in [0, 1], got {value}")));
    }
    Ok(())
}
