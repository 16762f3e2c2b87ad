/// Convenience result type used across Scrollyte.
pub type ScrollyteResult<T> = Result<T, ScrollyteError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ScrollyteError {
    /// Invalid caller-provided configuration: bad trigger ranges, unresolved
    /// timeline offsets, operations on destroyed handles.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A measured region could not be resolved (zero extent, unknown target).
    #[error("measurement error: {0}")]
    Measurement(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from the host environment.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollyteError {
    /// Build a [`ScrollyteError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`ScrollyteError::Measurement`] value.
    pub fn measurement(msg: impl Into<String>) -> Self {
        Self::Measurement(msg.into())
    }

    /// Build a [`ScrollyteError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
