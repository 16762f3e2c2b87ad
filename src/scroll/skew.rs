use crate::foundation::error::{ScrollyteError, ScrollyteResult};

/// Velocity-proportional skew configuration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SkewConfig {
    /// Degrees of skew per unit of velocity.
    pub factor: f64,
    /// Lower clamp bound, degrees.
    pub min: f64,
    /// Upper clamp bound, degrees.
    pub max: f64,
}

impl Default for SkewConfig {
    fn default() -> Self {
        Self {
            factor: -1.0 / 300.0,
            min: -20.0,
            max: 20.0,
        }
    }
}

impl SkewConfig {
    /// Validate bounds and factor.
    pub fn validate(&self) -> ScrollyteResult<()> {
        if !self.factor.is_finite() {
            return Err(ScrollyteError::configuration("skew factor must be finite"));
        }
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ScrollyteError::configuration(
                "skew bounds must be finite with min <= max",
            ));
        }
        Ok(())
    }
}

/// Maps scroll velocity to a clamped skew angle.
///
/// The clamp is applied against the configured bounds directly; velocity
/// spikes from input bursts are an expected transient and never an error.
#[derive(Clone, Copy, Debug)]
pub struct VelocitySkew {
    config: SkewConfig,
}

impl VelocitySkew {
    /// Build from a validated config.
    pub fn new(config: SkewConfig) -> ScrollyteResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Skew angle in degrees for `velocity`, clamped to `[min, max]`.
    pub fn apply(&self, velocity: f64) -> f64 {
        if !velocity.is_finite() {
            return 0.0;
        }
        (velocity * self.config.factor).clamp(self.config.min, self.config.max)
    }
}
