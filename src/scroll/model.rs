use crate::foundation::core::{ScrollAxis, ScrollDirection};
use crate::foundation::error::{ScrollyteError, ScrollyteResult};

/// Virtual scroll configuration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollConfig {
    /// Scroll axis.
    pub axis: ScrollAxis,
    /// Seconds for the smoothed position to settle on a new target.
    pub smoothing: f64,
    /// Multiplier applied to wheel deltas before ingestion.
    pub wheel_multiplier: f64,
    /// Multiplier applied to touch deltas before ingestion.
    pub touch_multiplier: f64,
    /// When false, touch input settles on a much shorter horizon so touch
    /// tracking feels native while staying continuous.
    pub smooth_touch: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            axis: ScrollAxis::Vertical,
            smoothing: 1.8,
            wheel_multiplier: 0.8,
            touch_multiplier: 1.5,
            smooth_touch: false,
        }
    }
}

impl ScrollConfig {
    /// Validate all fields.
    pub fn validate(&self) -> ScrollyteResult<()> {
        if !self.smoothing.is_finite() || self.smoothing <= 0.0 {
            return Err(ScrollyteError::configuration(
                "scroll smoothing must be finite and > 0",
            ));
        }
        for (name, v) in [
            ("wheel_multiplier", self.wheel_multiplier),
            ("touch_multiplier", self.touch_multiplier),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ScrollyteError::configuration(format!(
                    "scroll {name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

/// Published scroll state, recomputed once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollState {
    /// Accumulated input target, clamped to `[0, limit]`.
    pub raw_position: f64,
    /// Damped position converging toward `raw_position`.
    pub smoothed_position: f64,
    /// Per-second delta of the smoothed position.
    pub velocity: f64,
    /// Sign of the last smoothed motion.
    pub direction: ScrollDirection,
}

/// Damped virtual scroll position, decoupled from native scrolling.
///
/// Raw deltas move a target; each tick the smoothed position approaches the
/// target by frame-independent exponential decay, so a variable tick rate
/// produces the same curve. Within a snap epsilon the smoothed value lands
/// exactly on the target, guaranteeing convergence without drift.
#[derive(Clone, Debug)]
pub struct VirtualScroll {
    config: ScrollConfig,
    state: ScrollState,
    limit: f64,
    // Set by touch input when smooth_touch is off; consumed by the next tick.
    fast_follow: bool,
}

/// Distance below which the smoothed position snaps onto the target.
const SNAP_EPSILON: f64 = 1.0e-3;

/// Settle duration is treated as six time constants of the decay.
const SETTLE_TIME_CONSTANTS: f64 = 6.0;

/// Velocity magnitude below which direction reads as `Still`.
const STILL_VELOCITY: f64 = 1.0e-4;

impl VirtualScroll {
    /// Create a model with a zero limit (no scrollable distance yet).
    pub fn new(config: ScrollConfig) -> ScrollyteResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: ScrollState::default(),
            limit: 0.0,
            fast_follow: false,
        })
    }

    /// Current configuration.
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Last published state.
    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    /// Total scrollable distance. Raw input clamps into `[0, limit]`.
    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Set the scrollable distance (content extent plus pin reservations).
    pub fn set_limit(&mut self, limit: f64) {
        self.limit = limit.max(0.0);
        self.state.raw_position = self.state.raw_position.clamp(0.0, self.limit);
    }

    /// Ingest a wheel delta.
    pub fn wheel(&mut self, delta: f64) {
        self.apply_delta(delta * self.config.wheel_multiplier);
    }

    /// Ingest a touch delta.
    ///
    /// With `smooth_touch` off the next tick settles on a horizon six times
    /// shorter, so touch tracking feels native while staying continuous.
    pub fn touch(&mut self, delta: f64) {
        self.apply_delta(delta * self.config.touch_multiplier);
        if !self.config.smooth_touch {
            self.fast_follow = true;
        }
    }

    /// Jump the target to `pos`. With `immediate` the smoothed position and
    /// velocity jump too, the one discontinuity besides [`reset`].
    ///
    /// [`reset`]: VirtualScroll::reset
    pub fn scroll_to(&mut self, pos: f64, immediate: bool) {
        if !pos.is_finite() {
            return;
        }
        self.state.raw_position = pos.clamp(0.0, self.limit);
        if immediate {
            self.state.smoothed_position = self.state.raw_position;
            self.state.velocity = 0.0;
            self.state.direction = ScrollDirection::Still;
        }
    }

    /// Advance the smoothed position by `dt` seconds and republish state.
    pub fn tick(&mut self, dt: f64) -> ScrollState {
        let mut settle = self.config.smoothing;
        if std::mem::take(&mut self.fast_follow) {
            settle /= SETTLE_TIME_CONSTANTS;
        }
        let tau = settle / SETTLE_TIME_CONSTANTS;
        let alpha = 1.0 - (-dt / tau).exp();

        let prev = self.state.smoothed_position;
        let target = self.state.raw_position;
        let mut next = prev + (target - prev) * alpha;
        if (target - next).abs() < SNAP_EPSILON {
            next = target;
        }

        self.state.smoothed_position = next;
        self.state.velocity = (next - prev) / dt;
        self.state.direction = if self.state.velocity > STILL_VELOCITY {
            ScrollDirection::Forward
        } else if self.state.velocity < -STILL_VELOCITY {
            ScrollDirection::Backward
        } else {
            ScrollDirection::Still
        };
        self.state
    }

    /// Zero all positions and velocity.
    pub fn reset(&mut self) {
        self.state = ScrollState::default();
        self.fast_follow = false;
    }

    fn apply_delta(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.state.raw_position = (self.state.raw_position + delta).clamp(0.0, self.limit);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/model.rs"]
mod tests;
