use crate::foundation::core::{Point, Rect, Vec2};
use crate::foundation::error::{ScrollyteError, ScrollyteResult};

/// Pointer bookkeeping configuration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerConfig {
    /// Seconds of inactivity before the cursor fades.
    pub idle_timeout: f64,
    /// Opacity published once idle.
    pub idle_opacity: f64,
    /// Distance from an interactive rect's center within which the magnetic
    /// pull engages.
    pub magnet_radius: f64,
    /// Fraction of the center offset applied as pull, `[0, 1]`.
    pub magnet_strength: f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            idle_timeout: 3.0,
            idle_opacity: 0.3,
            magnet_radius: 120.0,
            magnet_strength: 1.0,
        }
    }
}

impl PointerConfig {
    /// Validate all fields.
    pub fn validate(&self) -> ScrollyteResult<()> {
        if !self.idle_timeout.is_finite() || self.idle_timeout <= 0.0 {
            return Err(ScrollyteError::configuration(
                "pointer idle_timeout must be finite and > 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.idle_opacity) {
            return Err(ScrollyteError::configuration(
                "pointer idle_opacity must be in [0, 1]",
            ));
        }
        if !self.magnet_radius.is_finite() || self.magnet_radius < 0.0 {
            return Err(ScrollyteError::configuration(
                "pointer magnet_radius must be finite and >= 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.magnet_strength) {
            return Err(ScrollyteError::configuration(
                "pointer magnet_strength must be in [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Explicit pointer state, queried per tick instead of chained callbacks.
#[derive(Clone, Debug)]
pub struct PointerState {
    config: PointerConfig,
    position: Point,
    inside_window: bool,
    last_move_at: f64,
    has_moved: bool,
}

impl PointerState {
    /// Initial state: pointer inside the window at the origin, never moved.
    pub fn new(config: PointerConfig) -> ScrollyteResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            position: Point::ZERO,
            inside_window: true,
            last_move_at: 0.0,
            has_moved: false,
        })
    }

    /// Last reported position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Whether the pointer is inside the window.
    pub fn inside_window(&self) -> bool {
        self.inside_window
    }

    /// Record a move at engine time `now`.
    pub fn record_move(&mut self, position: Point, now: f64) {
        self.position = position;
        self.last_move_at = now;
        self.has_moved = true;
    }

    /// Record the pointer entering or leaving the window.
    pub fn set_inside_window(&mut self, inside: bool, now: f64) {
        self.inside_window = inside;
        if inside {
            self.last_move_at = now;
        }
    }

    /// Cursor opacity at engine time `now`: 0 outside the window, the idle
    /// level after the inactivity timeout, 1 otherwise.
    pub fn opacity(&self, now: f64) -> f64 {
        if !self.inside_window {
            return 0.0;
        }
        if self.has_moved && now - self.last_move_at >= self.config.idle_timeout {
            return self.config.idle_opacity;
        }
        1.0
    }

    /// Pull toward `rect`'s center when the pointer is within the magnet
    /// radius; zero otherwise.
    pub fn magnetic_offset(&self, rect: Rect) -> Vec2 {
        let center = rect.center();
        let delta = center - self.position;
        if delta.hypot() > self.config.magnet_radius {
            return Vec2::ZERO;
        }
        delta * self.config.magnet_strength
    }

    /// Forget activity history (teardown path).
    pub fn reset(&mut self) {
        self.position = Point::ZERO;
        self.inside_window = true;
        self.last_move_at = 0.0;
        self.has_moved = false;
    }
}
