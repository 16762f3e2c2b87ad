use std::collections::BTreeMap;

use crate::foundation::error::{ScrollyteError, ScrollyteResult};

pub use kurbo::{Point, Rect, Vec2};

/// Scroll axis the engine operates on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScrollAxis {
    /// Scroll along the y axis (the default for page scrolling).
    #[default]
    Vertical,
    /// Scroll along the x axis.
    Horizontal,
}

impl ScrollAxis {
    /// Offset of `rect` along this axis.
    pub fn offset_of(self, rect: Rect) -> f64 {
        match self {
            Self::Vertical => rect.y0,
            Self::Horizontal => rect.x0,
        }
    }

    /// Extent of `rect` along this axis.
    pub fn extent_of(self, rect: Rect) -> f64 {
        match self {
            Self::Vertical => rect.height(),
            Self::Horizontal => rect.width(),
        }
    }
}

/// Sign of the smoothed scroll motion on the last tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScrollDirection {
    /// Moving toward smaller positions.
    Backward,
    /// No perceptible motion.
    #[default]
    Still,
    /// Moving toward larger positions.
    Forward,
}

/// Half-open span of virtual scroll positions, `start < end`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollRange {
    /// Position where progress is 0.
    pub start: f64,
    /// Position where progress is 1.
    pub end: f64,
}

impl ScrollRange {
    /// Validated constructor. Zero-length and inverted ranges are rejected.
    pub fn new(start: f64, end: f64) -> ScrollyteResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ScrollyteError::configuration(
                "ScrollRange bounds must be finite",
            ));
        }
        if start >= end {
            return Err(ScrollyteError::configuration(
                "ScrollRange start must be < end",
            ));
        }
        Ok(Self { start, end })
    }

    /// Length of the span in scroll units.
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    /// Whether `pos` falls inside the span (inclusive of both bounds).
    pub fn contains(self, pos: f64) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Normalized progress of `pos` through the span, clamped to `[0, 1]`.
    pub fn progress(self, pos: f64) -> f64 {
        ((pos - self.start) / self.span()).clamp(0.0, 1.0)
    }

    /// Span translated by `delta`.
    pub fn shift(self, delta: f64) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }
}

/// Host viewport dimensions, supplied on init and resize.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in host units (CSS pixels or equivalent).
    pub width: f64,
    /// Height in host units.
    pub height: f64,
}

impl Viewport {
    /// Validated constructor; both dimensions must be finite and positive.
    pub fn new(width: f64, height: f64) -> ScrollyteResult<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ScrollyteError::configuration(
                "Viewport dimensions must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }
}

/// Numeric visual property the engine animates.
///
/// The engine never touches visual elements; it publishes values keyed by
/// `Prop` and the host maps them onto its own transforms. Props serialize
/// as their canonical names (`"x"`, `"opacity"`, ...), so property sets are
/// plain JSON objects.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Prop {
    /// Horizontal translation.
    X,
    /// Vertical translation.
    Y,
    /// Uniform scale.
    Scale,
    /// Horizontal scale.
    ScaleX,
    /// Vertical scale.
    ScaleY,
    /// Rotation in degrees.
    Rotation,
    /// Opacity in `[0, 1]` by convention (not enforced; eases may overshoot).
    Opacity,
    /// Vertical skew in degrees.
    SkewY,
    /// Scalar payload for counters and similar non-transform tweens.
    Value,
    /// Host-defined property.
    Custom(String),
}

impl Prop {
    /// Canonical name used for serialization and host lookup.
    pub fn name(&self) -> &str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Scale => "scale",
            Self::ScaleX => "scaleX",
            Self::ScaleY => "scaleY",
            Self::Rotation => "rotation",
            Self::Opacity => "opacity",
            Self::SkewY => "skewY",
            Self::Value => "value",
            Self::Custom(name) => name,
        }
    }

    /// Parse a canonical name; unknown names become [`Prop::Custom`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "x" => Self::X,
            "y" => Self::Y,
            "scale" => Self::Scale,
            "scaleX" => Self::ScaleX,
            "scaleY" => Self::ScaleY,
            "rotation" => Self::Rotation,
            "opacity" => Self::Opacity,
            "skewY" => Self::SkewY,
            "value" => Self::Value,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl serde::Serialize for Prop {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> serde::Deserialize<'de> for Prop {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// Published property values for one animation target.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PropSet {
    values: BTreeMap<Prop, f64>,
}

impl PropSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite one property.
    pub fn set(&mut self, prop: Prop, value: f64) {
        self.values.insert(prop, value);
    }

    /// Read one property.
    pub fn get(&self, prop: &Prop) -> Option<f64> {
        self.values.get(prop).copied()
    }

    /// Overlay `other` on top of `self`; later writers win.
    pub fn merge(&mut self, other: &PropSet) {
        for (prop, value) in &other.values {
            self.values.insert(prop.clone(), *value);
        }
    }

    /// Number of properties present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no properties are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate properties in stable (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&Prop, f64)> {
        self.values.iter().map(|(p, v)| (p, *v))
    }
}
