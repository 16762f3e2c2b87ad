use crate::foundation::core::{Point, Prop, Vec2};

/// Linear interpolation between two values of a type.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` at parameter `t`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        (*a as f64 + ((*b as f64 - *a as f64) * t)) as f32
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// One animated property, from a start value to an end value.
///
/// Eased time is applied before sampling, so overshooting eases produce
/// values outside the `[from, to]` interval by design.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PropTrack {
    /// Property this track writes.
    pub prop: Prop,
    /// Value at eased time 0.
    pub from: f64,
    /// Value at eased time 1.
    pub to: f64,
}

impl PropTrack {
    /// Build a track.
    pub fn new(prop: Prop, from: f64, to: f64) -> Self {
        Self { prop, from, to }
    }

    /// Sample the track at eased time `t`.
    pub fn at(&self, t: f64) -> f64 {
        f64::lerp(&self.from, &self.to, t)
    }
}
