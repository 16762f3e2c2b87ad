use std::f64::consts::TAU;

/// Easing curve applied to normalized time.
///
/// Input is clamped to `[0, 1]`; output is in `[0, 1]` for every variant
/// except [`Ease::InBack`], [`Ease::OutBack`] and [`Ease::OutElastic`],
/// which deliberately overshoot.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Identity.
    #[default]
    Linear,
    /// Quadratic accelerate-in.
    InQuad,
    /// Quadratic decelerate-out.
    OutQuad,
    /// Quadratic in/out.
    InOutQuad,
    /// Cubic accelerate-in.
    InCubic,
    /// Cubic decelerate-out.
    OutCubic,
    /// Cubic in/out.
    InOutCubic,
    /// Quartic accelerate-in.
    InQuart,
    /// Quartic decelerate-out.
    OutQuart,
    /// Quartic in/out.
    InOutQuart,
    /// Quintic accelerate-in.
    InQuint,
    /// Quintic decelerate-out.
    OutQuint,
    /// Quintic in/out.
    InOutQuint,
    /// Exponential decelerate-out.
    OutExpo,
    /// Exponential in/out.
    InOutExpo,
    /// Anticipation pull-back before accelerating.
    InBack {
        /// Overshoot factor; 1.70158 gives the classic 10% pull-back.
        overshoot: f64,
    },
    /// Overshoot past the target before settling.
    OutBack {
        /// Overshoot factor; larger values swing further past the target.
        overshoot: f64,
    },
    /// Damped oscillation past the target.
    OutElastic {
        /// Peak overshoot amplitude, `>= 1`.
        amplitude: f64,
        /// Oscillation period as a fraction of the duration.
        period: f64,
    },
}

impl Ease {
    /// Evaluate the curve at `t`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => in_out(t, 2),
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => in_out(t, 3),
            Self::InQuart => t.powi(4),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutQuart => in_out(t, 4),
            Self::InQuint => t.powi(5),
            Self::OutQuint => 1.0 - (1.0 - t).powi(5),
            Self::InOutQuint => in_out(t, 5),
            Self::OutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::InOutExpo => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Self::InBack { overshoot } => {
                let o = overshoot;
                (o + 1.0) * t * t * t - o * t * t
            }
            Self::OutBack { overshoot } => {
                let o = overshoot;
                let u = t - 1.0;
                1.0 + (o + 1.0) * u * u * u + o * u * u
            }
            Self::OutElastic { amplitude, period } => {
                if t <= 0.0 {
                    return 0.0;
                }
                if t >= 1.0 {
                    return 1.0;
                }
                let a = amplitude.max(1.0);
                let p = if period > 0.0 { period } else { 0.3 };
                let s = p / TAU * (1.0 / a).asin();
                a * 2f64.powf(-10.0 * t) * ((t - s) * TAU / p).sin() + 1.0
            }
        }
    }

    /// `back.out` with the classic 1.70158 overshoot.
    pub fn out_back() -> Self {
        Self::OutBack { overshoot: 1.70158 }
    }

    /// `elastic.out` with unit amplitude and the conventional 0.3 period.
    pub fn out_elastic() -> Self {
        Self::OutElastic {
            amplitude: 1.0,
            period: 0.3,
        }
    }
}

fn in_out(t: f64, power: i32) -> f64 {
    if t < 0.5 {
        2f64.powi(power - 1) * t.powi(power)
    } else {
        1.0 - ((-2.0 * t + 2.0).powi(power) / 2.0)
    }
}
