use std::collections::BTreeMap;
use std::str::FromStr;

use crate::animation::ease::Ease;
use crate::animation::stagger::StaggerSpec;
use crate::animation::tween::PropTrack;
use crate::foundation::error::{ScrollyteError, ScrollyteResult};

/// Placement of a segment on its timeline.
///
/// Relative variants anchor on the *finish* of the previous segment (or of a
/// labeled segment), so `"-=0.5"` overlaps the last half second and
/// `"+=0.5"` leaves a half-second gap.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PositionSpec {
    /// Absolute start time.
    At(f64),
    /// Start `delta` after the previous segment finishes.
    After(f64),
    /// Start `delta` before the previous segment finishes (overlap).
    Before(f64),
    /// Start relative to a labeled segment's finish.
    AtLabel {
        /// Label of the anchor segment.
        name: String,
        /// Signed offset from the anchor.
        offset: f64,
    },
}

impl Default for PositionSpec {
    fn default() -> Self {
        Self::After(0.0)
    }
}

impl From<f64> for PositionSpec {
    fn from(t: f64) -> Self {
        Self::At(t)
    }
}

impl FromStr for PositionSpec {
    type Err = ScrollyteError;

    /// Parse position strings: `"1.5"`, `"+=0.5"`, `"-=1"`,
    /// `"intro"`, `"intro+=0.2"`, `"intro-=0.2"`.
    fn from_str(s: &str) -> ScrollyteResult<Self> {
        let s = s.trim();
        let parse_num = |n: &str| -> ScrollyteResult<f64> {
            n.trim().parse::<f64>().map_err(|_| {
                ScrollyteError::configuration(format!("invalid position offset '{n}'"))
            })
        };

        if let Some(rest) = s.strip_prefix("+=") {
            return Ok(Self::After(parse_num(rest)?));
        }
        if let Some(rest) = s.strip_prefix("-=") {
            return Ok(Self::Before(parse_num(rest)?));
        }
        if let Ok(t) = s.parse::<f64>() {
            return Ok(Self::At(t));
        }
        if s.is_empty() {
            return Err(ScrollyteError::configuration("empty position spec"));
        }
        if let Some(i) = s.find("+=") {
            return Ok(Self::AtLabel {
                name: s[..i].trim().to_string(),
                offset: parse_num(&s[i + 2..])?,
            });
        }
        if let Some(i) = s.find("-=") {
            return Ok(Self::AtLabel {
                name: s[..i].trim().to_string(),
                offset: -parse_num(&s[i + 2..])?,
            });
        }
        Ok(Self::AtLabel {
            name: s.to_string(),
            offset: 0.0,
        })
    }
}

/// One animation segment before placement.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SegmentSpec {
    /// Optional label other segments can anchor on (anchor = this segment's
    /// finish).
    pub label: Option<String>,
    /// Targets the segment animates; staggers spread across them in order.
    pub targets: Vec<String>,
    /// Property tracks applied to every target.
    pub tracks: Vec<PropTrack>,
    /// Duration per target, in seconds (or progress fraction when the
    /// timeline is progress-driven).
    pub duration: f64,
    /// Easing; `None` takes the builder default.
    pub ease: Option<Ease>,
    /// Per-target start offsets within the segment.
    pub stagger: Option<StaggerSpec>,
}

impl SegmentSpec {
    /// Segment animating `tracks` on a single target.
    pub fn tween(target: impl Into<String>, tracks: Vec<PropTrack>, duration: f64) -> Self {
        Self {
            label: None,
            targets: vec![target.into()],
            tracks,
            duration,
            ease: None,
            stagger: None,
        }
    }

    /// Segment animating `tracks` across a target group.
    pub fn group(targets: Vec<String>, tracks: Vec<PropTrack>, duration: f64) -> Self {
        Self {
            label: None,
            targets,
            tracks,
            duration,
            ease: None,
            stagger: None,
        }
    }

    /// Set the easing curve.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    /// Set the stagger distribution.
    pub fn stagger(mut self, stagger: StaggerSpec) -> Self {
        self.stagger = Some(stagger);
        self
    }

    /// Label this segment so later ones can anchor on its finish.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Segment with its placement and per-target offsets resolved.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResolvedSegment {
    /// Absolute start time on the timeline.
    pub start: f64,
    /// Stagger offset per target, aligned with `spec.targets`.
    pub offsets: Vec<f64>,
    /// Resolved easing curve.
    pub ease: Ease,
    /// The source segment.
    pub spec: SegmentSpec,
}

impl ResolvedSegment {
    /// Total span including the stagger spread.
    pub fn span(&self) -> f64 {
        let spread = self.offsets.iter().copied().fold(0.0, f64::max);
        self.spec.duration + spread
    }

    /// Absolute finish time on the timeline.
    pub fn end(&self) -> f64 {
        self.start + self.span()
    }
}

/// How many times a timeline re-runs after its first play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Repeat {
    /// Play `1 + n` cycles in total.
    Finite(u32),
    /// Loop until killed.
    Infinite,
}

impl Default for Repeat {
    fn default() -> Self {
        Self::Finite(0)
    }
}

/// A validated, fully resolved timeline ready to run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelineSpec {
    /// Segments in add order; starts are absolute.
    pub segments: Vec<ResolvedSegment>,
    /// Duration of one cycle (max segment finish).
    pub total: f64,
    /// Seconds before the first cycle starts (time-driven mode only).
    pub delay: f64,
    /// Extra cycles after the first.
    pub repeat: Repeat,
    /// Reverse direction on every other cycle.
    pub yoyo: bool,
}

/// Incremental timeline construction with fail-fast position resolution.
#[derive(Clone, Debug)]
pub struct TimelineBuilder {
    segments: Vec<ResolvedSegment>,
    labels: BTreeMap<String, f64>,
    delay: f64,
    repeat: Repeat,
    yoyo: bool,
    default_ease: Ease,
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineBuilder {
    /// Empty builder with a linear default ease.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            labels: BTreeMap::new(),
            delay: 0.0,
            repeat: Repeat::default(),
            yoyo: false,
            default_ease: Ease::Linear,
        }
    }

    /// Ease used by segments that do not set their own.
    pub fn default_ease(mut self, ease: Ease) -> Self {
        self.default_ease = ease;
        self
    }

    /// Delay before the first cycle (time-driven mode only).
    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    /// Number of extra cycles after the first.
    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Reverse direction on every other cycle.
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Append a segment at `position`, resolving it immediately.
    pub fn add(
        mut self,
        spec: SegmentSpec,
        position: impl Into<PositionSpec>,
    ) -> ScrollyteResult<Self> {
        if spec.targets.is_empty() {
            return Err(ScrollyteError::configuration(
                "segment must have at least one target",
            ));
        }
        if spec.tracks.is_empty() {
            return Err(ScrollyteError::configuration(
                "segment must animate at least one property",
            ));
        }
        if !spec.duration.is_finite() || spec.duration < 0.0 {
            return Err(ScrollyteError::configuration(
                "segment duration must be finite and >= 0",
            ));
        }
        if let Some(stagger) = &spec.stagger {
            stagger.validate()?;
        }

        let prev_end = self.segments.last().map(ResolvedSegment::end).unwrap_or(0.0);
        let start = match position.into() {
            PositionSpec::At(t) => t,
            PositionSpec::After(d) => prev_end + d,
            PositionSpec::Before(d) => prev_end - d,
            PositionSpec::AtLabel { name, offset } => {
                let anchor = self.labels.get(&name).ok_or_else(|| {
                    ScrollyteError::configuration(format!("unresolved timeline label '{name}'"))
                })?;
                anchor + offset
            }
        };
        if !start.is_finite() || start < 0.0 {
            return Err(ScrollyteError::configuration(format!(
                "segment position resolves to negative start {start}"
            )));
        }

        let offsets = spec
            .stagger
            .map(|s| s.offsets(spec.targets.len()))
            .unwrap_or_else(|| vec![0.0; spec.targets.len()]);
        let ease = spec.ease.unwrap_or(self.default_ease);

        let resolved = ResolvedSegment {
            start,
            offsets,
            ease,
            spec,
        };
        if let Some(label) = &resolved.spec.label {
            if self.labels.insert(label.clone(), resolved.end()).is_some() {
                return Err(ScrollyteError::configuration(format!(
                    "duplicate timeline label '{label}'"
                )));
            }
        }
        self.segments.push(resolved);
        Ok(self)
    }

    /// Finish construction.
    pub fn build(self) -> ScrollyteResult<TimelineSpec> {
        if self.segments.is_empty() {
            return Err(ScrollyteError::configuration(
                "timeline must contain at least one segment",
            ));
        }
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(ScrollyteError::configuration(
                "timeline delay must be finite and >= 0",
            ));
        }
        let total = self
            .segments
            .iter()
            .map(ResolvedSegment::end)
            .fold(0.0, f64::max);
        Ok(TimelineSpec {
            segments: self.segments,
            total,
            delay: self.delay,
            repeat: self.repeat,
            yoyo: self.yoyo,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/builder.rs"]
mod tests;
