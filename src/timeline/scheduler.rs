use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::core::PropSet;
use crate::foundation::error::{ScrollyteError, ScrollyteResult};
use crate::timeline::builder::{Repeat, TimelineSpec};

/// Stable identifier for a scheduled timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TimelineId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq)]
enum Drive {
    /// Free-running on the clock.
    Time { t: f64, playing: bool },
    /// Slaved to an external progress value (a scrub trigger).
    Progress { p: f64 },
}

#[derive(Debug)]
struct RunningTimeline {
    id: TimelineId,
    spec: TimelineSpec,
    drive: Drive,
    complete: bool,
}

/// Runs every live timeline and produces the per-tick property values.
///
/// Timelines advance in creation order; on conflicting writes to the same
/// target property the later-created timeline wins, deterministically.
/// Killing is idempotent and immediate: a killed timeline publishes nothing
/// further, and values already published stay wherever they were.
#[derive(Debug, Default)]
pub struct TimelineScheduler {
    timelines: Vec<RunningTimeline>,
    completed: BTreeSet<TimelineId>,
    killed: BTreeSet<TimelineId>,
    next_id: u64,
}

impl TimelineScheduler {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live timelines.
    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    /// Whether no timelines are live.
    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    /// Add a timeline, paused at time zero.
    pub fn add(&mut self, spec: TimelineSpec) -> TimelineId {
        let id = TimelineId(self.next_id);
        self.next_id += 1;
        tracing::debug!(
            id = id.0,
            segments = spec.segments.len(),
            total = spec.total,
            "timeline added"
        );
        self.timelines.push(RunningTimeline {
            id,
            spec,
            drive: Drive::Time {
                t: 0.0,
                playing: false,
            },
            complete: false,
        });
        id
    }

    /// Start or resume time-driven playback, optionally seeking first.
    pub fn play(&mut self, id: TimelineId, from: Option<f64>) -> ScrollyteResult<()> {
        let entry = self.entry_mut(id)?;
        let t = match (from, entry.drive) {
            (Some(seek), _) => seek.max(0.0),
            (None, Drive::Time { t, .. }) => t,
            (None, Drive::Progress { .. }) => 0.0,
        };
        entry.drive = Drive::Time { t, playing: true };
        entry.complete = false;
        Ok(())
    }

    /// Pause time-driven playback in place.
    pub fn pause(&mut self, id: TimelineId) -> ScrollyteResult<()> {
        let entry = self.entry_mut(id)?;
        if let Drive::Time { t, .. } = entry.drive {
            entry.drive = Drive::Time { t, playing: false };
        }
        Ok(())
    }

    /// Drive the timeline from an external progress value in `[0, 1]`.
    ///
    /// Segment durations are reinterpreted as fractions of the timeline's
    /// total span; `delay`, `repeat` and `yoyo` do not apply in this mode.
    pub fn set_progress(&mut self, id: TimelineId, p: f64) -> ScrollyteResult<()> {
        let entry = self.entry_mut(id)?;
        let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
        entry.drive = Drive::Progress { p };
        Ok(())
    }

    /// Stop a timeline immediately. Idempotent: killing an unknown or
    /// already-killed timeline is a no-op.
    pub fn kill(&mut self, id: TimelineId) {
        if let Some(idx) = self.timelines.iter().position(|t| t.id == id) {
            self.timelines.remove(idx);
            self.killed.insert(id);
            tracing::debug!(id = id.0, "timeline killed");
        }
    }

    /// Whether a one-shot timeline has finished all its cycles.
    pub fn is_complete(&self, id: TimelineId) -> bool {
        self.completed.contains(&id)
            || self
                .timelines
                .iter()
                .any(|t| t.id == id && t.complete)
    }

    /// Whether the id refers to a live timeline.
    pub fn is_live(&self, id: TimelineId) -> bool {
        self.timelines.iter().any(|t| t.id == id)
    }

    /// Advance every live timeline by `dt` and collect property values per
    /// target. Completed one-shots are retired in a deferred sweep after
    /// sampling their exact end state.
    pub fn advance(&mut self, dt: f64) -> BTreeMap<String, PropSet> {
        let mut out: BTreeMap<String, PropSet> = BTreeMap::new();

        for entry in &mut self.timelines {
            match entry.drive {
                Drive::Time { t, playing } => {
                    if !playing {
                        continue;
                    }
                    let t = t + dt;
                    entry.drive = Drive::Time { t, playing: true };

                    let raw = t - entry.spec.delay;
                    if raw < 0.0 {
                        continue;
                    }
                    let (phase, done) = resolve_cycle(&entry.spec, raw);
                    sample(&entry.spec, phase, &mut out);
                    if done {
                        entry.complete = true;
                        entry.drive = Drive::Time { t, playing: false };
                    }
                }
                Drive::Progress { p } => {
                    sample(&entry.spec, p * entry.spec.total, &mut out);
                }
            }
        }

        // Deferred retirement: completed one-shots leave the live list only
        // after their final values were published above.
        let completed = &mut self.completed;
        self.timelines.retain(|entry| {
            if entry.complete {
                completed.insert(entry.id);
                false
            } else {
                true
            }
        });

        out
    }

    /// Drop every timeline without marking them killed (teardown path).
    pub fn clear(&mut self) {
        self.timelines.clear();
    }

    fn entry_mut(&mut self, id: TimelineId) -> ScrollyteResult<&mut RunningTimeline> {
        if self.killed.contains(&id) {
            return Err(ScrollyteError::configuration(format!(
                "timeline {} was killed",
                id.0
            )));
        }
        if self.completed.contains(&id) {
            return Err(ScrollyteError::configuration(format!(
                "timeline {} already completed",
                id.0
            )));
        }
        self.timelines
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ScrollyteError::configuration(format!("unknown timeline {}", id.0)))
    }
}

/// Map raw elapsed cycle time onto a phase within `[0, total]`, honoring
/// repeat and yoyo. Returns the phase and whether all cycles are done.
fn resolve_cycle(spec: &TimelineSpec, raw: f64) -> (f64, bool) {
    let cycle = spec.total;
    if cycle <= 0.0 {
        return (0.0, true);
    }

    if let Repeat::Finite(extra) = spec.repeat {
        let plays = u64::from(extra) + 1;
        if raw >= cycle * plays as f64 {
            // Final resting phase: a yoyo with an even play count ends where
            // it started.
            let last_reversed = spec.yoyo && (plays - 1) % 2 == 1;
            return (if last_reversed { 0.0 } else { cycle }, true);
        }
    }

    let index = (raw / cycle).floor() as u64;
    let mut phase = raw - index as f64 * cycle;
    if spec.yoyo && index % 2 == 1 {
        phase = cycle - phase;
    }
    (phase, false)
}

/// Sample every segment at `phase`, writing values for each target element
/// that has already started. Elements whose local start lies beyond `phase`
/// publish nothing, which is what keeps a killed mid-stagger group frozen.
fn sample(spec: &TimelineSpec, phase: f64, out: &mut BTreeMap<String, PropSet>) {
    for segment in &spec.segments {
        for (i, target) in segment.spec.targets.iter().enumerate() {
            let local_start = segment.start + segment.offsets[i];
            if phase < local_start {
                continue;
            }
            let local = if segment.spec.duration > 0.0 {
                ((phase - local_start) / segment.spec.duration).min(1.0)
            } else {
                1.0
            };
            let eased = segment.ease.apply(local);
            let props = out.entry(target.clone()).or_default();
            for track in &segment.spec.tracks {
                props.set(track.prop.clone(), track.at(eased));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/scheduler.rs"]
mod tests;
