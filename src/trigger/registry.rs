use std::collections::BTreeSet;

use crate::foundation::core::ScrollRange;
use crate::foundation::error::{ScrollyteError, ScrollyteResult};
use crate::scroll::model::ScrollState;

/// Stable identifier for a registered trigger.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TriggerId(pub u64);

/// How a trigger turns scroll position into updates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TriggerMode {
    /// Continuous clamped progress; fires every tick while active.
    Scrub,
    /// Holds the owning element fixed while consuming reserved scroll
    /// distance equal to the measured extent times `multiplier`.
    Pin {
        /// Reserved distance per unit of measured extent.
        multiplier: f64,
    },
    /// Boundary-crossing events instead of continuous progress.
    Toggle {
        /// Fire the enter event at most once, then go quiet.
        once: bool,
    },
}

/// Where a trigger's scroll range comes from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TriggerExtent {
    /// Caller-supplied offsets in content coordinates.
    Explicit {
        /// Range start.
        start: f64,
        /// Range end; must be > start.
        end: f64,
    },
    /// Range measured from a registered target via the capability interface.
    Measured {
        /// Target name to measure.
        target: String,
    },
}

/// Registration-time configuration of a trigger.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TriggerConfig {
    /// Range source.
    pub extent: TriggerExtent,
    /// Update mode.
    pub mode: TriggerMode,
    /// Quantize scrub progress to `1/n` steps once velocity settles.
    pub snap: Option<u32>,
}

impl TriggerConfig {
    /// Scrub over an explicit range.
    pub fn scrub(start: f64, end: f64) -> Self {
        Self {
            extent: TriggerExtent::Explicit { start, end },
            mode: TriggerMode::Scrub,
            snap: None,
        }
    }

    /// Scrub over a measured target.
    pub fn scrub_measured(target: impl Into<String>) -> Self {
        Self {
            extent: TriggerExtent::Measured {
                target: target.into(),
            },
            mode: TriggerMode::Scrub,
            snap: None,
        }
    }

    /// Pin a measured target, reserving `extent * multiplier` scroll units.
    pub fn pin(target: impl Into<String>, multiplier: f64) -> Self {
        Self {
            extent: TriggerExtent::Measured {
                target: target.into(),
            },
            mode: TriggerMode::Pin { multiplier },
            snap: None,
        }
    }

    /// Toggle over an explicit range.
    pub fn toggle(start: f64, end: f64, once: bool) -> Self {
        Self {
            extent: TriggerExtent::Explicit { start, end },
            mode: TriggerMode::Toggle { once },
            snap: None,
        }
    }
}

/// Boundary-crossing event emitted by toggle triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ToggleEvent {
    /// Scroll position entered the range.
    Enter,
    /// Scroll position left the range.
    Leave,
}

/// Per-tick payload delivered for a trigger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerUpdate {
    /// Trigger this update belongs to.
    pub id: TriggerId,
    /// Clamped progress through the active range.
    pub progress: f64,
    /// Smoothed scroll velocity this tick.
    pub velocity: f64,
    /// Whether the scroll position is inside the active range.
    pub is_active: bool,
    /// Boundary event, toggle mode only.
    pub event: Option<ToggleEvent>,
    /// Distance to hold the pinned element against scroll, pin mode only.
    pub pin_offset: Option<f64>,
}

#[derive(Debug)]
struct TriggerEntry {
    id: TriggerId,
    extent: TriggerExtent,
    mode: TriggerMode,
    snap: Option<u32>,
    /// Resolved range in content coordinates; `None` while measurement
    /// is pending (zero extent or unknown target).
    base: Option<ScrollRange>,
    /// Reserved scroll distance; non-zero only for resolved pins.
    reserved: f64,
    measurement_error: Option<String>,
    progress: f64,
    is_active: bool,
    inside: bool,
    entered_once: bool,
}

/// Velocity magnitude below which snap quantization engages.
const SNAP_SETTLE_VELOCITY: f64 = 1.0;

/// Creation-ordered registry of scroll-driven progress observers.
///
/// Update order is creation order; it is also the tie-break for every
/// downstream consumer, so a given input trace always produces the same
/// callback sequence. Pin reservations shift the effective offsets of every
/// later-registered trigger by the reserved distance.
#[derive(Debug, Default)]
pub struct TriggerRegistry {
    entries: Vec<TriggerEntry>,
    retired: BTreeSet<TriggerId>,
    next_id: u64,
}

impl TriggerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live triggers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no triggers are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a trigger; `resolver` maps a target name to its measured
    /// `(offset, extent)` along the scroll axis, in content coordinates.
    ///
    /// Configuration problems (empty or inverted explicit range, bad pin
    /// multiplier) fail fast. Measurement problems do not: the trigger is
    /// registered inactive and picked up by a later
    /// [`recompute_layout`](Self::recompute_layout).
    pub fn register(
        &mut self,
        config: TriggerConfig,
        resolver: &mut dyn FnMut(&str) -> Option<(f64, f64)>,
    ) -> ScrollyteResult<TriggerId> {
        if let TriggerMode::Pin { multiplier } = config.mode {
            if !multiplier.is_finite() || multiplier <= 0.0 {
                return Err(ScrollyteError::configuration(
                    "pin multiplier must be finite and > 0",
                ));
            }
        }
        if let Some(0) = config.snap {
            return Err(ScrollyteError::configuration(
                "snap interval count must be >= 1",
            ));
        }

        let id = TriggerId(self.next_id);
        self.next_id += 1;

        let mut entry = TriggerEntry {
            id,
            extent: config.extent,
            mode: config.mode,
            snap: config.snap,
            base: None,
            reserved: 0.0,
            measurement_error: None,
            progress: 0.0,
            is_active: false,
            inside: false,
            entered_once: false,
        };
        resolve_entry(&mut entry, resolver)?;

        if let Some(reason) = &entry.measurement_error {
            tracing::debug!(id = id.0, %reason, "trigger registered unmeasured");
        } else {
            tracing::debug!(id = id.0, mode = ?entry.mode, "trigger registered");
        }
        self.entries.push(entry);
        Ok(id)
    }

    /// Remove a trigger, releasing its pin reservation.
    ///
    /// Destroying a trigger twice is a configuration error, not a no-op.
    pub fn unregister(&mut self, id: TriggerId) -> ScrollyteResult<()> {
        if self.retired.contains(&id) {
            return Err(ScrollyteError::configuration(format!(
                "trigger {} was already destroyed",
                id.0
            )));
        }
        let Some(idx) = self.entries.iter().position(|e| e.id == id) else {
            return Err(ScrollyteError::configuration(format!(
                "unknown trigger {}",
                id.0
            )));
        };
        let entry = self.entries.remove(idx);
        self.retired.insert(id);
        tracing::debug!(id = id.0, reserved = entry.reserved, "trigger destroyed");
        Ok(())
    }

    /// Re-measure every `Measured` trigger after a resize.
    ///
    /// Creation order never changes, so relative update ordering is
    /// preserved across recomputes.
    #[tracing::instrument(skip(self, resolver))]
    pub fn recompute_layout(&mut self, resolver: &mut dyn FnMut(&str) -> Option<(f64, f64)>) {
        for entry in &mut self.entries {
            if matches!(entry.extent, TriggerExtent::Measured { .. }) {
                // Explicit extents were validated at registration; measured
                // ones can legitimately fail here and stay parked.
                let _ = resolve_entry(entry, resolver);
            }
        }
    }

    /// Sum of reserved distances of all resolved pins.
    pub fn total_reserved(&self) -> f64 {
        self.entries.iter().map(|e| e.reserved).sum()
    }

    /// Last computed progress of a trigger.
    pub fn progress(&self, id: TriggerId) -> Option<f64> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.progress)
    }

    /// Whether a trigger was active on the last update.
    pub fn is_active(&self, id: TriggerId) -> Option<bool> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.is_active)
    }

    /// Pending measurement failure, if the trigger is parked.
    pub fn measurement_error(&self, id: TriggerId) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| e.measurement_error.as_deref())
    }

    /// Effective range of a trigger after pin shifting; `None` while
    /// measurement is pending.
    pub fn effective_range(&self, id: TriggerId) -> Option<ScrollRange> {
        let mut shift = 0.0;
        for entry in &self.entries {
            if entry.id == id {
                return entry.base.map(|base| {
                    let range = base.shift(shift);
                    match entry.mode {
                        TriggerMode::Pin { .. } => ScrollRange {
                            start: range.start,
                            end: range.start + entry.reserved,
                        },
                        _ => range,
                    }
                });
            }
            shift += entry.reserved;
        }
        None
    }

    /// Recompute every trigger for the tick's scroll state, in creation
    /// order, returning the updates to dispatch.
    ///
    /// Scrub and pin triggers fire on every active tick and once more on the
    /// tick they deactivate (delivering the final clamped progress). Toggle
    /// triggers fire only on boundary crossings.
    pub fn update(&mut self, state: &ScrollState) -> Vec<TriggerUpdate> {
        let pos = state.smoothed_position;
        let mut updates = Vec::new();
        let mut shift = 0.0;

        for entry in &mut self.entries {
            let Some(base) = entry.base else {
                shift += entry.reserved;
                continue;
            };
            let range = base.shift(shift);
            shift += entry.reserved;

            match entry.mode {
                TriggerMode::Scrub => {
                    let active = range.contains(pos);
                    let mut progress = range.progress(pos);
                    if let Some(n) = entry.snap {
                        if state.velocity.abs() < SNAP_SETTLE_VELOCITY {
                            progress = (progress * f64::from(n)).round() / f64::from(n);
                        }
                    }
                    let fire = active || entry.is_active;
                    entry.progress = progress;
                    entry.is_active = active;
                    if fire {
                        updates.push(TriggerUpdate {
                            id: entry.id,
                            progress,
                            velocity: state.velocity,
                            is_active: active,
                            event: None,
                            pin_offset: None,
                        });
                    }
                }
                TriggerMode::Pin { .. } => {
                    let pinned = ScrollRange {
                        start: range.start,
                        end: range.start + entry.reserved,
                    };
                    let active = pinned.contains(pos);
                    let progress = pinned.progress(pos);
                    let hold = (pos - pinned.start).clamp(0.0, entry.reserved);
                    let fire = active || entry.is_active;
                    entry.progress = progress;
                    entry.is_active = active;
                    if fire {
                        updates.push(TriggerUpdate {
                            id: entry.id,
                            progress,
                            velocity: state.velocity,
                            is_active: active,
                            event: None,
                            pin_offset: Some(hold),
                        });
                    }
                }
                TriggerMode::Toggle { once } => {
                    let inside = range.contains(pos);
                    let event = match (entry.inside, inside) {
                        (false, true) => Some(ToggleEvent::Enter),
                        (true, false) => Some(ToggleEvent::Leave),
                        _ => None,
                    };
                    entry.inside = inside;
                    entry.progress = range.progress(pos);
                    entry.is_active = inside;

                    let suppressed = once && entry.entered_once;
                    if let Some(ToggleEvent::Enter) = event {
                        entry.entered_once = true;
                    }
                    if let Some(event) = event {
                        if !suppressed {
                            updates.push(TriggerUpdate {
                                id: entry.id,
                                progress: entry.progress,
                                velocity: state.velocity,
                                is_active: inside,
                                event: Some(event),
                                pin_offset: None,
                            });
                        }
                    }
                }
            }
        }
        updates
    }

    /// Drop every trigger without retiring ids (teardown path).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn resolve_entry(
    entry: &mut TriggerEntry,
    resolver: &mut dyn FnMut(&str) -> Option<(f64, f64)>,
) -> ScrollyteResult<()> {
    let (base, extent_len) = match &entry.extent {
        TriggerExtent::Explicit { start, end } => {
            let range = ScrollRange::new(*start, *end)?;
            (range, range.span())
        }
        TriggerExtent::Measured { target } => {
            let Some((offset, len)) = resolver(target) else {
                entry.base = None;
                entry.reserved = 0.0;
                entry.measurement_error = Some(format!("target '{target}' is not registered"));
                return Ok(());
            };
            if len <= 0.0 || !offset.is_finite() || !len.is_finite() {
                entry.base = None;
                entry.reserved = 0.0;
                entry.measurement_error = Some(format!("target '{target}' has zero extent"));
                return Ok(());
            }
            (ScrollRange::new(offset, offset + len)?, len)
        }
    };

    entry.base = Some(base);
    entry.measurement_error = None;
    entry.reserved = match entry.mode {
        TriggerMode::Pin { multiplier } => extent_len * multiplier,
        _ => 0.0,
    };
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/registry.rs"]
mod tests;
