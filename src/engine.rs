use std::collections::{BTreeMap, VecDeque};

use crate::animation::ease::Ease;
use crate::clock::Clock;
use crate::foundation::core::{Point, PropSet, Rect, ScrollAxis, Vec2, Viewport};
use crate::foundation::error::{ScrollyteError, ScrollyteResult};
use crate::pointer::{PointerConfig, PointerState};
use crate::scroll::model::{ScrollConfig, ScrollState, VirtualScroll};
use crate::scroll::skew::{SkewConfig, VelocitySkew};
use crate::timeline::builder::{TimelineBuilder, TimelineSpec};
use crate::timeline::scheduler::{TimelineId, TimelineScheduler};
use crate::trail::{DEFAULT_TRAIL_CAPACITY, TrailBuffer, TrailSample};
use crate::trigger::registry::{TriggerConfig, TriggerId, TriggerRegistry, TriggerUpdate};

/// Engine-wide configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    /// Virtual scroll smoothing and input normalization.
    pub scroll: ScrollConfig,
    /// Velocity-proportional skew bounds.
    pub skew: SkewConfig,
    /// Cursor idle fade and magnetic pull.
    pub pointer: PointerConfig,
    /// Pointer trail history length.
    pub trail_capacity: usize,
    /// Ease used by timelines that do not set their own.
    pub default_ease: Ease,
    /// Reserved distance per unit of pinned extent for
    /// [`Engine::register_pin`].
    pub pin_multiplier: f64,
    /// Upper clamp for per-frame deltas, in seconds.
    pub max_dt: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scroll: ScrollConfig::default(),
            skew: SkewConfig::default(),
            pointer: PointerConfig::default(),
            trail_capacity: DEFAULT_TRAIL_CAPACITY,
            default_ease: Ease::OutCubic,
            pin_multiplier: 2.0,
            max_dt: 0.1,
        }
    }
}

impl EngineConfig {
    /// Validate every section.
    pub fn validate(&self) -> ScrollyteResult<()> {
        self.scroll.validate()?;
        self.skew.validate()?;
        self.pointer.validate()?;
        if self.trail_capacity == 0 {
            return Err(ScrollyteError::configuration(
                "trail_capacity must be >= 1",
            ));
        }
        if !self.pin_multiplier.is_finite() || self.pin_multiplier <= 0.0 {
            return Err(ScrollyteError::configuration(
                "pin_multiplier must be finite and > 0",
            ));
        }
        if !self.max_dt.is_finite() || self.max_dt <= 0.0 {
            return Err(ScrollyteError::configuration(
                "max_dt must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// Host measurement hook: viewport in, element rect in content coordinates
/// out.
pub type MeasureFn = Box<dyn Fn(Viewport) -> Rect>;
/// Host apply hook, invoked with the full published property set after each
/// tick that changed it.
pub type ApplyFn = Box<dyn FnMut(&PropSet)>;
/// Per-trigger update callback.
pub type TriggerCallback = Box<dyn FnMut(&TriggerUpdate)>;
/// Raw scroll delta passthrough listener.
pub type ScrollListener = Box<dyn FnMut(f64)>;
/// Raw pointer position passthrough listener.
pub type PointerListener = Box<dyn FnMut(Point)>;

/// Capability interface of a host visual element.
///
/// Elements are registered by name; there is no selector-style discovery.
/// Both hooks are optional: a target can be measure-only (trigger geometry),
/// apply-only (timeline consumer), or both.
#[derive(Default)]
pub struct Target {
    measure: Option<MeasureFn>,
    apply: Option<ApplyFn>,
}

impl Target {
    /// Target with no hooks (a pure published-value consumer).
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a measurement hook.
    pub fn with_measure(mut self, measure: impl Fn(Viewport) -> Rect + 'static) -> Self {
        self.measure = Some(Box::new(measure));
        self
    }

    /// Attach an apply hook.
    pub fn with_apply(mut self, apply: impl FnMut(&PropSet) + 'static) -> Self {
        self.apply = Some(Box::new(apply));
        self
    }
}

/// Opaque reference to a registered trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerHandle {
    id: TriggerId,
}

impl TriggerHandle {
    /// Underlying trigger id.
    pub fn id(&self) -> TriggerId {
        self.id
    }
}

/// Opaque reference to a scheduled timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineHandle {
    id: TimelineId,
}

impl TimelineHandle {
    /// Underlying timeline id.
    pub fn id(&self) -> TimelineId {
        self.id
    }
}

enum InputEvent {
    Wheel(f64),
    Touch(f64),
    PointerMove(Point),
    PointerEnter,
    PointerLeave,
    Resize(Viewport),
}

/// The orchestration engine: one explicitly constructed instance owns the
/// clock, scroll model, trigger registry, timeline scheduler, and trail.
///
/// All state mutates inside [`tick`](Engine::tick) or in direct response to
/// a synchronous call; there is no ambient global. Every mutating operation
/// takes `&mut self` and tick-time callbacks only receive payloads, so
/// registries can never be mutated while they are being iterated.
///
/// Tick order is fixed: buffered input, scroll model, triggers in creation
/// order, then timelines. A timeline bound to a trigger always sees that
/// trigger's progress from the same tick.
pub struct Engine {
    config: EngineConfig,
    clock: Clock,
    scroll: VirtualScroll,
    skew: VelocitySkew,
    registry: TriggerRegistry,
    scheduler: TimelineScheduler,
    trail: TrailBuffer,
    pointer: PointerState,
    targets: BTreeMap<String, Target>,
    callbacks: BTreeMap<TriggerId, TriggerCallback>,
    bindings: BTreeMap<TriggerId, TimelineId>,
    scroll_listeners: Vec<ScrollListener>,
    pointer_listeners: Vec<PointerListener>,
    input: VecDeque<InputEvent>,
    published: BTreeMap<String, PropSet>,
    trail_snapshot: Vec<TrailSample>,
    viewport: Viewport,
    content_extent: f64,
    skew_value: f64,
    torn_down: bool,
}

impl Engine {
    /// Construct an engine for the given viewport.
    pub fn new(config: EngineConfig, viewport: Viewport) -> ScrollyteResult<Self> {
        config.validate()?;
        Ok(Self {
            clock: Clock::new(config.max_dt)?,
            scroll: VirtualScroll::new(config.scroll)?,
            skew: VelocitySkew::new(config.skew)?,
            registry: TriggerRegistry::new(),
            scheduler: TimelineScheduler::new(),
            trail: TrailBuffer::new(config.trail_capacity)?,
            pointer: PointerState::new(config.pointer)?,
            targets: BTreeMap::new(),
            callbacks: BTreeMap::new(),
            bindings: BTreeMap::new(),
            scroll_listeners: Vec::new(),
            pointer_listeners: Vec::new(),
            input: VecDeque::new(),
            published: BTreeMap::new(),
            trail_snapshot: Vec::new(),
            viewport,
            content_extent: 0.0,
            skew_value: 0.0,
            torn_down: false,
            config,
        })
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Last published scroll state.
    pub fn scroll_state(&self) -> &ScrollState {
        self.scroll.state()
    }

    /// Velocity skew of the last tick, clamped to the configured bounds.
    pub fn skew(&self) -> f64 {
        self.skew_value
    }

    /// Pointer trail as of the last tick, newest first.
    pub fn trail(&self) -> &[TrailSample] {
        &self.trail_snapshot
    }

    /// Per-tick cursor opacity (idle fade, window enter/leave).
    pub fn pointer_opacity(&self) -> f64 {
        self.pointer.opacity(self.clock.elapsed())
    }

    /// Magnetic pull of the cursor toward an interactive rect.
    pub fn magnetic_offset(&self, rect: Rect) -> Vec2 {
        self.pointer.magnetic_offset(rect)
    }

    /// Published property values for a target, if any timeline wrote them.
    pub fn published_props(&self, target: &str) -> Option<&PropSet> {
        self.published.get(target)
    }

    // ---- capability interface -------------------------------------------

    /// Register a host element under `name`.
    pub fn register_target(&mut self, name: impl Into<String>, target: Target) {
        self.targets.insert(name.into(), target);
    }

    /// Remove a host element. Triggers measured from it park on the next
    /// layout pass.
    pub fn unregister_target(&mut self, name: &str) {
        self.targets.remove(name);
    }

    /// Scrollable content extent, before pin reservations.
    pub fn set_content_extent(&mut self, extent: f64) {
        self.content_extent = extent.max(0.0);
        self.refresh_limit();
    }

    /// Total scrollable distance including pin reservations.
    pub fn scroll_limit(&self) -> f64 {
        self.scroll.limit()
    }

    // ---- input ingestion -------------------------------------------------

    /// Queue a wheel delta for the next tick.
    pub fn push_wheel(&mut self, delta: f64) {
        self.input.push_back(InputEvent::Wheel(delta));
    }

    /// Queue a touch delta for the next tick.
    pub fn push_touch(&mut self, delta: f64) {
        self.input.push_back(InputEvent::Touch(delta));
    }

    /// Queue a pointer move for the next tick.
    pub fn push_pointer_move(&mut self, position: Point) {
        self.input.push_back(InputEvent::PointerMove(position));
    }

    /// Queue a window-enter for the next tick.
    pub fn pointer_entered(&mut self) {
        self.input.push_back(InputEvent::PointerEnter);
    }

    /// Queue a window-leave for the next tick.
    pub fn pointer_left(&mut self) {
        self.input.push_back(InputEvent::PointerLeave);
    }

    /// Queue a viewport resize; layout is recomputed during the next tick.
    pub fn push_resize(&mut self, viewport: Viewport) {
        self.input.push_back(InputEvent::Resize(viewport));
    }

    /// Jump the scroll target (anchor navigation). With `immediate` the
    /// smoothed position jumps too, which is an explicit discontinuity.
    pub fn scroll_to(&mut self, pos: f64, immediate: bool) {
        self.scroll.scroll_to(pos, immediate);
    }

    /// Subscribe to raw scroll deltas (after input normalization queueing,
    /// before smoothing).
    pub fn on_scroll(&mut self, listener: impl FnMut(f64) + 'static) {
        self.scroll_listeners.push(Box::new(listener));
    }

    /// Subscribe to raw pointer positions.
    pub fn on_pointer_move(&mut self, listener: impl FnMut(Point) + 'static) {
        self.pointer_listeners.push(Box::new(listener));
    }

    // ---- triggers --------------------------------------------------------

    /// Register a trigger.
    pub fn register_trigger(&mut self, config: TriggerConfig) -> ScrollyteResult<TriggerHandle> {
        self.ensure_live()?;
        let mut resolver = measure_resolver(&self.targets, self.viewport, self.config.scroll.axis);
        let id = self.registry.register(config, &mut resolver)?;
        drop(resolver);
        self.refresh_limit();
        Ok(TriggerHandle { id })
    }

    /// Register a pin trigger on `target` using the configured default
    /// multiplier.
    pub fn register_pin(&mut self, target: impl Into<String>) -> ScrollyteResult<TriggerHandle> {
        let multiplier = self.config.pin_multiplier;
        self.register_trigger(TriggerConfig::pin(target, multiplier))
    }

    /// Attach an update callback to a trigger.
    pub fn on_trigger(
        &mut self,
        handle: &TriggerHandle,
        callback: impl FnMut(&TriggerUpdate) + 'static,
    ) -> ScrollyteResult<()> {
        if self.registry.progress(handle.id).is_none() {
            return Err(ScrollyteError::configuration(format!(
                "unknown trigger {}",
                handle.id.0
            )));
        }
        self.callbacks.insert(handle.id, Box::new(callback));
        Ok(())
    }

    /// Destroy a trigger, releasing its pin reservation and callback.
    /// Destroying twice is a configuration error.
    pub fn destroy_trigger(&mut self, handle: &TriggerHandle) -> ScrollyteResult<()> {
        self.registry.unregister(handle.id)?;
        self.callbacks.remove(&handle.id);
        self.bindings.remove(&handle.id);
        self.refresh_limit();
        Ok(())
    }

    /// Last computed progress of a trigger.
    pub fn trigger_progress(&self, handle: &TriggerHandle) -> Option<f64> {
        self.registry.progress(handle.id)
    }

    /// Whether a trigger was active on the last tick.
    pub fn trigger_active(&self, handle: &TriggerHandle) -> Option<bool> {
        self.registry.is_active(handle.id)
    }

    /// Pending measurement failure for a parked trigger.
    pub fn trigger_measurement_error(&self, handle: &TriggerHandle) -> Option<&str> {
        self.registry.measurement_error(handle.id)
    }

    /// Re-measure every measured trigger against the current viewport.
    #[tracing::instrument(skip(self))]
    pub fn recompute_layout(&mut self) {
        let mut resolver = measure_resolver(&self.targets, self.viewport, self.config.scroll.axis);
        self.registry.recompute_layout(&mut resolver);
        drop(resolver);
        self.refresh_limit();
    }

    // ---- timelines -------------------------------------------------------

    /// Builder preconfigured with the engine's default ease.
    pub fn timeline(&self) -> TimelineBuilder {
        TimelineBuilder::new().default_ease(self.config.default_ease)
    }

    /// Schedule a built timeline, paused.
    pub fn add_timeline(&mut self, spec: TimelineSpec) -> ScrollyteResult<TimelineHandle> {
        self.ensure_live()?;
        let id = self.scheduler.add(spec);
        Ok(TimelineHandle { id })
    }

    /// Drive a timeline from a scrub trigger's progress. The binding is
    /// evaluated after the trigger phase of the same tick, never a tick
    /// late.
    pub fn bind(
        &mut self,
        timeline: &TimelineHandle,
        trigger: &TriggerHandle,
    ) -> ScrollyteResult<()> {
        if self.registry.progress(trigger.id).is_none() {
            return Err(ScrollyteError::configuration(format!(
                "unknown trigger {}",
                trigger.id.0
            )));
        }
        if !self.scheduler.is_live(timeline.id) {
            return Err(ScrollyteError::configuration(format!(
                "unknown timeline {}",
                timeline.id.0
            )));
        }
        self.bindings.insert(trigger.id, timeline.id);
        Ok(())
    }

    /// Start or resume time-driven playback.
    pub fn play(&mut self, handle: &TimelineHandle, from: Option<f64>) -> ScrollyteResult<()> {
        self.scheduler.play(handle.id, from)
    }

    /// Pause time-driven playback in place.
    pub fn pause(&mut self, handle: &TimelineHandle) -> ScrollyteResult<()> {
        self.scheduler.pause(handle.id)
    }

    /// Drive a timeline directly from an external progress value.
    pub fn set_progress(&mut self, handle: &TimelineHandle, p: f64) -> ScrollyteResult<()> {
        self.scheduler.set_progress(handle.id, p)
    }

    /// Stop a timeline immediately; idempotent.
    pub fn kill(&mut self, handle: &TimelineHandle) {
        self.scheduler.kill(handle.id);
    }

    /// Whether a one-shot timeline has finished all cycles.
    pub fn is_complete(&self, handle: &TimelineHandle) -> bool {
        self.scheduler.is_complete(handle.id)
    }

    // ---- the tick --------------------------------------------------------

    /// Advance one frame: (1) drain buffered input, (2) advance the scroll
    /// model, (3) recompute triggers in creation order and dispatch, (4)
    /// advance timelines and publish values. No-op after teardown.
    #[tracing::instrument(skip(self))]
    pub fn tick(&mut self, dt: f64) {
        if self.torn_down {
            return;
        }
        let ctx = self.clock.tick(dt);

        // Phase 1: buffered input.
        while let Some(event) = self.input.pop_front() {
            match event {
                InputEvent::Wheel(delta) => {
                    self.scroll.wheel(delta);
                    for listener in &mut self.scroll_listeners {
                        listener(delta);
                    }
                }
                InputEvent::Touch(delta) => {
                    self.scroll.touch(delta);
                    for listener in &mut self.scroll_listeners {
                        listener(delta);
                    }
                }
                InputEvent::PointerMove(position) => {
                    self.pointer.record_move(position, ctx.elapsed);
                    self.trail.push(TrailSample {
                        position,
                        time: ctx.elapsed,
                    });
                    for listener in &mut self.pointer_listeners {
                        listener(position);
                    }
                }
                InputEvent::PointerEnter => self.pointer.set_inside_window(true, ctx.elapsed),
                InputEvent::PointerLeave => self.pointer.set_inside_window(false, ctx.elapsed),
                InputEvent::Resize(viewport) => {
                    self.viewport = viewport;
                    self.recompute_layout();
                }
            }
        }

        // Phase 2: scroll model.
        let state = self.scroll.tick(ctx.dt);
        self.skew_value = self.skew.apply(state.velocity);

        // Phase 3: triggers, creation order.
        let updates = self.registry.update(&state);
        for update in &updates {
            if let Some(callback) = self.callbacks.get_mut(&update.id) {
                callback(update);
            }
            if let Some(timeline) = self.bindings.get(&update.id) {
                // The bound timeline may have completed or been killed;
                // a stale binding is not an error.
                let _ = self.scheduler.set_progress(*timeline, update.progress);
            }
        }

        // Phase 4: timelines.
        let changes = self.scheduler.advance(ctx.dt);
        for (target, props) in changes {
            let entry = self.published.entry(target.clone()).or_default();
            entry.merge(&props);
            if let Some(hooks) = self.targets.get_mut(&target) {
                if let Some(apply) = hooks.apply.as_mut() {
                    apply(entry);
                }
            }
        }

        // Trail readers all see the same per-tick snapshot.
        self.trail_snapshot = self.trail.snapshot();
    }

    /// Release every trigger, timeline, listener, and published value.
    /// Subsequent ticks are no-ops and registrations fail.
    #[tracing::instrument(skip(self))]
    pub fn teardown(&mut self) {
        self.registry.clear();
        self.scheduler.clear();
        self.callbacks.clear();
        self.bindings.clear();
        self.scroll_listeners.clear();
        self.pointer_listeners.clear();
        self.input.clear();
        self.published.clear();
        self.trail.clear();
        self.trail_snapshot.clear();
        self.pointer.reset();
        self.scroll.reset();
        self.skew_value = 0.0;
        self.torn_down = true;
        tracing::debug!("engine torn down");
    }

    fn ensure_live(&self) -> ScrollyteResult<()> {
        if self.torn_down {
            return Err(ScrollyteError::configuration("engine was torn down"));
        }
        Ok(())
    }

    fn refresh_limit(&mut self) {
        self.scroll
            .set_limit(self.content_extent + self.registry.total_reserved());
    }
}

fn measure_resolver<'a>(
    targets: &'a BTreeMap<String, Target>,
    viewport: Viewport,
    axis: ScrollAxis,
) -> impl FnMut(&str) -> Option<(f64, f64)> + 'a {
    move |name: &str| {
        let measure = targets.get(name)?.measure.as_ref()?;
        let rect = measure(viewport);
        Some((axis.offset_of(rect), axis.extent_of(rect)))
    }
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
