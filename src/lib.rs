//! Scrollyte is a deterministic scroll-driven animation orchestration engine.
//!
//! It computes the numeric animation state behind scroll-choreographed pages:
//! a damped virtual scroll position decoupled from native scrolling, a
//! registry of progress observers whose active range can reserve extra scroll
//! distance (pinning), a timeline scheduler with relative offsets and
//! per-element stagger, and a bounded pointer-trail history. Rendering,
//! markup, and asset loading live in the host; the engine only exchanges
//! numbers across the boundary.
//!
//! # Tick overview
//!
//! Each [`Engine::tick`] executes a fixed four-phase order:
//!
//! 1. **Ingest**: drain buffered input (scroll deltas, pointer moves, resize)
//! 2. **Scroll**: advance the smoothed position and derive velocity
//! 3. **Triggers**: recompute every trigger's progress in creation order
//! 4. **Timelines**: advance running timelines and publish property values
//!
//! A timeline bound to a scrub trigger therefore always sees that trigger's
//! progress from the same tick, never a stale value.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: the same input trace produces the same
//!   published values; all randomness (stagger shuffles) is seeded.
//! - **Single-threaded**: all state mutates inside the tick or in direct
//!   response to a synchronous call; callbacks receive payloads, never the
//!   engine, so registries cannot change mid-iteration.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod animation;
mod clock;
mod engine;
mod foundation;
mod pointer;
mod scroll;
mod sections;
mod timeline;
mod trail;
mod trigger;

pub use animation::ease::Ease;
pub use animation::stagger::{StaggerFrom, StaggerSpec};
pub use animation::tween::{Lerp, PropTrack};
pub use clock::{Clock, TickCtx};
pub use engine::{
    ApplyFn, Engine, EngineConfig, MeasureFn, PointerListener, ScrollListener, Target,
    TimelineHandle, TriggerCallback, TriggerHandle,
};
pub use foundation::core::{
    Point, Prop, PropSet, Rect, ScrollAxis, ScrollDirection, ScrollRange, Vec2, Viewport,
};
pub use foundation::error::{ScrollyteError, ScrollyteResult};
pub use pointer::{PointerConfig, PointerState};
pub use scroll::model::{ScrollConfig, ScrollState, VirtualScroll};
pub use scroll::skew::{SkewConfig, VelocitySkew};
pub use sections::{SectionAdapter, Sequencer, start_preloader};
pub use timeline::builder::{
    PositionSpec, Repeat, ResolvedSegment, SegmentSpec, TimelineBuilder, TimelineSpec,
};
pub use timeline::scheduler::{TimelineId, TimelineScheduler};
pub use trail::{DEFAULT_TRAIL_CAPACITY, FollowerStyle, TrailBuffer, TrailSample};
pub use trigger::registry::{
    ToggleEvent, TriggerConfig, TriggerExtent, TriggerId, TriggerMode, TriggerRegistry,
    TriggerUpdate,
};
