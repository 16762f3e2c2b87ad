use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::animation::tween::PropTrack;
use crate::foundation::core::Prop;
use crate::timeline::builder::{PositionSpec, SegmentSpec};

const DT: f64 = 1.0 / 60.0;

fn engine() -> Engine {
    // Large max_dt so coarse test ticks are not clamped.
    let config = EngineConfig {
        max_dt: 1.0,
        ..Default::default()
    };
    let mut eng = Engine::new(config, Viewport::new(1920.0, 1080.0).unwrap()).unwrap();
    eng.set_content_extent(10_000.0);
    eng
}

#[test]
fn invalid_config_fails_fast() {
    let cfg = EngineConfig {
        trail_capacity: 0,
        ..Default::default()
    };
    assert!(Engine::new(cfg, Viewport::new(100.0, 100.0).unwrap()).is_err());
}

#[test]
fn scrub_callback_receives_clamped_progress() {
    let mut eng = engine();
    let handle = eng
        .register_trigger(TriggerConfig::scrub(0.0, 100.0))
        .unwrap();

    let seen: Rc<RefCell<Vec<f64>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    eng.on_trigger(&handle, move |update| {
        sink.borrow_mut().push(update.progress);
    })
    .unwrap();

    eng.scroll_to(50.0, true);
    eng.tick(DT);
    assert_eq!(seen.borrow().as_slice(), &[0.5]);
    assert_eq!(eng.trigger_progress(&handle), Some(0.5));
}

#[test]
fn bound_timeline_sees_trigger_progress_from_the_same_tick() {
    let mut eng = engine();
    let trigger = eng
        .register_trigger(TriggerConfig::scrub(0.0, 100.0))
        .unwrap();
    let spec = eng
        .timeline()
        .add(
            SegmentSpec::tween("box", vec![PropTrack::new(Prop::X, 0.0, 100.0)], 1.0)
                .ease(Ease::Linear),
            PositionSpec::default(),
        )
        .unwrap()
        .build()
        .unwrap();
    let timeline = eng.add_timeline(spec).unwrap();
    eng.bind(&timeline, &trigger).unwrap();

    eng.scroll_to(50.0, true);
    eng.tick(DT);
    // One tick: trigger progress 0.5 drives the timeline to X = 50.
    assert_eq!(
        eng.published_props("box").unwrap().get(&Prop::X),
        Some(50.0)
    );
}

#[test]
fn measured_trigger_resolves_through_the_capability_interface() {
    let mut eng = engine();
    eng.register_target(
        "hero",
        Target::new().with_measure(|_| Rect::new(0.0, 200.0, 1920.0, 800.0)),
    );
    let handle = eng
        .register_trigger(TriggerConfig::scrub_measured("hero"))
        .unwrap();

    // Vertical axis: range [200, 800].
    eng.scroll_to(500.0, true);
    eng.tick(DT);
    assert_eq!(eng.trigger_progress(&handle), Some(0.5));
}

#[test]
fn pin_extends_the_scroll_limit_and_destroy_restores_it() {
    let mut eng = engine();
    eng.register_target(
        "showcase",
        Target::new().with_measure(|_| Rect::new(0.0, 1000.0, 1920.0, 1800.0)),
    );
    // Default multiplier is 2.0; extent 800 reserves 1600.
    let pin = eng.register_pin("showcase").unwrap();
    assert_eq!(eng.scroll_limit(), 11_600.0);

    eng.destroy_trigger(&pin).unwrap();
    assert_eq!(eng.scroll_limit(), 10_000.0);
    assert!(eng.destroy_trigger(&pin).is_err());
}

#[test]
fn unmeasured_trigger_recovers_after_resize() {
    let mut eng = engine();
    let handle = eng
        .register_trigger(TriggerConfig::scrub_measured("late"))
        .unwrap();
    assert!(eng.trigger_measurement_error(&handle).is_some());

    eng.register_target(
        "late",
        Target::new().with_measure(|_| Rect::new(0.0, 0.0, 1920.0, 400.0)),
    );
    eng.push_resize(Viewport::new(1280.0, 720.0).unwrap());
    eng.scroll_to(200.0, true);
    eng.tick(DT);
    assert!(eng.trigger_measurement_error(&handle).is_none());
    assert_eq!(eng.trigger_progress(&handle), Some(0.5));
}

#[test]
fn apply_hook_receives_published_values() {
    let mut eng = engine();
    let seen: Rc<RefCell<Vec<f64>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    eng.register_target(
        "card",
        Target::new().with_apply(move |props| {
            if let Some(v) = props.get(&Prop::Opacity) {
                sink.borrow_mut().push(v);
            }
        }),
    );

    let spec = eng
        .timeline()
        .add(
            SegmentSpec::tween("card", vec![PropTrack::new(Prop::Opacity, 0.0, 1.0)], 1.0)
                .ease(Ease::Linear),
            PositionSpec::default(),
        )
        .unwrap()
        .build()
        .unwrap();
    let timeline = eng.add_timeline(spec).unwrap();
    eng.play(&timeline, None).unwrap();

    eng.tick(0.25);
    eng.tick(0.25);
    assert_eq!(seen.borrow().as_slice(), &[0.25, 0.5]);
}

#[test]
fn pointer_moves_feed_trail_and_listeners_once_per_tick() {
    let mut eng = engine();
    let moves: Rc<RefCell<usize>> = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&moves);
    eng.on_pointer_move(move |_| *counter.borrow_mut() += 1);

    for i in 0..15 {
        eng.push_pointer_move(Point::new(i as f64, i as f64));
    }
    eng.tick(DT);

    assert_eq!(*moves.borrow(), 15);
    let trail = eng.trail();
    assert_eq!(trail.len(), 10);
    assert_eq!(trail[0].position, Point::new(14.0, 14.0));
}

#[test]
fn scroll_listener_sees_raw_deltas() {
    let mut eng = engine();
    let deltas: Rc<RefCell<Vec<f64>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&deltas);
    eng.on_scroll(move |d| sink.borrow_mut().push(d));

    eng.push_wheel(120.0);
    eng.push_wheel(-40.0);
    eng.tick(DT);
    assert_eq!(deltas.borrow().as_slice(), &[120.0, -40.0]);
}

#[test]
fn skew_is_clamped_for_violent_input() {
    let mut eng = engine();
    eng.push_wheel(1.0e9);
    eng.tick(DT);
    let skew = eng.skew();
    assert!((-20.0..=20.0).contains(&skew));
    assert!(skew < 0.0); // forward velocity, negative factor
}

#[test]
fn preloader_timeline_gates_until_complete() {
    let mut eng = engine();
    let spec = eng
        .timeline()
        .add(
            SegmentSpec::tween("logo", vec![PropTrack::new(Prop::Scale, 0.8, 1.0)], 0.5),
            PositionSpec::default(),
        )
        .unwrap()
        .build()
        .unwrap();
    let preloader = eng.add_timeline(spec).unwrap();
    eng.play(&preloader, None).unwrap();

    eng.tick(0.25);
    assert!(!eng.is_complete(&preloader));
    eng.tick(0.5);
    assert!(eng.is_complete(&preloader));
    assert_eq!(
        eng.published_props("logo").unwrap().get(&Prop::Scale),
        Some(1.0)
    );
}

#[test]
fn teardown_silences_everything() {
    let mut eng = engine();
    let handle = eng
        .register_trigger(TriggerConfig::scrub(0.0, 100.0))
        .unwrap();
    let fired: Rc<RefCell<usize>> = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&fired);
    eng.on_trigger(&handle, move |_| *counter.borrow_mut() += 1)
        .unwrap();

    eng.scroll_to(50.0, true);
    eng.tick(DT);
    assert_eq!(*fired.borrow(), 1);

    eng.teardown();
    eng.scroll_to(60.0, true);
    eng.tick(DT);
    assert_eq!(*fired.borrow(), 1);
    assert!(eng.register_trigger(TriggerConfig::scrub(0.0, 1.0)).is_err());
    assert!(eng.published_props("box").is_none());
}

#[test]
fn killed_timeline_leaves_published_values_in_place() {
    let mut eng = engine();
    let spec = eng
        .timeline()
        .add(
            SegmentSpec::tween("el", vec![PropTrack::new(Prop::Opacity, 0.0, 1.0)], 1.0)
                .ease(Ease::Linear),
            PositionSpec::default(),
        )
        .unwrap()
        .build()
        .unwrap();
    let timeline = eng.add_timeline(spec).unwrap();
    eng.play(&timeline, None).unwrap();
    eng.tick(0.25);
    assert_eq!(
        eng.published_props("el").unwrap().get(&Prop::Opacity),
        Some(0.25)
    );

    eng.kill(&timeline);
    eng.kill(&timeline); // idempotent
    eng.tick(0.25);
    // No snap-back: the last published value stays.
    assert_eq!(
        eng.published_props("el").unwrap().get(&Prop::Opacity),
        Some(0.25)
    );
}
