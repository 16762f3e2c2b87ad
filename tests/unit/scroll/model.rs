use super::*;

fn model() -> VirtualScroll {
    let mut vs = VirtualScroll::new(ScrollConfig::default()).unwrap();
    vs.set_limit(10_000.0);
    vs
}

#[test]
fn config_validation_rejects_bad_values() {
    let cfg = ScrollConfig {
        smoothing: 0.0,
        ..Default::default()
    };
    assert!(VirtualScroll::new(cfg).is_err());

    let cfg = ScrollConfig {
        wheel_multiplier: -1.0,
        ..Default::default()
    };
    assert!(VirtualScroll::new(cfg).is_err());

    let cfg = ScrollConfig {
        touch_multiplier: f64::NAN,
        ..Default::default()
    };
    assert!(VirtualScroll::new(cfg).is_err());
}

#[test]
fn no_input_means_no_drift() {
    let mut vs = model();
    for _ in 0..1000 {
        vs.tick(1.0 / 60.0);
    }
    assert_eq!(vs.state().smoothed_position, 0.0);
    assert_eq!(vs.state().velocity, 0.0);
    assert_eq!(vs.state().direction, ScrollDirection::Still);
}

#[test]
fn smoothed_position_converges_exactly_onto_target() {
    let mut vs = model();
    vs.wheel(500.0);
    assert_eq!(vs.state().raw_position, 400.0); // 500 * 0.8 wheel multiplier
    for _ in 0..1000 {
        vs.tick(1.0 / 60.0);
    }
    assert_eq!(vs.state().smoothed_position, 400.0);
    assert_eq!(vs.state().direction, ScrollDirection::Still);
}

#[test]
fn smoothing_is_frame_rate_independent() {
    let mut coarse = model();
    let mut fine = model();
    coarse.wheel(1000.0);
    fine.wheel(1000.0);

    // One 100 ms step vs ten 10 ms steps land in the same place.
    coarse.tick(0.1);
    for _ in 0..10 {
        fine.tick(0.01);
    }
    let a = coarse.state().smoothed_position;
    let b = fine.state().smoothed_position;
    assert!((a - b).abs() < 1.0, "{a} vs {b}");
}

#[test]
fn smoothed_motion_is_monotonic_toward_target() {
    let mut vs = model();
    vs.wheel(2000.0);
    let mut prev = vs.state().smoothed_position;
    for _ in 0..100 {
        let s = vs.tick(1.0 / 60.0);
        assert!(s.smoothed_position >= prev);
        prev = s.smoothed_position;
    }
    assert!(prev <= vs.state().raw_position);
}

#[test]
fn velocity_sign_tracks_direction() {
    let mut vs = model();
    vs.scroll_to(5000.0, true);
    vs.wheel(1000.0);
    let s = vs.tick(1.0 / 60.0);
    assert!(s.velocity > 0.0);
    assert_eq!(s.direction, ScrollDirection::Forward);

    vs.wheel(-5000.0);
    let s = vs.tick(1.0 / 60.0);
    assert!(s.velocity < 0.0);
    assert_eq!(s.direction, ScrollDirection::Backward);
}

#[test]
fn raw_position_clamps_to_limit() {
    let mut vs = model();
    vs.wheel(1.0e9);
    assert_eq!(vs.state().raw_position, 10_000.0);
    vs.wheel(-1.0e9);
    assert_eq!(vs.state().raw_position, 0.0);
}

#[test]
fn shrinking_limit_pulls_raw_position_back() {
    let mut vs = model();
    vs.scroll_to(8000.0, true);
    vs.set_limit(5000.0);
    assert_eq!(vs.state().raw_position, 5000.0);
}

#[test]
fn immediate_scroll_to_is_discontinuous_by_contract() {
    let mut vs = model();
    vs.scroll_to(1234.0, true);
    assert_eq!(vs.state().smoothed_position, 1234.0);
    assert_eq!(vs.state().velocity, 0.0);
}

#[test]
fn touch_without_smoothing_settles_faster_than_wheel() {
    let mut wheel = model();
    let mut touch = model();
    wheel.wheel(1000.0 / 0.8); // normalize so both targets are 1000
    touch.touch(1000.0 / 1.5);

    wheel.tick(1.0 / 60.0);
    touch.tick(1.0 / 60.0);
    assert!(
        touch.state().smoothed_position > wheel.state().smoothed_position,
        "touch should chase its target on a shorter horizon"
    );
}

#[test]
fn reset_returns_to_origin() {
    let mut vs = model();
    vs.wheel(3000.0);
    vs.tick(1.0 / 60.0);
    vs.reset();
    assert_eq!(*vs.state(), ScrollState::default());
}
