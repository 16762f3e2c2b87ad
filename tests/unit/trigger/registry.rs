use super::*;
use crate::foundation::core::ScrollDirection;

fn no_targets() -> impl FnMut(&str) -> Option<(f64, f64)> {
    |_: &str| None
}

fn state_at(pos: f64) -> ScrollState {
    ScrollState {
        raw_position: pos,
        smoothed_position: pos,
        velocity: 0.0,
        direction: ScrollDirection::Still,
    }
}

fn state_moving(pos: f64, velocity: f64) -> ScrollState {
    ScrollState {
        raw_position: pos,
        smoothed_position: pos,
        velocity,
        direction: ScrollDirection::Forward,
    }
}

#[test]
fn register_rejects_empty_and_inverted_ranges() {
    let mut reg = TriggerRegistry::new();
    assert!(reg
        .register(TriggerConfig::scrub(100.0, 100.0), &mut no_targets())
        .is_err());
    assert!(reg
        .register(TriggerConfig::scrub(200.0, 100.0), &mut no_targets())
        .is_err());
    assert!(reg.is_empty());
}

#[test]
fn register_rejects_bad_pin_multiplier_and_snap() {
    let mut reg = TriggerRegistry::new();
    assert!(reg
        .register(TriggerConfig::pin("cards", 0.0), &mut no_targets())
        .is_err());
    let cfg = TriggerConfig {
        snap: Some(0),
        ..TriggerConfig::scrub(0.0, 100.0)
    };
    assert!(reg.register(cfg, &mut no_targets()).is_err());
}

#[test]
fn scrub_progress_is_clamped_and_linear() {
    let mut reg = TriggerRegistry::new();
    let id = reg
        .register(TriggerConfig::scrub(0.0, 100.0), &mut no_targets())
        .unwrap();

    reg.update(&state_at(50.0));
    assert_eq!(reg.progress(id), Some(0.5));

    reg.update(&state_at(-40.0));
    assert_eq!(reg.progress(id), Some(0.0));

    reg.update(&state_at(400.0));
    assert_eq!(reg.progress(id), Some(1.0));
}

#[test]
fn scrub_progress_is_monotonic_in_position() {
    let mut reg = TriggerRegistry::new();
    let id = reg
        .register(TriggerConfig::scrub(100.0, 300.0), &mut no_targets())
        .unwrap();
    let mut prev = -1.0;
    for step in 0..=40 {
        reg.update(&state_at(step as f64 * 10.0));
        let p = reg.progress(id).unwrap();
        assert!(p >= prev);
        assert!((0.0..=1.0).contains(&p));
        prev = p;
    }
}

#[test]
fn scrub_fires_every_active_tick_and_once_on_exit() {
    let mut reg = TriggerRegistry::new();
    reg.register(TriggerConfig::scrub(0.0, 100.0), &mut no_targets())
        .unwrap();

    assert_eq!(reg.update(&state_at(50.0)).len(), 1);
    assert_eq!(reg.update(&state_at(50.0)).len(), 1); // flat progress still fires
    let exit = reg.update(&state_at(500.0));
    assert_eq!(exit.len(), 1); // final clamped delivery
    assert!(!exit[0].is_active);
    assert_eq!(exit[0].progress, 1.0);
    assert!(reg.update(&state_at(500.0)).is_empty());
}

#[test]
fn pin_reserves_extent_times_multiplier_and_shifts_later_triggers() {
    let mut reg = TriggerRegistry::new();
    let mut resolver = |name: &str| match name {
        "showcase" => Some((1000.0, 800.0)),
        _ => None,
    };

    let before = reg
        .register(TriggerConfig::scrub(0.0, 500.0), &mut resolver)
        .unwrap();
    let pin = reg
        .register(TriggerConfig::pin("showcase", 2.0), &mut resolver)
        .unwrap();
    let after = reg
        .register(TriggerConfig::scrub(2000.0, 2500.0), &mut resolver)
        .unwrap();

    // 800 * 2.0 reserved.
    assert_eq!(reg.total_reserved(), 1600.0);

    // Earlier trigger untouched.
    let r = reg.effective_range(before).unwrap();
    assert_eq!((r.start, r.end), (0.0, 500.0));

    // The pin occupies [1000, 1000 + 1600].
    let r = reg.effective_range(pin).unwrap();
    assert_eq!((r.start, r.end), (1000.0, 2600.0));

    // Later trigger shifted downstream by exactly the reservation.
    let r = reg.effective_range(after).unwrap();
    assert_eq!((r.start, r.end), (3600.0, 4100.0));

    // Destroying the pin restores the original offsets.
    reg.unregister(pin).unwrap();
    let r = reg.effective_range(after).unwrap();
    assert_eq!((r.start, r.end), (2000.0, 2500.0));
}

#[test]
fn pin_progress_spans_the_pinned_phase_and_publishes_hold_offset() {
    let mut reg = TriggerRegistry::new();
    let mut resolver = |_: &str| Some((1000.0, 500.0));
    let id = reg
        .register(TriggerConfig::pin("cards", 2.0), &mut resolver)
        .unwrap();

    // Pinned phase is [1000, 2000].
    let updates = reg.update(&state_at(1500.0));
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].id, id);
    assert_eq!(updates[0].progress, 0.5);
    assert_eq!(updates[0].pin_offset, Some(500.0));

    // Past the reserved span the hold saturates at the reservation.
    let updates = reg.update(&state_at(2500.0));
    assert_eq!(updates[0].progress, 1.0);
    assert_eq!(updates[0].pin_offset, Some(1000.0));
}

#[test]
fn toggle_fires_on_boundary_crossings_only() {
    let mut reg = TriggerRegistry::new();
    reg.register(TriggerConfig::toggle(100.0, 200.0, false), &mut no_targets())
        .unwrap();

    assert!(reg.update(&state_at(0.0)).is_empty());
    let enter = reg.update(&state_at(150.0));
    assert_eq!(enter.len(), 1);
    assert_eq!(enter[0].event, Some(ToggleEvent::Enter));
    assert!(reg.update(&state_at(160.0)).is_empty());
    let leave = reg.update(&state_at(300.0));
    assert_eq!(leave[0].event, Some(ToggleEvent::Leave));
    // Re-entering fires again when not one-shot.
    let reenter = reg.update(&state_at(150.0));
    assert_eq!(reenter[0].event, Some(ToggleEvent::Enter));
}

#[test]
fn one_shot_toggle_fires_enter_exactly_once() {
    let mut reg = TriggerRegistry::new();
    reg.register(TriggerConfig::toggle(100.0, 200.0, true), &mut no_targets())
        .unwrap();

    assert_eq!(reg.update(&state_at(150.0)).len(), 1);
    assert!(reg.update(&state_at(300.0)).is_empty());
    assert!(reg.update(&state_at(150.0)).is_empty());
    assert!(reg.update(&state_at(0.0)).is_empty());
}

#[test]
fn snap_quantizes_progress_once_velocity_settles() {
    let mut reg = TriggerRegistry::new();
    let cfg = TriggerConfig {
        snap: Some(4),
        ..TriggerConfig::scrub(0.0, 100.0)
    };
    let id = reg.register(cfg, &mut no_targets()).unwrap();

    // Fast motion: raw progress passes through.
    reg.update(&state_moving(60.0, 500.0));
    assert_eq!(reg.progress(id), Some(0.6));

    // Settled: progress snaps to the nearest quarter.
    reg.update(&state_at(60.0));
    assert_eq!(reg.progress(id), Some(0.5));
}

#[test]
fn unmeasured_trigger_parks_until_layout_succeeds() {
    let mut reg = TriggerRegistry::new();
    let mut empty = |_: &str| Some((0.0, 0.0));
    let id = reg
        .register(TriggerConfig::scrub_measured("hero"), &mut empty)
        .unwrap();

    assert!(reg.measurement_error(id).is_some());
    assert!(reg.effective_range(id).is_none());
    assert!(reg.update(&state_at(50.0)).is_empty());

    let mut resolver = |_: &str| Some((0.0, 400.0));
    reg.recompute_layout(&mut resolver);
    assert!(reg.measurement_error(id).is_none());
    reg.update(&state_at(200.0));
    assert_eq!(reg.progress(id), Some(0.5));
}

#[test]
fn destroy_twice_is_a_configuration_error() {
    let mut reg = TriggerRegistry::new();
    let id = reg
        .register(TriggerConfig::scrub(0.0, 100.0), &mut no_targets())
        .unwrap();
    assert!(reg.unregister(id).is_ok());
    let err = reg.unregister(id).unwrap_err();
    assert!(matches!(err, crate::ScrollyteError::Configuration(_)));
}

#[test]
fn update_order_is_creation_order() {
    let mut reg = TriggerRegistry::new();
    let a = reg
        .register(TriggerConfig::scrub(0.0, 1000.0), &mut no_targets())
        .unwrap();
    let b = reg
        .register(TriggerConfig::scrub(0.0, 500.0), &mut no_targets())
        .unwrap();
    let updates = reg.update(&state_at(100.0));
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].id, a);
    assert_eq!(updates[1].id, b);
}
