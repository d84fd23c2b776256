//! Scenario: step buttons disable exactly at the bounds
//!
//! # Invariants under test
//!
//! 1. Decrement is enabled iff the current value is above `min`.
//! 2. Increment is enabled iff `max` is unbounded or the value is below `max`.
//! 3. A press on a disabled button is `Ignored` and commits nothing.
//! 4. Rules 1-3 hold while a draft is open, judged on the draft as blur would
//!    resolve it; an ignored press leaves the draft open.
//!
//! All tests are pure in-process.

use odk_quantity::*;

fn stepper_flags(view: &FieldView) -> (bool, bool) {
    match view {
        FieldView::Stepper {
            decrement_enabled,
            increment_enabled,
            ..
        } => (*decrement_enabled, *increment_enabled),
        FieldView::AddTrigger { .. } => panic!("expected stepper, got {view:?}"),
    }
}

#[test]
fn flags_match_bounds_for_every_value_in_range() {
    let bounds = Bounds::new(2, Some(6)).unwrap();
    for value in 2..=6u32 {
        let f = QuantityField::mount(FieldProps::new(value, bounds));
        let (dec, inc) = stepper_flags(&f.view());
        assert_eq!(dec, value > 2, "decrement flag at {value}");
        assert_eq!(inc, value < 6, "increment flag at {value}");
    }
}

#[test]
fn disabled_buttons_do_not_commit() {
    let bounds = Bounds::new(1, Some(1)).unwrap();
    let mut f = QuantityField::mount(FieldProps::new(1, bounds));
    assert_eq!(stepper_flags(&f.view()), (false, false));

    let mut calls = 0;
    for ev in [FieldEvent::Increment, FieldEvent::Decrement] {
        assert_eq!(f.dispatch(&ev, |_| calls += 1), Outcome::Ignored);
    }
    assert_eq!(calls, 0);
}

#[test]
fn unbounded_increment_never_disabled_by_value() {
    let bounds = Bounds::unbounded();
    for value in [1u32, 10, 999, 1_000_000] {
        let f = QuantityField::mount(FieldProps::new(value, bounds));
        let (_, inc) = stepper_flags(&f.view());
        assert!(inc, "increment must stay enabled at {value}");
    }
}

#[test]
fn walking_to_the_ceiling_stops_there() {
    let bounds = Bounds::new(0, Some(3)).unwrap();
    let mut f = QuantityField::mount(FieldProps::new(1, bounds));
    let mut seen = Vec::new();
    for _ in 0..5 {
        f.dispatch(&FieldEvent::Increment, |v| seen.push(v));
    }
    assert_eq!(seen, vec![2, 3]);
    assert_eq!(stepper_flags(&f.view()), (true, false));
}

#[test]
fn open_draft_buttons_match_their_flags() {
    let bounds = Bounds::new(2, Some(10)).unwrap();
    for text in ["", "0", "1", "2", "5", "10", "11", "40", "-3", "junk"] {
        for (ev, dec_side) in [(FieldEvent::Decrement, true), (FieldEvent::Increment, false)] {
            let mut f = QuantityField::mount(FieldProps::new(5, bounds));
            f.apply(&FieldEvent::Input {
                text: text.to_string(),
            });
            let (dec, inc) = stepper_flags(&f.view());
            let enabled = if dec_side { dec } else { inc };

            let mut calls = Vec::new();
            let out = f.dispatch(&ev, |v| calls.push(v));
            assert_eq!(
                matches!(out, Outcome::Committed(_)),
                enabled,
                "draft {text:?} {ev:?}"
            );
            assert_eq!(calls.len(), usize::from(enabled), "draft {text:?} {ev:?}");
            assert_eq!(f.is_dirty(), !enabled, "draft {text:?} {ev:?}");
        }
    }
}
