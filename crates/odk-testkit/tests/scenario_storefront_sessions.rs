//! Scenario: storefront quantity sessions, end to end through a parent
//!
//! # Invariants under test
//!
//! 1. "Add" from idle fires `on_change(1)` once and switches to the stepper.
//! 2. Rapid step presses each fire a distinct `on_change`, in order.
//! 3. A typed value above `max` is clamped and fired once, on blur.
//! 4. Clearing the input and blurring fires `on_change(min)`; at 0 the field
//!    returns to the "Add" trigger.
//! 5. A parent reset while clean re-renders without any `on_change`.
//!
//! All tests are pure in-process.

use odk_quantity::{Bounds, FieldView};
use odk_testkit::FieldHarness;

fn storefront() -> Bounds {
    Bounds::new(0, Some(999)).unwrap()
}

#[test]
fn add_from_idle_fires_once_and_shows_stepper() {
    let mut h = FieldHarness::mount(0, storefront());
    assert!(h.view().is_add_trigger());
    assert_eq!(h.view().affordance_count(), 1);

    h.click_add();

    assert_eq!(h.calls(), &[1]);
    assert_eq!(h.view().text(), Some("1"));
    assert_eq!(h.view().affordance_count(), 3);
}

#[test]
fn rapid_decrements_fire_distinct_calls() {
    let mut h = FieldHarness::mount(5, storefront());

    h.click_decrement();
    h.click_decrement();
    h.click_decrement();

    assert_eq!(h.calls(), &[4, 3, 2]);
    assert_eq!(h.view().text(), Some("2"));
    assert_eq!(h.parent_value(), 2);
}

#[test]
fn rapid_decrements_without_parent_echo_still_step_locally() {
    let mut h = FieldHarness::mount(5, storefront()).without_echo();

    h.click_decrement();
    h.click_decrement();
    h.click_decrement();

    assert_eq!(h.calls(), &[4, 3, 2]);
    assert_eq!(h.view().text(), Some("2"));
    assert_eq!(h.parent_value(), 5);
}

#[test]
fn typed_value_above_max_clamps_on_blur() {
    let mut h = FieldHarness::mount(3, Bounds::new(0, Some(10)).unwrap());

    h.type_text("12");
    assert!(h.calls().is_empty());

    let c = h.blur().commit().expect("blur commits");
    assert_eq!(c.value, 10);
    assert!(c.corrected);
    assert_eq!(h.calls(), &[10]);
    assert_eq!(h.view().text(), Some("10"));
}

#[test]
fn cleared_input_blurs_to_idle() {
    let mut h = FieldHarness::mount(4, storefront());

    h.type_text("");
    // Still a stepper while the empty draft is open.
    assert_eq!(h.view().affordance_count(), 3);
    assert_eq!(h.view().text(), Some(""));

    h.blur();

    assert_eq!(h.calls(), &[0]);
    assert_eq!(h.view(), FieldView::AddTrigger { enabled: true });
}

#[test]
fn parent_reset_while_clean_is_silent() {
    let mut h = FieldHarness::mount(7, storefront());

    h.parent_sets(0);

    assert!(h.calls().is_empty());
    assert!(h.view().is_add_trigger());
}
