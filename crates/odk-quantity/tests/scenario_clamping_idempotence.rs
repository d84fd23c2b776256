//! Scenario: blur resolution is clamp, and clamp is idempotent
//!
//! # Invariants under test
//!
//! 1. For any typed integer `x`, committing `clamp(x)` yields the same value
//!    as committing `x`.
//! 2. Committed values always lie inside `[min, max]`.
//! 3. `corrected` is set only when the typed number was out of range.

use odk_quantity::*;

fn commit_text(bounds: Bounds, text: &str) -> Commit {
    let mut f = QuantityField::mount(FieldProps::new(bounds.min().max(1), bounds));
    assert_eq!(
        f.apply(&FieldEvent::Input {
            text: text.to_string()
        }),
        Outcome::Edited
    );
    f.apply(&FieldEvent::Blur)
        .commit()
        .expect("blur of a dirty field must commit")
}

#[test]
fn committing_a_clamped_value_is_a_noop_for_the_clamp_step() {
    let cases = [
        Bounds::new(0, Some(10)).unwrap(),
        Bounds::new(3, Some(7)).unwrap(),
        Bounds::new(5, None).unwrap(),
    ];
    let inputs = [-50i64, -1, 0, 1, 3, 7, 10, 11, 500, i64::MAX];

    for bounds in cases {
        for x in inputs {
            let direct = commit_text(bounds, &x.to_string());
            let pre_clamped = commit_text(bounds, &bounds.clamp(x).to_string());
            assert_eq!(direct.value, pre_clamped.value, "bounds={bounds:?} x={x}");
            assert!(bounds.contains(i64::from(direct.value)));
            assert!(!pre_clamped.corrected);
        }
    }
}

#[test]
fn corrected_flag_marks_out_of_range_only() {
    let bounds = Bounds::new(1, Some(10)).unwrap();
    assert!(commit_text(bounds, "12").corrected);
    assert!(commit_text(bounds, "0").corrected);
    assert!(!commit_text(bounds, "5").corrected);
    assert!(!commit_text(bounds, "").corrected);
}
