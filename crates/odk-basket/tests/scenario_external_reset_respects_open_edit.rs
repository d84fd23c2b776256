//! Scenario: ancestor-driven resets reach clean rows only
//!
//! # Invariants under test
//!
//! 1. `clear()` returns every clean row to the "Add" trigger with no commit.
//! 2. A row mid-edit keeps its draft through `clear()`; its blur then
//!    commits the typed value, which the basket applies as the new quantity.
//! 3. `set_quantity` is authoritative for clean rows even when it reverts a
//!    value the field just committed.
//! 4. An ancestor value outside the row's bounds is stored clamped, so the
//!    billed quantity always equals the displayed one.

use odk_basket::*;
use odk_quantity::{Bounds, FieldEvent, FieldView, Outcome};

fn lines() -> Vec<LineItem> {
    vec![
        LineItem::new("MILK-1L", "Whole milk 1L", 129).with_quantity(6),
        LineItem::new("EGGS-30", "Eggs x30", 549).with_quantity(1),
        LineItem::new("FLOUR-5", "Flour 5kg", 799),
    ]
}

#[test]
fn clear_returns_clean_rows_to_add_trigger() {
    let mut basket = Basket::with_items(Bounds::unbounded(), lines()).unwrap();
    assert_eq!(basket.clear(), 2);

    for row in basket.rows() {
        assert_eq!(row.quantity, 0, "{}", row.code);
        assert_eq!(row.field, FieldView::AddTrigger { enabled: true });
    }
    assert!(basket.take_changes().is_empty(), "reset must not commit");
    assert_eq!(basket.total_cents(), 0);
}

#[test]
fn open_edit_survives_clear_and_commits_on_blur() {
    let mut basket = Basket::with_items(Bounds::unbounded(), lines()).unwrap();
    basket
        .dispatch(
            "MILK-1L",
            &FieldEvent::Input {
                text: "12".to_string(),
            },
        )
        .unwrap();

    basket.clear();

    let milk = basket.field("MILK-1L").unwrap();
    assert!(milk.is_dirty());
    assert_eq!(milk.view().text(), Some("12"));

    let out = basket.dispatch("MILK-1L", &FieldEvent::Blur).unwrap();
    assert_eq!(out.commit().map(|c| c.value), Some(12));
    assert_eq!(basket.get("MILK-1L").unwrap().quantity, 12);

    let changes = basket.take_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].previous, 0, "commit lands on top of the reset");
}

#[test]
fn set_quantity_is_authoritative_when_clean() {
    let mut basket = Basket::with_items(Bounds::unbounded(), lines()).unwrap();
    basket.dispatch("EGGS-30", &FieldEvent::Increment).unwrap();
    assert_eq!(basket.get("EGGS-30").unwrap().quantity, 2);

    // Ancestor rejects the change (e.g. per-customer limit) and restores 1.
    assert_eq!(
        basket.set_quantity("EGGS-30", 1).unwrap(),
        Outcome::Resynced
    );
    assert_eq!(basket.field("EGGS-30").unwrap().current(), 1);
}

#[test]
fn out_of_range_ancestor_value_is_stored_clamped() {
    let mut basket = Basket::with_items(Bounds::new(0, Some(10)).unwrap(), lines()).unwrap();
    basket.set_quantity("FLOUR-5", 40).unwrap();

    // Billed and displayed quantities agree, and nothing was committed.
    assert_eq!(basket.get("FLOUR-5").unwrap().quantity, 10);
    assert_eq!(basket.field("FLOUR-5").unwrap().view().text(), Some("10"));
    assert_eq!(basket.rows()[2].line_total_cents, 10 * 799);
    assert!(basket.take_changes().is_empty());
}

#[test]
fn limited_stock_ancestor_value_bills_the_cap() {
    let mut basket = Basket::with_items(Bounds::new(0, Some(999)).unwrap(), lines()).unwrap();
    basket
        .upsert(
            LineItem::new("FLOUR-5", "Flour 5kg", 799)
                .with_stock(StockStatus::Limited { available: 3 }),
        )
        .unwrap();
    basket.set_quantity("FLOUR-5", 10).unwrap();

    let row = &basket.rows()[2];
    assert_eq!(row.quantity, 3);
    assert_eq!(row.field.text(), Some("3"));
    assert_eq!(row.line_total_cents, 3 * 799);
    assert_eq!(basket.total_cents(), 6 * 129 + 549 + 3 * 799);
}
