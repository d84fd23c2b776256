//! odk-quantity
//!
//! Quantity entry for a single order line.
//!
//! - Explicit state machine: `IdleZero`, `Active`, `Editing`
//! - Every value handed to the parent is clamped to `[min, max]`
//! - No commit while a text edit is in progress; blur resolves the draft
//! - The parent's value is authoritative whenever no edit is open
//!
//! Pure deterministic logic. No IO, no clock, no rendering backend. A UI layer
//! translates DOM/terminal events into [`FieldEvent`]s and paints [`FieldView`].

mod bounds;
mod draft;
mod field;
mod view;

pub use bounds::{Bounds, BoundsError, Resolution};
pub use draft::{parse_draft, Draft, DraftValue};
pub use field::{
    Commit, CommitSource, FieldEvent, FieldProps, FieldState, Outcome, QuantityField,
};
pub use view::FieldView;

/// Committed quantity. Non-negative by construction.
///
/// An "unbounded" range is still capped by the type: increment is disabled
/// at `Qty::MAX` (4_294_967_295) and larger typed values clamp to it.
pub type Qty = u32;

/// Quantity committed by the "Add" trigger before clamping.
pub const ADD_QUANTITY: Qty = 1;
