//! odk-basket
//!
//! Order list that owns the authoritative quantity of every line.
//!
//! - Lines are keyed by product code; each row keeps one [`QuantityField`]
//! - The basket is the single writer of quantities: fields only propose
//!   values through commits, the basket applies them and echoes them back
//! - Clear/remove/external updates flow to fields as props, never as commits
//! - Every applied commit is recorded as a [`ChangeRecord`]
//!
//! Pure deterministic logic. No IO.
//!
//! [`QuantityField`]: odk_quantity::QuantityField

mod basket;
mod script;
mod types;

pub use basket::{Basket, RowView};
pub use script::{Action, Step};
pub use types::{BasketError, ChangeRecord, LineItem, StockStatus};
