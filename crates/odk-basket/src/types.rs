use odk_quantity::{Bounds, CommitSource, Qty};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Availability of a product, as far as quantity entry is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    InStock,
    /// At most `available` units can be ordered.
    Limited { available: Qty },
    /// Row is shown but quantity entry is disabled.
    OutOfStock,
}

/// One orderable product row.
///
/// `quantity` is the authoritative value; only [`crate::Basket`] writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub unit_price_cents: i64,
    #[serde(default)]
    pub quantity: Qty,
    #[serde(default)]
    pub stock: StockStatus,
}

impl LineItem {
    pub fn new(code: impl Into<String>, name: impl Into<String>, unit_price_cents: i64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            unit_price_cents,
            quantity: 0,
            stock: StockStatus::InStock,
        }
    }

    pub fn with_quantity(mut self, quantity: Qty) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_stock(mut self, stock: StockStatus) -> Self {
        self.stock = stock;
        self
    }

    /// Row bounds: basket defaults narrowed by stock on hand.
    pub fn bounds(&self, defaults: Bounds) -> Bounds {
        match self.stock {
            StockStatus::Limited { available } => defaults.capped(available),
            StockStatus::InStock | StockStatus::OutOfStock => defaults,
        }
    }

    pub fn is_orderable(&self) -> bool {
        !matches!(self.stock, StockStatus::OutOfStock)
    }

    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents.saturating_mul(i64::from(self.quantity))
    }

    pub(crate) fn validate(&self) -> Result<(), BasketError> {
        if self.code.trim().is_empty() {
            return Err(BasketError::EmptyCode);
        }
        if self.unit_price_cents < 0 {
            return Err(BasketError::NegativePrice {
                code: self.code.clone(),
                unit_price_cents: self.unit_price_cents,
            });
        }
        Ok(())
    }
}

/// One quantity change applied by the basket in response to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub code: String,
    pub previous: Qty,
    pub value: Qty,
    pub source: CommitSource,
    pub corrected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BasketError {
    #[error("unknown line: {code}")]
    UnknownLine { code: String },
    #[error("duplicate line code: {code}")]
    DuplicateCode { code: String },
    #[error("line code must be non-empty")]
    EmptyCode,
    #[error("step '{action}' requires a line code")]
    MissingCode { action: &'static str },
    #[error("line {code}: unit price must be >= 0, got {unit_price_cents}")]
    NegativePrice { code: String, unit_price_cents: i64 },
    /// Props are derived from the basket's own state; callers cannot inject them.
    #[error("line {code}: props are owned by the basket")]
    ParentOwnedProps { code: String },
}
