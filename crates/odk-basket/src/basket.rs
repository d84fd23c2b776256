//! Basket: keyed line items with one quantity field per row.
//!
//! # Single writer
//!
//! `LineItem::quantity` is written in exactly three places: an applied
//! commit in [`Basket::dispatch`], [`Basket::set_quantity`] (an ancestor
//! changing the value, e.g. a server sync), and [`Basket::clear`]. Stored
//! values are always 0 or inside the row's bounds. After every write the
//! row's field receives fresh props, so a clean field always shows the
//! authoritative value and a dirty one holds it until blur.
//!
//! # Usage
//! ```ignore
//! let mut basket = Basket::with_items(Bounds::unbounded(), lines)?;
//! basket.dispatch("SKU-1", &FieldEvent::Add)?;
//! assert_eq!(basket.get("SKU-1").unwrap().quantity, 1);
//! ```

use std::collections::BTreeMap;

use odk_quantity::{Bounds, FieldEvent, FieldProps, FieldView, Outcome, QuantityField, Qty};

use crate::types::{BasketError, ChangeRecord, LineItem};

/// Render model for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub code: String,
    pub name: String,
    pub quantity: Qty,
    pub line_total_cents: i64,
    pub field: FieldView,
}

#[derive(Debug, Clone)]
pub struct Basket {
    defaults: Bounds,
    /// Display order.
    lines: Vec<LineItem>,
    fields: BTreeMap<String, QuantityField>,
    changes: Vec<ChangeRecord>,
}

impl Basket {
    pub fn new(defaults: Bounds) -> Self {
        Self {
            defaults,
            lines: Vec::new(),
            fields: BTreeMap::new(),
            changes: Vec::new(),
        }
    }

    /// Build a basket from injected fixture lines. Codes must be unique.
    pub fn with_items<I>(defaults: Bounds, items: I) -> Result<Self, BasketError>
    where
        I: IntoIterator<Item = LineItem>,
    {
        let mut basket = Self::new(defaults);
        for item in items {
            if basket.fields.contains_key(&item.code) {
                return Err(BasketError::DuplicateCode { code: item.code });
            }
            basket.upsert(item)?;
        }
        Ok(basket)
    }

    pub fn defaults(&self) -> Bounds {
        self.defaults
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn get(&self, code: &str) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.code == code)
    }

    pub fn field(&self, code: &str) -> Option<&QuantityField> {
        self.fields.get(code)
    }

    /// Lines with a non-zero quantity, in display order.
    pub fn ordered_lines(&self) -> impl Iterator<Item = &LineItem> {
        self.lines.iter().filter(|l| l.quantity > 0)
    }

    pub fn total_cents(&self) -> i64 {
        self.lines
            .iter()
            .map(LineItem::line_total_cents)
            .fold(0i64, i64::saturating_add)
    }

    /// Insert a new line or replace an existing one with the same code.
    ///
    /// An existing row keeps its field (stable key); the field receives the
    /// new line's props like any other parent re-render.
    pub fn upsert(&mut self, mut item: LineItem) -> Result<Outcome, BasketError> {
        item.validate()?;
        item.quantity = self.in_bounds(&item, item.quantity);
        let props = self.props_for(&item);

        match self.position(&item.code) {
            Some(idx) => {
                let field = self
                    .fields
                    .get_mut(&item.code)
                    .ok_or_else(|| BasketError::UnknownLine {
                        code: item.code.clone(),
                    })?;
                let outcome = field.apply(&FieldEvent::Props(props));
                self.lines[idx] = item;
                Ok(outcome)
            }
            None => {
                tracing::debug!(code = %item.code, quantity = item.quantity, "line mounted");
                self.fields
                    .insert(item.code.clone(), QuantityField::mount(props));
                self.lines.push(item);
                Ok(Outcome::Resynced)
            }
        }
    }

    /// Unmount a row. Its edit state is discarded.
    pub fn remove(&mut self, code: &str) -> Result<LineItem, BasketError> {
        let idx = self.position(code).ok_or_else(|| unknown(code))?;
        self.fields.remove(code);
        tracing::debug!(code, "line removed");
        Ok(self.lines.remove(idx))
    }

    /// Reset every quantity to 0. Clean fields fall back to "Add"; fields
    /// mid-edit hold the reset until they blur. Returns how many lines had a
    /// quantity.
    pub fn clear(&mut self) -> usize {
        let mut cleared = 0;
        for idx in 0..self.lines.len() {
            if self.lines[idx].quantity > 0 {
                cleared += 1;
            }
            self.lines[idx].quantity = 0;
            self.push_props(idx);
        }
        tracing::debug!(cleared, "basket cleared");
        cleared
    }

    /// Ancestor-driven quantity change. A non-zero value outside the row's
    /// bounds is stored clamped, so the line bills what the field shows.
    pub fn set_quantity(&mut self, code: &str, quantity: Qty) -> Result<Outcome, BasketError> {
        let idx = self.position(code).ok_or_else(|| unknown(code))?;
        let stored = self.in_bounds(&self.lines[idx], quantity);
        self.lines[idx].quantity = stored;
        Ok(self.push_props(idx))
    }

    /// Route a user event to a row's field. A resulting commit is applied to
    /// the line and echoed back to the field.
    pub fn dispatch(&mut self, code: &str, event: &FieldEvent) -> Result<Outcome, BasketError> {
        if matches!(event, FieldEvent::Props(_)) {
            return Err(BasketError::ParentOwnedProps {
                code: code.to_string(),
            });
        }

        let idx = self.position(code).ok_or_else(|| unknown(code))?;
        let field = self.fields.get_mut(code).ok_or_else(|| unknown(code))?;
        let outcome = field.apply(event);

        if let Outcome::Committed(commit) = &outcome {
            let line = &mut self.lines[idx];
            let previous = line.quantity;
            line.quantity = commit.value;
            tracing::debug!(
                code,
                previous,
                value = commit.value,
                source = commit.source.as_str(),
                "line quantity updated"
            );
            self.changes.push(ChangeRecord {
                code: code.to_string(),
                previous,
                value: commit.value,
                source: commit.source,
                corrected: commit.corrected,
            });
            self.push_props(idx);
        }

        Ok(outcome)
    }

    /// Changes applied since the last call, oldest first.
    pub fn take_changes(&mut self) -> Vec<ChangeRecord> {
        std::mem::take(&mut self.changes)
    }

    pub fn rows(&self) -> Vec<RowView> {
        self.lines
            .iter()
            .filter_map(|line| {
                let field = self.fields.get(&line.code)?;
                Some(RowView {
                    code: line.code.clone(),
                    name: line.name.clone(),
                    quantity: line.quantity,
                    line_total_cents: line.line_total_cents(),
                    field: field.view(),
                })
            })
            .collect()
    }

    fn position(&self, code: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.code == code)
    }

    /// 0 stays "not ordered"; anything else is clamped to the row bounds.
    fn in_bounds(&self, line: &LineItem, requested: Qty) -> Qty {
        if requested == 0 {
            return 0;
        }
        let stored = line.bounds(self.defaults).clamp(i64::from(requested));
        if stored != requested {
            tracing::debug!(code = %line.code, requested, stored, "quantity clamped to row bounds");
        }
        stored
    }

    fn props_for(&self, line: &LineItem) -> FieldProps {
        FieldProps::new(line.quantity, line.bounds(self.defaults)).disabled(!line.is_orderable())
    }

    fn push_props(&mut self, idx: usize) -> Outcome {
        let line = &self.lines[idx];
        let props = self.props_for(line);
        match self.fields.get_mut(&line.code) {
            Some(field) => field.apply(&FieldEvent::Props(props)),
            None => Outcome::Ignored,
        }
    }
}

fn unknown(code: &str) -> BasketError {
    BasketError::UnknownLine {
        code: code.to_string(),
    }
}
