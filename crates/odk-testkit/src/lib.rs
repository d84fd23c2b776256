//! odk-testkit
//!
//! Test support for order-entry scenarios.
//!
//! - [`FieldHarness`]: a field mounted under a minimal parent that owns the
//!   value and records every `on_change` call
//! - [`fixtures`]: line items and configs injected explicitly into tests
//! - [`load_lines`] / [`load_script`]: YAML or JSON documents from disk

use anyhow::Result;
use odk_basket::{LineItem, Step};
use odk_quantity::{Bounds, FieldEvent, FieldProps, FieldView, Outcome, QuantityField, Qty};
use std::path::Path;

pub mod fixtures;

/// A parent component holding the authoritative value for one field.
///
/// With `echo` on (the default) the parent adopts every committed value and
/// re-renders the field with it, as a controlled component would. With echo
/// off the parent records calls but never re-renders, which models a parent
/// that ignores or defers updates.
pub struct FieldHarness {
    value: Qty,
    bounds: Bounds,
    disabled: bool,
    echo: bool,
    field: QuantityField,
    calls: Vec<Qty>,
}

impl FieldHarness {
    pub fn mount(value: Qty, bounds: Bounds) -> Self {
        Self {
            value,
            bounds,
            disabled: false,
            echo: true,
            field: QuantityField::mount(FieldProps::new(value, bounds)),
            calls: Vec::new(),
        }
    }

    pub fn without_echo(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn click_add(&mut self) -> Outcome {
        self.fire(FieldEvent::Add)
    }

    pub fn click_increment(&mut self) -> Outcome {
        self.fire(FieldEvent::Increment)
    }

    pub fn click_decrement(&mut self) -> Outcome {
        self.fire(FieldEvent::Decrement)
    }

    /// Replace the input's text, as a select-all + type would.
    pub fn type_text(&mut self, text: &str) -> Outcome {
        self.fire(FieldEvent::Input {
            text: text.to_string(),
        })
    }

    /// Type `text` one character at a time, starting from an empty field.
    pub fn type_keys(&mut self, text: &str) -> Vec<Outcome> {
        let mut typed = String::new();
        let mut outcomes = vec![self.type_text("")];
        for ch in text.chars() {
            typed.push(ch);
            outcomes.push(self.type_text(&typed));
        }
        outcomes
    }

    pub fn blur(&mut self) -> Outcome {
        self.fire(FieldEvent::Blur)
    }

    /// The parent changes its value (e.g. "clear basket").
    pub fn parent_sets(&mut self, value: Qty) -> Outcome {
        self.value = value;
        self.render()
    }

    pub fn parent_disables(&mut self, disabled: bool) -> Outcome {
        self.disabled = disabled;
        self.render()
    }

    pub fn parent_bounds(&mut self, bounds: Bounds) -> Outcome {
        self.bounds = bounds;
        self.render()
    }

    pub fn view(&self) -> FieldView {
        self.field.view()
    }

    pub fn field(&self) -> &QuantityField {
        &self.field
    }

    /// Every value passed to `on_change`, oldest first.
    pub fn calls(&self) -> &[Qty] {
        &self.calls
    }

    pub fn parent_value(&self) -> Qty {
        self.value
    }

    fn fire(&mut self, event: FieldEvent) -> Outcome {
        let calls = &mut self.calls;
        let mut committed = None;
        let outcome = self.field.dispatch(&event, |v| {
            calls.push(v);
            committed = Some(v);
        });
        if let (Some(v), true) = (committed, self.echo) {
            self.value = v;
            self.render();
        }
        outcome
    }

    fn render(&mut self) -> Outcome {
        let props = FieldProps::new(self.value, self.bounds).disabled(self.disabled);
        self.field.apply(&FieldEvent::Props(props))
    }
}

/// Load line items from a YAML (or JSON) list.
pub fn load_lines(path: impl AsRef<Path>) -> Result<Vec<LineItem>> {
    odk_config::load_document(path, "lines")
}

/// Load a session script from a YAML (or JSON) list of steps.
pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<Step>> {
    odk_config::load_document(path, "script")
}
