//! What the UI layer should paint for a field.

use crate::{FieldState, QuantityField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldView {
    /// Single "Add" affordance.
    AddTrigger { enabled: bool },
    /// Decrement button, numeric input, increment button.
    Stepper {
        decrement_enabled: bool,
        text: String,
        increment_enabled: bool,
        editable: bool,
    },
}

impl FieldView {
    pub fn is_add_trigger(&self) -> bool {
        matches!(self, FieldView::AddTrigger { .. })
    }

    /// Number of interactive controls rendered (1 or 3).
    pub fn affordance_count(&self) -> usize {
        match self {
            FieldView::AddTrigger { .. } => 1,
            FieldView::Stepper { .. } => 3,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            FieldView::AddTrigger { .. } => None,
            FieldView::Stepper { text, .. } => Some(text),
        }
    }
}

impl QuantityField {
    pub fn view(&self) -> FieldView {
        let props = self.props();
        let enabled = !props.disabled;

        if let FieldState::IdleZero = self.state() {
            return FieldView::AddTrigger {
                enabled: enabled && self.add_quantity() > 0,
            };
        }

        // While editing, the buttons track the draft as blur would resolve it.
        let current = self.current();
        let text = match self.state() {
            FieldState::Editing { draft } => draft.raw().to_string(),
            _ => current.to_string(),
        };

        FieldView::Stepper {
            decrement_enabled: enabled && props.bounds.can_decrement(current),
            text,
            increment_enabled: enabled && props.bounds.can_increment(current),
            editable: enabled,
        }
    }
}
