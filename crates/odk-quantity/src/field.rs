//! QuantityField state machine
//!
//! # Design
//!
//! One field per order line. Every interaction is applied via
//! [`QuantityField::apply`], a reducer over three states:
//!
//! ```text
//!                 Add (commit max(1, min))
//!    IdleZero ─────────────────────────────► Active { shown }
//!       ▲                                     │  ▲   Increment / Decrement
//!       │ commit 0 / prop 0 while clean       │  └── (commit clamp(shown ± 1))
//!       └─────────────────────────────────────┤
//!                                      Input  ▼
//!                                   Editing { draft } ──Input──► Editing
//!                                             │
//!                                       Blur  │ commit resolve(draft)
//!                                             ▼
//!                                  Active | IdleZero
//! ```
//!
//! # Invariants
//!
//! - A [`Commit`] always carries a value inside the current [`Bounds`].
//! - `Editing` never commits on its own; only `Blur` or a step button does.
//! - Props received while clean are authoritative and replace the shown
//!   value, even when they equal the previous prop. Props received while
//!   `Editing` update bounds and `disabled` but leave the draft alone.
//! - A value of 0 while clean is always `IdleZero`.

use serde::{Deserialize, Serialize};

use crate::{Bounds, Draft, Qty, ADD_QUANTITY};

/// Configuration supplied by the parent on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldProps {
    pub value: Qty,
    pub bounds: Bounds,
    pub disabled: bool,
}

impl FieldProps {
    pub fn new(value: Qty, bounds: Bounds) -> Self {
        Self {
            value,
            bounds,
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldState {
    /// Nothing ordered and no edit open. Renders the "Add" trigger only.
    IdleZero,
    /// Stepper showing a committed (or parent-supplied) value.
    Active { shown: Qty },
    /// Stepper with an uncommitted text edit.
    Editing { draft: Draft },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// "Add" trigger activated.
    Add,
    /// "+" button pressed.
    Increment,
    /// "−" button pressed.
    Decrement,
    /// The input's text changed (one keystroke, paste, or clear).
    Input { text: String },
    /// The input lost focus.
    Blur,
    /// The parent re-rendered with new props.
    Props(FieldProps),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitSource {
    Add,
    Step,
    Blur,
}

impl CommitSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitSource::Add => "add",
            CommitSource::Step => "step",
            CommitSource::Blur => "blur",
        }
    }
}

/// A finalized quantity handed to the parent's `on_change`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub value: Qty,
    pub source: CommitSource,
    /// Blur moved a typed number into range (e.g. typed 12 with max 10).
    pub corrected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A value was committed; the parent must be notified.
    Committed(Commit),
    /// The draft changed. No notification.
    Edited,
    /// Clean field adopted the parent's props.
    Resynced,
    /// Props arrived mid-edit; the parent value is held until the edit commits.
    Held,
    /// The event has no effect in the current state (disabled, at a bound,
    /// or targets an affordance that is not rendered).
    Ignored,
}

impl Outcome {
    pub fn commit(&self) -> Option<Commit> {
        match self {
            Outcome::Committed(c) => Some(*c),
            _ => None,
        }
    }
}

/// Local edit state for one order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityField {
    props: FieldProps,
    state: FieldState,
}

impl QuantityField {
    /// Mount a field for a row. The initial value is taken from the props.
    pub fn mount(props: FieldProps) -> Self {
        Self {
            props,
            state: settled_state(&props),
        }
    }

    pub fn props(&self) -> &FieldProps {
        &self.props
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn bounds(&self) -> Bounds {
        self.props.bounds
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self.state, FieldState::Editing { .. })
    }

    /// The value the field currently stands for. While editing this is the
    /// draft as blur would resolve it.
    pub fn current(&self) -> Qty {
        match &self.state {
            FieldState::IdleZero => 0,
            FieldState::Active { shown } => *shown,
            FieldState::Editing { draft } => self.props.bounds.resolve(draft.value()).value,
        }
    }

    /// Quantity the "Add" trigger would commit.
    pub fn add_quantity(&self) -> Qty {
        self.props.bounds.clamp(i64::from(ADD_QUANTITY))
    }

    /// Apply one event.
    pub fn apply(&mut self, event: &FieldEvent) -> Outcome {
        match event {
            FieldEvent::Props(props) => self.receive(*props),
            // A draft opened before the field was disabled still resolves.
            FieldEvent::Blur => self.blur(),
            _ if self.props.disabled => Outcome::Ignored,
            FieldEvent::Add => self.add(),
            FieldEvent::Increment => self.step(1),
            FieldEvent::Decrement => self.step(-1),
            FieldEvent::Input { text } => self.input(text),
        }
    }

    /// Callback form: `on_change` runs exactly once per committed value.
    pub fn dispatch<F>(&mut self, event: &FieldEvent, mut on_change: F) -> Outcome
    where
        F: FnMut(Qty),
    {
        let outcome = self.apply(event);
        if let Outcome::Committed(c) = &outcome {
            on_change(c.value);
        }
        outcome
    }

    fn receive(&mut self, props: FieldProps) -> Outcome {
        self.props = props;
        if self.is_dirty() {
            tracing::debug!(held = props.value, "props held behind open edit");
            return Outcome::Held;
        }

        let next = settled_state(&props);
        if let FieldState::Active { shown } = next {
            if shown != props.value {
                tracing::debug!(
                    received = props.value,
                    shown,
                    "parent value outside bounds; displaying clamped"
                );
            }
        }
        self.state = next;
        Outcome::Resynced
    }

    fn add(&mut self) -> Outcome {
        if self.state != FieldState::IdleZero {
            return Outcome::Ignored;
        }
        let qty = self.add_quantity();
        if qty == 0 {
            return Outcome::Ignored;
        }
        self.commit(qty, CommitSource::Add, false)
    }

    fn step(&mut self, delta: i64) -> Outcome {
        let bounds = self.props.bounds;
        // While editing, the step applies to the draft as blur would resolve
        // it, and a committed step ends the edit.
        let (from, corrected) = match &self.state {
            FieldState::IdleZero => return Outcome::Ignored,
            FieldState::Active { shown } => (*shown, false),
            FieldState::Editing { draft } => {
                let resolved = bounds.resolve(draft.value());
                (resolved.value, resolved.corrected)
            }
        };

        let allowed = if delta > 0 {
            bounds.can_increment(from)
        } else {
            bounds.can_decrement(from)
        };
        // Same rule the view uses to disable the button. An open draft stays
        // open and still resolves on blur.
        if !allowed {
            return Outcome::Ignored;
        }
        let next = bounds.clamp(i64::from(from) + delta);
        self.commit(next, CommitSource::Step, corrected)
    }

    fn input(&mut self, text: &str) -> Outcome {
        if self.state == FieldState::IdleZero {
            return Outcome::Ignored;
        }
        self.state = FieldState::Editing {
            draft: Draft::from_text(text),
        };
        Outcome::Edited
    }

    fn blur(&mut self) -> Outcome {
        let FieldState::Editing { draft } = &self.state else {
            return Outcome::Ignored;
        };
        let resolved = self.props.bounds.resolve(draft.value());
        self.commit(resolved.value, CommitSource::Blur, resolved.corrected)
    }

    fn commit(&mut self, value: Qty, source: CommitSource, corrected: bool) -> Outcome {
        debug_assert!(self.props.bounds.contains(i64::from(value)));
        self.state = if value == 0 {
            FieldState::IdleZero
        } else {
            FieldState::Active { shown: value }
        };
        tracing::debug!(value, source = source.as_str(), corrected, "quantity committed");
        Outcome::Committed(Commit {
            value,
            source,
            corrected,
        })
    }
}

/// Clean state for a set of props. 0 means "not ordered"; any other value is
/// clamped on receipt so an out-of-range parent value is never displayed.
fn settled_state(props: &FieldProps) -> FieldState {
    if props.value == 0 {
        return FieldState::IdleZero;
    }
    match props.bounds.clamp(i64::from(props.value)) {
        0 => FieldState::IdleZero,
        shown => FieldState::Active { shown },
    }
}
