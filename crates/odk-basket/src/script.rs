//! Scripted basket sessions.
//!
//! A script is a list of steps, each naming a line by `code` and an `action`:
//!
//! ```yaml
//! - { code: MILK-1L, action: add }
//! - { code: MILK-1L, action: input, text: "12" }
//! - { code: MILK-1L, action: blur }
//! - { action: clear }
//! ```
//!
//! Field actions go through [`Basket::dispatch`] exactly as UI events would;
//! `set`, `upsert`, `remove` and `clear` play the role of the ancestor.

use odk_quantity::{FieldEvent, Outcome, Qty};
use serde::{Deserialize, Serialize};

use crate::{Basket, BasketError, LineItem};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Add,
    Increment,
    Decrement,
    Input { text: String },
    Blur,
    Set { quantity: Qty },
    Upsert { item: LineItem },
    Remove,
    Clear,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Increment => "increment",
            Action::Decrement => "decrement",
            Action::Input { .. } => "input",
            Action::Blur => "blur",
            Action::Set { .. } => "set",
            Action::Upsert { .. } => "upsert",
            Action::Remove => "remove",
            Action::Clear => "clear",
        }
    }

    fn field_event(&self) -> Option<FieldEvent> {
        match self {
            Action::Add => Some(FieldEvent::Add),
            Action::Increment => Some(FieldEvent::Increment),
            Action::Decrement => Some(FieldEvent::Decrement),
            Action::Input { text } => Some(FieldEvent::Input { text: text.clone() }),
            Action::Blur => Some(FieldEvent::Blur),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(flatten)]
    pub action: Action,
}

impl Step {
    pub fn new(code: impl Into<String>, action: Action) -> Self {
        Self {
            code: Some(code.into()),
            action,
        }
    }

    pub fn clear() -> Self {
        Self {
            code: None,
            action: Action::Clear,
        }
    }

    fn code(&self) -> Result<&str, BasketError> {
        self.code
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or(BasketError::MissingCode {
                action: self.action.as_str(),
            })
    }
}

impl Basket {
    /// Apply one scripted step.
    pub fn apply_step(&mut self, step: &Step) -> Result<Outcome, BasketError> {
        if let Some(event) = step.action.field_event() {
            return self.dispatch(step.code()?, &event);
        }

        match &step.action {
            Action::Set { quantity } => self.set_quantity(step.code()?, *quantity),
            Action::Upsert { item } => self.upsert(item.clone()),
            Action::Remove => self.remove(step.code()?).map(|_| Outcome::Resynced),
            Action::Clear => {
                self.clear();
                Ok(Outcome::Resynced)
            }
            _ => Ok(Outcome::Ignored),
        }
    }

    /// Apply steps in order, stopping at the first error.
    pub fn run_script(&mut self, steps: &[Step]) -> Result<usize, BasketError> {
        let mut commits = 0;
        for step in steps {
            if let Outcome::Committed(_) = self.apply_step(step)? {
                commits += 1;
            }
        }
        Ok(commits)
    }
}
