use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DraftValue, Qty};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundsError {
    #[error("quantity bounds inverted: min {min} > max {max}")]
    Inverted { min: Qty, max: Qty },
}

/// Inclusive quantity range. `max = None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds", into = "RawBounds")]
pub struct Bounds {
    min: Qty,
    max: Option<Qty>,
}

#[derive(Serialize, Deserialize)]
struct RawBounds {
    #[serde(default)]
    min: Qty,
    #[serde(default)]
    max: Option<Qty>,
}

impl TryFrom<RawBounds> for Bounds {
    type Error = BoundsError;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        Bounds::new(raw.min, raw.max)
    }
}

impl From<Bounds> for RawBounds {
    fn from(b: Bounds) -> Self {
        RawBounds {
            min: b.min,
            max: b.max,
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Outcome of resolving a draft against the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub value: Qty,
    /// The draft held a number that had to be moved into range.
    pub corrected: bool,
}

impl Bounds {
    pub fn new(min: Qty, max: Option<Qty>) -> Result<Self, BoundsError> {
        match max {
            Some(max) if min > max => Err(BoundsError::Inverted { min, max }),
            _ => Ok(Self { min, max }),
        }
    }

    /// `[0, ∞)`
    pub fn unbounded() -> Self {
        Self { min: 0, max: None }
    }

    pub fn min(&self) -> Qty {
        self.min
    }

    pub fn max(&self) -> Option<Qty> {
        self.max
    }

    /// Narrow the ceiling to `cap` (e.g. stock on hand). The floor is lowered
    /// to the cap if needed so the range never inverts.
    pub fn capped(&self, cap: Qty) -> Self {
        let max = self.max.map_or(cap, |m| m.min(cap));
        Self {
            min: self.min.min(max),
            max: Some(max),
        }
    }

    /// Constrain any integer to `[min, max]`. Saturates at `Qty::MAX` when
    /// unbounded.
    pub fn clamp(&self, x: i64) -> Qty {
        let mut v = x.max(i64::from(self.min));
        if let Some(max) = self.max {
            v = v.min(i64::from(max));
        }
        Qty::try_from(v).unwrap_or(Qty::MAX)
    }

    pub fn contains(&self, x: i64) -> bool {
        self.clamp(x) as i64 == x
    }

    /// Blur resolution, in order:
    /// empty → min, above max → max, below min → min, else unchanged.
    pub fn resolve(&self, draft: DraftValue) -> Resolution {
        match draft {
            DraftValue::Empty => Resolution {
                value: self.min,
                corrected: false,
            },
            DraftValue::Parsed(n) => {
                let value = self.clamp(n);
                Resolution {
                    value,
                    corrected: i64::from(value) != n,
                }
            }
        }
    }

    pub fn can_decrement(&self, current: Qty) -> bool {
        current > self.min
    }

    /// With no `max` this is only false at `Qty::MAX`.
    pub fn can_increment(&self, current: Qty) -> bool {
        self.max.map_or(current < Qty::MAX, |max| current < max)
    }
}
