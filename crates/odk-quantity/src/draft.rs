//! In-progress text of the quantity input.
//!
//! Parsing never fails: anything that is not an optionally signed run of ASCII
//! digits becomes [`DraftValue::Empty`]. Digit runs too long for `i64`
//! saturate so that a very large typed number still clamps to `max` on blur.

use std::num::IntErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftValue {
    Parsed(i64),
    Empty,
}

/// Raw text exactly as typed, plus its parsed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    raw: String,
    value: DraftValue,
}

impl Draft {
    pub fn from_text(text: impl Into<String>) -> Self {
        let raw = text.into();
        let value = parse_draft(&raw);
        Self { raw, value }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> DraftValue {
        self.value
    }
}

pub fn parse_draft(text: &str) -> DraftValue {
    let t = text.trim();
    let digits = t.strip_prefix(['+', '-']).unwrap_or(t);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return DraftValue::Empty;
    }

    match t.parse::<i64>() {
        Ok(n) => DraftValue::Parsed(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => DraftValue::Parsed(i64::MAX),
            IntErrorKind::NegOverflow => DraftValue::Parsed(i64::MIN),
            _ => DraftValue::Empty,
        },
    }
}
