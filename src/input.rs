//! Text-field handling for numeric macro inputs.
//!
//! Fields keep the string the user typed. A keystroke is accepted only if
//! the whole value still looks like an unsigned decimal; values are parsed
//! when they are committed.

use lazy_static::lazy_static;
use regex::Regex;

use crate::nutrition::{Macro, Macros};

pub(crate) fn is_decimal_input(raw: &str) -> bool {
    lazy_static! {
        static ref DECIMAL_RE: Regex = Regex::new(r"^[0-9]*\.?[0-9]*$").unwrap();
    }
    DECIMAL_RE.is_match(raw)
}

/// Parse a field for commit. Empty or unparseable input counts as 0.
pub fn parse_decimal(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Seed string for a field. Whole numbers print without a fraction.
pub fn format_value(value: f64) -> String {
    format!("{value}")
}

/// Display strings for the five macro fields of one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDraft {
    fields: [String; 5],
}

impl MacroDraft {
    pub fn from_macros(values: &Macros) -> Self {
        Self {
            fields: Macro::ALL.map(|m| format_value(values.get(m))),
        }
    }

    pub fn get(&self, m: Macro) -> &str {
        &self.fields[m.index()]
    }

    /// Apply a keystroke. Returns `false` and leaves the field untouched when
    /// `raw` is not an unsigned decimal.
    pub fn set(&mut self, m: Macro, raw: &str) -> bool {
        if !is_decimal_input(raw) {
            return false;
        }
        self.fields[m.index()] = raw.to_string();
        true
    }

    pub fn to_macros(&self) -> Macros {
        let mut out = Macros::default();
        for m in Macro::ALL {
            out.set(m, parse_decimal(self.get(m)));
        }
        out
    }
}

impl Default for MacroDraft {
    fn default() -> Self {
        Self::from_macros(&Macros::default())
    }
}
