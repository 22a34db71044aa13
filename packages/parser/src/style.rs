//! Inline `style` strings and CSS value helpers.

use serde_json::Value;

/// Declarations of an inline `style` attribute, in source order.
///
/// Property names are lowercased; a repeated property keeps its last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleDeclarations {
    declarations: Vec<(String, String)>,
}

impl StyleDeclarations {
    /// Tolerant parse of `prop: value; prop: value`. Fragments without a
    /// colon are skipped.
    pub fn parse(style: &str) -> Self {
        let mut out = Self::default();
        for fragment in style.split(';') {
            let Some((property, value)) = fragment.split_once(':') else {
                continue;
            };
            let property = property.trim().to_ascii_lowercase();
            let value = strip_quotes(value.trim());
            if property.is_empty() {
                continue;
            }
            out.set(&property, &value);
        }
        out
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn set(&mut self, property: &str, value: &str) {
        match self.declarations.iter_mut().find(|(name, _)| name == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => self
                .declarations
                .push((property.to_string(), value.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Remove `'` and `"` characters, as the editor does for style values.
pub fn strip_quotes(value: &str) -> String {
    value.chars().filter(|c| *c != '"' && *c != '\'').collect()
}

/// Parse a CSS length or plain number, dropping a unit suffix
/// (`"12px"` → 12, `"33%"` → 33). Returns `None` when nothing numeric is left.
pub fn parse_number(value: &str) -> Option<f64> {
    let cleaned = strip_quotes(value);
    let trimmed = cleaned
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
        .trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Shortest decimal form: `50.0` → `"50"`, `33.33` → `"33.33"`.
pub fn format_number(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// JSON number for `value`, integral values stored as integers so that
/// parsed and constructed attributes compare equal.
pub fn number_value(value: f64) -> Value {
    if value == value.trunc() && value.abs() < 1e15 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
