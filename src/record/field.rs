//! Reading identifying values out of a record's serialized form and comparing
//! them against requested identifiers.

use std::collections::HashSet;

use serde_json::Value;

/// Read the value at `path` from a serialized record.
///
/// Segments are separated by `.`: object keys walk into nested objects and
/// numeric segments index arrays. Anything missing reads as `null`.
pub fn field_value(record: &Value, path: &str) -> Value {
    let mut current = record;
    for segment in path.split('.') {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Value::Null,
        }
    }
    current.clone()
}

/// Type-coercing comparison between a stored value and a requested identifier.
///
/// - strings compare numerically when both sides are numeric (`"007"` equals
///   `"7"`), otherwise exactly
/// - numbers compare numerically when the identifier is numeric, otherwise
///   by their textual form
/// - `true` equals every identifier except `""` and `"0"`; `false` equals
///   only those two
/// - `null` equals `""`
/// - arrays and objects never match
pub fn loosely_equals(value: &Value, identifier: &str) -> bool {
    match value {
        Value::String(s) => match (parse_numeric(s), parse_numeric(identifier)) {
            (Some(stored), Some(wanted)) => stored.equals(&wanted),
            _ => s == identifier,
        },
        Value::Number(n) => match parse_numeric(identifier) {
            Some(wanted) => {
                let stored = match n.as_i64() {
                    Some(v) => Some(Numeric::Int(v)),
                    None => n.as_f64().map(Numeric::Float),
                };
                stored.is_some_and(|stored| stored.equals(&wanted))
            }
            None => n.to_string() == identifier,
        },
        Value::Bool(b) => *b == !(identifier.is_empty() || identifier == "0"),
        Value::Null => identifier.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Exact membership test: only string values that appear verbatim in the set match.
pub fn is_member(value: &Value, identifiers: &HashSet<String>) -> bool {
    match value {
        Value::String(s) => identifiers.contains(s),
        _ => false,
    }
}

enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    fn equals(&self, other: &Numeric) -> bool {
        match (self, other) {
            (Numeric::Int(a), Numeric::Int(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            Numeric::Int(i) => *i as f64,
            Numeric::Float(f) => *f,
        }
    }
}

fn parse_numeric(identifier: &str) -> Option<Numeric> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Numeric::Int(i));
    }
    // Rust accepts "inf"/"NaN" as floats; those are not numeric identifiers.
    if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    trimmed.parse::<f64>().ok().map(Numeric::Float)
}
