//! Rule evaluator — pure logic, one rule against one value.

use serde_json::Value;

use super::rules::{FieldError, FieldRule, FieldType};

/// Evaluate `rule` against the value found at a path (`None` when absent).
///
/// Checks run in a fixed order and the first failure wins. `None` means the
/// value passes.
pub fn validate_field(value: Option<&Value>, rule: &FieldRule) -> Option<FieldError> {
    if rule.required && is_blank(value) {
        return Some(FieldError::Empty);
    }

    match rule.field_type {
        FieldType::String => evaluate_string(value, rule),
        FieldType::Number => evaluate_number(value, rule),
        FieldType::Boolean => None,
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

fn evaluate_string(value: Option<&Value>, rule: &FieldRule) -> Option<FieldError> {
    let length = value.and_then(length_of);

    if let (Some(max), Some(len)) = (rule.max_length, length) {
        if len > max {
            return Some(FieldError::MaxLengthExceeded);
        }
    }

    if let (Some(min), Some(len)) = (rule.min_length, length) {
        if len < min {
            return Some(FieldError::MinLengthExceeded);
        }
    }

    if let (Some(pattern), Some(Value::String(s))) = (&rule.pattern, value) {
        if !pattern.is_match(s) {
            return Some(FieldError::PatternMismatch);
        }
    }

    None
}

fn evaluate_number(value: Option<&Value>, rule: &FieldRule) -> Option<FieldError> {
    let Some(number) = coerce_number(value) else {
        return Some(FieldError::NotANumber);
    };

    if rule.max.is_some_and(|max| number > max) {
        return Some(FieldError::TooLarge);
    }

    if rule.min.is_some_and(|min| number < min) {
        return Some(FieldError::TooLow);
    }

    None
}

/// Character count for strings, element count for arrays.
fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Interpret a form value as a number the way loosely typed form input is
/// usually read: blank strings are zero, booleans are 0/1, `null` is zero.
///
/// Returns `None` for anything that is not a number (including a missing
/// value).
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        Value::Array(items) => coerce_list(items),
        Value::Object(_) => None,
    }
}

/// A list reads as its joined text: empty is zero, one element is that
/// element, more than one is never numeric.
fn coerce_list(items: &[Value]) -> Option<f64> {
    match items {
        [] => Some(0.0),
        [only] => match only {
            Value::Null => Some(0.0),
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_number(s),
            Value::Array(inner) => coerce_list(inner),
            Value::Bool(_) | Value::Object(_) => None,
        },
        _ => None,
    }
}

const RADIX_PREFIXES: &[(&str, u32)] = &[
    ("0x", 16),
    ("0X", 16),
    ("0o", 8),
    ("0O", 8),
    ("0b", 2),
    ("0B", 2),
];

fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    for (prefix, radix) in RADIX_PREFIXES {
        if let Some(digits) = s.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(*radix)) {
                return None;
            }
            return u64::from_str_radix(digits, *radix).ok().map(|n| n as f64);
        }
    }

    let unsigned = s
        .strip_prefix('-')
        .or_else(|| s.strip_prefix('+'))
        .unwrap_or(s);
    if unsigned == "Infinity" {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    // f64::from_str also accepts "inf" and "nan", which form input must not.
    if !unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    s.parse::<f64>().ok()
}
