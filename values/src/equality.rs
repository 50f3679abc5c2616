//! Value equality (`==`) across the host value model.

use crate::{Class, HostError, Value};

/// Nesting depth at which comparison gives up, e.g. on two distinct cyclic values.
const MAX_COMPARE_DEPTH: usize = 256;

impl Value {
    /// `self == other`.
    ///
    /// Identical references are always equal. Numbers compare across `bool`,
    /// `int`, `float` and `complex`; byte buffers compare by content regardless
    /// of their concrete type; lists never equal tuples. Host objects decide
    /// for themselves and may fail.
    pub fn try_eq(&self, other: &Value) -> Result<bool, HostError> {
        eq_at(self, other, 0)
    }
}

#[derive(Clone, Copy)]
enum Numeric {
    Int(i64),
    Float(f64),
    Complex(f64, f64),
}

fn numeric(value: &Value) -> Option<Numeric> {
    match value {
        Value::Bool(b) => Some(Numeric::Int(i64::from(*b))),
        Value::Int(n) => Some(Numeric::Int(*n)),
        Value::Float(x) => Some(Numeric::Float(*x)),
        Value::Complex(c) => Some(Numeric::Complex(c.re, c.im)),
        _ => None,
    }
}

fn numeric_eq(a: Numeric, b: Numeric) -> bool {
    match (a, b) {
        (Numeric::Int(a), Numeric::Int(b)) => a == b,
        (Numeric::Int(n), Numeric::Float(x)) | (Numeric::Float(x), Numeric::Int(n)) => {
            int_float_eq(n, x)
        }
        (Numeric::Float(a), Numeric::Float(b)) => a == b,
        (Numeric::Complex(re, im), other) | (other, Numeric::Complex(re, im)) => match other {
            Numeric::Complex(re2, im2) => re == re2 && im == im2,
            Numeric::Int(n) => im == 0.0 && int_float_eq(n, re),
            Numeric::Float(x) => im == 0.0 && re == x,
        },
    }
}

/// Exact comparison without rounding the integer through `f64`.
fn int_float_eq(n: i64, x: f64) -> bool {
    if !x.is_finite() || x.fract() != 0.0 {
        return false;
    }
    // i64 spans [-2^63, 2^63).
    if !(-9.223_372_036_854_776e18..9.223_372_036_854_776e18).contains(&x) {
        return false;
    }
    x as i64 == n
}

fn byte_content(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::Bytes(b) | Value::MemoryView(b) => Some(b.to_vec()),
        Value::ByteArray(b) => Some(b.borrow().clone()),
        _ => None,
    }
}

fn eq_at(a: &Value, b: &Value, depth: usize) -> Result<bool, HostError> {
    if depth > MAX_COMPARE_DEPTH {
        return Err(HostError::RecursionLimit);
    }
    if a.is_same(b) {
        return Ok(true);
    }
    if let (Some(x), Some(y)) = (numeric(a), numeric(b)) {
        return Ok(numeric_eq(x, y));
    }
    if let (Some(x), Some(y)) = (byte_content(a), byte_content(b)) {
        return Ok(x == y);
    }

    match (a, b) {
        (Value::Host(host), other) => host.equals(other),
        (other, Value::Host(host)) => host.equals(other),
        (Value::None, Value::None) => Ok(true),
        (Value::Str(x), Value::Str(y)) => Ok(x == y),
        (Value::List(x), Value::List(y)) => {
            let (x, y) = (x.borrow().clone(), y.borrow().clone());
            sequence_eq(&x, &y, depth)
        }
        (Value::Tuple(x), Value::Tuple(y)) => sequence_eq(x, y, depth),
        (Value::Range(x), Value::Range(y)) => {
            // Ranges are equal when they produce the same sequence.
            let len = x.len();
            Ok(len == y.len()
                && (len == 0 || (x.start == y.start && (len == 1 || x.step == y.step))))
        }
        (Value::Set(_) | Value::FrozenSet(_), Value::Set(_) | Value::FrozenSet(_)) => {
            let (x, y) = (set_items(a), set_items(b));
            if x.len() != y.len() {
                return Ok(false);
            }
            for item in &x {
                if !contains(&y, item, depth)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Value::Dict(x), Value::Dict(y)) => {
            let (x, y) = (x.borrow().clone(), y.borrow().clone());
            if x.len() != y.len() {
                return Ok(false);
            }
            for (key, value) in &x {
                let mut found = None;
                for (other_key, other_value) in &y {
                    if eq_at(key, other_key, depth + 1)? {
                        found = Some(other_value);
                        break;
                    }
                }
                match found {
                    Some(other_value) if eq_at(value, other_value, depth + 1)? => {}
                    _ => return Ok(false),
                }
            }
            Ok(true)
        }
        (Value::Datetime(x), Value::Datetime(y)) => Ok(match (x.to_utc(), y.to_utc()) {
            (Some(x), Some(y)) => x == y,
            (None, None) => x.local() == y.local(),
            // Naive and aware timestamps are never equal.
            _ => false,
        }),
        (Value::Class(x), Value::Class(y)) => Ok(dotted_path(x) == dotted_path(y)),
        _ => Ok(false),
    }
}

fn sequence_eq(x: &[Value], y: &[Value], depth: usize) -> Result<bool, HostError> {
    if x.len() != y.len() {
        return Ok(false);
    }
    for (a, b) in x.iter().zip(y) {
        if !eq_at(a, b, depth + 1)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn set_items(value: &Value) -> Vec<Value> {
    match value {
        Value::Set(items) => items.borrow().clone(),
        Value::FrozenSet(items) => items.to_vec(),
        _ => Vec::new(),
    }
}

fn contains(haystack: &[Value], needle: &Value, depth: usize) -> Result<bool, HostError> {
    for item in haystack {
        if eq_at(item, needle, depth + 1)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// `module.qualname`, so a nested class split at a different dot is still the same class.
fn dotted_path(class: &Class) -> String {
    format!("{}.{}", class.module, class.qualname)
}
