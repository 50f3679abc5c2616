//! Host-style textual representations (`repr()`).
//!
//! Containers guard against self-reference the way the host runtime does: a
//! container already being rendered further up the stack prints as `[...]`,
//! `{...}` or `(...)`.

use core::fmt::{self, Write};

use crate::{HostError, Value, ObjectRepr, number::format_float};

/// Nesting depth at which rendering gives up.
const MAX_REPR_DEPTH: usize = 256;

impl Value {
    /// `repr(value)`. Fails when a user-defined or host repr fails.
    pub fn repr(&self) -> Result<String, HostError> {
        let mut out = String::new();
        let mut active = Vec::new();
        write_repr(&mut out, self, &mut active)?;
        Ok(out)
    }

    /// `object.__repr__(value)`: the low-level representation that ignores any
    /// user-defined repr.
    pub fn raw_repr(&self) -> Result<String, HostError> {
        match self {
            Value::Object(object) => Ok(format!(
                "<{}.{} object at {:#x}>",
                object.class.module,
                object.class.qualname,
                self.address()
            )),
            Value::Host(object) => object.raw_repr(),
            _ => self.repr(),
        }
    }

    /// `str(value)`: strings are their own text and timestamps use their
    /// display form; everything else falls back to `repr`.
    pub fn to_str(&self) -> Result<String, HostError> {
        match self {
            Value::Str(s) => Ok(s.to_string()),
            Value::Datetime(datetime) => Ok(datetime.to_display_string()),
            _ => self.repr(),
        }
    }
}

/// Quote and escape a string as a host string literal.
///
/// Single quotes are preferred; double quotes are used when the text contains
/// a single quote but no double quote.
pub fn str_repr(s: &str) -> String {
    str_repr_with_quote(s, str_quote(s))
}

/// The quote [`str_repr`] picks for `s`.
pub fn str_quote(s: &str) -> char {
    pick_quote(s.contains('\''), s.contains('"'))
}

/// Like [`str_repr`], with the quote chosen by the caller.
pub fn str_repr_with_quote(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    // Writing into a String cannot fail.
    let _ = escape_str(&mut out, s, quote);
    out
}

/// `b'...'` literal for a byte string.
pub fn bytes_repr(bytes: &[u8]) -> String {
    bytes_repr_with_quote(bytes, bytes_quote(bytes))
}

/// The quote [`bytes_repr`] picks for `bytes`.
pub fn bytes_quote(bytes: &[u8]) -> char {
    pick_quote(bytes.contains(&b'\''), bytes.contains(&b'"'))
}

pub fn bytes_repr_with_quote(bytes: &[u8], quote: char) -> String {
    let mut out = String::with_capacity(bytes.len() + 3);
    out.push('b');
    let _ = escape_bytes(&mut out, bytes, quote);
    out
}

/// `bytearray(b'...')` literal.
pub fn bytearray_repr(bytes: &[u8]) -> String {
    format!("bytearray({})", bytes_repr(bytes))
}

fn pick_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double { '"' } else { '\'' }
}

fn escape_str(f: &mut impl Write, s: &str, quote: char) -> fmt::Result {
    f.write_char(quote)?;
    for ch in s.chars() {
        match ch {
            c if c == quote => write!(f, "\\{c}")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => match c as u32 {
                code @ 0..=0xff => write!(f, "\\x{code:02x}")?,
                code @ 0x100..=0xffff => write!(f, "\\u{code:04x}")?,
                code => write!(f, "\\U{code:08x}")?,
            },
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

fn escape_bytes(f: &mut impl Write, bytes: &[u8], quote: char) -> fmt::Result {
    f.write_char(quote)?;
    for &byte in bytes {
        match byte {
            b'\\' => f.write_str("\\\\")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            b if b as char == quote => write!(f, "\\{quote}")?,
            0x20..=0x7e => f.write_char(byte as char)?,
            _ => write!(f, "\\x{byte:02x}")?,
        }
    }
    f.write_char(quote)
}

fn write_repr(out: &mut String, value: &Value, active: &mut Vec<usize>) -> Result<(), HostError> {
    match value {
        Value::None => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Float(x) => out.push_str(&format_float(*x)),
        Value::Complex(c) => out.push_str(&c.to_string()),
        Value::Str(s) => out.push_str(&str_repr(s)),
        Value::Bytes(b) => out.push_str(&bytes_repr(b)),
        Value::ByteArray(b) => out.push_str(&bytearray_repr(&b.borrow())),
        Value::MemoryView(_) => out.push_str(&format!("<memory at {:#x}>", value.address())),
        Value::Range(range) => {
            if range.step == 1 {
                out.push_str(&format!("range({}, {})", range.start, range.stop));
            } else {
                out.push_str(&format!(
                    "range({}, {}, {})",
                    range.start, range.stop, range.step
                ));
            }
        }
        Value::Datetime(datetime) => out.push_str(&datetime.repr()),
        Value::Function(function) => out.push_str(&format!(
            "<function {} at {:#x}>",
            function.qualname,
            value.address()
        )),
        Value::Class(class) => {
            if class.module == "builtins" || class.module.is_empty() {
                out.push_str(&format!("<class '{}'>", class.qualname));
            } else {
                out.push_str(&format!("<class '{}.{}'>", class.module, class.qualname));
            }
        }
        Value::Property(_) => {
            out.push_str(&format!("<property object at {:#x}>", value.address()))
        }
        Value::Object(object) => match &object.repr {
            ObjectRepr::Default => out.push_str(&value.raw_repr()?),
            ObjectRepr::Custom(text) => out.push_str(text),
            ObjectRepr::Broken(message) => return Err(HostError::Failed(message.clone())),
        },
        Value::Host(object) => out.push_str(&object.repr()?),
        Value::List(items) => {
            let items = items.borrow();
            write_sequence(out, value, &items, "[", "]", active)?;
        }
        Value::Tuple(items) => {
            if items.len() == 1 {
                guarded(out, value, "(...)", active, |out, active| {
                    out.push('(');
                    write_repr(out, &items[0], active)?;
                    out.push_str(",)");
                    Ok(())
                })?;
            } else {
                write_sequence(out, value, items, "(", ")", active)?;
            }
        }
        Value::Set(items) => {
            let items = items.borrow();
            if items.is_empty() {
                out.push_str("set()");
            } else {
                write_sequence(out, value, &items, "{", "}", active)?;
            }
        }
        Value::FrozenSet(items) => {
            if items.is_empty() {
                out.push_str("frozenset()");
            } else {
                write_sequence(out, value, items, "frozenset({", "})", active)?;
            }
        }
        Value::Dict(pairs) => {
            let pairs = pairs.borrow();
            guarded(out, value, "{...}", active, |out, active| {
                out.push('{');
                for (i, (key, item)) in pairs.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_repr(out, key, active)?;
                    out.push_str(": ");
                    write_repr(out, item, active)?;
                }
                out.push('}');
                Ok(())
            })?;
        }
    }
    Ok(())
}

fn write_sequence(
    out: &mut String,
    container: &Value,
    items: &[Value],
    prefix: &str,
    suffix: &str,
    active: &mut Vec<usize>,
) -> Result<(), HostError> {
    let placeholder = format!("{prefix}...{suffix}");
    guarded(out, container, &placeholder, active, |out, active| {
        out.push_str(prefix);
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_repr(out, item, active)?;
        }
        out.push_str(suffix);
        Ok(())
    })
}

/// Runs `body` with `container` marked as being rendered, or writes
/// `placeholder` if it already is.
fn guarded(
    out: &mut String,
    container: &Value,
    placeholder: &str,
    active: &mut Vec<usize>,
    body: impl FnOnce(&mut String, &mut Vec<usize>) -> Result<(), HostError>,
) -> Result<(), HostError> {
    let address = container.address();
    if active.contains(&address) {
        out.push_str(placeholder);
        return Ok(());
    }
    if active.len() >= MAX_REPR_DEPTH {
        return Err(HostError::RecursionLimit);
    }
    active.push(address);
    let result = body(out, active);
    active.pop();
    result
}
