//! Size-bounded display values.
//!
//! Every display value is bounded by the character budget of the nesting level
//! it is rendered at (see [`crate::options`]). Strings are cut in the middle,
//! keeping two thirds of the budget from the start and one third from the end.
//! Collections and maps render a bounded number of items, each one level
//! deeper, and collapse to `prefix…suffix` past the last level.

use spyglass_values::{
    HostError, Value,
    repr::{
        bytearray_repr, bytes_quote, bytes_repr, bytes_repr_with_quote, str_quote, str_repr,
        str_repr_with_quote,
    },
};
use tracing::debug;

use crate::{
    options::{ELLIPSIS, MAX_ITEMS_BY_LEVEL, max_characters},
    qualname::get_qualname,
    registry::get_inspector,
};

/// Last-resort display text when nothing about the value can be rendered.
pub const NO_REPR_AVAILABLE: &str = "<no repr available for object>";

/// Display text plus whether anything was cut from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayValue {
    pub text: String,
    pub truncated: bool,
}

impl DisplayValue {
    pub fn new(text: impl Into<String>, truncated: bool) -> Self {
        Self {
            text: text.into(),
            truncated,
        }
    }
}

/// How many characters to keep from each end of an over-budget text.
fn split_budget(budget: usize) -> (usize, usize) {
    ((2 * budget / 3).max(1), (budget / 3).max(1))
}

/// Whether `text` has at most `budget` characters, without counting past it.
fn fits(text: &str, budget: usize) -> bool {
    text.chars().nth(budget).is_none()
}

fn head(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn tail(text: &str, count: usize) -> &str {
    match text.char_indices().rev().nth(count.saturating_sub(1)) {
        Some((start, _)) => &text[start..],
        None => text,
    }
}

/// Cut plain text that exceeds the budget of `level`.
pub fn maybe_truncate_string(text: &str, level: usize) -> DisplayValue {
    let budget = max_characters(level);
    if fits(text, budget) {
        return DisplayValue::new(text, false);
    }
    let (start, end) = split_budget(budget);
    DisplayValue::new(
        format!("{}{ELLIPSIS}{}", head(text, start), tail(text, end)),
        true,
    )
}

/// Joins a quoted head and tail, both written with `quote`, into one literal:
/// the head loses its closing quote, the tail loses its prefix and opening quote.
fn splice_quoted(head: &str, tail: &str, quote: char) -> String {
    let head = &head[..head.rfind(quote).unwrap_or(head.len())];
    let tail = match tail.find(quote) {
        Some(open) => &tail[open + quote.len_utf8()..],
        None => tail,
    };
    format!("{head}{ELLIPSIS}{tail}")
}

/// Quoted display value of a string. Both halves of a cut string use the
/// quote of the whole string.
///
/// The budget check uses the raw character count, not the length of the
/// escaped literal, so the text may exceed the budget by its escapes.
pub fn string_display_value(s: &str, level: usize) -> DisplayValue {
    let budget = max_characters(level);
    if fits(s, budget) {
        return DisplayValue::new(str_repr(s), false);
    }
    let (start, end) = split_budget(budget);
    let quote = str_quote(s);
    DisplayValue::new(
        splice_quoted(
            &str_repr_with_quote(head(s, start), quote),
            &str_repr_with_quote(tail(s, end), quote),
            quote,
        ),
        true,
    )
}

/// Literal display value of a byte string (`b'...'` or `bytearray(b'...')`).
pub fn bytes_display_value(bytes: &[u8], mutable: bool, level: usize) -> DisplayValue {
    let budget = max_characters(level);
    if bytes.len() <= budget {
        let literal = if mutable { bytearray_repr } else { bytes_repr };
        return DisplayValue::new(literal(bytes), false);
    }
    let (start, end) = split_budget(budget);
    let quote = bytes_quote(bytes);
    let literal = |fragment: &[u8]| {
        let text = bytes_repr_with_quote(fragment, quote);
        if mutable { format!("bytearray({text})") } else { text }
    };
    DisplayValue::new(
        splice_quoted(
            &literal(&bytes[..start]),
            &literal(&bytes[bytes.len() - end..]),
            quote,
        ),
        true,
    )
}

/// The generic display value: `repr`, then the low-level repr, then a
/// placeholder naming the type.
pub fn default_display_value(value: &Value, level: usize) -> DisplayValue {
    let text = match value.repr() {
        Ok(text) => text,
        Err(err) => {
            debug!(error = %err, "repr failed, falling back to raw repr");
            match value.raw_repr() {
                Ok(text) => text,
                Err(err) => {
                    debug!(error = %err, "raw repr failed");
                    if value.type_name().qualname.is_empty() {
                        NO_REPR_AVAILABLE.to_string()
                    } else {
                        format!("<no preview available for {}>", get_qualname(value))
                    }
                }
            }
        }
    };
    maybe_truncate_string(&text, level)
}

/// Runs the item loop shared by collections and maps. `render` appends one
/// item and reports whether it was truncated.
fn render_items<I>(
    items: I,
    prefix: &str,
    level: usize,
    mut render: impl FnMut(&mut String, I::Item) -> bool,
) -> (String, bool)
where
    I: IntoIterator,
{
    let mut text = String::from(prefix);
    let mut allowance = MAX_ITEMS_BY_LEVEL[level];
    let mut truncated = false;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            text.push_str(", ");
        }
        allowance -= 1;
        if allowance == 0 {
            text.push_str(ELLIPSIS);
            truncated = true;
            break;
        }
        truncated |= render(&mut text, item);
    }
    (text, truncated)
}

/// Display value of an element rendered inside `parent`.
fn nested_display_value(
    parent: &Value,
    item: &Value,
    prefix: &str,
    suffix: &str,
    level: usize,
) -> DisplayValue {
    if item.is_same(parent) {
        DisplayValue::new(format!("{prefix}{ELLIPSIS}{suffix}"), true)
    } else {
        get_inspector(item).get_display_value(level + 1)
    }
}

/// Bounded display value of a sequence or set: `prefix`, then the items at
/// `level + 1` separated by `", "`, then `suffix`.
///
/// An item that is the container itself renders as `prefix…suffix`.
/// Self-reference further down is caught by the depth bound.
pub fn collection_display_value(
    parent: &Value,
    items: impl IntoIterator<Item = Value>,
    len: usize,
    prefix: &str,
    suffix: &str,
    level: usize,
) -> DisplayValue {
    if len == 0 {
        return DisplayValue::new(format!("{prefix}{suffix}"), false);
    }
    if level >= MAX_ITEMS_BY_LEVEL.len() {
        return DisplayValue::new(format!("{prefix}{ELLIPSIS}{suffix}"), true);
    }

    let (mut text, truncated) = render_items(items, prefix, level, |text, item| {
        let display = nested_display_value(parent, &item, prefix, suffix, level);
        text.push_str(&display.text);
        display.truncated
    });

    if matches!(parent, Value::Tuple(items) if items.len() == 1) {
        text.push(',');
    }
    text.push_str(suffix);
    DisplayValue::new(text, truncated)
}

/// Bounded display value of a mapping: `{key: value, ...}`. Entries are
/// consumed lazily so only rendered values are fetched; a failed fetch renders
/// as `<?>`.
pub fn map_display_value(
    parent: &Value,
    entries: impl IntoIterator<Item = (Value, Result<Value, HostError>)>,
    len: usize,
    level: usize,
) -> DisplayValue {
    let (prefix, suffix) = ("{", "}");
    if len == 0 {
        return DisplayValue::new(format!("{prefix}{suffix}"), false);
    }
    if level >= MAX_ITEMS_BY_LEVEL.len() {
        return DisplayValue::new(format!("{prefix}{ELLIPSIS}{suffix}"), true);
    }

    let (mut text, truncated) = render_items(entries, prefix, level, |text, (key, item)| {
        let key_display = get_inspector(&key).get_display_value(level + 1);
        text.push_str(&key_display.text);
        text.push_str(": ");
        match item {
            Ok(item) => {
                let display = nested_display_value(parent, &item, prefix, suffix, level);
                text.push_str(&display.text);
                key_display.truncated || display.truncated
            }
            Err(err) => {
                debug!(error = %err, "map value lookup failed");
                text.push_str("<?>");
                key_display.truncated
            }
        }
    });
    text.push_str(suffix);
    DisplayValue::new(text, truncated)
}
