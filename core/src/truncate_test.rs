use std::rc::Rc;

use pretty_assertions::assert_eq;
use spyglass_values::{Class, Object, ObjectRepr, Value};

use crate::{
    options::{ELLIPSIS, MAX_CHARACTERS},
    registry::get_inspector,
    truncate::{DisplayValue, maybe_truncate_string, string_display_value},
};

fn display(value: &Value, level: usize) -> DisplayValue {
    get_inspector(value).get_display_value(level)
}

#[test]
fn test_short_text_is_untouched() {
    assert_eq!(maybe_truncate_string("hello", 1), DisplayValue::new("hello", false));
}

#[test]
fn test_nested_text_keeps_two_thirds_head_and_one_third_tail() {
    let text = format!("{}{}", "a".repeat(100), "b".repeat(100));
    let display = maybe_truncate_string(&text, 1);

    assert!(display.truncated);
    assert_eq!(
        display.text,
        format!("{}{ELLIPSIS}{}", "a".repeat(85), "b".repeat(42))
    );
    assert_eq!(display.text.chars().count(), 128);
}

#[test]
fn test_top_level_budget() {
    let fits = "x".repeat(MAX_CHARACTERS);
    assert!(!maybe_truncate_string(&fits, 0).truncated);

    let over = "x".repeat(MAX_CHARACTERS + 1);
    let display = maybe_truncate_string(&over, 0);
    assert!(display.truncated);
    assert!(display.text.chars().count() <= MAX_CHARACTERS);
}

#[test]
fn test_multibyte_text_is_cut_on_char_boundaries() {
    let text = "é".repeat(300);
    let display = maybe_truncate_string(&text, 1);
    assert_eq!(
        display.text,
        format!("{}{ELLIPSIS}{}", "é".repeat(85), "é".repeat(42))
    );
}

#[test]
fn test_string_display_is_quoted() {
    assert_eq!(string_display_value("abc", 0), DisplayValue::new("'abc'", false));
    assert_eq!(string_display_value("it's", 0), DisplayValue::new("\"it's\"", false));
}

#[test]
fn test_long_string_is_spliced_into_one_literal() {
    let text = "x".repeat(200);
    let display = string_display_value(&text, 1);

    assert!(display.truncated);
    assert_eq!(
        display.text,
        format!("'{}{ELLIPSIS}{}'", "x".repeat(85), "x".repeat(42))
    );
}

#[test]
fn test_long_string_with_single_quotes_uses_double_quotes() {
    let text = "it's".repeat(50);
    let display = string_display_value(&text, 1);

    assert!(display.text.starts_with("\"it's"));
    assert!(display.text.ends_with("it's\""));
    assert_eq!(display.text.matches(ELLIPSIS).count(), 1);
}

#[test]
fn test_cut_string_keeps_one_quote_style() {
    // The apostrophe only survives in the head.
    let text = format!("it's {}", "x".repeat(200));
    assert_eq!(
        string_display_value(&text, 1).text,
        format!("\"it's {}{ELLIPSIS}{}\"", "x".repeat(80), "x".repeat(42))
    );

    // The apostrophe only survives in the tail.
    let text = format!("{}'s", "x".repeat(200));
    assert_eq!(
        string_display_value(&text, 1).text,
        format!("\"{}{ELLIPSIS}{}'s\"", "x".repeat(85), "x".repeat(40))
    );
}

#[test]
fn test_cut_bytes_keep_one_quote_style() {
    let mut bytes = b"it's ".to_vec();
    bytes.extend(vec![b'a'; 200]);
    let display = display(&Value::bytes(bytes), 1);

    assert_eq!(
        display.text,
        format!("b\"it's {}{ELLIPSIS}{}\"", "a".repeat(80), "a".repeat(42))
    );
}

#[test]
fn test_long_bytes_are_spliced_into_one_literal() {
    let value = Value::bytes(vec![b'a'; 200]);
    let display = display(&value, 1);

    assert!(display.truncated);
    assert_eq!(
        display.text,
        format!("b'{}{ELLIPSIS}{}'", "a".repeat(85), "a".repeat(42))
    );
}

#[test]
fn test_bytearray_display_keeps_its_constructor() {
    let value = Value::bytearray(b"hi".to_vec());
    assert_eq!(display(&value, 0), DisplayValue::new("bytearray(b'hi')", false));
}

#[test]
fn test_empty_collections() {
    assert_eq!(display(&Value::list([]), 0), DisplayValue::new("[]", false));
    assert_eq!(display(&Value::tuple([]), 0), DisplayValue::new("()", false));
    assert_eq!(display(&Value::set([]), 0), DisplayValue::new("set()", false));
    assert_eq!(
        display(&Value::frozenset([]), 0),
        DisplayValue::new("frozenset()", false)
    );
    assert_eq!(display(&Value::dict([]), 0), DisplayValue::new("{}", false));
}

#[test]
fn test_one_element_tuple_keeps_its_comma() {
    let value = Value::tuple([Value::Int(1)]);
    assert_eq!(display(&value, 0), DisplayValue::new("(1,)", false));
}

#[test]
fn test_set_display() {
    let value = Value::set([Value::Int(1), Value::Int(2), Value::Int(1)]);
    assert_eq!(display(&value, 0), DisplayValue::new("{1, 2}", false));
}

#[test]
fn test_item_allowance_at_top_level() {
    let value = Value::list((0..100).map(Value::Int));
    let display = display(&value, 0);

    let shown: Vec<String> = (0..59).map(|i| i.to_string()).collect();
    assert!(display.truncated);
    assert_eq!(display.text, format!("[{}, {ELLIPSIS}]", shown.join(", ")));
}

#[test]
fn test_item_allowance_when_nested() {
    let value = Value::list((0..30).map(Value::Int));
    let display = display(&value, 1);

    let shown: Vec<String> = (0..19).map(|i| i.to_string()).collect();
    assert_eq!(display.text, format!("[{}, {ELLIPSIS}]", shown.join(", ")));
}

#[test]
fn test_exactly_one_less_than_allowance_is_not_truncated() {
    let value = Value::list((0..19).map(Value::Int));
    assert!(!display(&value, 1).truncated);
}

#[test]
fn test_collections_past_the_last_level_are_elided() {
    let value = Value::list([Value::list([Value::Int(1)])]);

    assert_eq!(display(&value, 0), DisplayValue::new("[[1]]", false));
    assert_eq!(
        display(&value, 1),
        DisplayValue::new(format!("[[{ELLIPSIS}]]"), true)
    );
    assert_eq!(
        display(&value, 2),
        DisplayValue::new(format!("[{ELLIPSIS}]"), true)
    );
}

#[test]
fn test_self_containing_list() {
    let value = Value::list([]);
    value.append(value.clone()).unwrap();

    assert_eq!(
        display(&value, 0),
        DisplayValue::new(format!("[[{ELLIPSIS}]]"), true)
    );
}

#[test]
fn test_self_containing_dict() {
    let value = Value::dict([]);
    value.set_item(Value::str("self"), value.clone()).unwrap();

    assert_eq!(
        display(&value, 0),
        DisplayValue::new(format!("{{'self': {{{ELLIPSIS}}}}}"), true)
    );
}

#[test]
fn test_map_display() {
    let value = Value::dict([
        (Value::str("a"), Value::Int(1)),
        (Value::Int(2), Value::list([Value::None])),
    ]);
    assert_eq!(
        display(&value, 0),
        DisplayValue::new("{'a': 1, 2: [None]}", false)
    );
}

#[test]
fn test_long_nested_string_marks_parent_truncated() {
    let value = Value::list([Value::str("y".repeat(500))]);
    let display = display(&value, 0);

    assert!(display.truncated);
    assert!(display.text.starts_with("['yyy"));
    assert!(display.text.ends_with("yyy']"));
}

#[test]
fn test_broken_repr_falls_back_to_raw_repr() {
    let class = Rc::new(Class::new("__main__", "Widget"));
    let value = Value::object(Object::new(class).with_repr(ObjectRepr::Broken("boom".into())));

    let display = display(&value, 0);
    assert!(!display.truncated);
    assert!(
        display.text.starts_with("<__main__.Widget object at 0x"),
        "unexpected display: {}",
        display.text
    );
}

#[test]
fn test_custom_repr_is_used() {
    let class = Rc::new(Class::new("__main__", "Point"));
    let value = Value::object(Object::new(class).with_repr(ObjectRepr::Custom("Point(1, 2)".into())));

    assert_eq!(display(&value, 0), DisplayValue::new("Point(1, 2)", false));
}
