use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{
    errors::InspectError,
    json::{JsonPayload, float_from_json, float_to_json, int_field, validate_payload},
};

#[test]
fn test_payload_serializes_with_type_key() {
    let payload = JsonPayload::new("int", json!(42));
    let text = serde_json::to_string(&payload).unwrap();
    assert_eq!(text, r#"{"type":"int","data":42}"#);

    let parsed: JsonPayload = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, payload);
}

#[test]
fn test_validate_accepts_well_formed_payloads() {
    let payload = validate_payload(&json!({"type": "str", "data": "hi"})).unwrap();
    assert_eq!(payload, JsonPayload::new("str", json!("hi")));
}

#[test]
fn test_validate_accepts_null_data() {
    let payload = validate_payload(&json!({"type": "NoneType", "data": null})).unwrap();
    assert_eq!(payload.data, json!(null));
}

#[test]
fn test_validate_rejects_malformed_envelopes() {
    let cases = [
        json!([1, 2]),
        json!("int"),
        json!({"data": 1}),
        json!({"type": 3, "data": 1}),
        json!({"type": "int"}),
    ];
    for payload in cases {
        let err = validate_payload(&payload).unwrap_err();
        assert!(
            matches!(err, InspectError::MalformedPayload { .. }),
            "{payload} gave {err:?}"
        );
    }
}

#[test]
fn test_non_finite_floats_travel_as_strings() {
    assert_eq!(float_to_json(f64::INFINITY), json!("inf"));
    assert_eq!(float_to_json(f64::NEG_INFINITY), json!("-inf"));
    assert_eq!(float_to_json(f64::NAN), json!("nan"));
    assert_eq!(float_to_json(2.5), json!(2.5));

    assert_eq!(float_from_json(&json!("-inf")), Some(f64::NEG_INFINITY));
    assert!(float_from_json(&json!("nan")).is_some_and(f64::is_nan));
    assert_eq!(float_from_json(&json!(3)), Some(3.0));
    assert_eq!(float_from_json(&json!("three")), None);
    assert_eq!(float_from_json(&json!(null)), None);
}

#[test]
fn test_int_field() {
    let data = json!({"start": 1, "stop": "ten"});
    assert_eq!(int_field(&data, "start"), Ok(1));
    assert!(matches!(
        int_field(&data, "stop"),
        Err(InspectError::MalformedPayload { .. })
    ));
    assert_eq!(
        int_field(&data, "step"),
        Err(InspectError::malformed("missing key 'step'"))
    );
}
