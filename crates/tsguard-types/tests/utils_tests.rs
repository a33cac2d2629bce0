use super::*;

#[test]
fn test_numeric_literal_names_round_trip() {
    assert!(is_numeric_literal_name("0"));
    assert!(is_numeric_literal_name("42"));
    assert!(is_numeric_literal_name("1.5"));
    assert!(is_numeric_literal_name("NaN"));
    assert!(!is_numeric_literal_name("01"));
    assert!(!is_numeric_literal_name("1.50"));
    assert!(!is_numeric_literal_name("foo"));
    assert!(!is_numeric_literal_name("1.0"));
    assert!(!is_numeric_literal_name(" 1"));
    assert!(!is_numeric_literal_name("inf"));
}

#[test]
fn test_js_number_to_string() {
    assert_eq!(js_number_to_string(1.0), "1");
    assert_eq!(js_number_to_string(-0.0), "0");
    assert_eq!(js_number_to_string(0.5), "0.5");
    assert_eq!(js_number_to_string(1e21), "1e+21");
    assert_eq!(js_number_to_string(1e-7), "1e-7");
    assert_eq!(js_number_to_string(f64::INFINITY), "Infinity");
}

#[test]
fn test_numeric_string_accepts_js_number_syntax() {
    for text in ["0", "12", "-3", "+4", "1.5", ".5", "5.", "1e10", "2E-3", "0x1F", "0o17", "0b101"] {
        assert!(is_numeric_string(text), "{text} should be numeric");
    }
}

#[test]
fn test_numeric_string_rejects_non_numbers() {
    for text in ["", " 1", "1 ", "abc", "1e", "e5", ".", "-0x10", "Infinity", "1_000", "0xG"] {
        assert!(!is_numeric_string(text), "{text:?} should not be numeric");
    }
}

#[test]
fn test_bigint_string() {
    assert!(is_bigint_string("0"));
    assert!(is_bigint_string("-123456789012345678901234567890"));
    assert!(!is_bigint_string(""));
    assert!(!is_bigint_string("-"));
    assert!(!is_bigint_string("1.0"));
}

#[test]
fn test_quote_string_escapes() {
    assert_eq!(quote_string("a\"b"), "\"a\\\"b\"");
    assert_eq!(quote_string("line\nbreak"), "\"line\\nbreak\"");
}
