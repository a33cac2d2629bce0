use super::*;

fn text(s: &str) -> TemplateSegment {
    TemplateSegment::Text(s.to_string())
}

fn hole(placeholder: Placeholder) -> TemplateSegment {
    TemplateSegment::Placeholder(placeholder)
}

fn pattern(segments: Vec<TemplateSegment>) -> TemplatePattern {
    TemplatePattern {
        segments,
        display: String::new(),
    }
}

#[test]
fn test_text_only() {
    let p = pattern(vec![text("abc")]);
    assert!(p.matches("abc"));
    assert!(!p.matches("abcd"));
    assert!(!p.matches("ab"));
}

#[test]
fn test_empty_pattern_matches_empty_string() {
    assert!(pattern(vec![]).matches(""));
    assert!(!pattern(vec![]).matches("x"));
}

#[test]
fn test_string_placeholder_accepts_empty_span() {
    let p = pattern(vec![text("id-"), hole(Placeholder::String)]);
    assert!(p.matches("id-"));
    assert!(p.matches("id-42"));
    assert!(!p.matches("ID-42"));
}

#[test]
fn test_number_placeholder() {
    let p = pattern(vec![hole(Placeholder::Number), text("px")]);
    assert!(p.matches("12px"));
    assert!(p.matches("-1.5px"));
    assert!(p.matches("1e3px"));
    assert!(p.matches("0x1Fpx"));
    assert!(!p.matches("px"));
    assert!(!p.matches("12 px"));
    assert!(!p.matches("abcpx"));
}

#[test]
fn test_bigint_placeholder() {
    let p = pattern(vec![hole(Placeholder::BigInt), text("n")]);
    assert!(p.matches("123n"));
    assert!(p.matches("-7n"));
    assert!(!p.matches("1.5n"));
    assert!(!p.matches("n"));
}

#[test]
fn test_literal_list_tries_every_option() {
    // Only "ab" lets the rest of "abc" match.
    let p = pattern(vec![
        hole(Placeholder::Literals(vec!["a".to_string(), "ab".to_string()])),
        text("c"),
    ]);
    assert!(p.matches("ac"));
    assert!(p.matches("abc"));
    assert!(!p.matches("abbc"));
}

#[test]
fn test_adjacent_placeholders() {
    let p = pattern(vec![hole(Placeholder::String), hole(Placeholder::Number)]);
    assert!(p.matches("abc1"));
    assert!(p.matches("12"));
    assert!(!p.matches("abc"));
}

#[test]
fn test_alternatives_join_with_remaining_segments() {
    let p = pattern(vec![
        hole(Placeholder::Alternatives(vec![
            vec![text("v"), hole(Placeholder::Number)],
            vec![text("latest")],
        ])),
        text("/api"),
    ]);
    assert!(p.matches("v2/api"));
    assert!(p.matches("latest/api"));
    assert!(!p.matches("vx/api"));
    assert!(!p.matches("latest"));
}

#[test]
fn test_multibyte_text() {
    let p = pattern(vec![text("é"), hole(Placeholder::String), text("ü")]);
    assert!(p.matches("éü"));
    assert!(p.matches("éxyzü"));
    assert!(!p.matches("eü"));
}

#[test]
fn test_many_string_placeholders_on_long_input() {
    // `${string}a${string}a${string}a${string}b`
    let p = pattern(vec![
        hole(Placeholder::String),
        text("a"),
        hole(Placeholder::String),
        text("a"),
        hole(Placeholder::String),
        text("a"),
        hole(Placeholder::String),
        text("b"),
    ]);
    let long = "a".repeat(10_000);
    assert!(!p.matches(&long));
    assert!(p.matches(&format!("{long}b")));
    assert!(p.matches("aaab"));
    assert!(!p.matches("aab"));
}

#[test]
fn test_number_placeholders_on_long_digit_run() {
    let p = pattern(vec![
        hole(Placeholder::Number),
        text("1"),
        hole(Placeholder::Number),
        text("x"),
    ]);
    let digits = "1".repeat(200);
    assert!(!p.matches(&digits));
    assert!(p.matches(&format!("{digits}x")));
    assert!(!p.matches("11"));
}

#[test]
fn test_empty_text_alternative() {
    let p = pattern(vec![
        text("a"),
        hole(Placeholder::Literals(vec![String::new(), "-".to_string()])),
        hole(Placeholder::BigInt),
    ]);
    assert!(p.matches("a12"));
    assert!(p.matches("a--12"));
    assert!(!p.matches("a"));
}
