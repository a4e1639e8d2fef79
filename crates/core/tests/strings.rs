//! String escaping tests: decoding through whole lines and the
//! encode/parse round-trip property.

mod common;

use common::{node, parse_err};
use opl_toolchain_core::{escape_into, ErrorKind};

/// Encode `text` and splice it into a tag value, then read it back.
fn roundtrip_as_tag_value(text: &str) -> String {
    let mut encoded = String::new();
    escape_into(text, &mut encoded);
    let n = node(&format!("n1 Tk={encoded}"));
    assert_eq!(n.tags.len(), 1);
    n.tags[0].value.clone()
}

#[test]
fn single_escape_form_decodes_to_cafe() {
    let n = node("n1 Tname=Caf%e9%");
    assert_eq!(n.tags[0].value, "Café");
    // Case of the hex digits does not matter.
    let n = node("n1 Tname=Caf%E9%");
    assert_eq!(n.tags[0].value, "Café");
}

#[test]
fn each_escape_is_one_codepoint() {
    // Adjacent escapes decode independently, not as UTF-8 byte pairs.
    let n = node("n1 Tname=Caf%C3%%A9%");
    assert_eq!(n.tags[0].value, "Caf\u{c3}\u{a9}");
}

#[test]
fn escapes_anywhere_in_key_and_value() {
    let n = node("n1 T%6e%ame=a%20%b");
    assert_eq!(n.tags[0].key, "name");
    assert_eq!(n.tags[0].value, "a b");
}

#[test]
fn escaped_separators_do_not_split_tags() {
    let n = node("n1 Ta%3d%b=c%2c%d,e=f");
    assert_eq!(n.tags.len(), 2);
    assert_eq!(n.tags[0].key, "a=b");
    assert_eq!(n.tags[0].value, "c,d");
    assert_eq!(n.tags[1].key, "e");
}

#[test]
fn verbatim_utf8_passes_through() {
    let n = node("n1 Tname=Grünkohlstraße");
    assert_eq!(n.tags[0].value, "Grünkohlstraße");
}

#[test]
fn user_names_are_escaped_strings() {
    let n = node("n1 uJ%20%Random%20%Hacker");
    assert_eq!(n.user, "J Random Hacker");
}

#[test]
fn roundtrip_preserves_arbitrary_text() {
    for text in [
        "",
        "bench",
        "two words",
        "a=b,c=d",
        "100%",
        "tab\tand newline\n",
        "Grünkohl",
        "Καφές",
        "喫茶店",
        "emoji 😀 works",
        "mixed %=, \t end",
    ] {
        assert_eq!(roundtrip_as_tag_value(text), text, "for {text:?}");
    }
}

#[test]
fn unterminated_escape_fails_with_eol() {
    let err = parse_err("n1 Tname=Caf%e9");
    assert_eq!(err.kind, ErrorKind::Eol);
    assert_eq!(err.column, 15);
}

#[test]
fn bad_hex_digit_inside_line() {
    let err = parse_err("n1 ux%zz%");
    assert_eq!(err.kind, ErrorKind::NotHexChar);
    assert_eq!(err.column, 6);
}

#[test]
fn overlong_escape_inside_line() {
    let err = parse_err("n1 u%123456789%");
    assert_eq!(err.kind, ErrorKind::HexEscapeTooLong);
    assert_eq!(err.column, 13);
}
