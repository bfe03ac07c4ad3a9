use menu_label::encoding::{charset_from_content_type, decode_body};

/// 메뉴 in EUC-KR
const MENU_EUC_KR: &[u8] = &[0xB8, 0xDE, 0xB4, 0xBA];

#[test]
fn declared_charset_wins() {
    assert_eq!(decode_body(MENU_EUC_KR, Some("euc-kr")), "메뉴");
    assert_eq!(decode_body(b"Caf\xE9", Some("iso-8859-1")), "Café");
}

#[test]
fn utf8_is_tried_before_regional_encoding() {
    assert_eq!(decode_body("메뉴".as_bytes(), None), "메뉴");
}

#[test]
fn regional_encoding_is_the_second_fallback() {
    assert_eq!(decode_body(MENU_EUC_KR, None), "메뉴");
}

#[test]
fn wrong_declaration_falls_back() {
    // declared utf-8 but the bytes are EUC-KR
    assert_eq!(decode_body(MENU_EUC_KR, Some("utf-8")), "메뉴");
}

#[test]
fn meta_charset_used_without_header() {
    let mut html = b"<html><head><meta charset=\"windows-1252\"></head><body>".to_vec();
    html.extend_from_slice(b"\x93quoted\x94</body></html>");
    let text = decode_body(&html, None);
    assert!(text.contains("\u{201C}quoted\u{201D}"));
}

#[test]
fn never_fails_on_arbitrary_bytes() {
    let bytes: Vec<u8> = (0..=255u8).collect();
    let text = decode_body(&bytes, Some("no-such-charset"));
    assert!(!text.is_empty());
}

#[test]
fn unknown_label_is_ignored() {
    assert_eq!(decode_body(b"plain", Some("x-unknown")), "plain");
}

#[test]
fn charset_parameter_parsing() {
    assert_eq!(
        charset_from_content_type("text/html; charset=\"EUC-KR\"").as_deref(),
        Some("euc-kr")
    );
    assert_eq!(charset_from_content_type("text/html"), None);
}
