use super::*;

#[test]
fn test_format_message_substitutes_positional_args() {
    let text = format_message("Type '{0}' in '{1}'", &["Foo", "bar"]);
    assert_eq!(text, "Type 'Foo' in 'bar'");
}

#[test]
fn test_from_message_copies_code_and_category() {
    let diag = Diagnostic::from_message(
        &diagnostic_messages::OBJECT_LITERAL_TYPE_NOT_SUPPORTED,
        "file1.MyClass.x",
        &["file1.MyClass.x"],
    );
    assert_eq!(diag.code, diagnostic_codes::OBJECT_LITERAL_TYPE_NOT_SUPPORTED);
    assert!(diag.is_warning());
    assert!(diag.message_text.contains("file1.MyClass.x"));
}

#[test]
fn test_format_message_does_not_rescan_arguments() {
    let text = format_message(
        diagnostic_messages::LITERAL_TYPE_NOT_SUPPORTED.message,
        &["{1}", "Point.tag"],
    );
    assert_eq!(
        text,
        "Literal type '{1}' is not supported by reflection; 'Point.tag' is left unserialized."
    );
}

#[test]
fn test_format_message_keeps_unmatched_braces() {
    assert_eq!(format_message("{0} {x} {2} {", &["a"]), "a {x} {2} {");
}

#[test]
fn test_display_includes_code() {
    let diag = Diagnostic::from_message(
        &diagnostic_messages::UNKNOWN_TYPE_KIND,
        "x",
        &["weird", "x"],
    );
    assert_eq!(
        diag.to_string(),
        "warning TSR9004: Type 'weird' has a kind reflection does not know; 'x' is left unserialized."
    );
}

#[test]
fn test_diagnostic_serializes_camel_case() {
    let diag = Diagnostic::from_message(&diagnostic_messages::UNNAMED_TYPE_DECLARATION, "a", &["class", "a"]);
    let json = serde_json::to_value(&diag).expect("serializes");
    assert_eq!(json["messageText"], "Unnamed class declaration in package 'a' is not registered by name.");
    assert_eq!(json["category"], "message");
    assert_eq!(json["subject"], "a");
}
