use super::*;

fn incoming(to: Option<&str>, message: &str) -> IncomingSms {
    IncomingSms { to: to.map(str::to_owned), message: message.to_owned() }
}

#[test]
fn plain_text_body_is_the_message() {
    let parsed = parse_sms_body(Some("text/plain"), "  Your verification code is: 841317. Do not share.\n");
    assert_eq!(parsed, incoming(None, "Your verification code is: 841317. Do not share."));
}

#[test]
fn json_message_and_recipient() {
    let parsed = parse_sms_body(Some("application/json"), r#"{"to":"+15559876543","message":"code 1234"}"#);
    assert_eq!(parsed, incoming(Some("+15559876543"), "code 1234"));
}

#[test]
fn json_alternate_keys() {
    let parsed = parse_sms_body(None, r#"{"recipient":"+1555","body":"hi"}"#);
    assert_eq!(parsed, incoming(Some("+1555"), "hi"));
    let parsed = parse_sms_body(None, r#"{"text":"hello"}"#);
    assert_eq!(parsed, incoming(None, "hello"));
}

#[test]
fn json_without_message_key_is_empty() {
    let parsed = parse_sms_body(Some("application/json"), r#"{"to":"+1555"}"#);
    assert_eq!(parsed.message, "");
}

#[test]
fn malformed_json_falls_back_to_text() {
    let parsed = parse_sms_body(Some("application/json"), "{code 4455");
    assert_eq!(parsed, incoming(None, "{code 4455"));
}

#[test]
fn form_lines() {
    let parsed = parse_sms_body(
        Some("application/x-www-form-urlencoded"),
        "to=+15559876543\nmessage=Test message",
    );
    assert_eq!(parsed, incoming(Some("+15559876543"), "Test message"));
}

#[test]
fn form_message_may_span_lines_and_contain_equals() {
    let parsed = parse_sms_body(None, "message=Your code=482913\nValid for 5 minutes\nto=+1555");
    assert_eq!(parsed, incoming(Some("+1555"), "Your code=482913\nValid for 5 minutes"));
}

#[test]
fn equals_without_message_key_is_text() {
    let parsed = parse_sms_body(None, "a=b");
    assert_eq!(parsed, incoming(None, "a=b"));
}
