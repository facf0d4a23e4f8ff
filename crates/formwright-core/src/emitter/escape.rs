//! Literal escaping for emitted source
//!
//! Every user-controlled string passes through one of these functions before
//! it reaches the output. Plain values stay readable; anything else falls
//! back to a quoted string literal.

use std::fmt::Write as _;

/// Double-quoted string literal
///
/// Single quotes are escaped too, so a literal never contains a bare quote
/// of either kind.
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' | '\u{2029}' => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Numeric literal, spelling out non-finite values
pub fn js_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        format!("{}", value)
    }
}

/// `[A-Za-z_$][A-Za-z0-9_$]*`
pub fn is_js_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Object literal key: bare when it is an identifier, quoted otherwise
pub fn object_key(name: &str) -> String {
    if is_js_identifier(name) {
        name.to_string()
    } else {
        js_string(name)
    }
}

/// `object.name` or `object["name"]`
pub fn member_access(object: &str, name: &str) -> String {
    if is_js_identifier(name) {
        format!("{}.{}", object, name)
    } else {
        format!("{}[{}]", object, js_string(name))
    }
}

fn is_plain_attribute(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| matches!(c, '"' | '\'' | '{' | '}' | '<' | '>' | '&' | '\\') || c.is_control())
}

/// JSX attribute: `name="value"` when plain, `name={"value"}` otherwise
pub fn jsx_attr(name: &str, value: &str) -> String {
    if is_plain_attribute(value) {
        format!("{}=\"{}\"", name, value)
    } else {
        format!("{}={{{}}}", name, js_string(value))
    }
}

fn is_plain_text(value: &str) -> bool {
    const PUNCTUATION: &str = " _-.,:;!?/+*#%@$=~^|";
    !value.is_empty()
        && value.trim() == value
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || PUNCTUATION.contains(c))
}

/// JSX child text: raw when plain, `{"text"}` otherwise
pub fn jsx_text(value: &str) -> String {
    if is_plain_text(value) {
        value.to_string()
    } else {
        format!("{{{}}}", js_string(value))
    }
}
