//! Component naming.
//!
//! Component names must match `^[A-Za-z0-9._-]+$`. Entity names arrive with
//! namespace separators (`Admin::Account`) or spaces; both are PascalCase-joined.
use once_cell::sync::Lazy;
use regex::Regex;

static COMPONENT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("component name pattern"));

pub fn is_valid_component_name(name: &str) -> bool {
    COMPONENT_NAME.is_match(name)
}

/// Sanitize an entity name into a component name.
///
/// Characters outside the allowed set split the name; each piece gets an
/// upper-case first letter. `.`, `-` and `_` are kept as-is.
pub fn component_name(raw: &str) -> String {
    let out: String = raw
        .split(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
        .filter(|piece| !piece.is_empty())
        .map(capitalize)
        .collect();
    if out.is_empty() { "Unnamed".to_string() } else { out }
}

/// `sign_up` → `SignUp`, `admin.sign_up` → `AdminSignUp`.
pub fn pascal_case(raw: &str) -> String {
    raw.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|piece| !piece.is_empty())
        .map(capitalize)
        .collect()
}

fn capitalize(piece: &str) -> String {
    let mut chars = piece.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
