//! Scalar refinement rules.
//!
//! Evaluated in `RULES` order against a scalar (or array-item) descriptor;
//! the first rule that matches decides the enum/format. When none match the
//! keyword fallback decides the bare type.
use once_cell::sync::Lazy;
use regex::Regex;

use super::Hints;
use crate::ir::{Format, Kind, ScalarType, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Enumerable,
    Uri,
    LanguageCode,
    Timestamp,
    Email,
}

pub const RULES: [Rule; 5] = [
    Rule::Enumerable,
    Rule::Uri,
    Rule::LanguageCode,
    Rule::Timestamp,
    Rule::Email,
];

/// Substrings that veto the email rule even when "email" is mentioned.
const EMAIL_EXCLUSIONS: &[&str] = &[
    "hash",
    "sha",
    "domain",
    "count",
    "confirmation email",
    "email that will be sent",
    "the id of",
];

static ENUMERABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\benumerable\b").expect("regex"));
static URI: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(url|uri)s?\b").expect("regex"));
static ISO_639: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\biso[\s-]*639").expect("regex"));
static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)datetime-format/?#(date-?time|date)\b|\biso[\s-]*8601\s+(date-?time|date)\b")
        .expect("regex")
});
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\be-?mail").expect("regex"));
static STANDALONE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(^|[^a-z0-9])id([^a-z0-9]|$)").expect("regex"));
static KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(string|integer|boolean|number|float)\b").expect("regex"));

impl Rule {
    /// Refinements only make sense on strings; an `Integer` descriptor that
    /// mentions a URL is still an integer.
    fn applies_to(self, ty: ScalarType) -> bool {
        ty == ScalarType::String
    }

    pub fn apply(self, descriptor: &str, hints: &Hints) -> Option<Schema> {
        match self {
            Rule::Enumerable => {
                if hints.enum_values.is_empty() {
                    if ENUMERABLE.is_match(descriptor) {
                        log::debug!("`{}` is marked enumerable but lists no values", hints.name);
                    }
                    return None;
                }
                Some(Schema::string_enum(hints.enum_values.to_vec()))
            }
            Rule::Uri => URI.is_match(descriptor).then(|| Schema::formatted(ScalarType::String, Format::Uri)),
            Rule::LanguageCode => ISO_639
                .is_match(descriptor)
                .then(|| Schema::formatted(ScalarType::String, Format::Iso6391)),
            Rule::Timestamp => {
                let caps = TIMESTAMP.captures(descriptor)?;
                let target = caps.get(1).or_else(|| caps.get(2))?.as_str().to_ascii_lowercase();
                let format = if target.contains("time") { Format::DateTime } else { Format::Date };
                Some(Schema::formatted(ScalarType::String, format))
            }
            Rule::Email => mentions_email(descriptor, hints)
                .then(|| Schema::formatted(ScalarType::String, Format::Email)),
        }
    }
}

fn mentions_email(descriptor: &str, hints: &Hints) -> bool {
    let text = format!("{} {} {}", hints.name, descriptor, hints.description).to_lowercase();
    if !EMAIL.is_match(&text) {
        return false;
    }
    if EMAIL_EXCLUSIONS.iter().any(|needle| text.contains(needle)) {
        return false;
    }
    !STANDALONE_ID.is_match(&text)
}

/// Keyword fallback: the earliest type keyword in the descriptor, else string.
pub fn base_type(descriptor: &str) -> ScalarType {
    let Some(m) = KEYWORD.find(descriptor) else {
        return ScalarType::String;
    };
    match m.as_str().to_ascii_lowercase().as_str() {
        "integer" => ScalarType::Integer,
        "boolean" => ScalarType::Boolean,
        "number" | "float" => ScalarType::Number,
        _ => ScalarType::String,
    }
}

pub fn infer_scalar(descriptor: &str, hints: &Hints) -> Schema {
    let ty = base_type(descriptor);
    for rule in RULES {
        if !rule.applies_to(ty) {
            continue;
        }
        if let Some(schema) = rule.apply(descriptor, hints) {
            return schema;
        }
    }
    Schema::scalar(ty)
}

/// True for a plain `string` scalar without enum or format.
pub fn is_plain_string(schema: &Schema) -> bool {
    matches!(
        &schema.kind,
        Kind::Scalar { ty: ScalarType::String, format: None, enum_values } if enum_values.is_empty()
    )
}
