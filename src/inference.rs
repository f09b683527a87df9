//! Type inference from free-text descriptors.
//!
//! Resolution order (first match wins):
//! 1. shape: `X or Y` unions, `Array of X`, `Hash`/`Object`, `[Entity]` references
//!    (unknown entities are rejected and fall through)
//! 2. scalar refinement rules, see [`rules::RULES`]
//! 3. name overrides (`*_at`, sentinel zeros, scope lists), see [`overrides`]
//!
//! Nothing here fails. Unrecognised text degrades to `string`.
//!
//! Null markers in the descriptor (`or null`, `nullable`) are dropped before
//! matching and carry no meaning of their own: only the record's `nullable`
//! flag makes a property nullable.
pub mod overrides;
pub mod rules;

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::CompilerConfig;
use crate::ir::Schema;
use crate::naming;
use crate::record::{AttributeRecord, ParameterRecord};

static NULL_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bor\s+null\b|\bnullable\b|\(\s*\)").expect("regex"));
static ARRAY_OF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^array(?:\s+of\s+(.+))?$").expect("regex"));
static HASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(hash|object)\b").expect("regex"));
static ENTITY_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([^\]]+)\](?:\([^)]*\))?").expect("regex"));

/// Context signals beside the descriptor itself.
#[derive(Debug, Clone, Copy)]
pub struct Hints<'a> {
    /// The property's own name (last path segment).
    pub name: &'a str,
    pub description: &'a str,
    pub enum_values: &'a [String],
}

impl<'a> Hints<'a> {
    pub fn for_attribute(name: &'a str, record: &'a AttributeRecord) -> Self {
        Self { name, description: &record.description, enum_values: &record.enum_values }
    }

    pub fn for_parameter(name: &'a str, record: &'a ParameterRecord) -> Self {
        Self { name, description: &record.description, enum_values: &record.enum_values }
    }
}

pub struct TypeInference<'c> {
    known_entities: &'c BTreeSet<String>,
    config: &'c CompilerConfig,
}

impl<'c> TypeInference<'c> {
    pub fn new(known_entities: &'c BTreeSet<String>, config: &'c CompilerConfig) -> Self {
        Self { known_entities, config }
    }

    pub fn infer(&self, descriptor: &str, hints: &Hints) -> Schema {
        let shape = self.infer_shape(descriptor, hints);
        overrides::apply(shape, hints.name, self.config)
    }

    fn infer_shape(&self, descriptor: &str, hints: &Hints) -> Schema {
        let descriptor = strip_null_markers(descriptor);
        let descriptor = descriptor.as_str();

        let alternatives = split_alternatives(descriptor);
        if alternatives.len() > 1 {
            let mut arms: Vec<Schema> = Vec::new();
            for alt in alternatives {
                let arm = self.infer_shape(alt, hints);
                if !arms.contains(&arm) {
                    arms.push(arm);
                }
            }
            return if arms.len() == 1 { arms.remove(0) } else { Schema::one_of(arms) };
        }

        if let Some(caps) = ARRAY_OF.captures(descriptor) {
            let items = match caps.get(1) {
                Some(inner) => self.infer_shape(inner.as_str(), hints),
                None => Schema::string(),
            };
            return Schema::array(items);
        }
        if HASH.is_match(descriptor) {
            return Schema::empty_object();
        }
        if let Some(name) = self.entity_reference(descriptor, hints) {
            return Schema::reference(name);
        }
        rules::infer_scalar(descriptor, hints)
    }

    /// `[Account]` or `[Account](link)` naming a known entity.
    fn entity_reference(&self, descriptor: &str, hints: &Hints) -> Option<String> {
        let caps = ENTITY_REF.captures(descriptor)?;
        let raw = caps.get(1)?.as_str();
        let name = naming::component_name(raw);
        if self.known_entities.contains(&name) {
            Some(name)
        } else {
            log::debug!("`{}`: `{raw}` is not a known entity, inferring from text", hints.name);
            None
        }
    }
}

/// Whether the descriptor already spells out an array (`Array of ...`).
pub fn describes_array(descriptor: &str) -> bool {
    ARRAY_OF.is_match(&strip_null_markers(descriptor))
}

fn strip_null_markers(descriptor: &str) -> String {
    let stripped = NULL_MARKER.replace_all(descriptor, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split on ` or ` outside brackets and parentheses.
fn split_alternatives(descriptor: &str) -> Vec<&str> {
    let lower = descriptor.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth -= 1,
            b' ' if depth == 0 && lower[i..].starts_with(" or ") => {
                out.push(descriptor[start..i].trim());
                i += 4;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    out.push(descriptor[start..].trim());
    out.retain(|s| !s.is_empty());
    out
}
