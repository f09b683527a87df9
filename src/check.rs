//! Structural self-check of emitted components.
//!
//! Runs on the emitted JSON rather than the tree so it sees exactly what a
//! consumer would.
use serde_json::{Map, Value};

use crate::compile::CompiledSchemas;
use crate::lower::COMPONENT_PREFIX;
use crate::naming;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Problem {
    #[error("invalid component name `{name}`")]
    InvalidName { name: String },
    #[error("{location}: `$ref` to missing component `{target}`")]
    DanglingRef { location: String, target: String },
    #[error("{location}: empty `enum`")]
    EmptyEnum { location: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckReport {
    pub entities: usize,
    pub shared: usize,
    pub problems: Vec<Problem>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool { self.problems.is_empty() }
}

pub fn check(compiled: &CompiledSchemas) -> CheckReport {
    let schemas = compiled.schemas_json();
    let problems = match schemas.as_object() {
        Some(map) => check_schemas(map),
        None => Vec::new(),
    };
    CheckReport { entities: compiled.entities.len(), shared: compiled.shared.len(), problems }
}

/// Check a `components.schemas` map.
pub fn check_schemas(schemas: &Map<String, Value>) -> Vec<Problem> {
    let mut problems = Vec::new();
    for (name, schema) in schemas {
        if !naming::is_valid_component_name(name) {
            problems.push(Problem::InvalidName { name: name.clone() });
        }
        walk(schema, name, schemas, &mut problems);
    }
    problems
}

fn walk(value: &Value, location: &str, schemas: &Map<String, Value>, problems: &mut Vec<Problem>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match (key.as_str(), child) {
                    ("$ref", Value::String(target)) => {
                        let resolved = target
                            .strip_prefix(COMPONENT_PREFIX)
                            .is_some_and(|name| schemas.contains_key(name));
                        if !resolved {
                            problems.push(Problem::DanglingRef {
                                location: location.to_string(),
                                target: target.clone(),
                            });
                        }
                    }
                    ("enum", Value::Array(values)) if values.is_empty() => {
                        problems.push(Problem::EmptyEnum { location: location.to_string() });
                    }
                    // property names are data, not keywords
                    ("properties", Value::Object(properties)) => {
                        for (property, schema) in properties {
                            walk(schema, &format!("{location}/{property}"), schemas, problems);
                        }
                    }
                    _ => walk(child, location, schemas, problems),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, location, schemas, problems);
            }
        }
        _ => {}
    }
}
