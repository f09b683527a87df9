//! Name-based overrides.
//!
//! These run after descriptor inference and win over whatever the text said.
use crate::config::CompilerConfig;
use crate::ir::{Format, Kind, ScalarType, Schema};

pub fn apply(schema: Schema, name: &str, config: &CompilerConfig) -> Schema {
    let schema = timestamp_suffix(schema, name, config);
    scope_list(schema, name, config)
}

/// `*_at` → date-time unless a format is already known; sentinel-zero
/// attributes → integer with no format.
fn timestamp_suffix(mut schema: Schema, name: &str, config: &CompilerConfig) -> Schema {
    let Kind::Scalar { ty, format, enum_values } = &mut schema.kind else {
        return schema;
    };
    if config.is_sentinel_zero(name) {
        *ty = ScalarType::Integer;
        *format = None;
        enum_values.clear();
    } else if name.ends_with("_at") && format.is_none() && enum_values.is_empty() {
        *ty = ScalarType::String;
        *format = Some(Format::DateTime);
    }
    schema
}

/// An array of strings under a scope attribute becomes the shared scope list.
fn scope_list(schema: Schema, name: &str, config: &CompilerConfig) -> Schema {
    if !config.is_scope_attribute(name) {
        return schema;
    }
    let is_string_list = schema
        .items()
        .is_some_and(|items| matches!(items.kind, Kind::Scalar { ty: ScalarType::String, .. }));
    if is_string_list {
        Schema::reference(config.scope_component.clone())
    } else {
        schema
    }
}
