//! Emission of the schema tree as OpenAPI 3.1 JSON.
use serde_json::{json, Map, Value};

use crate::compile::CompiledParameter;
use crate::ir::{Kind, ObjectSchema, Schema};

pub const COMPONENT_PREFIX: &str = "#/components/schemas/";

pub fn ref_path(name: &str) -> String {
    format!("{COMPONENT_PREFIX}{name}")
}

/// `type`, widened to `[type, "null"]` for nullable nodes.
fn type_of(name: &str, nullable: bool) -> Value {
    if nullable { json!([name, "null"]) } else { Value::from(name) }
}

pub fn schema_to_json(schema: &Schema) -> Value {
    let mut o = match &schema.kind {
        Kind::Null => json!({ "type": "null" }),

        Kind::Scalar { ty, format, enum_values } => {
            let mut o = json!({ "type": type_of(ty.as_str(), schema.nullable) });
            if let Some(format) = format {
                o["format"] = Value::from(format.as_str());
            }
            if !enum_values.is_empty() {
                let mut values: Vec<Value> = enum_values.iter().cloned().map(Value::from).collect();
                if schema.nullable {
                    values.push(Value::Null);
                }
                o["enum"] = Value::Array(values);
            }
            o
        }

        Kind::Ref(name) => json!({ "$ref": ref_path(name) }),

        Kind::Array(items) => json!({
            "type": type_of("array", schema.nullable),
            "items": schema_to_json(items),
        }),

        Kind::Object(object) => object_to_json(object, schema.nullable),

        Kind::OneOf(arms) => json!({ "oneOf": arms.iter().map(schema_to_json).collect::<Vec<_>>() }),
    };
    if let Some(description) = &schema.description {
        o["description"] = Value::from(description.as_str());
    }
    if schema.deprecated {
        o["deprecated"] = Value::Bool(true);
    }
    o
}

fn object_to_json(object: &ObjectSchema, nullable: bool) -> Value {
    let mut map = Map::new();
    map.insert("type".into(), type_of("object", nullable));
    let properties: Map<String, Value> = object
        .properties
        .iter()
        .map(|(name, schema)| (name.clone(), schema_to_json(schema)))
        .collect();
    map.insert("properties".into(), Value::Object(properties));
    if !object.required.is_empty() {
        map.insert(
            "required".into(),
            Value::Array(object.required.iter().cloned().map(Value::from).collect()),
        );
    }
    Value::Object(map)
}

/// An OpenAPI parameter object.
pub fn parameter_to_json(parameter: &CompiledParameter) -> Value {
    let mut o = json!({
        "name": parameter.name,
        "in": parameter.location.as_str(),
        "required": parameter.required,
    });
    if let Some(description) = &parameter.description {
        o["description"] = Value::from(description.as_str());
    }
    o["schema"] = schema_to_json(&parameter.schema);
    o
}
