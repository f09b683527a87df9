//! Deterministic property order: required first, then the rest, each
//! alphabetical. Presentation only; never changes semantics.
use crate::ir::{Kind, ObjectSchema, Schema};

pub fn sort_schema(schema: &mut Schema) {
    match &mut schema.kind {
        Kind::Object(object) => sort_object(object),
        Kind::Array(items) => sort_schema(items),
        Kind::Null | Kind::Scalar { .. } | Kind::Ref(_) | Kind::OneOf(_) => {}
    }
}

pub fn sort_object(object: &mut ObjectSchema) {
    let ObjectSchema { properties, required } = object;
    required.sort();
    properties.sort_by(|a, _, b, _| {
        let a_key = (!required.contains(a), a);
        let b_key = (!required.contains(b), b);
        a_key.cmp(&b_key)
    });
    for property in properties.values_mut() {
        sort_schema(property);
    }
}
