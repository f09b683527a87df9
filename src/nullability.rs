//! Nullability and required-set membership.
//!
//! A property is required iff its record exists, is not optional and is not
//! nullable. Nullable wins over a missing `optional` flag: documentation uses
//! "nullable" for fields the server may also omit.
use crate::ir::{Kind, Schema};
use crate::record::AttributeRecord;

/// Union an already-inferred fragment with null.
///
/// - reference → `oneOf [ref, null]`
/// - union → one more `null` alternative (once)
/// - anything else → `[type, "null"]`, format kept
pub fn make_nullable(schema: &mut Schema) {
    match &mut schema.kind {
        Kind::Null => {}
        Kind::Ref(name) => {
            let reference = Schema::reference(std::mem::take(name));
            schema.kind = Kind::OneOf(vec![reference, Schema::null()]);
        }
        Kind::OneOf(alternatives) => {
            if !alternatives.iter().any(Schema::is_null) {
                alternatives.push(Schema::null());
            }
        }
        Kind::Scalar { .. } | Kind::Array(_) | Kind::Object(_) => schema.nullable = true,
    }
}

pub fn is_required(record: &AttributeRecord) -> bool {
    !record.optional && !record.nullable
}

/// Apply the record's nullability to its property and report whether the
/// property joins its parent's required set. Properties synthesised without a
/// record (intermediate objects) are never required.
pub fn resolve(schema: &mut Schema, record: Option<&AttributeRecord>) -> bool {
    let Some(record) = record else {
        return false;
    };
    if record.nullable {
        make_nullable(schema);
    }
    is_required(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Format, ScalarType};

    #[test]
    fn reference_is_wrapped_in_union() {
        let mut s = Schema::reference("Account").with_description("moved to");
        make_nullable(&mut s);
        match &s.kind {
            Kind::OneOf(arms) => {
                assert_eq!(arms[0].kind, Kind::Ref("Account".into()));
                assert!(arms[1].is_null());
            }
            other => panic!("expected oneOf, got {other:?}"),
        }
        assert_eq!(s.description.as_deref(), Some("moved to"));
        assert!(!s.nullable);
    }

    #[test]
    fn union_gains_single_null() {
        let mut s = Schema::one_of(vec![Schema::string(), Schema::scalar(ScalarType::Integer)]);
        make_nullable(&mut s);
        make_nullable(&mut s);
        let Kind::OneOf(arms) = &s.kind else { panic!() };
        assert_eq!(arms.len(), 3);
    }

    #[test]
    fn scalar_keeps_format() {
        let mut s = Schema::formatted(ScalarType::String, Format::Uri);
        make_nullable(&mut s);
        assert!(s.nullable);
        assert!(matches!(s.kind, Kind::Scalar { format: Some(Format::Uri), .. }));
    }

    #[test]
    fn nullable_never_required() {
        for optional in [false, true] {
            let rec = AttributeRecord { optional, nullable: true, ..AttributeRecord::new("x", "String") };
            let mut s = Schema::string();
            assert!(!resolve(&mut s, Some(&rec)));
            assert!(s.nullable);
        }
        let rec = AttributeRecord::new("x", "String");
        assert!(resolve(&mut Schema::string(), Some(&rec)));
        assert!(!resolve(&mut Schema::string(), Some(&rec.clone().optional())));
        assert!(!resolve(&mut Schema::empty_object(), None));
    }
}
