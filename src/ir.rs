// Strongly-typed schema tree. No serde_json::Value here; see `lower` for emission.

use indexmap::{IndexMap, IndexSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ScalarType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Uri,
    Email,
    Date,
    DateTime,
    Iso6391,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uri => "uri",
            Self::Email => "email",
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Iso6391 => "iso-639-1",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    /// Exactly null; only appears as a union alternative.
    Null,
    Scalar {
        ty: ScalarType,
        format: Option<Format>,
        enum_values: Vec<String>,
    },
    /// Named shared component.
    Ref(String),
    Array(Box<Schema>),
    Object(ObjectSchema),
    OneOf(Vec<Schema>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, Schema>,
    pub required: IndexSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub kind: Kind,
    /// `[type, "null"]` on emission. References and unions never set this;
    /// they carry an explicit `Null` alternative instead.
    pub nullable: bool,
    pub description: Option<String>,
    pub deprecated: bool,
}

impl From<Kind> for Schema {
    fn from(kind: Kind) -> Self {
        Self { kind, nullable: false, description: None, deprecated: false }
    }
}

impl Schema {
    pub fn null() -> Self { Kind::Null.into() }

    pub fn scalar(ty: ScalarType) -> Self {
        Kind::Scalar { ty, format: None, enum_values: Vec::new() }.into()
    }

    pub fn string() -> Self { Self::scalar(ScalarType::String) }

    pub fn formatted(ty: ScalarType, format: Format) -> Self {
        Kind::Scalar { ty, format: Some(format), enum_values: Vec::new() }.into()
    }

    pub fn string_enum(values: Vec<String>) -> Self {
        Kind::Scalar { ty: ScalarType::String, format: None, enum_values: values }.into()
    }

    pub fn reference(name: impl Into<String>) -> Self { Kind::Ref(name.into()).into() }

    pub fn array(items: Schema) -> Self { Kind::Array(Box::new(items)).into() }

    pub fn object(object: ObjectSchema) -> Self { Kind::Object(object).into() }

    pub fn empty_object() -> Self { Self::object(ObjectSchema::default()) }

    pub fn one_of(alternatives: Vec<Schema>) -> Self { Kind::OneOf(alternatives).into() }

    pub fn with_description(mut self, description: &str) -> Self {
        let description = description.trim();
        if !description.is_empty() {
            self.description = Some(description.to_string());
        }
        self
    }

    pub fn is_null(&self) -> bool { matches!(self.kind, Kind::Null) }

    pub fn is_object(&self) -> bool { matches!(self.kind, Kind::Object(_)) }

    pub fn is_array(&self) -> bool { matches!(self.kind, Kind::Array(_)) }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match &self.kind {
            Kind::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectSchema> {
        match &mut self.kind {
            Kind::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&Schema> {
        match &self.kind {
            Kind::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn items_mut(&mut self) -> Option<&mut Schema> {
        match &mut self.kind {
            Kind::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Inline enum values of a scalar node, if any.
    pub fn enum_values(&self) -> Option<&[String]> {
        match &self.kind {
            Kind::Scalar { enum_values, .. } if !enum_values.is_empty() => Some(enum_values),
            _ => None,
        }
    }

    /// Every component name this subtree points at.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_references(self, &mut out);
        out
    }

    pub fn refers_to(&self, name: &str) -> bool {
        self.references().into_iter().any(|r| r == name)
    }
}

fn collect_references<'a>(schema: &'a Schema, out: &mut Vec<&'a str>) {
    match &schema.kind {
        Kind::Ref(name) => out.push(name),
        Kind::Array(items) => collect_references(items, out),
        Kind::Object(o) => {
            for prop in o.properties.values() {
                collect_references(prop, out);
            }
        }
        Kind::OneOf(alts) => {
            for alt in alts {
                collect_references(alt, out);
            }
        }
        Kind::Null | Kind::Scalar { .. } => {}
    }
}

impl ObjectSchema {
    /// Insert or replace a property; a later insert for the same name wins,
    /// including its required-set membership.
    pub fn insert(&mut self, name: String, schema: Schema, required: bool) {
        if required {
            self.required.insert(name.clone());
        } else {
            self.required.shift_remove(&name);
        }
        self.properties.insert(name, schema);
    }

    /// Fold another level's properties into this one.
    pub fn merge(&mut self, other: ObjectSchema) {
        let ObjectSchema { properties, required } = other;
        for (name, schema) in properties {
            let is_required = required.contains(&name);
            self.insert(name, schema, is_required);
        }
    }

    pub fn is_empty(&self) -> bool { self.properties.is_empty() }
}
