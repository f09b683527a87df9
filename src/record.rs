//! Input records as produced by the documentation parsers.
//!
//! Everything here is plain data; the compiler only ever reads it.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::path_de::{from_value_with_path, PathError};

/// One documented field of an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRecord {
    /// Raw path, may contain `.`, `[]` and `[key]` segments.
    pub name: String,
    #[serde(alias = "type")]
    pub type_descriptor: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub enum_values: Vec<String>,
    #[serde(default)]
    pub versions: Vec<String>,
}

impl AttributeRecord {
    pub fn new(name: impl Into<String>, type_descriptor: impl Into<String>) -> Self {
        Self { name: name.into(), type_descriptor: type_descriptor.into(), ..Self::default() }
    }

    pub fn optional(mut self) -> Self { self.optional = true; self }

    pub fn nullable(mut self) -> Self { self.nullable = true; self }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: Vec<AttributeRecord>,
}

impl EntityRecord {
    pub fn new(name: impl Into<String>, attributes: Vec<AttributeRecord>) -> Self {
        Self { name: name.into(), description: String::new(), attributes }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterLocation {
    #[default]
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "path")]
    Path,
    #[serde(rename = "header")]
    Header,
    #[serde(rename = "formData", alias = "body")]
    FormData,
}

impl ParameterLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Path => "path",
            Self::Header => "header",
            Self::FormData => "formData",
        }
    }
}

/// One documented endpoint parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterRecord {
    pub name: String,
    #[serde(alias = "type")]
    pub type_descriptor: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub enum_values: Vec<String>,
    #[serde(default, alias = "in")]
    pub location: ParameterLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRecord {
    /// Free-form label, e.g. `GET /api/v1/accounts/:id`.
    pub operation: String,
    #[serde(default)]
    pub parameters: Vec<ParameterRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentationSet {
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
    #[serde(default)]
    pub methods: Vec<MethodRecord>,
}

/// Accepted shapes for one input document.
///
/// The shape is picked from the JSON itself: an array is a list of entities,
/// an object with `entities` or `methods` is a full set, anything else is a
/// single entity. Errors then point into the chosen shape.
#[derive(Debug, Clone)]
pub enum InputDocument {
    Set(DocumentationSet),
    Entities(Vec<EntityRecord>),
    Entity(EntityRecord),
}

impl InputDocument {
    pub fn from_value(value: Value) -> Result<Self, PathError> {
        let is_set = value
            .as_object()
            .is_some_and(|o| o.contains_key("entities") || o.contains_key("methods"));
        if value.is_array() {
            from_value_with_path(value).map(Self::Entities)
        } else if is_set {
            from_value_with_path(value).map(Self::Set)
        } else {
            from_value_with_path(value).map(Self::Entity)
        }
    }

    pub fn into_set(self) -> DocumentationSet {
        match self {
            Self::Set(set) => set,
            Self::Entities(entities) => DocumentationSet { entities, methods: Vec::new() },
            Self::Entity(entity) => DocumentationSet { entities: vec![entity], methods: Vec::new() },
        }
    }
}

impl<'de> Deserialize<'de> for InputDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl DocumentationSet {
    pub fn extend(&mut self, other: DocumentationSet) {
        self.entities.extend(other.entities);
        self.methods.extend(other.methods);
    }
}
