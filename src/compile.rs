//! Pipeline front end.
//!
//! inheritance → per-entity tree build (parallel) → property sort → barrier →
//! enum dedup → shared components.
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use serde_json::{Map, Value};

use crate::builder::TreeBuilder;
use crate::config::CompilerConfig;
use crate::dedup;
use crate::inference::{self, Hints, TypeInference};
use crate::inherit;
use crate::ir::Schema;
use crate::lower;
use crate::naming;
use crate::path::AttributePath;
use crate::record::{DocumentationSet, EntityRecord, ParameterLocation, ParameterRecord};
use crate::sort;

// ———— TYPES ————

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSchemas {
    /// Entity component name → root object schema.
    pub entities: BTreeMap<String, Schema>,
    /// Shared enums and the scope list.
    pub shared: BTreeMap<String, Schema>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub description: Option<String>,
    pub schema: Schema,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDocument {
    pub schemas: CompiledSchemas,
    /// Operation label → parameters, in documented order.
    pub parameters: BTreeMap<String, Vec<CompiledParameter>>,
}

#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

// ———— IMPLEMENTATION ————

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig { &self.config }

    /// Names a `[Entity]` descriptor may resolve to.
    pub fn known_entities(&self, entities: &[EntityRecord]) -> BTreeSet<String> {
        entities
            .iter()
            .map(|e| e.name.as_str())
            .chain(self.config.known_entities.iter().map(String::as_str))
            .map(naming::component_name)
            .collect()
    }

    pub fn compile(&self, entities: &[EntityRecord]) -> CompiledSchemas {
        let known = self.known_entities(entities);
        let resolved = inherit::resolve(entities, &self.config);

        let built: Vec<(String, Schema)> = resolved
            .par_iter()
            .map(|entity| {
                let builder = TreeBuilder::new(TypeInference::new(&known, &self.config));
                let mut root = Schema::object(builder.build(&entity.attributes)).with_description(entity.description);
                sort::sort_schema(&mut root);
                (entity.name.clone(), root)
            })
            .collect();

        let mut trees = BTreeMap::new();
        for (name, tree) in built {
            if trees.insert(name.clone(), tree).is_some() {
                log::warn!("entity `{name}` appears more than once; keeping the last");
            }
        }

        let table = dedup::collect(&trees, &self.config.enum_names);
        let entities = dedup::rewrite(trees, &table);
        let mut shared = table.to_schemas();

        let scope_component = self.config.scope_component.as_str();
        if entities.values().any(|tree| tree.refers_to(scope_component)) {
            if shared.contains_key(scope_component) || entities.contains_key(scope_component) {
                log::warn!("`{scope_component}` is already a component name; scope list not emitted");
            } else {
                shared.insert(scope_component.to_string(), self.scope_schema());
            }
        }

        log::info!("compiled {} entities, {} shared components", entities.len(), shared.len());
        CompiledSchemas { entities, shared }
    }

    fn scope_schema(&self) -> Schema {
        let items = if self.config.oauth_scopes.is_empty() {
            Schema::string()
        } else {
            Schema::string_enum(self.config.oauth_scopes.clone())
        };
        Schema::array(items).with_description("OAuth scopes")
    }

    /// Parameter schemas through the same inference as attributes. A `[]`
    /// suffix on the name makes the schema an array.
    pub fn compile_parameters(&self, parameters: &[ParameterRecord], known: &BTreeSet<String>) -> Vec<CompiledParameter> {
        let engine = TypeInference::new(known, &self.config);
        parameters
            .iter()
            .map(|record| {
                let path = AttributePath::parse(&record.name);
                let descriptor = if record.name.ends_with("[]") && !inference::describes_array(&record.type_descriptor) {
                    Cow::Owned(format!("Array of {}", record.type_descriptor))
                } else {
                    Cow::Borrowed(record.type_descriptor.as_str())
                };
                let schema = engine.infer(&descriptor, &Hints::for_parameter(path.last(), record));
                let description = Some(record.description.trim())
                    .filter(|d| !d.is_empty())
                    .map(str::to_string);
                CompiledParameter {
                    name: record.name.clone(),
                    location: record.location,
                    required: record.required || record.location == ParameterLocation::Path,
                    description,
                    schema,
                }
            })
            .collect()
    }

    pub fn compile_set(&self, set: &DocumentationSet) -> CompiledDocument {
        let schemas = self.compile(&set.entities);
        let known = self.known_entities(&set.entities);
        let mut parameters: BTreeMap<String, Vec<CompiledParameter>> = BTreeMap::new();
        for method in &set.methods {
            let compiled = self.compile_parameters(&method.parameters, &known);
            parameters.entry(method.operation.clone()).or_default().extend(compiled);
        }
        CompiledDocument { schemas, parameters }
    }
}

impl CompiledSchemas {
    /// Entities and shared components in one map. An entity wins a name clash.
    pub fn all(&self) -> BTreeMap<&str, &Schema> {
        self.shared
            .iter()
            .chain(&self.entities)
            .map(|(name, schema)| (name.as_str(), schema))
            .collect()
    }

    pub fn schemas_json(&self) -> Value {
        let map: Map<String, Value> = self
            .all()
            .into_iter()
            .map(|(name, schema)| (name.to_string(), lower::schema_to_json(schema)))
            .collect();
        Value::Object(map)
    }

    /// `{"components": {"schemas": {...}}}`
    pub fn to_json(&self) -> Value {
        serde_json::json!({ "components": { "schemas": self.schemas_json() } })
    }
}

impl CompiledDocument {
    /// [`CompiledSchemas::to_json`] plus a `parameters` map when any
    /// operation was documented.
    pub fn to_json(&self) -> Value {
        let mut out = self.schemas.to_json();
        if !self.parameters.is_empty() {
            let parameters: Map<String, Value> = self
                .parameters
                .iter()
                .map(|(operation, list)| {
                    let list = list.iter().map(lower::parameter_to_json).collect();
                    (operation.clone(), Value::Array(list))
                })
                .collect();
            out["parameters"] = Value::Object(parameters);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ir::{Format, Kind};
    use crate::record::{AttributeRecord, MethodRecord};

    fn visibility() -> AttributeRecord {
        AttributeRecord::new("visibility", "String").with_enum(["public", "unlisted", "private", "direct"])
    }

    #[test]
    fn shared_enum_across_unrelated_entities() {
        let compiled = Compiler::default().compile(&[
            EntityRecord::new("A", vec![visibility()]),
            EntityRecord::new("B", vec![visibility()]),
        ]);
        let out = compiled.to_json();
        let schemas = &out["components"]["schemas"];
        assert_eq!(
            schemas["VisibilityEnum"],
            json!({ "type": "string", "enum": ["direct", "private", "public", "unlisted"] })
        );
        for entity in ["A", "B"] {
            assert_eq!(
                schemas[entity]["properties"]["visibility"],
                json!({ "$ref": "#/components/schemas/VisibilityEnum" })
            );
            assert_eq!(schemas[entity]["required"], json!(["visibility"]));
        }
    }

    #[test]
    fn scope_component_only_when_referenced() {
        let compiler = Compiler::default();
        let plain = compiler.compile(&[EntityRecord::new("A", vec![AttributeRecord::new("id", "String")])]);
        assert!(plain.shared.is_empty());

        let with_scopes = compiler.compile(&[EntityRecord::new(
            "Application",
            vec![AttributeRecord::new("scopes", "Array of String")],
        )]);
        let scopes = &with_scopes.shared["OAuthScopes"];
        assert!(scopes.items().unwrap().enum_values().unwrap().contains(&"read:statuses".to_string()));
        assert_eq!(with_scopes.entities["Application"].as_object().unwrap().properties["scopes"].kind, Kind::Ref("OAuthScopes".into()));
    }

    #[test]
    fn entity_names_are_sanitized_and_referenced() {
        let compiled = Compiler::default().compile(&[
            EntityRecord::new("Admin::Account", vec![AttributeRecord::new("id", "String")]),
            EntityRecord::new("Report", vec![AttributeRecord::new("target_account", "[Admin::Account]")]),
        ]);
        assert!(compiled.entities.contains_key("AdminAccount"));
        let target = &compiled.entities["Report"].as_object().unwrap().properties["target_account"];
        assert_eq!(target.kind, Kind::Ref("AdminAccount".into()));
    }

    #[test]
    fn entity_description_lands_on_root() {
        let mut entity = EntityRecord::new("Tag", vec![AttributeRecord::new("name", "String")]);
        entity.description = "A hashtag.".into();
        let compiled = Compiler::default().compile(&[entity]);
        assert_eq!(compiled.entities["Tag"].description.as_deref(), Some("A hashtag."));
    }

    #[test]
    fn parameters_share_inference() {
        let compiler = Compiler::default();
        let known: BTreeSet<String> = BTreeSet::new();
        let params = vec![
            ParameterRecord {
                name: "id".into(),
                type_descriptor: "String".into(),
                location: ParameterLocation::Path,
                ..ParameterRecord::default()
            },
            ParameterRecord {
                name: "media_ids[]".into(),
                type_descriptor: "String".into(),
                ..ParameterRecord::default()
            },
            ParameterRecord {
                name: "redirect_uri".into(),
                type_descriptor: "String (URL)".into(),
                description: "Where to send the user".into(),
                required: true,
                location: ParameterLocation::FormData,
                ..ParameterRecord::default()
            },
        ];
        let compiled = compiler.compile_parameters(&params, &known);
        assert!(compiled[0].required);
        assert!(compiled[1].schema.is_array());
        assert!(!compiled[1].required);
        assert!(matches!(compiled[2].schema.kind, Kind::Scalar { format: Some(Format::Uri), .. }));

        let v = lower::parameter_to_json(&compiled[2]);
        assert_eq!(v["in"], json!("formData"));
        assert_eq!(v["description"], json!("Where to send the user"));
    }

    #[test]
    fn documentation_set_emits_parameters() {
        let set = DocumentationSet {
            entities: vec![EntityRecord::new("Status", vec![AttributeRecord::new("id", "String")])],
            methods: vec![MethodRecord {
                operation: "GET /api/v1/statuses/:id".into(),
                parameters: vec![ParameterRecord {
                    name: "id".into(),
                    type_descriptor: "String".into(),
                    location: ParameterLocation::Path,
                    ..ParameterRecord::default()
                }],
            }],
        };
        let out = Compiler::default().compile_set(&set).to_json();
        assert_eq!(out["parameters"]["GET /api/v1/statuses/:id"][0]["in"], json!("path"));
        assert!(out["components"]["schemas"]["Status"].is_object());
    }
}
