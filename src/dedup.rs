//! Cross-entity enum consolidation.
//!
//! Two pure passes over the finished entity trees:
//! [`collect`] counts every inline enum by its [`EnumSignature`] and names a
//! shared component the second time a signature shows up; [`rewrite`] then
//! replaces every occurrence of a component-backed signature, the first one
//! included, with a reference.
use std::collections::{BTreeMap, BTreeSet};

use crate::config::EnumNameOverride;
use crate::ir::{Kind, Schema};
use crate::naming;
use crate::nullability;

// ———— SIGNATURES ————

/// Canonical identity of an enumeration: its sorted, deduplicated values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnumSignature {
    key: String,
    values: Vec<String>,
}

impl EnumSignature {
    pub fn of(values: &[String]) -> Self {
        let values: Vec<String> = values
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let key = serde_json::Value::from(values.clone()).to_string();
        Self { key, values }
    }

    /// JSON array text of the canonical values.
    pub fn key(&self) -> &str { &self.key }

    pub fn values(&self) -> &[String] { &self.values }
}

// ———— TABLE ————

#[derive(Debug, Clone, PartialEq)]
pub struct SharedEnum {
    pub name: String,
    pub signature: EnumSignature,
}

#[derive(Debug, Clone, Default)]
pub struct SignatureTable {
    occurrences: BTreeMap<String, usize>,
    /// In creation order.
    components: Vec<SharedEnum>,
    /// Signature key → index into `components`.
    by_key: BTreeMap<String, usize>,
}

impl SignatureTable {
    /// Component backing this value list, if the signature was shared.
    pub fn component_for(&self, values: &[String]) -> Option<&str> {
        let signature = EnumSignature::of(values);
        self.by_key.get(signature.key()).map(|&i| self.components[i].name.as_str())
    }

    pub fn occurrences(&self, values: &[String]) -> usize {
        self.occurrences.get(EnumSignature::of(values).key()).copied().unwrap_or(0)
    }

    pub fn components(&self) -> &[SharedEnum] { &self.components }

    pub fn is_empty(&self) -> bool { self.components.is_empty() }

    /// `{type: string, enum: [...]}` per component, keyed by name.
    pub fn to_schemas(&self) -> BTreeMap<String, Schema> {
        self.components
            .iter()
            .map(|c| (c.name.clone(), Schema::string_enum(c.signature.values().to_vec())))
            .collect()
    }

    fn observe(&mut self, entity: &str, property: &str, values: &[String], ctx: &NamingContext) {
        let signature = EnumSignature::of(values);
        let count = self.occurrences.entry(signature.key().to_string()).or_insert(0);
        *count += 1;
        if *count != 2 {
            return;
        }
        let name = self.allocate_name(entity, property, ctx);
        log::debug!("`{entity}.{property}`: sharing enum {} as `{name}`", signature.key());
        self.by_key.insert(signature.key().to_string(), self.components.len());
        self.components.push(SharedEnum { name, signature });
    }

    fn allocate_name(&self, entity: &str, property: &str, ctx: &NamingContext) -> String {
        let pascal = naming::pascal_case(property);
        let preferred = ctx
            .overrides
            .iter()
            .find(|o| o.matches(entity, property))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| format!("{pascal}Enum"));
        let qualified = format!("{entity}{pascal}Enum");
        for candidate in [preferred, qualified.clone()] {
            if !self.is_taken(&candidate, ctx) {
                return candidate;
            }
        }
        (2..)
            .map(|n| format!("{qualified}{n}"))
            .find(|candidate| !self.is_taken(candidate, ctx))
            .unwrap_or(qualified)
    }

    fn is_taken(&self, name: &str, ctx: &NamingContext) -> bool {
        ctx.reserved.contains(name) || self.components.iter().any(|c| c.name == name)
    }
}

struct NamingContext<'a> {
    overrides: &'a [EnumNameOverride],
    /// Entity component names; a shared enum never shadows one.
    reserved: BTreeSet<&'a str>,
}

// ———— PASSES ————

/// Count signatures over all trees, walking entities in name order so the
/// names handed out do not depend on input order.
pub fn collect(trees: &BTreeMap<String, Schema>, overrides: &[EnumNameOverride]) -> SignatureTable {
    let ctx = NamingContext { overrides, reserved: trees.keys().map(String::as_str).collect() };
    let mut table = SignatureTable::default();
    for (entity, tree) in trees {
        visit(tree, "", &mut |property: &str, values: &[String]| table.observe(entity, property, values, &ctx));
    }
    table
}

/// Replace shared enums with references. Descriptions stay on the property;
/// a nullable enum becomes `oneOf [ref, null]`.
pub fn rewrite(mut trees: BTreeMap<String, Schema>, table: &SignatureTable) -> BTreeMap<String, Schema> {
    if table.is_empty() {
        return trees;
    }
    for tree in trees.values_mut() {
        rewrite_schema(tree, table);
    }
    trees
}

/// Calls `found(property, values)` for every inline enum, attributing array
/// items and union arms to the property that holds them.
fn visit(schema: &Schema, property: &str, found: &mut dyn FnMut(&str, &[String])) {
    if let Some(values) = schema.enum_values() {
        found(property, values);
        return;
    }
    match &schema.kind {
        Kind::Object(object) => {
            for (name, child) in &object.properties {
                visit(child, name, found);
            }
        }
        Kind::Array(items) => visit(items, property, found),
        Kind::OneOf(arms) => {
            for arm in arms {
                visit(arm, property, found);
            }
        }
        Kind::Null | Kind::Scalar { .. } | Kind::Ref(_) => {}
    }
}

fn rewrite_schema(schema: &mut Schema, table: &SignatureTable) {
    if let Some(name) = schema.enum_values().and_then(|values| table.component_for(values)) {
        let name = name.to_string();
        let nullable = std::mem::take(&mut schema.nullable);
        schema.kind = Kind::Ref(name);
        if nullable {
            nullability::make_nullable(schema);
        }
        return;
    }
    match &mut schema.kind {
        Kind::Object(object) => {
            for child in object.properties.values_mut() {
                rewrite_schema(child, table);
            }
        }
        Kind::Array(items) => rewrite_schema(items, table),
        Kind::OneOf(arms) => {
            for arm in arms {
                rewrite_schema(arm, table);
            }
        }
        Kind::Null | Kind::Scalar { .. } | Kind::Ref(_) => {}
    }
}
