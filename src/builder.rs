//! Schema tree construction for one entity.
//!
//! Records are partitioned by their decomposed path:
//! - direct: one segment, becomes a property of the current level
//! - object-nested: grouped by first segment and built recursively under it
//! - array-item: routed by [`AttributePath::array_prefix`] to the `items` of
//!   an array property that must already exist
//!
//! The builder never fails; malformed input degrades one property at a time.
use std::borrow::Cow;

use indexmap::{IndexMap, IndexSet};

use crate::inference::{self, Hints, TypeInference};
use crate::ir::{Kind, ObjectSchema, Schema};
use crate::nullability;
use crate::path::AttributePath;
use crate::record::AttributeRecord;

struct Entry<'r> {
    path: AttributePath,
    record: &'r AttributeRecord,
}

pub struct TreeBuilder<'c> {
    inference: TypeInference<'c>,
}

impl<'c> TreeBuilder<'c> {
    pub fn new(inference: TypeInference<'c>) -> Self {
        Self { inference }
    }

    /// Build the root object for one entity's (inheritance-expanded) attributes.
    pub fn build(&self, attributes: &[AttributeRecord]) -> ObjectSchema {
        let mut structural = Vec::new();
        let mut array_items: IndexMap<Vec<String>, Vec<Entry>> = IndexMap::new();
        for record in attributes {
            let path = AttributePath::parse(&record.name);
            match path.array_prefix() {
                Some((prefix, tail)) => array_items.entry(prefix).or_default().push(Entry { path: tail, record }),
                None => structural.push(Entry { path, record }),
            }
        }

        let mut root = self.build_level(structural);

        // shorter prefixes first so `a[].b[]` exists before `a[].b[].c` needs it
        let mut groups: Vec<_> = array_items.into_iter().collect();
        groups.sort_by_key(|(prefix, _)| prefix.len());
        for (prefix, entries) in groups {
            match array_items_mut(&mut root, &prefix) {
                Some(items) => {
                    let level = self.build_level(entries);
                    items.merge(level);
                }
                None => log::debug!(
                    "dropping {} item attribute(s) under `{}`: no array property there",
                    entries.len(),
                    prefix.join("."),
                ),
            }
        }
        root
    }

    fn build_level(&self, entries: Vec<Entry>) -> ObjectSchema {
        let mut order: IndexSet<String> = IndexSet::new();
        let mut direct: IndexMap<String, Entry> = IndexMap::new();
        let mut nested: IndexMap<String, Vec<Entry>> = IndexMap::new();
        for entry in entries {
            let head = entry.path.head().to_string();
            order.insert(head.clone());
            if entry.path.is_direct() {
                // later records for the same slot are authoritative
                direct.insert(head, entry);
            } else {
                let rest = Entry { path: entry.path.strip_head(), record: entry.record };
                nested.entry(head).or_default().push(rest);
            }
        }

        let mut object = ObjectSchema::default();
        for name in order {
            let own = direct.shift_remove(&name);
            let mut schema = match &own {
                Some(entry) => self.property(&name, entry),
                None => Schema::empty_object(),
            };
            if let Some(children) = nested.shift_remove(&name) {
                attach_children(&mut schema, &name, self.build_level(children));
            }
            let required = nullability::resolve(&mut schema, own.as_ref().map(|e| e.record));
            object.insert(name, schema, required);
        }
        object
    }

    fn property(&self, name: &str, entry: &Entry) -> Schema {
        let record = entry.record;
        let descriptor = if entry.path.is_array_at(0) && !inference::describes_array(&record.type_descriptor) {
            Cow::Owned(format!("Array of {}", record.type_descriptor))
        } else {
            Cow::Borrowed(record.type_descriptor.as_str())
        };
        let mut schema = self.inference.infer(&descriptor, &Hints::for_attribute(name, record));
        schema.deprecated = record.deprecated;
        schema.with_description(&record.description)
    }
}

fn attach_children(schema: &mut Schema, name: &str, children: ObjectSchema) {
    if let Some(object) = schema.as_object_mut() {
        object.merge(children);
        return;
    }
    if let Some(items) = schema.items_mut() {
        match items.as_object_mut() {
            Some(object) => object.merge(children),
            None => {
                log::debug!("`{name}` has nested attributes; treating its items as objects");
                *items = Schema::object(children);
            }
        }
        return;
    }
    log::debug!("`{name}` has nested attributes; treating it as an object");
    schema.kind = Kind::Object(children);
}

/// The items object of the array property at `prefix`, descending through
/// objects and the items of intermediate arrays.
fn array_items_mut<'o>(object: &'o mut ObjectSchema, prefix: &[String]) -> Option<&'o mut ObjectSchema> {
    let (first, rest) = prefix.split_first()?;
    let schema = object.properties.get_mut(first)?;
    if rest.is_empty() {
        let items = schema.items_mut()?;
        if !items.is_object() {
            log::debug!("array `{first}` has item attributes; treating its items as objects");
            *items = Schema::empty_object();
        }
        return items.as_object_mut();
    }
    let next = match &mut schema.kind {
        Kind::Object(o) => o,
        Kind::Array(items) => items.as_object_mut()?,
        _ => return None,
    };
    array_items_mut(next, rest)
}
