//! Single-level entity inheritance.
//!
//! Documentation never states inheritance in a machine-readable way, so the
//! subtype → base pairs come from [`CompilerConfig::inheritance`].
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::config::CompilerConfig;
use crate::naming;
use crate::record::{AttributeRecord, EntityRecord};

/// An entity with its attribute list after inheritance.
#[derive(Debug, Clone)]
pub struct ResolvedEntity<'a> {
    /// Sanitized component name.
    pub name: String,
    pub description: &'a str,
    pub attributes: Cow<'a, [AttributeRecord]>,
}

/// Prepend each configured subtype's base attributes (`base ++ subtype`).
///
/// Bases are taken as documented, never themselves expanded. A subtype whose
/// base is missing from the input is passed through unchanged.
pub fn resolve<'a>(entities: &'a [EntityRecord], config: &CompilerConfig) -> Vec<ResolvedEntity<'a>> {
    let by_name: BTreeMap<String, &EntityRecord> = entities
        .iter()
        .map(|e| (naming::component_name(&e.name), e))
        .collect();
    let table: BTreeMap<String, String> = config
        .inheritance
        .iter()
        .map(|(sub, base)| (naming::component_name(sub), naming::component_name(base)))
        .collect();

    entities
        .iter()
        .map(|entity| {
            let name = naming::component_name(&entity.name);
            let attributes = match table.get(&name) {
                Some(base_name) => match by_name.get(base_name) {
                    Some(base) => {
                        log::debug!("`{name}` inherits {} attributes from `{base_name}`", base.attributes.len());
                        Cow::Owned(base.attributes.iter().chain(&entity.attributes).cloned().collect())
                    }
                    None => {
                        log::warn!("`{name}` inherits from `{base_name}`, which is not in the input");
                        Cow::Borrowed(entity.attributes.as_slice())
                    }
                },
                None => Cow::Borrowed(entity.attributes.as_slice()),
            };
            ResolvedEntity { name, description: &entity.description, attributes }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'b>(e: &'b ResolvedEntity<'_>) -> Vec<&'b str> {
        e.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn subtype_gets_base_first() {
        let entities = vec![
            EntityRecord::new("Account", vec![AttributeRecord::new("x", "String"), AttributeRecord::new("y", "String")]),
            EntityRecord::new("CredentialAccount", vec![AttributeRecord::new("z", "Hash")]),
        ];
        let resolved = resolve(&entities, &CompilerConfig::default());
        assert_eq!(names(&resolved[0]), ["x", "y"]);
        assert_eq!(names(&resolved[1]), ["x", "y", "z"]);
        assert!(matches!(resolved[0].attributes, Cow::Borrowed(_)));
    }

    #[test]
    fn missing_base_leaves_subtype_alone() {
        let entities = vec![EntityRecord::new("MutedAccount", vec![AttributeRecord::new("mute_expires_at", "String")])];
        let resolved = resolve(&entities, &CompilerConfig::default());
        assert_eq!(names(&resolved[0]), ["mute_expires_at"]);
    }

    #[test]
    fn only_one_level() {
        let mut config = CompilerConfig::default();
        config.inheritance.insert("Grandchild".into(), "CredentialAccount".into());
        let entities = vec![
            EntityRecord::new("Account", vec![AttributeRecord::new("x", "String")]),
            EntityRecord::new("CredentialAccount", vec![AttributeRecord::new("z", "Hash")]),
            EntityRecord::new("Grandchild", vec![AttributeRecord::new("w", "String")]),
        ];
        let resolved = resolve(&entities, &config);
        assert_eq!(names(&resolved[2]), ["z", "w"]);
    }
}
