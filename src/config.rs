//! Compiler configuration.
//!
//! Every static table the compiler consults lives here, so documentation
//! quirks are data rather than name checks scattered through the passes.
//! All fields default; a JSON file only needs the keys it overrides.
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Subtype entity → base entity. One level only.
    pub inheritance: BTreeMap<String, String>,
    /// Canonical names for shared enums on well-known properties.
    pub enum_names: Vec<EnumNameOverride>,
    /// `*_at` attributes that are documented to always hold zero; typed `integer`.
    ///
    /// Empty by default: the documentation names no such attribute, so every
    /// `*_at` name gets `date-time` until a config lists one here.
    pub sentinel_zero_attributes: Vec<String>,
    /// Properties that reference the shared OAuth scope list.
    pub scope_attributes: Vec<String>,
    pub scope_component: String,
    /// Known scope values; empty leaves the scope items unconstrained.
    pub oauth_scopes: Vec<String>,
    /// Extra names accepted as entity references on top of the compiled set.
    pub known_entities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumNameOverride {
    pub property: String,
    /// Only applies when the owning entity's component name contains this.
    #[serde(default)]
    pub entity_contains: Option<String>,
    pub name: String,
}

impl EnumNameOverride {
    pub fn matches(&self, entity: &str, property: &str) -> bool {
        self.property == property
            && self.entity_contains.as_deref().is_none_or(|needle| entity.contains(needle))
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            inheritance: [("CredentialAccount", "Account"), ("MutedAccount", "Account")]
                .into_iter()
                .map(|(sub, base)| (sub.to_string(), base.to_string()))
                .collect(),
            enum_names: vec![
                EnumNameOverride {
                    property: "type".into(),
                    entity_contains: Some("Notification".into()),
                    name: "NotificationTypeEnum".into(),
                },
                EnumNameOverride {
                    property: "category".into(),
                    entity_contains: Some("Report".into()),
                    name: "ReportCategoryEnum".into(),
                },
            ],
            sentinel_zero_attributes: Vec::new(),
            scope_attributes: vec!["scopes".into(), "scopes_supported".into()],
            scope_component: "OAuthScopes".into(),
            oauth_scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            known_entities: Vec::new(),
        }
    }
}

const DEFAULT_SCOPES: &[&str] = &[
    "read", "write", "follow", "push", "profile",
    "read:accounts", "read:blocks", "read:bookmarks", "read:favourites", "read:filters",
    "read:follows", "read:lists", "read:mutes", "read:notifications", "read:search",
    "read:statuses",
    "write:accounts", "write:blocks", "write:bookmarks", "write:conversations",
    "write:favourites", "write:filters", "write:follows", "write:lists", "write:media",
    "write:mutes", "write:notifications", "write:reports", "write:statuses",
    "admin:read", "admin:read:accounts", "admin:read:reports", "admin:read:domain_allows",
    "admin:read:domain_blocks", "admin:read:ip_blocks", "admin:read:email_domain_blocks",
    "admin:read:canonical_email_blocks",
    "admin:write", "admin:write:accounts", "admin:write:reports", "admin:write:domain_allows",
    "admin:write:domain_blocks", "admin:write:ip_blocks", "admin:write:email_domain_blocks",
    "admin:write:canonical_email_blocks",
];

impl CompilerConfig {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let source = std::fs::read_to_string(path)
            .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
        crate::path_de::from_str_with_path(&source)
            .map_err(|source| LoadError::Json { path: path.to_path_buf(), source })
    }

    pub fn is_sentinel_zero(&self, name: &str) -> bool {
        self.sentinel_zero_attributes.iter().any(|n| n == name)
    }

    pub fn is_scope_attribute(&self, name: &str) -> bool {
        self.scope_attributes.iter().any(|n| n == name)
    }
}
