use docschema::check;
use docschema::ir::{Format, Kind, ObjectSchema, Schema};
use docschema::record::InputDocument;
use docschema::{AttributeRecord, CompiledSchemas, Compiler, CompilerConfig, EntityRecord};
use serde_json::json;

fn compile(entities: Vec<EntityRecord>) -> CompiledSchemas {
    Compiler::default().compile(&entities)
}

fn root<'a>(compiled: &'a CompiledSchemas, entity: &str) -> &'a ObjectSchema {
    compiled.entities[entity].as_object().unwrap()
}

fn keys(o: &ObjectSchema) -> Vec<&str> {
    o.properties.keys().map(String::as_str).collect()
}

#[test]
fn bracket_path_builds_nested_objects() {
    let compiled = compile(vec![EntityRecord::new("Root", vec![AttributeRecord::new("a[b][c]", "String")])]);
    let a = root(&compiled, "Root").properties["a"].as_object().unwrap();
    let b = a.properties["b"].as_object().unwrap();
    assert_eq!(keys(b), ["c"]);
}

#[test]
fn array_items_get_their_own_required_set() {
    let compiled = compile(vec![EntityRecord::new(
        "Root",
        vec![
            AttributeRecord::new("items[]", "Hash"),
            AttributeRecord::new("items[].name", "String"),
            AttributeRecord::new("items[].tag", "String").optional(),
        ],
    )]);
    let out = compiled.to_json();
    let items = &out["components"]["schemas"]["Root"]["properties"]["items"]["items"];
    assert_eq!(items["properties"].as_object().unwrap().len(), 2);
    assert_eq!(items["required"], json!(["name"]));
}

#[test]
fn dots_inside_brackets_are_kept() {
    let compiled = compile(vec![EntityRecord::new(
        "WebPushSubscription",
        vec![
            AttributeRecord::new("alerts", "Hash"),
            AttributeRecord::new("alerts[admin.sign_up]", "Boolean"),
        ],
    )]);
    let alerts = root(&compiled, "WebPushSubscription").properties["alerts"].as_object().unwrap();
    assert_eq!(keys(alerts), ["admin.sign_up"]);
}

#[test]
fn subtype_carries_base_attributes() {
    let compiled = compile(vec![
        EntityRecord::new("Account", vec![AttributeRecord::new("x", "String"), AttributeRecord::new("y", "String")]),
        EntityRecord::new("CredentialAccount", vec![AttributeRecord::new("z", "String")]),
    ]);
    assert_eq!(keys(root(&compiled, "CredentialAccount")), ["x", "y", "z"]);
    assert_eq!(keys(root(&compiled, "Account")), ["x", "y"]);
}

#[test]
fn subtype_override_of_base_attribute_wins() {
    let compiled = compile(vec![
        EntityRecord::new("Account", vec![AttributeRecord::new("source", "String")]),
        EntityRecord::new("CredentialAccount", vec![AttributeRecord::new("source", "Hash")]),
    ]);
    assert!(root(&compiled, "CredentialAccount").properties["source"].is_object());
}

#[test]
fn end_to_end_visibility_is_shared() {
    let visibility = || {
        AttributeRecord::new("visibility", "String").with_enum(["public", "unlisted", "private", "direct"])
    };
    let compiled = compile(vec![
        EntityRecord::new("A", vec![visibility()]),
        EntityRecord::new("B", vec![visibility()]),
    ]);
    assert_eq!(compiled.shared.len(), 1);
    for entity in ["A", "B"] {
        let property = &root(&compiled, entity).properties["visibility"];
        assert_eq!(property.kind, Kind::Ref("VisibilityEnum".into()));
        assert!(property.enum_values().is_none());
    }
    let text = compiled.to_json().to_string();
    assert_eq!(text.matches("\"enum\"").count(), 1);
}

#[test]
fn unresolved_reference_degrades_to_string() {
    let compiled = compile(vec![EntityRecord::new(
        "Status",
        vec![AttributeRecord::new("application", "[Application]").nullable()],
    )]);
    let application = &root(&compiled, "Status").properties["application"];
    assert!(matches!(application.kind, Kind::Scalar { .. }));
    assert!(application.nullable);
    assert!(check::check(&compiled).is_ok());
}

#[test]
fn orphaned_item_group_is_dropped() {
    let compiled = compile(vec![EntityRecord::new(
        "Tag",
        vec![AttributeRecord::new("name", "String"), AttributeRecord::new("history[].uses", "String")],
    )]);
    assert_eq!(keys(root(&compiled, "Tag")), ["name"]);
}

#[test]
fn scopes_use_the_shared_list() {
    let compiled = compile(vec![EntityRecord::new(
        "Instance",
        vec![AttributeRecord::new("configuration[oauth][scopes_supported]", "Array of String")],
    )]);
    let out = compiled.to_json();
    let schemas = &out["components"]["schemas"];
    assert_eq!(
        schemas["Instance"]["properties"]["configuration"]["properties"]["oauth"]["properties"]["scopes_supported"],
        json!({ "$ref": "#/components/schemas/OAuthScopes" })
    );
    assert_eq!(schemas["OAuthScopes"]["type"], json!("array"));
}

#[test]
fn custom_config_changes_tables() {
    let config: CompilerConfig = serde_json::from_value(json!({
        "sentinel_zero_attributes": ["last_status_at"],
        "oauth_scopes": []
    }))
    .unwrap();
    let compiled = Compiler::new(config).compile(&[EntityRecord::new(
        "Account",
        vec![
            AttributeRecord::new("last_status_at", "String"),
            AttributeRecord::new("created_at", "String"),
            AttributeRecord::new("scopes", "Array of String"),
        ],
    )]);
    let account = root(&compiled, "Account");
    assert!(matches!(account.properties["last_status_at"].kind, Kind::Scalar { format: None, .. }));
    assert!(matches!(account.properties["created_at"].kind, Kind::Scalar { format: Some(Format::DateTime), .. }));
    assert_eq!(compiled.shared["OAuthScopes"], Schema::array(Schema::string()).with_description("OAuth scopes"));
}

#[test]
fn input_document_forms_compile_alike() {
    let single: InputDocument = serde_json::from_value(json!({
        "name": "Admin::Tag",
        "attributes": [{ "name": "id", "type": "String" }]
    }))
    .unwrap();
    let compiled = Compiler::default().compile_set(&single.into_set());
    assert!(compiled.schemas.entities.contains_key("AdminTag"));
    assert!(compiled.parameters.is_empty());
    assert!(compiled.to_json().get("parameters").is_none());
}

#[test]
fn nullable_scopes_union_the_shared_list_with_null() {
    let compiled = compile(vec![EntityRecord::new(
        "Application",
        vec![AttributeRecord::new("scopes", "Array of String").nullable()],
    )]);
    let out = compiled.to_json();
    let schemas = &out["components"]["schemas"];
    assert_eq!(
        schemas["Application"]["properties"]["scopes"],
        json!({ "oneOf": [{ "$ref": "#/components/schemas/OAuthScopes" }, { "type": "null" }] })
    );
    assert!(schemas["Application"].get("required").is_none());
    assert_eq!(schemas["OAuthScopes"]["type"], json!("array"));
}

#[test]
fn descriptor_null_markers_leave_nullability_to_the_record() {
    let compiled = compile(vec![EntityRecord::new(
        "Filter",
        vec![
            AttributeRecord::new("expires_in", "Integer or null"),
            AttributeRecord::new("context", "Integer or null").nullable(),
        ],
    )]);
    let out = compiled.to_json();
    let filter = &out["components"]["schemas"]["Filter"];
    assert_eq!(filter["properties"]["expires_in"], json!({ "type": "integer" }));
    assert_eq!(filter["properties"]["context"], json!({ "type": ["integer", "null"] }));
    assert_eq!(filter["required"], json!(["expires_in"]));
}

#[test]
fn default_config_treats_every_at_suffix_as_a_timestamp() {
    assert!(CompilerConfig::default().sentinel_zero_attributes.is_empty());
    let compiled = compile(vec![EntityRecord::new(
        "Account",
        vec![AttributeRecord::new("last_status_at", "Integer")],
    )]);
    let property = &root(&compiled, "Account").properties["last_status_at"];
    assert!(matches!(property.kind, Kind::Scalar { format: Some(Format::DateTime), .. }));
}
