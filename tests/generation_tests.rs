//! Batch generation over JSON schemas: inclusion policy, inheritance
//! chains, vararg lowering, and how planned classes behave once bound.

mod common;

use std::sync::Arc;

use soap_proxygen::{generate, GenConfig, Proxy, SchemaRegistry, Value};
use soap_wire::testing::ScriptedTransport;
use soap_wire::{BagValue, PropertyBag, ResponseEnvelope};

const INHERITANCE_SCHEMA: &str = r#"{
    "interfaces": [
        {
            "name": "IMedium",
            "extends": ["IManagedObjectRef"],
            "methods": [
                {"name": "getLocation", "returns": {"named": "string"},
                 "cache": {"get": true, "put": true, "slot": "location"}}
            ]
        },
        {
            "name": "IManagedObjectRef",
            "wire": {"this_reference": "_this"},
            "methods": [
                {"name": "getInterfaceName", "returns": {"named": "string"},
                 "cache": {"get": true, "put": true, "slot": "interfaceName"}}
            ]
        }
    ]
}"#;

#[test]
fn annotated_only_inclusion_drops_unmarked_methods() {
    let schema = SchemaRegistry::from_json(
        r#"{"interfaces": [
            {"name": "IHost", "inclusion": "annotated_only", "methods": [
                {"name": "getHostname", "wire": {}, "returns": {"named": "string"}},
                {"name": "helperOnly", "returns": {"named": "string"}}
            ]}
        ]}"#,
    )
    .unwrap();
    let outcome = generate(&schema, &GenConfig::default());
    assert!(outcome.is_success(), "errors: {:?}", outcome.errors);

    let host = outcome.registry.get("IHost").unwrap();
    let names: Vec<_> = host.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["getHostname"]);
}

#[test]
fn vararg_parameter_lowers_to_a_trailing_collection() {
    let schema = SchemaRegistry::from_json(
        r#"{"interfaces": [
            {"name": "IConsole", "methods": [
                {"name": "powerUp", "params": [
                    {"name": "env", "type": {"named": "string"}, "is_vararg": true}
                ]}
            ]}
        ]}"#,
    )
    .unwrap();
    let outcome = generate(&schema, &GenConfig::default());
    assert!(outcome.is_success(), "errors: {:?}", outcome.errors);

    let method = &outcome.registry.get("IConsole").unwrap().methods[0];
    assert!(method.params[0].is_vararg);
    assert!(method.params[0].ty.element().is_some());
}

#[test]
fn subtype_slots_stack_on_top_of_supertype_slots() {
    let schema = SchemaRegistry::from_json(INHERITANCE_SCHEMA).unwrap();
    let outcome = generate(&schema, &GenConfig::default());
    assert!(outcome.is_success(), "errors: {:?}", outcome.errors);

    let slots = outcome.registry.slots("IMedium").unwrap();
    let names: Vec<_> = slots.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["interfaceName", "location"]);
}

#[tokio::test]
async fn inherited_methods_dispatch_under_the_supertype_prefix() {
    let schema = SchemaRegistry::from_json(INHERITANCE_SCHEMA).unwrap();
    let outcome = generate(&schema, &GenConfig::new("urn:test"));
    assert!(outcome.is_success(), "errors: {:?}", outcome.errors);

    let transport = ScriptedTransport::new();
    let medium = Proxy::new(
        outcome.registry,
        Arc::new(schema),
        transport.clone(),
        "IMedium",
        "medium-3",
    )
    .unwrap();

    transport.enqueue_response(ResponseEnvelope::bag(
        PropertyBag::new().with_unnamed(BagValue::text("IMedium")),
    ));
    let value = medium.invoke("getInterfaceName", vec![]).await.unwrap();
    assert_eq!(value, Value::Text("IMedium".to_string()));

    let request = transport.request(0).unwrap();
    assert_eq!(request.operation.name, "IManagedObjectRef_getInterfaceName");
    // The wire marker is inherited from the declaring interface.
    assert_eq!(
        request.this_ref,
        Some(("_this".to_string(), "medium-3".to_string()))
    );
}

#[test]
fn dependent_class_delegates_externalization_upward() {
    let schema = SchemaRegistry::from_json(INHERITANCE_SCHEMA).unwrap();
    let outcome = generate(&schema, &GenConfig::default());

    let medium = Proxy::new(
        outcome.registry,
        Arc::new(schema),
        ScriptedTransport::new(),
        "IMedium",
        "medium-3",
    )
    .unwrap();
    assert!(medium.externalize().is_err());
}

#[test]
fn custom_prefix_overrides_the_interface_name() {
    let schema = SchemaRegistry::from_json(
        r#"{"interfaces": [
            {"name": "IWebsessionManager",
             "wire": {"prefix": "IWebsessionManager", "this_reference": ""},
             "methods": [
                {"name": "logon",
                 "wire": {"prefix": "IWebsessionManager"},
                 "params": [
                    {"name": "username", "type": {"named": "string"}},
                    {"name": "password", "type": {"named": "string"}}
                 ],
                 "returns": {"named": "IWebsessionManager"}}
            ]}
        ]}"#,
    )
    .unwrap();
    let outcome = generate(&schema, &GenConfig::default());
    assert!(outcome.is_success(), "errors: {:?}", outcome.errors);

    let method = &outcome.registry.get("IWebsessionManager").unwrap().methods[0];
    assert_eq!(method.operation, "IWebsessionManager_logon");
    // An empty this-reference marker suppresses the property entirely.
    assert_eq!(method.this_property, None);
}
