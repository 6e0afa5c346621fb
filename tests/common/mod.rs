//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use std::sync::Arc;

use soap_codegen::SchemaRegistry;
use soap_proxygen::{generate, GenConfig, Proxy};
use soap_wire::testing::ScriptedTransport;

/// Machine/session schema exercising every return shape the unmarshaler
/// supports: scalars, enums, references, collections, and both map flavors.
pub const MACHINE_SCHEMA: &str = r#"{
    "interfaces": [
        {
            "name": "ISession",
            "wire": {"this_reference": "_this"},
            "methods": [
                {"name": "unlockMachine"}
            ]
        },
        {
            "name": "IMachine",
            "wire": {"this_reference": "_this"},
            "methods": [
                {"name": "getName", "returns": {"named": "string"},
                 "cache": {"get": true, "put": true, "slot": "name"}},
                {"name": "name", "is_async": false, "returns": {"named": "string"},
                 "cache": {"get": true, "slot": "name"}},
                {"name": "setName", "params": [
                    {"name": "name", "type": {"named": "string"},
                     "cache": {"put": true, "slot": "name"}}
                ]},
                {"name": "addTags", "params": [
                    {"name": "tags", "type": {"list": {"named": "string"}}}
                ]},
                {"name": "getGroups", "returns": {"list": {"named": "string"}}},
                {"name": "getProperties",
                 "returns": {"map": [{"named": "string"}, {"named": "string"}]}},
                {"name": "getGroupedProperties",
                 "returns": {"map": [{"named": "string"}, {"list": {"named": "string"}}]}},
                {"name": "getState", "returns": {"named": "MachineState"}},
                {"name": "getSession", "returns": {"named": "ISession"}},
                {"name": "launch", "params": [
                    {"name": "type", "type": {"named": "string"},
                     "wire": {"name": "launchType"}},
                    {"name": "timeout", "type": {"named": "i32"},
                     "wire": {"type_name": "unsignedInt",
                              "namespace": "http://www.w3.org/2001/XMLSchema"}}
                ]}
            ]
        }
    ],
    "enums": [
        {"name": "MachineState", "values": [
            {"name": "PoweredOff", "wire": "PoweredOff"},
            {"name": "Running", "wire": "Running"}
        ]}
    ]
}"#;

/// Generate the machine schema and bind an `IMachine` proxy to a scripted
/// transport.
pub fn machine_proxy(id_ref: &str) -> (Proxy, Arc<ScriptedTransport>) {
    let schema = SchemaRegistry::from_json(MACHINE_SCHEMA).expect("schema parses");
    let outcome = generate(&schema, &GenConfig::new("urn:test"));
    assert!(outcome.is_success(), "generation errors: {:?}", outcome.errors);

    let transport = ScriptedTransport::new();
    let proxy = Proxy::new(
        outcome.registry,
        Arc::new(schema),
        transport.clone(),
        "IMachine",
        id_ref,
    )
    .expect("IMachine was planned");
    (proxy, transport)
}
