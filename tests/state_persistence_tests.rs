//! Externalization round trips: proxy state written in one process image
//! and restored against a fresh transport handle.

mod common;

use std::sync::Arc;

use soap_proxygen::{generate, GenConfig, Proxy, SchemaRegistry, Value};
use soap_wire::testing::ScriptedTransport;
use soap_wire::{BagValue, PropertyBag, ResponseEnvelope};

use common::{machine_proxy, MACHINE_SCHEMA};

#[tokio::test]
async fn restored_proxy_carries_its_populated_cache_slots() {
    let (proxy, transport) = machine_proxy("obj-9");
    transport.enqueue_response(ResponseEnvelope::bag(
        PropertyBag::new().with_unnamed(BagValue::text("vm1")),
    ));
    proxy.invoke("getName", vec![]).await.unwrap();

    let bytes = proxy.externalize().unwrap();

    // Restore against a fresh transport, as a receiving process would.
    let schema = SchemaRegistry::from_json(MACHINE_SCHEMA).unwrap();
    let outcome = generate(&schema, &GenConfig::new("urn:test"));
    let fresh = ScriptedTransport::new();
    let restored =
        Proxy::restore(&bytes, outcome.registry, Arc::new(schema), fresh.clone()).unwrap();

    assert_eq!(restored.interface(), "IMachine");
    assert_eq!(restored.id_ref(), "obj-9");
    assert_eq!(restored, proxy);

    // The restored slot serves reads without any network traffic.
    assert_eq!(
        restored.invoke("name", vec![]).await.unwrap(),
        Value::Text("vm1".to_string())
    );
    assert_eq!(fresh.dispatch_count(), 0);
}

#[test]
fn empty_slots_restore_as_absent() {
    let (proxy, _) = machine_proxy("obj-9");
    let bytes = proxy.externalize().unwrap();

    let schema = SchemaRegistry::from_json(MACHINE_SCHEMA).unwrap();
    let outcome = generate(&schema, &GenConfig::new("urn:test"));
    let restored = Proxy::restore(
        &bytes,
        outcome.registry,
        Arc::new(schema),
        ScriptedTransport::new(),
    )
    .unwrap();
    assert_eq!(restored.cache_value("name"), None);
}

#[test]
fn garbage_bytes_fail_to_restore() {
    let schema = SchemaRegistry::from_json(MACHINE_SCHEMA).unwrap();
    let outcome = generate(&schema, &GenConfig::new("urn:test"));
    let result = Proxy::restore(
        b"not a proxy image",
        outcome.registry,
        Arc::new(schema),
        ScriptedTransport::new(),
    );
    assert!(result.is_err());
}
