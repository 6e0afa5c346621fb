//! Proxy instances and the per-invocation call protocol.
//!
//! A proxy binds a planned class to the externally owned transport handle
//! and an opaque entity reference string. Invocations follow the protocol:
//!
//! ```text
//! Idle -> Suspended -> Completed(value) | Failed(error) | Cancelled
//! ```
//!
//! Non-async methods are pure cache reads and never leave `Idle`. Async
//! methods may short-circuit on a populated cache slot; otherwise the
//! request is built and dispatched on a blocking-friendly task, and the
//! invocation suspends on the pending call. Dropping the invocation future
//! while suspended cancels the in-flight network call and delivers no
//! completion. Exactly one outcome occurs per invocation.

use std::fmt;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

use soap_model::{ClassRegistry, ProxyClass, TypeInfoProvider, Value};
use soap_wire::{OperationName, RequestEnvelope, ResponseBody, Transport};

use crate::cache::CacheStore;
use crate::error::{CallError, CallResult};
use crate::marshal::marshal_param;
use crate::unmarshal::{unmarshal_return, UnmarshalCtx};

struct ProxyInner {
    class: Arc<ProxyClass>,
    registry: ClassRegistry,
    provider: Arc<dyn TypeInfoProvider + Send + Sync>,
    transport: Arc<dyn Transport>,
    id_ref: String,
    cache: CacheStore,
}

/// Live client for one remote entity. Cheap to clone; clones share the cache.
#[derive(Clone)]
pub struct Proxy {
    inner: Arc<ProxyInner>,
}

impl Proxy {
    /// Bind a proxy for `interface` to a transport handle and an entity
    /// reference string.
    pub fn new(
        registry: ClassRegistry,
        provider: Arc<dyn TypeInfoProvider + Send + Sync>,
        transport: Arc<dyn Transport>,
        interface: &str,
        id_ref: impl Into<String>,
    ) -> CallResult<Self> {
        let class = registry
            .get(interface)
            .ok_or_else(|| CallError::UnknownInterface(interface.to_string()))?;
        Ok(Self {
            inner: Arc::new(ProxyInner {
                class,
                registry,
                provider,
                transport,
                id_ref: id_ref.into(),
                cache: CacheStore::new(),
            }),
        })
    }

    pub fn interface(&self) -> &str {
        &self.inner.class.interface
    }

    /// Opaque entity reference string this proxy is bound to.
    pub fn id_ref(&self) -> &str {
        &self.inner.id_ref
    }

    /// Construct a proxy for a reference value produced by unmarshaling,
    /// bound to the same transport handle.
    pub fn resolve_ref(&self, value: &Value) -> CallResult<Proxy> {
        match value {
            Value::Ref { interface, id_ref } => Proxy::new(
                self.inner.registry.clone(),
                Arc::clone(&self.inner.provider),
                Arc::clone(&self.inner.transport),
                interface,
                id_ref.clone(),
            ),
            _ => Err(CallError::Arguments(
                "value is not a remote-object reference".to_string(),
            )),
        }
    }

    /// Reset every cache slot to absent.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// Current value of a cache slot, if populated.
    pub fn cache_value(&self, slot: &str) -> Option<Value> {
        self.inner.cache.get(slot)
    }

    /// Invoke a method by name. Arguments are positional; a vararg method
    /// takes its trailing arguments as one ordered-collection value.
    pub async fn invoke(&self, method: &str, args: Vec<Value>) -> CallResult<Value> {
        let (declaring, descriptor) = self
            .inner
            .registry
            .resolve_method(self.interface(), method)
            .map_err(|e| CallError::UnknownMethod(e.to_string()))?;

        // Idle: non-async methods are pure cache reads.
        if !descriptor.is_async {
            let slot = descriptor.cache_slot().ok_or_else(|| {
                CallError::UnknownMethod(format!(
                    "non-async method `{}` has no cache slot",
                    descriptor.name
                ))
            })?;
            return Ok(self.inner.cache.get(slot).unwrap_or(Value::Null));
        }

        // Cache short-circuit before any transport contact.
        if let Some(marker) = &descriptor.cache {
            if marker.get {
                let slot = marker.slot_name(&descriptor.name);
                if let Some(value) = self.inner.cache.get(slot).filter(|v| !v.is_null()) {
                    trace!(method = %descriptor.name, slot, "cache hit, skipping transport");
                    return Ok(value);
                }
            }
        }

        if args.len() != descriptor.params.len() {
            return Err(CallError::Arguments(format!(
                "method `{}` takes {} argument(s), got {}",
                descriptor.name,
                descriptor.params.len(),
                args.len()
            )));
        }

        // Build and dispatch on a context suited for blocking I/O, then
        // suspend on the pending call.
        let inner = Arc::clone(&self.inner);
        let namespace = declaring.namespace.clone();
        let pending = tokio::task::spawn_blocking(move || -> CallResult<_> {
            let mut request = RequestEnvelope::new(OperationName::new(
                namespace.clone(),
                descriptor.operation.clone(),
            ));
            if let Some(property) = &descriptor.this_property {
                request.set_this(property.clone(), inner.id_ref.clone());
            }
            for (param, value) in descriptor.params.iter().zip(&args) {
                if let Some(marker) = &param.cache {
                    // Argument-seeded slots populate during marshaling,
                    // independent of the method's own result caching.
                    if marker.put {
                        inner.cache.put(marker.slot_name(&param.name), value.clone());
                    }
                }
                marshal_param(param, value, &namespace, &mut request)?;
            }
            trace!(operation = %request.operation.name, "dispatching request");
            Ok((inner.transport.dispatch(request), descriptor))
        })
        .await
        .map_err(|e| CallError::Dispatch(e.to_string()))?;
        let (pending, descriptor) = pending?;

        // Suspended: dropping this await cancels the in-flight call.
        let response = pending.join().await.map_err(CallError::from)?;

        match response.body {
            ResponseBody::Fault(fault) => {
                trace!(method = %descriptor.name, "completed with remote fault");
                Err(CallError::Fault(fault))
            }
            ResponseBody::Bag(bag) => {
                let value = match &descriptor.returns {
                    None => Value::Null,
                    Some(ty) => {
                        let provider: &dyn TypeInfoProvider = self.inner.provider.as_ref();
                        let ctx = UnmarshalCtx {
                            registry: &self.inner.registry,
                            provider,
                        };
                        unmarshal_return(&ctx, ty, &bag)?
                    }
                };
                if let Some(marker) = &descriptor.cache {
                    if marker.put {
                        self.inner
                            .cache
                            .put(marker.slot_name(&descriptor.name), value.clone());
                    }
                }
                trace!(method = %descriptor.name, "completed");
                Ok(value)
            }
        }
    }

    /// Write the cross-process representation: the entity reference string
    /// plus every cache slot value in stable declared order. Only an
    /// independent proxy (no remote supertype) carries this contract.
    pub fn externalize(&self) -> Result<Vec<u8>> {
        if !self.inner.class.is_independent() {
            return Err(anyhow!(
                "proxy for `{}` delegates externalization to its supertype chain",
                self.interface()
            ));
        }
        let slots = self
            .inner
            .registry
            .slots(self.interface())?
            .into_iter()
            .map(|slot| {
                let value = self.inner.cache.get(&slot.name).unwrap_or(Value::Null);
                (slot.name, value)
            })
            .collect();
        let form = ExternalForm {
            interface: self.interface().to_string(),
            id_ref: self.inner.id_ref.clone(),
            slots,
        };
        bincode::serialize(&form).context("Failed to serialize proxy state")
    }

    /// Reconstruct a proxy from its cross-process representation. The
    /// transport handle is externally owned and is re-supplied here rather
    /// than serialized.
    pub fn restore(
        bytes: &[u8],
        registry: ClassRegistry,
        provider: Arc<dyn TypeInfoProvider + Send + Sync>,
        transport: Arc<dyn Transport>,
    ) -> Result<Proxy> {
        let form: ExternalForm =
            bincode::deserialize(bytes).context("Failed to deserialize proxy state")?;
        let proxy = Proxy::new(registry, provider, transport, &form.interface, form.id_ref)
            .map_err(|e| anyhow!("{}", e))?;
        for (name, value) in form.slots {
            if !value.is_null() {
                proxy.inner.cache.put(&name, value);
            }
        }
        Ok(proxy)
    }
}

/// Proxies holding the same entity reference string are equivalent.
impl PartialEq for Proxy {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id_ref == other.inner.id_ref
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("interface", &self.interface())
            .field("id_ref", &self.inner.id_ref)
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct ExternalForm {
    interface: String,
    id_ref: String,
    slots: Vec<(String, Value)>,
}
