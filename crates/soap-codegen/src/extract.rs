//! Interface descriptor extraction.
//!
//! Reads one annotated interface definition and produces its ordered method
//! descriptors plus the cache slots they declare. Types are resolved through
//! the provider; any unresolved name defers the whole interface to a later
//! generation pass.

use indexmap::IndexMap;
use tracing::debug;

use soap_model::{
    resolve_type_ref, CacheSlot, InterfaceDef, MethodDef, MethodDescriptor, MethodInclusion,
    ParamDescriptor, TypeDescriptor, TypeInfoProvider, TypeRef, WireOverride,
};

use crate::error::{GenError, GenResult};

/// Extraction output: methods in declaration order plus the registered cache
/// slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub methods: Vec<MethodDescriptor>,
    pub slots: Vec<CacheSlot>,
}

/// Extract descriptors for one interface.
pub fn extract(def: &InterfaceDef, provider: &dyn TypeInfoProvider) -> GenResult<Extraction> {
    let included: Vec<&MethodDef> = def
        .methods
        .iter()
        .filter(|m| def.inclusion == MethodInclusion::All || m.wire.is_some())
        .collect();

    // Deferral check gates the pass: an interface with any unresolved
    // dependent type is retried later, before any shape validation can
    // fail it.
    let missing = unresolved_names(&included, provider);
    if !missing.is_empty() {
        return Err(GenError::Deferred {
            interface: def.name.clone(),
            missing,
        });
    }

    let mut methods = Vec::with_capacity(included.len());
    let mut slots: IndexMap<String, CacheSlot> = IndexMap::new();

    for method in included {
        let descriptor = extract_method(def, method, provider)?;

        if let Some(marker) = &method.cache {
            let slot_name = marker.slot_name(&method.name).to_string();
            let slot_ty = match &descriptor.returns {
                Some(ty) => ty.peel_nullable().1.clone(),
                None => {
                    return Err(GenError::InvalidDeclaration {
                        name: def.name.clone(),
                        reason: format!("cacheable method `{}` returns no value", method.name),
                    })
                }
            };
            register_slot(&mut slots, slot_name, slot_ty, &def.name);
        }

        for (param_def, param) in method.params.iter().zip(&descriptor.params) {
            if let Some(marker) = &param_def.cache {
                if marker.put {
                    let slot_name = marker.slot_name(&param.name).to_string();
                    let slot_ty = param.ty.peel_nullable().1.clone();
                    register_slot(&mut slots, slot_name, slot_ty, &def.name);
                }
            }
        }

        methods.push(descriptor);
    }

    Ok(Extraction {
        methods,
        slots: slots.into_values().collect(),
    })
}

/// Collect every unresolved type name across the included methods, in
/// encounter order without duplicates.
fn unresolved_names(methods: &[&MethodDef], provider: &dyn TypeInfoProvider) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    let mut note = |names: Vec<String>| {
        for name in names {
            if !missing.contains(&name) {
                missing.push(name);
            }
        }
    };
    for method in methods {
        for param in &method.params {
            if let Err(names) = resolve_type_ref(provider, &param.ty) {
                note(names);
            }
        }
        if let Some(returns) = &method.returns {
            if let Err(names) = resolve_type_ref(provider, returns) {
                note(names);
            }
        }
    }
    missing
}

fn extract_method(
    def: &InterfaceDef,
    method: &MethodDef,
    provider: &dyn TypeInfoProvider,
) -> GenResult<MethodDescriptor> {
    let mut params = Vec::with_capacity(method.params.len());
    let last = method.params.len().saturating_sub(1);

    for (i, param) in method.params.iter().enumerate() {
        if param.is_vararg && i != last {
            return Err(GenError::InvalidDeclaration {
                name: def.name.clone(),
                reason: format!(
                    "vararg parameter `{}` of `{}` is not the final parameter",
                    param.name, method.name
                ),
            });
        }
        let resolved = resolve(def, &param.ty, provider)?;
        let ty = if param.is_vararg {
            // The declared type is the element type; the call site passes an
            // ordered collection.
            TypeDescriptor::collection(resolved)
        } else {
            resolved
        };
        validate(def, &ty)?;

        let wire = param.wire.as_ref();
        params.push(ParamDescriptor {
            name: param.name.clone(),
            ty,
            is_vararg: param.is_vararg,
            wire_name: wire.and_then(|w| w.name.clone()),
            wire_type: wire.and_then(|w| {
                w.type_name
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .map(|type_name| WireOverride {
                        namespace: w.namespace.clone().unwrap_or_default(),
                        type_name: type_name.to_string(),
                    })
            }),
            cache: param.cache.clone(),
        });
    }

    let returns = match &method.returns {
        Some(ty) => {
            let resolved = resolve(def, ty, provider)?;
            validate(def, &resolved)?;
            Some(resolved)
        }
        None => None,
    };

    if !method.is_async {
        // Non-async methods are pure cache reads; anything else has no
        // generatable body.
        let reads_cache = method.cache.as_ref().map(|m| m.get).unwrap_or(false);
        if !reads_cache {
            return Err(GenError::InvalidDeclaration {
                name: def.name.clone(),
                reason: format!(
                    "non-async method `{}` carries no cache-read marker",
                    method.name
                ),
            });
        }
        if !method.params.is_empty() {
            return Err(GenError::InvalidDeclaration {
                name: def.name.clone(),
                reason: format!("non-async method `{}` declares parameters", method.name),
            });
        }
    }

    Ok(MethodDescriptor {
        name: method.name.clone(),
        params,
        returns,
        is_async: method.is_async,
        cache: method.cache.clone(),
        operation: format!("{}_{}", def.prefix_for(method), method.name),
        this_property: def.this_reference_for(method),
    })
}

fn resolve(
    def: &InterfaceDef,
    ty: &TypeRef,
    provider: &dyn TypeInfoProvider,
) -> GenResult<TypeDescriptor> {
    resolve_type_ref(provider, ty).map_err(|missing| GenError::Deferred {
        interface: def.name.clone(),
        missing,
    })
}

fn validate(def: &InterfaceDef, ty: &TypeDescriptor) -> GenResult<()> {
    ty.validate().map_err(|source| GenError::Codegen {
        interface: def.name.clone(),
        source,
    })
}

/// First registration of a slot name wins; later registrations with a
/// different type are ignored with a note.
fn register_slot(
    slots: &mut IndexMap<String, CacheSlot>,
    name: String,
    ty: TypeDescriptor,
    interface: &str,
) {
    if let Some(existing) = slots.get(&name) {
        if existing.ty != ty {
            debug!(
                interface,
                slot = %name,
                "cache slot re-registered with a different type; keeping the first"
            );
        }
        return;
    }
    slots.insert(name.clone(), CacheSlot { name, ty });
}
