//! Proxy class planning.
//!
//! Resolves the generated class's position in the single-inheritance chain
//! and fixes the cache-slot layout. An independent class (no remote
//! supertype) owns the transport handle and reference string directly and
//! carries the externalization contract; an extending class delegates both
//! constructor parameters upward and contributes only its own methods and
//! slots.

use soap_model::{InterfaceDef, ProxyClass, Resolution, TypeInfoProvider, TypeShape};

use crate::driver::GenConfig;
use crate::error::{GenError, GenResult};
use crate::extract::Extraction;

/// Plan the proxy class for one extracted interface.
pub fn plan(
    def: &InterfaceDef,
    extraction: Extraction,
    provider: &dyn TypeInfoProvider,
    config: &GenConfig,
) -> GenResult<ProxyClass> {
    let mut supertypes = Vec::new();
    for name in &def.extends {
        match provider.resolve_type(name) {
            Resolution::Resolved(TypeShape::Reference { name }) => supertypes.push(name),
            Resolution::Resolved(_) => {
                return Err(GenError::InvalidDeclaration {
                    name: def.name.clone(),
                    reason: format!("declared supertype `{}` is not a remote interface", name),
                })
            }
            Resolution::Unresolved => {
                return Err(GenError::Deferred {
                    interface: def.name.clone(),
                    missing: vec![name.clone()],
                })
            }
        }
    }

    if supertypes.len() > 1 {
        return Err(GenError::MultipleSupertypes {
            interface: def.name.clone(),
            supertypes,
        });
    }

    Ok(ProxyClass {
        interface: def.name.clone(),
        extends: supertypes.into_iter().next(),
        namespace: config.namespace.clone(),
        methods: extraction.methods,
        slots: extraction.slots,
    })
}
