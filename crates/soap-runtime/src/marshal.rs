//! Request marshaling.
//!
//! Recursively converts a typed argument into wire properties, in priority
//! order: nullable guard, array/collection flattening with repeated-property
//! semantics, fixed wire-type override, object reference, enum, then plain
//! pass-through. Marshaling is a synchronous, non-suspending, pure function
//! of its inputs.

use smallvec::SmallVec;

use soap_model::{ParamDescriptor, TypeDescriptor, Value, WireOverride};
use soap_wire::{RequestEnvelope, WireProperty, WireValue};

use crate::error::{CallError, CallResult};

/// Marshal one argument into the request under the parameter's wire name.
pub fn marshal_param(
    param: &ParamDescriptor,
    value: &Value,
    namespace: &str,
    request: &mut RequestEnvelope,
) -> CallResult<()> {
    let mut properties: SmallVec<[WireProperty; 4]> = SmallVec::new();
    marshal_value(
        &param.ty,
        value,
        param.wire_name(),
        param.wire_type.as_ref(),
        namespace,
        &mut properties,
    )?;
    for property in properties {
        request.add_property(property.name, property.value);
    }
    Ok(())
}

/// Recursive marshaling rule set.
pub fn marshal_value(
    ty: &TypeDescriptor,
    value: &Value,
    wire_name: &str,
    wire_type: Option<&WireOverride>,
    namespace: &str,
    out: &mut SmallVec<[WireProperty; 4]>,
) -> CallResult<()> {
    match ty {
        // Absent values contribute no wire property.
        TypeDescriptor::Nullable(inner) => {
            if value.is_null() {
                Ok(())
            } else {
                marshal_value(inner, value, wire_name, wire_type, namespace, out)
            }
        }
        // One property per element, all under the same wire name, in order.
        TypeDescriptor::Array(elem) | TypeDescriptor::Collection(elem) => {
            let items = value.as_list().ok_or_else(|| {
                CallError::Arguments(format!(
                    "parameter `{}` expects an ordered collection",
                    wire_name
                ))
            })?;
            for item in items {
                marshal_value(elem, item, wire_name, wire_type, namespace, out)?;
            }
            Ok(())
        }
        // Explicit wire-type override wins over the remaining shape rules.
        _ if wire_type.is_some() => {
            if let Some(wire_type) = wire_type {
                out.push(WireProperty {
                    name: wire_name.to_string(),
                    value: WireValue::Typed {
                        namespace: wire_type.namespace.clone(),
                        type_name: wire_type.type_name.clone(),
                        text: value.wire_text(),
                    },
                });
            }
            Ok(())
        }
        // References marshal as the entity's opaque reference string.
        TypeDescriptor::ObjectRef(interface) => {
            let id_ref = value.as_ref_string().ok_or_else(|| {
                CallError::Arguments(format!(
                    "parameter `{}` expects a reference to `{}`",
                    wire_name, interface
                ))
            })?;
            out.push(WireProperty {
                name: wire_name.to_string(),
                value: WireValue::Text(id_ref.to_string()),
            });
            Ok(())
        }
        // Enums marshal as a typed primitive named after the enum itself.
        TypeDescriptor::Enum(enum_name) => match value {
            Value::Enum { value: wire, .. } => {
                out.push(WireProperty {
                    name: wire_name.to_string(),
                    value: WireValue::Typed {
                        namespace: namespace.to_string(),
                        type_name: enum_name.clone(),
                        text: wire.clone(),
                    },
                });
                Ok(())
            }
            _ => Err(CallError::Arguments(format!(
                "parameter `{}` expects an `{}` enum value",
                wire_name, enum_name
            ))),
        },
        // Plain primitives and opaquely passed composites go through as-is.
        _ => {
            out.push(WireProperty {
                name: wire_name.to_string(),
                value: WireValue::Raw(value.clone()),
            });
            Ok(())
        }
    }
}
