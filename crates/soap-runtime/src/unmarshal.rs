//! Response unmarshaling.
//!
//! Reconstructs a typed value, including nested composite objects, out of a
//! loosely-typed response property bag. Unmarshaling is a synchronous,
//! non-suspending, pure function of its inputs.

use indexmap::IndexMap;

use soap_model::{
    resolve_type_ref, ClassRegistry, PrimitiveKind, Resolution, TypeDescriptor, TypeInfoProvider,
    TypeShape, Value,
};
use soap_wire::{encoding, BagValue, PropertyBag};

use crate::error::{CallError, CallResult};

/// Everything entry-level unmarshaling needs besides the bag itself: the
/// generated classes (for reference reconstruction) and the host's type
/// information (for enum lookups and composite field lists).
pub struct UnmarshalCtx<'a> {
    pub registry: &'a ClassRegistry,
    pub provider: &'a dyn TypeInfoProvider,
}

/// Unmarshal a method's return value from the whole response bag.
///
/// Collection, array, and map returns iterate the bag by index; everything
/// else reads the first entry. A nullable non-collection return whose sole
/// entry is absent or carries the empty sentinel yields `Null` without
/// touching the entry rules.
pub fn unmarshal_return(
    ctx: &UnmarshalCtx<'_>,
    ty: &TypeDescriptor,
    bag: &PropertyBag,
) -> CallResult<Value> {
    let (nullable, inner) = ty.peel_nullable();
    if nullable && bag.is_empty() {
        return Ok(Value::Null);
    }

    match inner {
        TypeDescriptor::Array(elem) | TypeDescriptor::Collection(elem) => {
            let mut items = Vec::new();
            for entry in bag.iter() {
                // Null and sentinel entries are dropped; encounter order of
                // the survivors is preserved.
                if entry.value.is_null() || entry.value.is_empty_sentinel() {
                    continue;
                }
                items.push(unmarshal_entry(ctx, elem, &entry.value)?);
            }
            Ok(Value::List(items))
        }
        TypeDescriptor::Map(_, value_ty) => unmarshal_map(ctx, value_ty, bag),
        scalar => match bag.get(0) {
            None => Err(CallError::Decode(
                "response carries no return value".to_string(),
            )),
            Some(entry) => {
                if nullable && (entry.value.is_null() || entry.value.is_empty_sentinel()) {
                    Ok(Value::Null)
                } else {
                    unmarshal_entry(ctx, scalar, &entry.value)
                }
            }
        },
    }
}

/// Map returns recover each entry's tag name. When the declared value type
/// is a single-element collection, same-named entries group into an ordered
/// sequence; otherwise the mapping is direct with last-write-wins on
/// duplicate tag names. The asymmetry is the protocol's documented behavior.
fn unmarshal_map(
    ctx: &UnmarshalCtx<'_>,
    value_ty: &TypeDescriptor,
    bag: &PropertyBag,
) -> CallResult<Value> {
    let (_, value_inner) = value_ty.peel_nullable();

    if let Some(elem) = value_inner.element() {
        let mut map: IndexMap<String, Value> = IndexMap::new();
        for entry in bag.iter() {
            let key = entry.name.clone().unwrap_or_default();
            let value = unmarshal_entry(ctx, elem, &entry.value)?;
            match map.entry(key).or_insert_with(|| Value::List(Vec::new())) {
                Value::List(list) => list.push(value),
                _ => unreachable!("grouped map entries are always lists"),
            }
        }
        return Ok(Value::Map(map));
    }

    let mut map: IndexMap<String, Value> = IndexMap::new();
    for entry in bag.iter() {
        let key = entry.name.clone().unwrap_or_default();
        let value = unmarshal_entry(ctx, value_inner, &entry.value)?;
        map.insert(key, value);
    }
    Ok(Value::Map(map))
}

/// Recursive entry-level rule set.
pub fn unmarshal_entry(
    ctx: &UnmarshalCtx<'_>,
    ty: &TypeDescriptor,
    entry: &BagValue,
) -> CallResult<Value> {
    match ty {
        TypeDescriptor::Nullable(inner) => {
            if entry.is_null() || entry.is_empty_sentinel() {
                Ok(Value::Null)
            } else {
                unmarshal_entry(ctx, inner, entry)
            }
        }
        TypeDescriptor::Primitive(kind) => unmarshal_primitive(*kind, entry),
        TypeDescriptor::ObjectRef(interface) => {
            // The referenced interface must have a generated class; the
            // resulting reference binds a proxy to the same transport handle
            // on demand.
            if !ctx.registry.contains(interface) {
                return Err(CallError::Decode(format!(
                    "response references `{}`, which has no generated class",
                    interface
                )));
            }
            Ok(Value::reference(interface.clone(), entry.string_form()))
        }
        TypeDescriptor::Enum(name) => {
            let text = entry.string_form();
            let values = match ctx.provider.resolve_type(name) {
                Resolution::Resolved(TypeShape::Enum { values, .. }) => values,
                _ => {
                    return Err(CallError::Decode(format!(
                        "`{}` is not a known enum type",
                        name
                    )))
                }
            };
            values
                .iter()
                .find(|v| v.wire == text)
                .map(|v| Value::enumeration(name.clone(), v.wire.clone()))
                .ok_or_else(|| {
                    CallError::Decode(format!("`{}` is not a value of enum `{}`", text, name))
                })
        }
        TypeDescriptor::Composite(name) => unmarshal_composite(ctx, name, entry),
        TypeDescriptor::Array(elem) | TypeDescriptor::Collection(elem) => {
            // Nested sequences arrive as nested bags.
            let bag = match entry {
                BagValue::Bag(bag) => bag,
                other => {
                    return Err(CallError::Decode(format!(
                        "expected a nested sequence, found `{}`",
                        other
                    )))
                }
            };
            let mut items = Vec::new();
            for entry in bag.iter() {
                if entry.value.is_null() || entry.value.is_empty_sentinel() {
                    continue;
                }
                items.push(unmarshal_entry(ctx, elem, &entry.value)?);
            }
            Ok(Value::List(items))
        }
        TypeDescriptor::Map(..) => Err(CallError::Decode(
            "map values are only supported at the method return level".to_string(),
        )),
    }
}

fn unmarshal_primitive(kind: PrimitiveKind, entry: &BagValue) -> CallResult<Value> {
    // Direct cast when the entry is already the right runtime kind,
    // otherwise parse its string form.
    let text = || entry.string_form();
    match kind {
        PrimitiveKind::I16 => match entry {
            BagValue::I16(v) => Ok(Value::I16(*v)),
            _ => parse(&text(), "i16").map(Value::I16),
        },
        PrimitiveKind::I32 => match entry {
            BagValue::I32(v) => Ok(Value::I32(*v)),
            _ => parse(&text(), "i32").map(Value::I32),
        },
        PrimitiveKind::I64 => match entry {
            BagValue::I64(v) => Ok(Value::I64(*v)),
            _ => parse(&text(), "i64").map(Value::I64),
        },
        PrimitiveKind::Bool => match entry {
            BagValue::Bool(v) => Ok(Value::Bool(*v)),
            _ => parse(&text(), "bool").map(Value::Bool),
        },
        PrimitiveKind::Text => match entry {
            BagValue::Text(s) => Ok(Value::Text(s.clone())),
            _ => Ok(Value::Text(text())),
        },
        PrimitiveKind::Bytes => encoding::base64_decode(&text(), "byte-buffer entry")
            .map(Value::Bytes)
            .map_err(|e| CallError::Decode(e.to_string())),
    }
}

fn parse<T: std::str::FromStr>(text: &str, kind: &str) -> CallResult<T> {
    text.parse::<T>()
        .map_err(|_| CallError::Decode(format!("`{}` does not parse as {}", text, kind)))
}

/// Composite rule: the entry is a nested bag; every default-accessible field
/// reads its same-named nested entry, recursively unmarshaled per the
/// field's own type, and the composite is assembled in declaration order.
fn unmarshal_composite(
    ctx: &UnmarshalCtx<'_>,
    name: &str,
    entry: &BagValue,
) -> CallResult<Value> {
    let fields = match ctx.provider.resolve_type(name) {
        Resolution::Resolved(TypeShape::Composite { fields, .. }) => fields,
        _ => {
            return Err(CallError::Decode(format!(
                "`{}` is not a known composite type",
                name
            )))
        }
    };
    let bag = match entry {
        BagValue::Bag(bag) => bag,
        other => {
            return Err(CallError::Decode(format!(
                "composite `{}` expects a nested property bag, found `{}`",
                name, other
            )))
        }
    };

    let mut assembled = Vec::new();
    for field in fields.iter().filter(|f| f.default_accessor) {
        let field_ty = resolve_type_ref(ctx.provider, &field.ty).map_err(|missing| {
            CallError::Decode(format!(
                "field `{}` of composite `{}` has unresolved types [{}]",
                field.name,
                name,
                missing.join(", ")
            ))
        })?;
        let (field_nullable, field_inner) = field_ty.peel_nullable();
        let nested = bag.by_name(&field.name);

        let value = match nested {
            None => {
                if field_nullable {
                    Value::Null
                } else {
                    return Err(CallError::Decode(format!(
                        "composite `{}` is missing field `{}`",
                        name, field.name
                    )));
                }
            }
            Some(nested) => {
                if field_nullable
                    && (nested.value.is_null() || nested.value.is_empty_sentinel())
                {
                    Value::Null
                } else {
                    unmarshal_entry(ctx, field_inner, &nested.value)?
                }
            }
        };
        assembled.push((field.name.clone(), value));
    }

    Ok(Value::Composite {
        name: name.to_string(),
        fields: assembled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use soap_codegen::SchemaRegistry;
    use soap_model::ProxyClass;

    fn registry_with(interface: &str) -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        registry.insert(ProxyClass {
            interface: interface.to_string(),
            extends: None,
            namespace: "urn:test".to_string(),
            methods: vec![],
            slots: vec![],
        });
        registry
    }

    fn schema() -> SchemaRegistry {
        SchemaRegistry::from_json(
            r#"{
                "interfaces": [{"name": "IMedium", "methods": []}],
                "enums": [{"name": "MachineState", "values": [
                    {"name": "PoweredOff", "wire": "PoweredOff"},
                    {"name": "Running", "wire": "Running"}
                ]}],
                "composites": [{"name": "Snapshot", "fields": [
                    {"name": "id", "type": {"named": "string"}},
                    {"name": "online", "type": {"named": "bool"}},
                    {"name": "description", "type": {"nullable": {"named": "string"}}}
                ]}]
            }"#,
        )
        .unwrap()
    }

    fn text_ty() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Text)
    }

    #[test]
    fn scalar_direct_cast_and_string_parse() {
        let registry = ClassRegistry::new();
        let schema = schema();
        let ctx = UnmarshalCtx {
            registry: &registry,
            provider: &schema,
        };
        let i32_ty = TypeDescriptor::Primitive(PrimitiveKind::I32);
        assert_eq!(
            unmarshal_entry(&ctx, &i32_ty, &BagValue::I32(7)).unwrap(),
            Value::I32(7)
        );
        assert_eq!(
            unmarshal_entry(&ctx, &i32_ty, &BagValue::text("7")).unwrap(),
            Value::I32(7)
        );
        assert!(unmarshal_entry(&ctx, &i32_ty, &BagValue::text("seven")).is_err());
    }

    #[test]
    fn bytes_decode_from_base64_text() {
        let registry = ClassRegistry::new();
        let schema = schema();
        let ctx = UnmarshalCtx {
            registry: &registry,
            provider: &schema,
        };
        let bytes_ty = TypeDescriptor::Primitive(PrimitiveKind::Bytes);
        assert_eq!(
            unmarshal_entry(&ctx, &bytes_ty, &BagValue::text("AQID")).unwrap(),
            Value::Bytes(vec![1, 2, 3])
        );
    }

    #[test]
    fn collection_return_drops_sentinel_entries_in_order() {
        let registry = ClassRegistry::new();
        let schema = schema();
        let ctx = UnmarshalCtx {
            registry: &registry,
            provider: &schema,
        };
        let ty = TypeDescriptor::collection(text_ty());
        let bag = PropertyBag::new()
            .with_unnamed(BagValue::text("anyType{}"))
            .with_unnamed(BagValue::text("A"))
            .with_unnamed(BagValue::text("B"));
        assert_eq!(
            unmarshal_return(&ctx, &ty, &bag).unwrap(),
            Value::List(vec![Value::from("A"), Value::from("B")])
        );
    }

    #[test]
    fn plain_map_return_is_last_write_wins() {
        // Duplicate tag names overwrite for plain value types but group for
        // collection value types; the asymmetry is deliberate.
        let registry = ClassRegistry::new();
        let schema = schema();
        let ctx = UnmarshalCtx {
            registry: &registry,
            provider: &schema,
        };
        let ty = TypeDescriptor::Map(Box::new(text_ty()), Box::new(text_ty()));
        let bag = PropertyBag::new()
            .with("x", BagValue::text("1"))
            .with("x", BagValue::text("2"))
            .with("y", BagValue::text("3"));
        let expected: IndexMap<String, Value> = [
            ("x".to_string(), Value::from("2")),
            ("y".to_string(), Value::from("3")),
        ]
        .into_iter()
        .collect();
        assert_eq!(unmarshal_return(&ctx, &ty, &bag).unwrap(), Value::Map(expected));
    }

    #[test]
    fn grouping_map_return_collects_same_named_entries() {
        let registry = ClassRegistry::new();
        let schema = schema();
        let ctx = UnmarshalCtx {
            registry: &registry,
            provider: &schema,
        };
        let ty = TypeDescriptor::Map(
            Box::new(text_ty()),
            Box::new(TypeDescriptor::collection(text_ty())),
        );
        let bag = PropertyBag::new()
            .with("x", BagValue::text("1"))
            .with("x", BagValue::text("2"))
            .with("y", BagValue::text("3"));
        let result = unmarshal_return(&ctx, &ty, &bag).unwrap();
        let expected: IndexMap<String, Value> = [
            (
                "x".to_string(),
                Value::List(vec![Value::from("1"), Value::from("2")]),
            ),
            ("y".to_string(), Value::List(vec![Value::from("3")])),
        ]
        .into_iter()
        .collect();
        assert_eq!(result, Value::Map(expected));
    }

    #[test]
    fn nullable_scalar_return_with_sentinel_is_null() {
        let registry = ClassRegistry::new();
        let schema = schema();
        let ctx = UnmarshalCtx {
            registry: &registry,
            provider: &schema,
        };
        let ty = TypeDescriptor::nullable(text_ty());
        let empty = PropertyBag::new();
        assert_eq!(unmarshal_return(&ctx, &ty, &empty).unwrap(), Value::Null);
        let sentinel = PropertyBag::new().with_unnamed(BagValue::text("anyType{}"));
        assert_eq!(unmarshal_return(&ctx, &ty, &sentinel).unwrap(), Value::Null);
    }

    #[test]
    fn object_ref_requires_a_generated_class() {
        let schema = schema();
        let ty = TypeDescriptor::ObjectRef("IMedium".into());

        let empty = ClassRegistry::new();
        let ctx = UnmarshalCtx {
            registry: &empty,
            provider: &schema,
        };
        assert!(unmarshal_entry(&ctx, &ty, &BagValue::text("obj-9")).is_err());

        let registry = registry_with("IMedium");
        let ctx = UnmarshalCtx {
            registry: &registry,
            provider: &schema,
        };
        assert_eq!(
            unmarshal_entry(&ctx, &ty, &BagValue::text("obj-9")).unwrap(),
            Value::reference("IMedium", "obj-9")
        );
    }

    #[test]
    fn enum_resolves_via_from_wire_lookup() {
        let registry = ClassRegistry::new();
        let schema = schema();
        let ctx = UnmarshalCtx {
            registry: &registry,
            provider: &schema,
        };
        let ty = TypeDescriptor::Enum("MachineState".into());
        assert_eq!(
            unmarshal_entry(&ctx, &ty, &BagValue::text("Running")).unwrap(),
            Value::enumeration("MachineState", "Running")
        );
        assert!(unmarshal_entry(&ctx, &ty, &BagValue::text("Melted")).is_err());
    }

    #[test]
    fn composite_assembles_fields_in_declaration_order() {
        let registry = ClassRegistry::new();
        let schema = schema();
        let ctx = UnmarshalCtx {
            registry: &registry,
            provider: &schema,
        };
        let ty = TypeDescriptor::Composite("Snapshot".into());
        let nested = PropertyBag::new()
            .with("online", BagValue::Bool(true))
            .with("id", BagValue::text("snap-1"));
        // description is missing entirely; it is nullable so it unmarshals
        // to absent instead of failing.
        let value = unmarshal_entry(&ctx, &ty, &BagValue::Bag(nested)).unwrap();
        assert_eq!(
            value,
            Value::Composite {
                name: "Snapshot".into(),
                fields: vec![
                    ("id".into(), Value::from("snap-1")),
                    ("online".into(), Value::Bool(true)),
                    ("description".into(), Value::Null),
                ],
            }
        );
    }

    #[test]
    fn composite_missing_required_field_is_a_decode_error() {
        let registry = ClassRegistry::new();
        let schema = schema();
        let ctx = UnmarshalCtx {
            registry: &registry,
            provider: &schema,
        };
        let ty = TypeDescriptor::Composite("Snapshot".into());
        let nested = PropertyBag::new().with("online", BagValue::Bool(true));
        assert!(matches!(
            unmarshal_entry(&ctx, &ty, &BagValue::Bag(nested)),
            Err(CallError::Decode(_))
        ));
    }
}
