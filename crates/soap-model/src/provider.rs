//! Type-information query interface.
//!
//! The host that owns static type information (parsed schema, reflection,
//! IDL) implements [`TypeInfoProvider`]; the generation pipeline and the
//! response unmarshaler consume it through this trait only.

use serde::{Deserialize, Serialize};

use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use crate::schema::TypeRef;

/// One enumeration constant with its declared wire value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub wire: String,
}

/// One composite field, in constructor declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Only default-accessible fields participate in unmarshaling.
    #[serde(default = "default_true")]
    pub default_accessor: bool,
}

fn default_true() -> bool {
    true
}

/// Resolved shape of a named non-primitive type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    /// Enumeration with from-wire-value lookup data.
    Enum { name: String, values: Vec<EnumValue> },
    /// Composite object with its canonical constructor field list.
    Composite { name: String, fields: Vec<FieldDef> },
    /// Remote-object interface; values are entity references.
    Reference { name: String },
}

/// Outcome of a name lookup. `Unresolved` defers the enclosing interface to
/// a later generation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(TypeShape),
    Unresolved,
}

/// Pure query interface over the host's static type information.
pub trait TypeInfoProvider {
    fn resolve_type(&self, name: &str) -> Resolution;
}

/// Resolve a syntactic type reference into a [`TypeDescriptor`].
///
/// On failure returns every unresolved type name encountered, so a deferral
/// can report the full missing set rather than the first hit.
pub fn resolve_type_ref(
    provider: &dyn TypeInfoProvider,
    ty: &TypeRef,
) -> Result<TypeDescriptor, Vec<String>> {
    let mut missing = Vec::new();
    match walk(provider, ty, &mut missing) {
        Some(descriptor) if missing.is_empty() => Ok(descriptor),
        _ => Err(missing),
    }
}

fn walk(
    provider: &dyn TypeInfoProvider,
    ty: &TypeRef,
    missing: &mut Vec<String>,
) -> Option<TypeDescriptor> {
    match ty {
        TypeRef::Named(name) => {
            if let Some(kind) = PrimitiveKind::from_name(name) {
                return Some(TypeDescriptor::Primitive(kind));
            }
            match provider.resolve_type(name) {
                Resolution::Resolved(TypeShape::Enum { name, .. }) => {
                    Some(TypeDescriptor::Enum(name))
                }
                Resolution::Resolved(TypeShape::Composite { name, .. }) => {
                    Some(TypeDescriptor::Composite(name))
                }
                Resolution::Resolved(TypeShape::Reference { name }) => {
                    Some(TypeDescriptor::ObjectRef(name))
                }
                Resolution::Unresolved => {
                    missing.push(name.clone());
                    None
                }
            }
        }
        TypeRef::Nullable(inner) => walk(provider, inner, missing).map(TypeDescriptor::nullable),
        TypeRef::Array(elem) => walk(provider, elem, missing).map(TypeDescriptor::array),
        TypeRef::List(elem) => walk(provider, elem, missing).map(TypeDescriptor::collection),
        TypeRef::Map(key, value) => {
            let key = walk(provider, key, missing);
            let value = walk(provider, value, missing);
            match (key, value) {
                (Some(k), Some(v)) => Some(TypeDescriptor::Map(Box::new(k), Box::new(v))),
                _ => None,
            }
        }
    }
}
