//! Generation-time descriptors.
//!
//! Descriptors are constructed once per generation pass from an annotated
//! interface definition and are immutable afterwards. Runtime state (cache
//! slot contents) lives on proxy instances, not here.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Scalar kinds with a defined wire mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    I16,
    I32,
    I64,
    Bool,
    Text,
    Bytes,
}

impl PrimitiveKind {
    /// Resolve a primitive type name, if it names one.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "i16" | "short" => Some(PrimitiveKind::I16),
            "i32" | "int" => Some(PrimitiveKind::I32),
            "i64" | "long" => Some(PrimitiveKind::I64),
            "bool" | "boolean" => Some(PrimitiveKind::Bool),
            "string" | "text" => Some(PrimitiveKind::Text),
            "bytes" => Some(PrimitiveKind::Bytes),
            _ => None,
        }
    }
}

/// Resolved shape of a type. Exactly one tag applies; `Nullable` wraps
/// exactly one other tag and never nests directly inside another `Nullable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    Nullable(Box<TypeDescriptor>),
    Array(Box<TypeDescriptor>),
    Collection(Box<TypeDescriptor>),
    Map(Box<TypeDescriptor>, Box<TypeDescriptor>),
    Enum(String),
    ObjectRef(String),
    Composite(String),
}

impl TypeDescriptor {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeDescriptor::Primitive(kind)
    }

    /// Wrap in `Nullable`, collapsing a double wrap.
    pub fn nullable(inner: TypeDescriptor) -> Self {
        match inner {
            TypeDescriptor::Nullable(_) => inner,
            other => TypeDescriptor::Nullable(Box::new(other)),
        }
    }

    pub fn collection(elem: TypeDescriptor) -> Self {
        TypeDescriptor::Collection(Box::new(elem))
    }

    pub fn array(elem: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(elem))
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, TypeDescriptor::Nullable(_))
    }

    /// Strip an outer `Nullable`, reporting whether one was present.
    pub fn peel_nullable(&self) -> (bool, &TypeDescriptor) {
        match self {
            TypeDescriptor::Nullable(inner) => (true, inner),
            other => (false, other),
        }
    }

    /// Element type of an `Array` or `Collection`.
    pub fn element(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Array(elem) | TypeDescriptor::Collection(elem) => Some(elem),
            _ => None,
        }
    }

    /// Check structural invariants recursively.
    pub fn validate(&self) -> Result<()> {
        match self {
            TypeDescriptor::Nullable(inner) => {
                if inner.is_nullable() {
                    bail!("nullable type wraps another nullable type");
                }
                inner.validate()
            }
            TypeDescriptor::Array(elem) | TypeDescriptor::Collection(elem) => elem.validate(),
            TypeDescriptor::Map(key, value) => {
                key.validate()?;
                value.validate()
            }
            _ => Ok(()),
        }
    }
}

/// Fixed wire-type override: emit the value as a typed primitive with this
/// namespace and type name instead of letting the shape rules decide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireOverride {
    pub namespace: String,
    pub type_name: String,
}

/// Cache marker attached to a method or parameter.
///
/// `get` enables read-shortcutting against the slot, `put` populates the slot
/// (from the unmarshaled result on a method, from the argument on a
/// parameter). `slot` overrides the derived slot name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMarker {
    #[serde(default)]
    pub get: bool,
    #[serde(default)]
    pub put: bool,
    #[serde(default)]
    pub slot: Option<String>,
}

impl CacheMarker {
    /// Slot name: the explicit override, else the given fallback (method or
    /// parameter name).
    pub fn slot_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.slot.as_deref().filter(|s| !s.is_empty()).unwrap_or(fallback)
    }
}

/// One resolved method parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub ty: TypeDescriptor,
    pub is_vararg: bool,
    /// Wire property-name override. The declared name is used otherwise.
    pub wire_name: Option<String>,
    /// Fixed wire-type override.
    pub wire_type: Option<WireOverride>,
    pub cache: Option<CacheMarker>,
}

impl ParamDescriptor {
    /// Wire property name for this parameter.
    pub fn wire_name(&self) -> &str {
        self.wire_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }
}

/// One resolved method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub params: Vec<ParamDescriptor>,
    /// `None` for void methods.
    pub returns: Option<TypeDescriptor>,
    pub is_async: bool,
    pub cache: Option<CacheMarker>,
    /// Wire operation name: `prefix_method`.
    pub operation: String,
    /// Request property carrying the entity reference string, if any.
    pub this_property: Option<String>,
}

impl MethodDescriptor {
    /// Cache slot this method reads or writes, if it carries a marker.
    pub fn cache_slot(&self) -> Option<&str> {
        self.cache.as_ref().map(|m| m.slot_name(&self.name))
    }
}

/// Declared storage slot backing one cacheable result, nullable by
/// construction: `ty` is the stored value's type, absence is represented at
/// runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSlot {
    pub name: String,
    pub ty: TypeDescriptor,
}

/// Planned proxy class for one interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyClass {
    pub interface: String,
    /// Remote supertype whose generated proxy this one extends, if any.
    pub extends: Option<String>,
    /// Service namespace for wire operations and typed primitives.
    pub namespace: String,
    pub methods: Vec<MethodDescriptor>,
    /// Slots contributed by this interface (supertype slots live on the
    /// supertype's class).
    pub slots: Vec<CacheSlot>,
}

impl ProxyClass {
    /// An independent class owns the transport/reference fields and the
    /// externalization contract; an extending class delegates upward.
    pub fn is_independent(&self) -> bool {
        self.extends.is_none()
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}
