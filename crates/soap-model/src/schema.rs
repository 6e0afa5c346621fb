//! Input model for annotated remote-object interface definitions.
//!
//! This is the shape the host type-information source hands to the generation
//! pipeline: interfaces with their wire/caching markers, referencing types by
//! name. Type references stay syntactic here; resolution against a
//! [`TypeInfoProvider`](crate::provider::TypeInfoProvider) happens in the
//! extractor, so that unresolved names can defer an interface to a later
//! generation pass instead of failing it.

use serde::{Deserialize, Serialize};

use crate::descriptor::CacheMarker;

/// Syntactic reference to a type, prior to resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// A named type: a primitive name, enum, composite, or remote interface.
    Named(String),
    /// Nullable wrapper around another reference.
    Nullable(Box<TypeRef>),
    /// Fixed-size ordered sequence.
    Array(Box<TypeRef>),
    /// Ordered collection.
    List(Box<TypeRef>),
    /// Key/value mapping.
    Map(Box<TypeRef>, Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn nullable(inner: TypeRef) -> Self {
        match inner {
            TypeRef::Nullable(_) => inner,
            other => TypeRef::Nullable(Box::new(other)),
        }
    }

    pub fn list(elem: TypeRef) -> Self {
        TypeRef::List(Box::new(elem))
    }

    pub fn array(elem: TypeRef) -> Self {
        TypeRef::Array(Box::new(elem))
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Map(Box::new(key), Box::new(value))
    }
}

/// Which declared methods participate in generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodInclusion {
    /// Every declared method is generated.
    #[default]
    All,
    /// Only methods carrying an explicit wire marker are generated.
    AnnotatedOnly,
}

/// Interface- or method-level wire marker.
///
/// `prefix` overrides the operation-name prefix (defaults to the interface
/// name). `this_reference` names the request property carrying the entity
/// reference string; an empty string suppresses the property entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMarker {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub this_reference: Option<String>,
}

/// Parameter-level wire marker: property-name override and an optional fixed
/// wire-type override (namespace + type name).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamWireMarker {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    /// Declared type. For varargs this is the element type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub is_vararg: bool,
    #[serde(default)]
    pub wire: Option<ParamWireMarker>,
    #[serde(default)]
    pub cache: Option<CacheMarker>,
}

/// One declared method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    /// Async methods drive a network call; non-async methods are pure cache
    /// reads.
    #[serde(default = "default_true")]
    pub is_async: bool,
    #[serde(default)]
    pub wire: Option<WireMarker>,
    #[serde(default)]
    pub cache: Option<CacheMarker>,
    #[serde(default)]
    pub params: Vec<ParamDef>,
    #[serde(default)]
    pub returns: Option<TypeRef>,
}

fn default_true() -> bool {
    true
}

/// One annotated interface definition, as handed to the generation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDef {
    pub name: String,
    /// Declared remote supertypes. At most one is supported.
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub inclusion: MethodInclusion,
    /// Interface-level wire marker; methods inherit its fields.
    #[serde(default)]
    pub wire: Option<WireMarker>,
    #[serde(default)]
    pub methods: Vec<MethodDef>,
}

impl InterfaceDef {
    /// Effective operation-name prefix for a method: the method marker's
    /// prefix, else the interface marker's, else the interface name.
    pub fn prefix_for(&self, method: &MethodDef) -> String {
        method
            .wire
            .as_ref()
            .and_then(|w| w.prefix.clone())
            .or_else(|| self.wire.as_ref().and_then(|w| w.prefix.clone()))
            .unwrap_or_else(|| self.name.clone())
    }

    /// Effective "this" property name for a method, if any. An empty string
    /// at either level suppresses the property.
    pub fn this_reference_for(&self, method: &MethodDef) -> Option<String> {
        method
            .wire
            .as_ref()
            .and_then(|w| w.this_reference.clone())
            .or_else(|| self.wire.as_ref().and_then(|w| w.this_reference.clone()))
            .filter(|s| !s.is_empty())
    }
}
