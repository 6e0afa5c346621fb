//! Shared types for the soap-proxygen workspace.
//!
//! This crate provides the foundational model used across the workspace,
//! breaking circular dependency chains between the generation pipeline and
//! the proxy runtime:
//!
//! - [`schema`]: the annotated interface-definition input model
//! - [`descriptor`]: immutable generation-time descriptors ([`TypeDescriptor`],
//!   [`MethodDescriptor`], [`ProxyClass`])
//! - [`value`]: the closed runtime value union ([`Value`])
//! - [`provider`]: the type-information query interface and type-reference
//!   resolution
//! - [`registry`]: the registry of planned proxy classes

pub mod descriptor;
pub mod provider;
pub mod registry;
pub mod schema;
pub mod value;

// Re-export commonly used types at crate root
pub use descriptor::{
    CacheMarker, CacheSlot, MethodDescriptor, ParamDescriptor, PrimitiveKind, ProxyClass,
    TypeDescriptor, WireOverride,
};
pub use provider::{resolve_type_ref, EnumValue, FieldDef, Resolution, TypeInfoProvider, TypeShape};
pub use registry::ClassRegistry;
pub use schema::{InterfaceDef, MethodDef, MethodInclusion, ParamDef, TypeRef, WireMarker};
pub use value::Value;
