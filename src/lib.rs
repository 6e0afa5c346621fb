//! soap-proxygen
//!
//! Descriptor-driven client proxy generation for a legacy SOAP-style
//! remote-object RPC protocol:
//!
//! - **Generation**: extract annotated interface definitions into method
//!   descriptors and cache slots, plan proxy classes across a
//!   single-inheritance chain, with multi-pass deferral for unresolved types
//! - **Marshaling**: recursive type-directed argument-to-wire-property
//!   conversion, including repeated-property collections and typed overrides
//! - **Unmarshaling**: typed reconstruction of scalars, references, enums,
//!   nested composites, ordered collections, and tag-name maps out of a
//!   generic property bag
//! - **Call orchestration**: per-invocation suspend/resume/cancel protocol
//!   with cache short-circuiting and population
//!
//! This facade re-exports the workspace crates; see [`soap_codegen`] for the
//! generation pipeline and [`soap_runtime`] for proxy behavior.

pub use soap_codegen as codegen;
pub use soap_model as model;
pub use soap_runtime as runtime;
pub use soap_wire as wire;

pub use soap_codegen::{generate, BatchOutcome, GenConfig, SchemaRegistry};
pub use soap_model::{ClassRegistry, TypeDescriptor, Value};
pub use soap_runtime::{CallError, Proxy};
pub use soap_wire::{PropertyBag, RequestEnvelope, ResponseEnvelope, Transport};
