//! Proxy runtime for soap-proxygen.
//!
//! The behavioral half of the generator: planned proxy classes become live
//! [`Proxy`] instances bound to a transport handle and an entity reference
//! string. Each method invocation marshals its arguments into a request
//! envelope, suspends on the transport's pending call, and reconstructs the
//! typed return value out of the response property bag.
//!
//! - [`marshal`]: typed argument → wire properties
//! - [`unmarshal`]: response property bag → typed value
//! - [`cache`]: instance-local cache slot storage
//! - [`proxy`]: proxy instances, reference equality, externalization, and
//!   the per-invocation call protocol
//! - [`error`]: the invocation error taxonomy

pub mod cache;
pub mod error;
pub mod marshal;
pub mod proxy;
pub mod unmarshal;

// Re-export main types for convenience
pub use cache::CacheStore;
pub use error::CallError;
pub use marshal::{marshal_param, marshal_value};
pub use proxy::Proxy;
pub use unmarshal::{unmarshal_entry, unmarshal_return, UnmarshalCtx};
