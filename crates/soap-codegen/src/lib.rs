//! Generation pipeline for soap-proxygen.
//!
//! Turns annotated interface definitions into planned proxy classes:
//!
//! - [`schema`]: JSON-loadable schema container implementing the
//!   type-information provider interface
//! - [`extract`]: interface descriptor extraction (inclusion policy, cache
//!   slot registration, unresolved-type deferral)
//! - [`plan`]: proxy class planning (single-inheritance chain, slot layout)
//! - [`driver`]: multi-pass batch generation with per-interface error
//!   isolation
//! - [`error`]: the generation error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use soap_codegen::driver::{generate, GenConfig};
//! use soap_codegen::schema::SchemaRegistry;
//!
//! let schema = SchemaRegistry::from_json(&std::fs::read_to_string("api.json")?)?;
//! let outcome = generate(&schema, &GenConfig::default());
//! for class in outcome.registry.iter() {
//!     println!("{} ({} methods)", class.interface, class.methods.len());
//! }
//! ```

pub mod driver;
pub mod error;
pub mod extract;
pub mod plan;
pub mod schema;

// Re-export main types for convenience
pub use driver::{generate, BatchOutcome, GenConfig};
pub use error::GenError;
pub use extract::{extract, Extraction};
pub use plan::plan;
pub use schema::{CompositeDef, EnumDef, Schema, SchemaRegistry};
