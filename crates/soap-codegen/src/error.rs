//! Generation error taxonomy.

use thiserror::Error;

/// Result type alias for generation steps.
pub type GenResult<T> = Result<T, GenError>;

/// Errors raised while extracting and planning proxy classes.
///
/// `Deferred` is control flow, not failure: the batch driver retries the
/// interface on the next pass and only converts a deferral that survives the
/// final pass into `MissingDependency`. Every other variant is fatal for its
/// interface; the batch continues with the rest.
#[derive(Debug, Error)]
pub enum GenError {
    /// A dependent type is unresolved in this pass.
    #[error("interface `{interface}` deferred: unresolved types [{}]", missing.join(", "))]
    Deferred {
        interface: String,
        missing: Vec<String>,
    },

    /// The annotated declaration is not of the expected interface-like shape.
    #[error("`{name}` is not a generatable interface declaration: {reason}")]
    InvalidDeclaration { name: String, reason: String },

    /// More than one remote supertype was declared.
    #[error("interface `{interface}` declares multiple remote supertypes: [{}]", supertypes.join(", "))]
    MultipleSupertypes {
        interface: String,
        supertypes: Vec<String>,
    },

    /// A dependent type stayed unresolved through the final pass.
    #[error("could not find types required by `{interface}`: [{}]", missing.join(", "))]
    MissingDependency {
        interface: String,
        missing: Vec<String>,
    },

    /// Unexpected failure while synthesizing one interface.
    #[error("code generation failed for `{interface}`: {source}")]
    Codegen {
        interface: String,
        #[source]
        source: anyhow::Error,
    },
}

impl GenError {
    /// Interface the error is reported against.
    pub fn interface(&self) -> &str {
        match self {
            GenError::Deferred { interface, .. }
            | GenError::MultipleSupertypes { interface, .. }
            | GenError::MissingDependency { interface, .. }
            | GenError::Codegen { interface, .. } => interface,
            GenError::InvalidDeclaration { name, .. } => name,
        }
    }
}
