//! Batch generation driver.
//!
//! Runs extraction + planning over every interface in the schema, retrying
//! deferred interfaces across passes until a pass makes no progress. A fatal
//! error aborts only its own interface; the rest of the batch proceeds.
//! Deferrals that survive the final pass are reported as missing
//! dependencies.

use tracing::{debug, warn};

use soap_model::{ClassRegistry, ProxyClass};

use crate::error::GenError;
use crate::extract::extract;
use crate::plan::plan;
use crate::schema::SchemaRegistry;

/// Default service namespace for wire operations.
pub const DEFAULT_NAMESPACE: &str = "urn:remote-object";

/// Batch-wide generation settings.
#[derive(Debug, Clone)]
pub struct GenConfig {
    /// Service namespace stamped onto every planned class.
    pub namespace: String,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl GenConfig {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }
}

/// Outcome of a generation batch: the planned classes plus every fatal error
/// encountered.
#[derive(Debug)]
pub struct BatchOutcome {
    pub registry: ClassRegistry,
    pub errors: Vec<GenError>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Generate proxy classes for every interface in the schema.
pub fn generate(schema: &SchemaRegistry, config: &GenConfig) -> BatchOutcome {
    let mut registry = ClassRegistry::new();
    let mut errors = Vec::new();
    let mut remaining = schema.interface_names();
    let mut pass = 0usize;

    while !remaining.is_empty() {
        pass += 1;
        debug!(pass, interfaces = remaining.len(), "generation pass");
        let mut deferred: Vec<(String, Vec<String>)> = Vec::new();
        let mut progressed = false;

        for name in remaining.drain(..) {
            let def = match schema.interface(&name) {
                Some(def) => def,
                None => {
                    errors.push(GenError::InvalidDeclaration {
                        name: name.clone(),
                        reason: "interface vanished from the schema".to_string(),
                    });
                    continue;
                }
            };
            match generate_one(def, schema, config) {
                Ok(class) => {
                    debug!(interface = %class.interface, methods = class.methods.len(), "planned proxy class");
                    registry.insert(class);
                    progressed = true;
                }
                Err(GenError::Deferred { missing, .. }) => {
                    debug!(interface = %name, ?missing, "deferred to next pass");
                    deferred.push((name, missing));
                }
                Err(err) => {
                    warn!(interface = %name, error = %err, "generation failed");
                    errors.push(err);
                }
            }
        }

        if deferred.is_empty() {
            break;
        }
        if !progressed {
            // Final pass: nothing newly planned can resolve these.
            for (interface, missing) in deferred {
                errors.push(GenError::MissingDependency { interface, missing });
            }
            break;
        }
        remaining = deferred.into_iter().map(|(name, _)| name).collect();
    }

    BatchOutcome { registry, errors }
}

fn generate_one(
    def: &soap_model::InterfaceDef,
    schema: &SchemaRegistry,
    config: &GenConfig,
) -> Result<ProxyClass, GenError> {
    let extraction = extract(def, schema)?;
    plan(def, extraction, schema, config)
}
