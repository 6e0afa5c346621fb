//! JSON-loadable schema container.
//!
//! The schema document is the host's static type information: annotated
//! interfaces plus the enums and composites their signatures mention.
//! [`SchemaRegistry`] indexes it by name and implements
//! [`TypeInfoProvider`], which is all the extractor and the unmarshaler ever
//! see of it.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use soap_model::{EnumValue, FieldDef, InterfaceDef, Resolution, TypeInfoProvider, TypeShape};

/// Enumeration declaration with wire values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    pub values: Vec<EnumValue>,
}

/// Composite object declaration with its canonical constructor field list in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

/// Raw schema document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub interfaces: Vec<InterfaceDef>,
    #[serde(default)]
    pub enums: Vec<EnumDef>,
    #[serde(default)]
    pub composites: Vec<CompositeDef>,
}

/// Name-indexed schema, preserving declaration order.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    interfaces: IndexMap<String, InterfaceDef>,
    enums: IndexMap<String, EnumDef>,
    composites: IndexMap<String, CompositeDef>,
}

impl SchemaRegistry {
    pub fn from_schema(schema: Schema) -> Result<Self> {
        let mut registry = SchemaRegistry::default();
        for def in schema.interfaces {
            if registry.interfaces.insert(def.name.clone(), def.clone()).is_some() {
                return Err(anyhow!("duplicate interface `{}` in schema", def.name));
            }
        }
        for def in schema.enums {
            if registry.enums.insert(def.name.clone(), def.clone()).is_some() {
                return Err(anyhow!("duplicate enum `{}` in schema", def.name));
            }
        }
        for def in schema.composites {
            if registry.composites.insert(def.name.clone(), def.clone()).is_some() {
                return Err(anyhow!("duplicate composite `{}` in schema", def.name));
            }
        }
        Ok(registry)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let schema: Schema = serde_json::from_str(json).context("Failed to parse schema JSON")?;
        Self::from_schema(schema)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceDef> {
        self.interfaces.get(name)
    }

    /// Interface names in declaration order.
    pub fn interface_names(&self) -> Vec<String> {
        self.interfaces.keys().cloned().collect()
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }
}

impl TypeInfoProvider for SchemaRegistry {
    fn resolve_type(&self, name: &str) -> Resolution {
        if self.interfaces.contains_key(name) {
            return Resolution::Resolved(TypeShape::Reference {
                name: name.to_string(),
            });
        }
        if let Some(def) = self.enums.get(name) {
            return Resolution::Resolved(TypeShape::Enum {
                name: def.name.clone(),
                values: def.values.clone(),
            });
        }
        if let Some(def) = self.composites.get(name) {
            return Resolution::Resolved(TypeShape::Composite {
                name: def.name.clone(),
                fields: def.fields.clone(),
            });
        }
        Resolution::Unresolved
    }
}
