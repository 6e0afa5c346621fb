//! Registry of planned proxy classes.
//!
//! The generation batch inserts one [`ProxyClass`] per successfully planned
//! interface; the runtime resolves methods and cache-slot layouts through it,
//! walking the single-inheritance chain.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use indexmap::IndexMap;

use crate::descriptor::{CacheSlot, MethodDescriptor, ProxyClass};

#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: IndexMap<String, Arc<ProxyClass>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: ProxyClass) {
        self.classes.insert(class.interface.clone(), Arc::new(class));
    }

    pub fn get(&self, interface: &str) -> Option<Arc<ProxyClass>> {
        self.classes.get(interface).cloned()
    }

    pub fn contains(&self, interface: &str) -> bool {
        self.classes.contains_key(interface)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ProxyClass>> {
        self.classes.values()
    }

    /// Inheritance chain for an interface, root-most first.
    pub fn chain(&self, interface: &str) -> Result<Vec<Arc<ProxyClass>>> {
        let mut chain = Vec::new();
        let mut current = interface.to_string();
        loop {
            let class = self
                .get(&current)
                .ok_or_else(|| anyhow!("no generated class for interface `{}`", current))?;
            if chain.iter().any(|c: &Arc<ProxyClass>| c.interface == class.interface) {
                return Err(anyhow!(
                    "inheritance cycle detected at interface `{}`",
                    class.interface
                ));
            }
            let next = class.extends.clone();
            chain.push(class);
            match next {
                Some(base) => current = base,
                None => break,
            }
        }
        chain.reverse();
        Ok(chain)
    }

    /// Every cache slot an instance of `interface` owns, in stable declared
    /// order: supertype slots first, then each subtype's own.
    pub fn slots(&self, interface: &str) -> Result<Vec<CacheSlot>> {
        let mut slots = Vec::new();
        for class in self.chain(interface)? {
            slots.extend(class.slots.iter().cloned());
        }
        Ok(slots)
    }

    /// Resolve a method by name, walking from the leaf class toward the root.
    pub fn resolve_method(
        &self,
        interface: &str,
        method: &str,
    ) -> Result<(Arc<ProxyClass>, MethodDescriptor)> {
        for class in self.chain(interface)?.into_iter().rev() {
            if let Some(found) = class.method(method) {
                let found = found.clone();
                return Ok((class, found));
            }
        }
        Err(anyhow!(
            "interface `{}` declares no method `{}`",
            interface,
            method
        ))
    }
}
