//! Entity registry: entity name to generated module.

use std::collections::HashMap;

use crate::config::CompilerConfig;
use crate::ir::DeclarationSet;

/// Maps every entity name to the module id its model is generated into.
///
/// Built in a single pass over the whole source set before any property is
/// classified, then only read.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    modules: HashMap<String, String>,
    /// Module ids in the order their first entity was encountered.
    discovery: Vec<String>,
}

impl EntityRegistry {
    /// Registers every entity-marked class of every source module.
    ///
    /// Names are assumed unique. A duplicate silently takes over the mapping.
    pub fn build(set: &DeclarationSet, config: &CompilerConfig) -> Self {
        let mut registry = Self::default();

        for source in &set.modules {
            let module_id = config.module_id(&source.path);
            for entity in source.entities() {
                registry.insert(&entity.name, &module_id);
            }
        }

        tracing::debug!(
            entities = registry.modules.len(),
            modules = registry.discovery.len(),
            "built entity registry"
        );
        registry
    }

    fn insert(&mut self, entity: &str, module_id: &str) {
        if let Some(previous) = self.modules.insert(entity.to_string(), module_id.to_string()) {
            tracing::warn!(
                entity,
                previous = %previous,
                module = module_id,
                "entity declared more than once, the later declaration wins"
            );
        }
        if !self.discovery.iter().any(|m| m == module_id) {
            self.discovery.push(module_id.to_string());
        }
    }

    /// Module id that holds the model for `entity`.
    pub fn module_of(&self, entity: &str) -> Option<&str> {
        self.modules.get(entity).map(String::as_str)
    }

    /// Module ids in first-discovery order.
    pub fn modules(&self) -> &[String] {
        &self.discovery
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
