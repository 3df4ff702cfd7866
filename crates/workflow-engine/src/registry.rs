//! Block registry
//!
//! Maps every [`BlockType`] to its [`MasterBlockDefinition`]. The standard
//! registry is built once from the compiled-in catalogue and never mutated
//! afterwards; custom registries exist for tests and for hosts that ship a
//! reduced catalogue.
//!
//! # Usage
//!
//! ```ignore
//! use workflow_engine::{BlockRegistry, BlockType};
//!
//! let registry = BlockRegistry::standard();
//! let def = registry.definition(BlockType::Moderation)?;
//! assert!(def.can_be_disabled);
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::descriptor::{standard_definition, MasterBlockDefinition};
use crate::error::{EngineError, Result};
use crate::types::{BlockCategory, BlockType};

static STANDARD_REGISTRY: LazyLock<BlockRegistry> = LazyLock::new(BlockRegistry::standard);

/// Shared instance of the standard registry
pub fn standard_registry() -> &'static BlockRegistry {
    &STANDARD_REGISTRY
}

/// Registry of block types with their master definitions
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    entries: HashMap<BlockType, MasterBlockDefinition>,
}

impl BlockRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry holding the built-in definition of every block type
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for block_type in BlockType::ALL {
            registry.register(standard_definition(block_type));
        }
        registry
    }

    /// Register a definition, replacing any previous one for the same type
    pub fn register(&mut self, definition: MasterBlockDefinition) {
        self.entries.insert(definition.block_type, definition);
    }

    /// Get the definition for a block type
    pub fn get(&self, block_type: BlockType) -> Option<&MasterBlockDefinition> {
        self.entries.get(&block_type)
    }

    /// Get the definition for a block type, failing if it is not registered
    pub fn definition(&self, block_type: BlockType) -> Result<&MasterBlockDefinition> {
        self.get(block_type)
            .ok_or(EngineError::UnknownBlockType(block_type))
    }

    /// Check if a block type is registered
    pub fn contains(&self, block_type: BlockType) -> bool {
        self.entries.contains_key(&block_type)
    }

    /// Whether the block may be toggled off and dragged
    ///
    /// Unregistered types are treated as locked.
    pub fn can_be_disabled(&self, block_type: BlockType) -> bool {
        self.get(block_type).is_some_and(|d| d.can_be_disabled)
    }

    /// Whether the block must lead its branch
    pub fn is_pinned_first(&self, block_type: BlockType) -> bool {
        self.get(block_type).is_some_and(|d| d.pinned_first)
    }

    /// Predecessors declared for a block type
    pub fn dependencies_of(&self, block_type: BlockType) -> &[BlockType] {
        self.get(block_type)
            .map(|d| d.must_come_after.as_slice())
            .unwrap_or(&[])
    }

    /// Label for a block type, falling back to its wire name
    pub fn label_of(&self, block_type: BlockType) -> &str {
        self.get(block_type)
            .map(|d| d.label.as_str())
            .unwrap_or_else(|| block_type.as_str())
    }

    /// Definitions grouped by category
    pub fn by_category(&self) -> HashMap<BlockCategory, Vec<&MasterBlockDefinition>> {
        let mut grouped: HashMap<BlockCategory, Vec<&MasterBlockDefinition>> = HashMap::new();
        for def in self.iter() {
            grouped.entry(def.category).or_default().push(def);
        }
        grouped
    }

    /// All definitions, ordered by default position then type
    pub fn iter(&self) -> impl Iterator<Item = &MasterBlockDefinition> {
        let mut defs: Vec<&MasterBlockDefinition> = self.entries.values().collect();
        defs.sort_by_key(|d| (d.default_position, d.block_type));
        defs.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_is_complete() {
        let registry = BlockRegistry::standard();
        assert_eq!(registry.len(), BlockType::ALL.len());
        for block_type in BlockType::ALL {
            assert!(registry.contains(block_type));
        }
    }

    #[test]
    fn test_lookup_unknown_type() {
        let registry = BlockRegistry::new();
        let result = registry.definition(BlockType::Merge);
        assert!(matches!(
            result,
            Err(EngineError::UnknownBlockType(BlockType::Merge))
        ));
        assert!(!registry.can_be_disabled(BlockType::Merge));
        assert_eq!(registry.label_of(BlockType::Merge), "MERGE");
    }

    #[test]
    fn test_locked_and_dependency_queries() {
        let registry = BlockRegistry::standard();
        assert!(!registry.can_be_disabled(BlockType::OrderCreated));
        assert!(registry.can_be_disabled(BlockType::SendToClient));
        assert!(registry.is_pinned_first(BlockType::OrderCreated));
        assert_eq!(
            registry.dependencies_of(BlockType::Moderation),
            &[BlockType::PhotoRetouching, BlockType::VideoEditing]
        );
        assert!(registry.dependencies_of(BlockType::IfElse).is_empty());
    }

    #[test]
    fn test_register_override() {
        let mut registry = BlockRegistry::standard();
        let mut def = standard_definition(BlockType::SendToClient);
        def.label = "Deliver".to_string();
        registry.register(def);

        assert_eq!(registry.len(), BlockType::ALL.len());
        assert_eq!(registry.label_of(BlockType::SendToClient), "Deliver");
    }

    #[test]
    fn test_by_category_and_ordering() {
        let registry = BlockRegistry::standard();
        let grouped = registry.by_category();
        assert_eq!(grouped.get(&BlockCategory::Finalisation).unwrap().len(), 2);

        let first = registry.iter().next().unwrap();
        assert_eq!(first.block_type, BlockType::OrderCreated);
    }
}
