//! Fluent builders for branches and workflow configs
//!
//! Hand-assembles branch states without going through a preset, mostly for
//! tests and for hosts that import configs from elsewhere. Block instance
//! ids are deterministic: the lowercased block type.

use crate::block_config::BlockConfig;
use crate::registry::{standard_registry, BlockRegistry};
use crate::types::{
    BlockCategory, BlockType, BranchType, ProjectWorkflowConfig, WorkflowBlock, WorkflowBranch,
};

/// Fluent builder for a single branch
///
/// # Example
///
/// ```ignore
/// let branch = BranchBuilder::new("general", "General", BranchType::General)
///     .blocks(&[BlockType::OrderCreated, BlockType::WaitPayment])
///     .block(BlockType::SendToClient)
///     .disabled(BlockType::WaitPayment)
///     .build();
/// ```
pub struct BranchBuilder<'a> {
    registry: &'a BlockRegistry,
    id: String,
    name: String,
    branch_type: BranchType,
    blocks: Vec<WorkflowBlock>,
}

impl BranchBuilder<'static> {
    /// Create a builder using labels and categories from the standard registry
    pub fn new(id: impl Into<String>, name: impl Into<String>, branch_type: BranchType) -> Self {
        Self::with_registry(standard_registry(), id, name, branch_type)
    }
}

impl<'a> BranchBuilder<'a> {
    pub fn with_registry(
        registry: &'a BlockRegistry,
        id: impl Into<String>,
        name: impl Into<String>,
        branch_type: BranchType,
    ) -> Self {
        Self {
            registry,
            id: id.into(),
            name: name.into(),
            branch_type,
            blocks: Vec::new(),
        }
    }

    /// Append an enabled block without config
    pub fn block(mut self, block_type: BlockType) -> Self {
        let (label, category) = match self.registry.get(block_type) {
            Some(def) => (def.label.clone(), def.category),
            None => (block_type.as_str().to_string(), BlockCategory::Universal),
        };
        self.blocks.push(WorkflowBlock {
            id: block_type.as_str().to_lowercase(),
            block_type,
            label,
            category,
            is_enabled: true,
            config: None,
        });
        self
    }

    /// Append several blocks in order
    pub fn blocks(self, block_types: &[BlockType]) -> Self {
        block_types.iter().fold(self, |builder, &t| builder.block(t))
    }

    /// Switch off an already added block
    pub fn disabled(mut self, block_type: BlockType) -> Self {
        if let Some(block) = self.blocks.iter_mut().find(|b| b.block_type == block_type) {
            block.is_enabled = false;
        }
        self
    }

    /// Attach a config to an already added block
    pub fn with_config(mut self, block_type: BlockType, config: BlockConfig) -> Self {
        if let Some(block) = self.blocks.iter_mut().find(|b| b.block_type == block_type) {
            block.config = Some(config);
        }
        self
    }

    /// Build the branch without validation
    pub fn build(self) -> WorkflowBranch {
        WorkflowBranch {
            id: self.id,
            name: self.name,
            branch_type: self.branch_type,
            blocks: self.blocks,
        }
    }
}

/// Fluent builder for a whole project config
pub struct ConfigBuilder {
    config: ProjectWorkflowConfig,
}

impl ConfigBuilder {
    pub fn new(project_id: impl Into<String>, template_id: impl Into<String>) -> Self {
        Self {
            config: ProjectWorkflowConfig::new(project_id, template_id),
        }
    }

    /// Append a branch
    pub fn branch(mut self, branch: WorkflowBranch) -> Self {
        self.config.branches.push(branch);
        self
    }

    /// Build the config without validation
    pub fn build(self) -> ProjectWorkflowConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_builder() {
        let branch = BranchBuilder::new("general", "General", BranchType::General)
            .blocks(&[BlockType::OrderCreated, BlockType::WaitPayment])
            .block(BlockType::SendToClient)
            .disabled(BlockType::WaitPayment)
            .build();

        assert_eq!(branch.blocks.len(), 3);
        assert_eq!(branch.blocks[0].id, "order_created");
        assert_eq!(branch.blocks[0].label, "Order Created");
        assert_eq!(branch.blocks[2].category, BlockCategory::Finalisation);
        assert!(!branch.blocks[1].is_enabled);
    }

    #[test]
    fn test_unregistered_block_falls_back_to_wire_name() {
        let registry = BlockRegistry::new();
        let branch = BranchBuilder::with_registry(&registry, "g", "G", BranchType::General)
            .block(BlockType::Merge)
            .build();
        assert_eq!(branch.blocks[0].label, "MERGE");
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new("p1", "manual")
            .branch(
                BranchBuilder::new("general", "General", BranchType::General)
                    .block(BlockType::OrderCreated)
                    .build(),
            )
            .build();

        assert_eq!(config.project_id, "p1");
        assert_eq!(config.template_id, "manual");
        assert_eq!(config.find_block("general", "order_created").unwrap().label, "Order Created");
    }
}
