//! Core types for production workflows
//!
//! These types define the structure of a project's workflow: the closed set
//! of block types and categories, the branches a workflow is split into, and
//! the block instances that live in each branch.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::block_config::{BlockConfig, ConfigKind};

/// Unique identifier for a block instance
pub type BlockId = String;

/// Unique identifier for a branch
pub type BranchId = String;

/// A kind of production step
///
/// The set is closed: every consumer matches on it exhaustively, so adding a
/// variant fails compilation until the registry, payload mapping and any
/// other dispatch handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    OrderCreated,
    WaitPayment,
    ProAssigning,
    PhotoShoot,
    VideoShoot,
    Sst,
    FileRenaming,
    RetoucherAssigning,
    PhotoRetouching,
    VideoEditing,
    Moderation,
    IfElse,
    Merge,
    ExternalProcess,
    SendNotification,
    FileStorage,
    SendToClient,
}

impl BlockType {
    /// Every block type, in declaration order
    pub const ALL: [BlockType; 17] = [
        BlockType::OrderCreated,
        BlockType::WaitPayment,
        BlockType::ProAssigning,
        BlockType::PhotoShoot,
        BlockType::VideoShoot,
        BlockType::Sst,
        BlockType::FileRenaming,
        BlockType::RetoucherAssigning,
        BlockType::PhotoRetouching,
        BlockType::VideoEditing,
        BlockType::Moderation,
        BlockType::IfElse,
        BlockType::Merge,
        BlockType::ExternalProcess,
        BlockType::SendNotification,
        BlockType::FileStorage,
        BlockType::SendToClient,
    ];

    /// Wire name, e.g. `ORDER_CREATED`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderCreated => "ORDER_CREATED",
            Self::WaitPayment => "WAIT_PAYMENT",
            Self::ProAssigning => "PRO_ASSIGNING",
            Self::PhotoShoot => "PHOTO_SHOOT",
            Self::VideoShoot => "VIDEO_SHOOT",
            Self::Sst => "SST",
            Self::FileRenaming => "FILE_RENAMING",
            Self::RetoucherAssigning => "RETOUCHER_ASSIGNING",
            Self::PhotoRetouching => "PHOTO_RETOUCHING",
            Self::VideoEditing => "VIDEO_EDITING",
            Self::Moderation => "MODERATION",
            Self::IfElse => "IF_ELSE",
            Self::Merge => "MERGE",
            Self::ExternalProcess => "EXTERNAL_PROCESS",
            Self::SendNotification => "SEND_NOTIFICATION",
            Self::FileStorage => "FILE_STORAGE",
            Self::SendToClient => "SEND_TO_CLIENT",
        }
    }

    /// Which configuration payload shape this block type carries, if any
    pub fn config_kind(&self) -> Option<ConfigKind> {
        match self {
            Self::ProAssigning => Some(ConfigKind::ProAssigning),
            Self::RetoucherAssigning => Some(ConfigKind::RetoucherAssigning),
            Self::Sst => Some(ConfigKind::Sst),
            Self::Moderation => Some(ConfigKind::Moderation),
            Self::IfElse => Some(ConfigKind::IfElse),
            Self::ExternalProcess => Some(ConfigKind::ExternalProcess),
            Self::SendNotification => Some(ConfigKind::SendNotification),
            Self::FileStorage => Some(ConfigKind::FileStorage),
            Self::FileRenaming => Some(ConfigKind::FileRenaming),
            Self::OrderCreated
            | Self::WaitPayment
            | Self::PhotoShoot
            | Self::VideoShoot
            | Self::PhotoRetouching
            | Self::VideoEditing
            | Self::Merge
            | Self::SendToClient => None,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse ordering class of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockCategory {
    /// Intake steps (order creation, payment, assigning pros)
    Starting,
    /// Production steps (shooting, selection, retouching, moderation)
    Processing,
    /// Delivery steps (storage, sending to the client)
    Finalisation,
    /// Steps that may appear anywhere (branching, webhooks, notifications)
    Universal,
}

/// Kind of parallel track a branch represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BranchType {
    Photo,
    Video,
    General,
}

impl BranchType {
    pub const ALL: [BranchType; 3] = [BranchType::Photo, BranchType::Video, BranchType::General];
}

impl fmt::Display for BranchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Photo => f.write_str("PHOTO"),
            Self::Video => f.write_str("VIDEO"),
            Self::General => f.write_str("GENERAL"),
        }
    }
}

/// A block instance inside a branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowBlock {
    /// Instance id (unique within one generated config)
    pub id: BlockId,
    /// Block type (references a MasterBlockDefinition)
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// Label copied from the master definition at generation time
    pub label: String,
    /// Category copied from the master definition at generation time
    pub category: BlockCategory,
    pub is_enabled: bool,
    /// Resolved configuration; absent when the block has nothing to configure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BlockConfig>,
}

/// One parallel track of a workflow with its ordered blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowBranch {
    pub id: BranchId,
    pub name: String,
    #[serde(rename = "type")]
    pub branch_type: BranchType,
    /// Blocks in execution order
    pub blocks: Vec<WorkflowBlock>,
}

impl WorkflowBranch {
    /// Find a block by instance ID
    pub fn find_block(&self, block_id: &str) -> Option<&WorkflowBlock> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    /// Find a block by instance ID (mutable)
    pub fn find_block_mut(&mut self, block_id: &str) -> Option<&mut WorkflowBlock> {
        self.blocks.iter_mut().find(|b| b.id == block_id)
    }

    /// Index of a block instance within the branch
    pub fn position_of(&self, block_id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == block_id)
    }

    /// The instance of a given block type, if the branch hosts one
    pub fn block_of_type(&self, block_type: BlockType) -> Option<&WorkflowBlock> {
        self.blocks.iter().find(|b| b.block_type == block_type)
    }

    /// Block types in their current order
    pub fn block_types(&self) -> Vec<BlockType> {
        self.blocks.iter().map(|b| b.block_type).collect()
    }
}

/// A project's complete workflow; the unit of validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWorkflowConfig {
    pub project_id: String,
    /// Preset id the config was generated from
    pub template_id: String,
    pub branches: Vec<WorkflowBranch>,
}

impl ProjectWorkflowConfig {
    /// Create a config with no branches
    pub fn new(project_id: impl Into<String>, template_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            template_id: template_id.into(),
            branches: Vec::new(),
        }
    }

    /// Find a branch by ID
    pub fn find_branch(&self, branch_id: &str) -> Option<&WorkflowBranch> {
        self.branches.iter().find(|b| b.id == branch_id)
    }

    /// Find a branch by ID (mutable)
    pub fn find_branch_mut(&mut self, branch_id: &str) -> Option<&mut WorkflowBranch> {
        self.branches.iter_mut().find(|b| b.id == branch_id)
    }

    /// Find the branch that holds a block instance
    pub fn branch_of_block(&self, block_id: &str) -> Option<&WorkflowBranch> {
        self.branches.iter().find(|b| b.find_block(block_id).is_some())
    }

    /// Find a block within a branch
    pub fn find_block(&self, branch_id: &str, block_id: &str) -> Option<&WorkflowBlock> {
        self.find_branch(branch_id).and_then(|b| b.find_block(block_id))
    }

    /// Total number of block instances across all branches
    pub fn block_count(&self) -> usize {
        self.branches.iter().map(|b| b.blocks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: &str, block_type: BlockType) -> WorkflowBlock {
        WorkflowBlock {
            id: id.to_string(),
            block_type,
            label: block_type.as_str().to_string(),
            category: BlockCategory::Universal,
            is_enabled: true,
            config: None,
        }
    }

    #[test]
    fn test_block_type_wire_names() {
        for block_type in BlockType::ALL {
            let json = serde_json::to_string(&block_type).unwrap();
            assert_eq!(json, format!("\"{}\"", block_type.as_str()));
        }
    }

    #[test]
    fn test_branch_lookups() {
        let branch = WorkflowBranch {
            id: "general".to_string(),
            name: "General".to_string(),
            branch_type: BranchType::General,
            blocks: vec![
                block("a", BlockType::OrderCreated),
                block("b", BlockType::SendToClient),
            ],
        };

        assert_eq!(branch.position_of("b"), Some(1));
        assert!(branch.find_block("missing").is_none());
        assert_eq!(branch.block_of_type(BlockType::OrderCreated).unwrap().id, "a");
        assert_eq!(
            branch.block_types(),
            vec![BlockType::OrderCreated, BlockType::SendToClient]
        );

        let mut config = ProjectWorkflowConfig::new("p1", "t1");
        config.branches.push(branch);
        assert_eq!(config.branch_of_block("b").unwrap().id, "general");
        assert_eq!(config.block_count(), 2);
    }

    #[test]
    fn test_block_serializes_type_field() {
        let json = serde_json::to_value(block("a", BlockType::IfElse)).unwrap();
        assert_eq!(json["type"], "IF_ELSE");
        assert_eq!(json["isEnabled"], true);
        assert!(json.get("config").is_none());
    }
}
