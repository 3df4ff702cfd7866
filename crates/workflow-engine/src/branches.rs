//! Branch structure
//!
//! The fixed set of branches every project workflow is made of, and which
//! block types each may contain. Declaration order here is the pre-sort order
//! the generator starts from, so it doubles as the tie-break between blocks
//! sharing a position.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::registry::BlockRegistry;
use crate::types::{BlockType, BranchId, BranchType};

/// Static description of one branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchDefinition {
    pub id: BranchId,
    pub name: String,
    #[serde(rename = "type")]
    pub branch_type: BranchType,
    /// Block types hosted by the branch, in declaration order
    pub allowed_block_types: Vec<BlockType>,
}

impl BranchDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        branch_type: BranchType,
        allowed_block_types: Vec<BlockType>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            branch_type,
            allowed_block_types,
        }
    }

    /// Check that every allowed block exists in the registry and accepts
    /// this branch kind
    pub fn verify(&self, registry: &BlockRegistry) -> Result<()> {
        for &block_type in &self.allowed_block_types {
            let def = registry.definition(block_type)?;
            if !def.allows_branch(self.branch_type) {
                return Err(EngineError::BlockNotAllowedInBranch {
                    branch_id: self.id.clone(),
                    branch_type: self.branch_type,
                    block_type,
                });
            }
        }
        Ok(())
    }
}

/// The built-in photo / video / general branches
pub fn standard_branches() -> Vec<BranchDefinition> {
    use BlockType::*;

    vec![
        BranchDefinition::new(
            "photo",
            "Photo",
            BranchType::Photo,
            vec![
                OrderCreated,
                ProAssigning,
                PhotoShoot,
                Sst,
                FileRenaming,
                RetoucherAssigning,
                PhotoRetouching,
                Moderation,
                IfElse,
                Merge,
                ExternalProcess,
                SendNotification,
                FileStorage,
                SendToClient,
            ],
        ),
        BranchDefinition::new(
            "video",
            "Video",
            BranchType::Video,
            vec![
                OrderCreated,
                ProAssigning,
                VideoShoot,
                FileRenaming,
                VideoEditing,
                Moderation,
                IfElse,
                Merge,
                ExternalProcess,
                SendNotification,
                FileStorage,
                SendToClient,
            ],
        ),
        BranchDefinition::new(
            "general",
            "General",
            BranchType::General,
            vec![OrderCreated, WaitPayment, SendToClient],
        ),
    ]
}

/// Verify a whole branch structure against a registry
pub fn verify_branches(branches: &[BranchDefinition], registry: &BlockRegistry) -> Result<()> {
    branches.iter().try_for_each(|b| b.verify(registry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_branches_are_consistent() {
        let registry = BlockRegistry::standard();
        verify_branches(&standard_branches(), &registry).unwrap();
    }

    #[test]
    fn test_every_branch_starts_with_order_created() {
        for branch in standard_branches() {
            assert_eq!(branch.allowed_block_types[0], BlockType::OrderCreated);
        }
    }

    #[test]
    fn test_verify_rejects_foreign_block() {
        let branch = BranchDefinition::new(
            "general",
            "General",
            BranchType::General,
            vec![BlockType::OrderCreated, BlockType::PhotoShoot],
        );
        let err = branch.verify(&BlockRegistry::standard()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::BlockNotAllowedInBranch {
                block_type: BlockType::PhotoShoot,
                ..
            }
        ));
    }

    #[test]
    fn test_verify_rejects_unregistered_block() {
        let branch = BranchDefinition::new(
            "general",
            "General",
            BranchType::General,
            vec![BlockType::OrderCreated],
        );
        let err = branch.verify(&BlockRegistry::new()).unwrap_err();
        assert!(matches!(err, EngineError::UnknownBlockType(BlockType::OrderCreated)));
    }
}
