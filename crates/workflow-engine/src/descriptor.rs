//! Master block definitions
//!
//! A [`MasterBlockDefinition`] is the immutable catalogue entry for one
//! [`BlockType`]: everything the generator, validator and controller need to
//! know about a block that does not vary per project. The standard catalogue
//! is produced by [`standard_definition`], an exhaustive match, so a new block
//! type does not compile until it is described here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::block_config::{
    AssignmentStrategy, BlockConfig, FileRenamingConfig, FileStorageConfig, ModerationConfig,
    ModerationOutcome, ModeratorType, NotificationChannel, ProAssigningConfig, RejectTarget,
    RenameMode, RetoucherAssigningConfig, SendNotificationConfig, ShootSlots, SstConfig,
    SubmitMode,
};
use crate::types::{BlockCategory, BlockType, BranchType};

/// Complete, immutable description of a block type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterBlockDefinition {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// Human-readable label
    pub label: String,
    /// Description of what the step does
    pub description: String,
    pub category: BlockCategory,
    /// False for mandatory blocks: always enabled and never dragged
    pub can_be_disabled: bool,
    /// The block must be the first step of its branch
    pub pinned_first: bool,
    /// Ordering hint used when a preset does not override the position
    pub default_position: i32,
    /// Branch kinds that may host this block
    pub allowed_branches: HashSet<BranchType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_config: Option<BlockConfig>,
    /// Block types that must precede this one when present in the same branch
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must_come_after: Vec<BlockType>,
}

impl MasterBlockDefinition {
    /// Create an optional block definition
    pub fn new(
        block_type: BlockType,
        label: impl Into<String>,
        category: BlockCategory,
        default_position: i32,
    ) -> Self {
        Self {
            block_type,
            label: label.into(),
            description: String::new(),
            category,
            can_be_disabled: true,
            pinned_first: false,
            default_position,
            allowed_branches: BranchType::ALL.into_iter().collect(),
            default_config: None,
            must_come_after: Vec::new(),
        }
    }

    /// Make the block mandatory
    pub fn locked(mut self) -> Self {
        self.can_be_disabled = false;
        self
    }

    /// Pin the block to the head of its branch
    pub fn pinned_first(mut self) -> Self {
        self.pinned_first = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Restrict the block to the given branch kinds
    pub fn in_branches(mut self, branches: &[BranchType]) -> Self {
        self.allowed_branches = branches.iter().copied().collect();
        self
    }

    pub fn with_default_config(mut self, config: BlockConfig) -> Self {
        self.default_config = Some(config);
        self
    }

    /// Declare predecessors that must come earlier in the branch
    pub fn after(mut self, predecessors: &[BlockType]) -> Self {
        self.must_come_after = predecessors.to_vec();
        self
    }

    /// Check if this block may be placed in a branch kind
    pub fn allows_branch(&self, branch_type: BranchType) -> bool {
        self.allowed_branches.contains(&branch_type)
    }
}

/// The built-in definition of a block type
pub fn standard_definition(block_type: BlockType) -> MasterBlockDefinition {
    use BlockCategory::{Finalisation, Processing, Starting, Universal};
    use BranchType::{General, Photo, Video};

    match block_type {
        BlockType::OrderCreated => {
            MasterBlockDefinition::new(block_type, "Order Created", Starting, 0)
                .with_description("Entry point of every branch once the order is placed")
                .locked()
                .pinned_first()
        }
        BlockType::WaitPayment => {
            MasterBlockDefinition::new(block_type, "Wait for Payment", Starting, 10)
                .with_description("Hold the order until the client has paid")
                .in_branches(&[General])
                .after(&[BlockType::OrderCreated])
        }
        BlockType::ProAssigning => {
            MasterBlockDefinition::new(block_type, "Pro Assigning", Starting, 20)
                .with_description("Offer the shoot to photographers and videographers")
                .in_branches(&[Photo, Video])
                .after(&[BlockType::OrderCreated])
                .with_default_config(BlockConfig::ProAssigning(ProAssigningConfig {
                    strategy: Some(AssignmentStrategy::Manual),
                    require_confirmation: Some(true),
                    photographers: Some(ShootSlots {
                        count: Some(1),
                        default_duration_minutes: Some(60),
                    }),
                    videographers: Some(ShootSlots {
                        count: Some(0),
                        default_duration_minutes: Some(60),
                    }),
                    visible_to_client: Some(false),
                    min_pro_level: Some(1),
                    ..Default::default()
                }))
        }
        BlockType::PhotoShoot => {
            MasterBlockDefinition::new(block_type, "Photo Shoot", Processing, 30)
                .with_description("On-site photo session")
                .in_branches(&[Photo])
                .locked()
                .after(&[BlockType::ProAssigning])
        }
        BlockType::VideoShoot => {
            MasterBlockDefinition::new(block_type, "Video Shoot", Processing, 30)
                .with_description("On-site video session")
                .in_branches(&[Video])
                .locked()
                .after(&[BlockType::ProAssigning])
        }
        BlockType::Sst => {
            MasterBlockDefinition::new(block_type, "Photo Selection (SST)", Processing, 40)
                .with_description("Client or operator picks the photos to deliver")
                .in_branches(&[Photo])
                .after(&[BlockType::PhotoShoot])
                .with_default_config(BlockConfig::Sst(SstConfig {
                    allow_new_items: Some(false),
                    submit_mode: Some(SubmitMode::Single),
                    min_photos_per_batch: Some(0),
                    ..Default::default()
                }))
        }
        BlockType::FileRenaming => {
            MasterBlockDefinition::new(block_type, "File Renaming", Processing, 50)
                .with_description("Rename delivered files")
                .in_branches(&[Photo, Video])
                .after(&[BlockType::PhotoShoot, BlockType::VideoShoot])
                .with_default_config(BlockConfig::FileRenaming(FileRenamingConfig {
                    mode: Some(RenameMode::Auto),
                    number_pattern: Some("0001".to_string()),
                    include_date: Some(true),
                    include_time: Some(false),
                    ..Default::default()
                }))
        }
        BlockType::RetoucherAssigning => {
            MasterBlockDefinition::new(block_type, "Retoucher Assigning", Processing, 60)
                .with_description("Offer the retouching job to retouchers")
                .in_branches(&[Photo])
                .after(&[BlockType::PhotoShoot])
                .with_default_config(BlockConfig::RetoucherAssigning(RetoucherAssigningConfig {
                    strategy: Some(AssignmentStrategy::Manual),
                    enforce_guidelines: Some(false),
                    visible_to_client: Some(false),
                    min_retoucher_level: Some(1),
                    ..Default::default()
                }))
        }
        BlockType::PhotoRetouching => {
            MasterBlockDefinition::new(block_type, "Photo Retouching", Processing, 70)
                .with_description("Retouch the selected photos")
                .in_branches(&[Photo])
                .after(&[BlockType::PhotoShoot, BlockType::RetoucherAssigning])
        }
        BlockType::VideoEditing => {
            MasterBlockDefinition::new(block_type, "Video Editing", Processing, 70)
                .with_description("Cut and grade the footage")
                .in_branches(&[Video])
                .after(&[BlockType::VideoShoot])
        }
        BlockType::Moderation => {
            MasterBlockDefinition::new(block_type, "Moderation", Processing, 80)
                .with_description("Quality review before delivery")
                .in_branches(&[Photo, Video])
                .after(&[BlockType::PhotoRetouching, BlockType::VideoEditing])
                .with_default_config(BlockConfig::Moderation(ModerationConfig {
                    moderator_type: Some(ModeratorType::Internal),
                    outcomes: Some(
                        [ModerationOutcome::Approve, ModerationOutcome::Revision]
                            .into_iter()
                            .collect(),
                    ),
                    max_revisions: Some(0),
                    on_reject: Some(RejectTarget::CancelOrder),
                    ..Default::default()
                }))
        }
        BlockType::IfElse => MasterBlockDefinition::new(block_type, "If / Else", Universal, 90)
            .with_description("Route the order depending on a condition"),
        BlockType::Merge => MasterBlockDefinition::new(block_type, "Merge", Universal, 100)
            .with_description("Join the paths opened by an If / Else")
            .in_branches(&[Photo, Video])
            .after(&[BlockType::IfElse]),
        BlockType::ExternalProcess => {
            MasterBlockDefinition::new(block_type, "External Process", Universal, 110)
                .with_description("Call a webhook with order data")
        }
        BlockType::SendNotification => {
            MasterBlockDefinition::new(block_type, "Send Notification", Universal, 120)
                .with_description("Notify the client or the team")
                .with_default_config(BlockConfig::SendNotification(SendNotificationConfig {
                    channel: Some(NotificationChannel::Email),
                    ..Default::default()
                }))
        }
        BlockType::FileStorage => {
            MasterBlockDefinition::new(block_type, "File Storage", Finalisation, 130)
                .with_description("Keep delivered files available for download")
                .in_branches(&[Photo, Video])
                .with_default_config(BlockConfig::FileStorage(FileStorageConfig {
                    time_to_life: Some(30),
                }))
        }
        BlockType::SendToClient => {
            MasterBlockDefinition::new(block_type, "Send to Client", Finalisation, 140)
                .with_description("Deliver the final files to the client")
        }
    }
}
