//! Workflow presets
//!
//! A preset is a named template: which optional blocks are switched on, how
//! their configuration deviates from the master defaults, and where blocks
//! sit when the default positions are not wanted. Presets never add or
//! remove blocks; every branch always hosts its full allowed set.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::block_config::{
    AssignmentStrategy, BlockConfig, FileStorageConfig, ModerationConfig, ModerationOutcome,
    ModeratorType, NotificationChannel, ProAssigningConfig, SendNotificationConfig, ShootSlots,
    SstConfig, SubmitMode,
};
use crate::types::BlockType;

/// A named template used to generate a project workflow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPreset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Optional blocks switched on by this preset
    #[serde(default)]
    pub enabled_blocks: HashSet<BlockType>,
    /// Partial configs merged onto the master defaults
    #[serde(default)]
    pub block_configs: HashMap<BlockType, BlockConfig>,
    /// Position overrides used instead of the default positions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_positions: Option<HashMap<BlockType, i32>>,
}

impl WorkflowPreset {
    /// Create a preset with nothing enabled
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Switch on optional blocks
    pub fn enable(mut self, block_types: &[BlockType]) -> Self {
        self.enabled_blocks.extend(block_types.iter().copied());
        self
    }

    /// Override part of a block's configuration
    pub fn configure(mut self, block_type: BlockType, config: BlockConfig) -> Self {
        self.block_configs.insert(block_type, config);
        self
    }

    /// Override a block's position
    pub fn position(mut self, block_type: BlockType, position: i32) -> Self {
        self.block_positions
            .get_or_insert_with(HashMap::new)
            .insert(block_type, position);
        self
    }

    /// Position override for a block type, if any
    pub fn position_of(&self, block_type: BlockType) -> Option<i32> {
        self.block_positions
            .as_ref()
            .and_then(|positions| positions.get(&block_type).copied())
    }
}

/// Templates offered by the template picker
pub fn builtin_presets() -> Vec<WorkflowPreset> {
    vec![standard_photo(), full_production(), express_delivery()]
}

/// Find a built-in preset by id
pub fn find_builtin_preset(id: &str) -> Option<WorkflowPreset> {
    builtin_presets().into_iter().find(|p| p.id == id)
}

fn standard_photo() -> WorkflowPreset {
    WorkflowPreset::new("standard-photo", "Standard Photo")
        .with_description("Photo shoot with client selection, retouching and internal review")
        .enable(&[
            BlockType::WaitPayment,
            BlockType::ProAssigning,
            BlockType::Sst,
            BlockType::RetoucherAssigning,
            BlockType::PhotoRetouching,
            BlockType::Moderation,
            BlockType::FileStorage,
            BlockType::SendToClient,
        ])
        .configure(
            BlockType::Sst,
            BlockConfig::Sst(SstConfig {
                allow_new_items: Some(true),
                ..Default::default()
            }),
        )
}

fn full_production() -> WorkflowPreset {
    WorkflowPreset::new("full-production", "Photo & Video Full Production")
        .with_description("Every production step enabled, client moderation with revisions")
        .enable(&BlockType::ALL)
        .configure(
            BlockType::ProAssigning,
            BlockConfig::ProAssigning(ProAssigningConfig {
                strategy: Some(AssignmentStrategy::ProjectTeams),
                videographers: Some(ShootSlots {
                    count: Some(1),
                    default_duration_minutes: Some(120),
                }),
                ..Default::default()
            }),
        )
        .configure(
            BlockType::Sst,
            BlockConfig::Sst(SstConfig {
                submit_mode: Some(SubmitMode::Bulk),
                min_photos_per_batch: Some(20),
                ..Default::default()
            }),
        )
        .configure(
            BlockType::Moderation,
            BlockConfig::Moderation(ModerationConfig {
                moderator_type: Some(ModeratorType::Client),
                outcomes: Some(
                    [
                        ModerationOutcome::Approve,
                        ModerationOutcome::Revision,
                        ModerationOutcome::Reject,
                    ]
                    .into_iter()
                    .collect(),
                ),
                max_revisions: Some(2),
                ..Default::default()
            }),
        )
        .configure(
            BlockType::FileStorage,
            BlockConfig::FileStorage(FileStorageConfig {
                time_to_life: Some(0),
            }),
        )
}

fn express_delivery() -> WorkflowPreset {
    WorkflowPreset::new("express-delivery", "Express Delivery")
        .with_description("Shoot and deliver straight away with a short download window")
        .enable(&[
            BlockType::ProAssigning,
            BlockType::SendNotification,
            BlockType::FileStorage,
            BlockType::SendToClient,
        ])
        .configure(
            BlockType::SendNotification,
            BlockConfig::SendNotification(SendNotificationConfig {
                channel: Some(NotificationChannel::Sms),
                title: Some("Your photos are ready".to_string()),
                body: Some("Hi {{client_name}}, download them here: {{download_url}}".to_string()),
            }),
        )
        .configure(
            BlockType::FileStorage,
            BlockConfig::FileStorage(FileStorageConfig {
                time_to_life: Some(7),
            }),
        )
        .position(BlockType::SendNotification, 135)
}
