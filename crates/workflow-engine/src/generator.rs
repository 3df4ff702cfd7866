//! Preset-to-workflow generation
//!
//! Expands a [`WorkflowPreset`] into a full [`ProjectWorkflowConfig`]: one
//! block instance per allowed type in every branch, with enabled state,
//! deep-merged configuration and preset ordering applied. Membership never
//! depends on the preset.

use uuid::Uuid;

use crate::block_config::{merge_configs, ConfigKind};
use crate::branches::{standard_branches, BranchDefinition};
use crate::constants::defaults;
use crate::error::{EngineError, Result};
use crate::preset::WorkflowPreset;
use crate::registry::{standard_registry, BlockRegistry};
use crate::types::{BlockType, ProjectWorkflowConfig, WorkflowBlock, WorkflowBranch};

/// Generate a workflow from the standard registry and branch structure
pub fn generate(preset: &WorkflowPreset, project_id: &str) -> Result<ProjectWorkflowConfig> {
    let branches = standard_branches();
    WorkflowGenerator::new(standard_registry(), &branches).generate(preset, project_id)
}

/// Generates project workflows against a registry and branch structure
pub struct WorkflowGenerator<'a> {
    registry: &'a BlockRegistry,
    branches: &'a [BranchDefinition],
    id_suffix_length: usize,
}

impl<'a> WorkflowGenerator<'a> {
    pub fn new(registry: &'a BlockRegistry, branches: &'a [BranchDefinition]) -> Self {
        Self {
            registry,
            branches,
            id_suffix_length: defaults::ID_SUFFIX_LENGTH,
        }
    }

    /// Length of the random part of instance ids (1–32 hex chars)
    pub fn with_id_suffix_length(mut self, length: usize) -> Self {
        self.id_suffix_length = length.clamp(1, 32);
        self
    }

    /// Expand a preset into a project workflow
    ///
    /// Fails only on data-integrity problems: a branch allowing a block type
    /// the registry does not know or does not permit there, or a config
    /// payload of the wrong shape for its block type.
    pub fn generate(
        &self,
        preset: &WorkflowPreset,
        project_id: &str,
    ) -> Result<ProjectWorkflowConfig> {
        let mut config = ProjectWorkflowConfig::new(project_id, &preset.id);

        for branch_def in self.branches {
            branch_def.verify(self.registry)?;
            config.branches.push(self.generate_branch(branch_def, preset)?);
        }

        log::debug!(
            "Generated workflow for project '{}' from preset '{}' ({} branches, {} blocks)",
            project_id,
            preset.id,
            config.branches.len(),
            config.block_count()
        );
        Ok(config)
    }

    fn generate_branch(
        &self,
        branch_def: &BranchDefinition,
        preset: &WorkflowPreset,
    ) -> Result<WorkflowBranch> {
        let mut positioned = Vec::with_capacity(branch_def.allowed_block_types.len());

        for &block_type in &branch_def.allowed_block_types {
            let def = self.registry.definition(block_type)?;

            let is_enabled = !def.can_be_disabled || preset.enabled_blocks.contains(&block_type);

            let override_config = preset.block_configs.get(&block_type).cloned();
            for payload in def.default_config.iter().chain(override_config.iter()) {
                check_kind(block_type, payload.kind())?;
            }
            let config = merge_configs(def.default_config.clone(), override_config);

            let position = preset
                .position_of(block_type)
                .unwrap_or(def.default_position);

            positioned.push((
                position,
                WorkflowBlock {
                    id: self.instance_id(block_type, &branch_def.id),
                    block_type,
                    label: def.label.clone(),
                    category: def.category,
                    is_enabled,
                    config,
                },
            ));
        }

        // Stable: equal positions keep declaration order
        positioned.sort_by_key(|(position, _)| *position);

        Ok(WorkflowBranch {
            id: branch_def.id.clone(),
            name: branch_def.name.clone(),
            branch_type: branch_def.branch_type,
            blocks: positioned.into_iter().map(|(_, block)| block).collect(),
        })
    }

    fn instance_id(&self, block_type: BlockType, branch_id: &str) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!(
            "{}-{}-{}",
            block_type.as_str().to_lowercase(),
            branch_id,
            &suffix[..self.id_suffix_length]
        )
    }
}

fn check_kind(block_type: BlockType, actual: ConfigKind) -> Result<()> {
    let expected = block_type.config_kind();
    if expected == Some(actual) {
        Ok(())
    } else {
        Err(EngineError::ConfigKindMismatch {
            block_type,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::block_config::{
        BlockConfig, FileStorageConfig, ModerationConfig, ModerationOutcome, ProAssigningConfig,
        ShootSlots, SstConfig,
    };
    use crate::types::BranchType;

    fn general_only() -> Vec<BranchDefinition> {
        vec![BranchDefinition::new(
            "general",
            "General",
            BranchType::General,
            vec![
                BlockType::OrderCreated,
                BlockType::WaitPayment,
                BlockType::SendToClient,
            ],
        )]
    }

    #[test]
    fn test_enabled_state_resolution() {
        let registry = BlockRegistry::standard();
        let branches = general_only();
        let preset = WorkflowPreset::new("p", "Preset").enable(&[BlockType::WaitPayment]);

        let config = WorkflowGenerator::new(&registry, &branches)
            .generate(&preset, "project-1")
            .unwrap();

        let blocks = &config.branches[0].blocks;
        assert_eq!(blocks.len(), 3);
        let enabled: Vec<(BlockType, bool)> =
            blocks.iter().map(|b| (b.block_type, b.is_enabled)).collect();
        assert_eq!(
            enabled,
            vec![
                (BlockType::OrderCreated, true),
                (BlockType::WaitPayment, true),
                (BlockType::SendToClient, false),
            ]
        );
    }

    #[test]
    fn test_every_allowed_block_exactly_once() {
        let preset = WorkflowPreset::new("empty", "Empty");
        let config = generate(&preset, "project-1").unwrap();

        for (branch, def) in config.branches.iter().zip(standard_branches()) {
            let mut generated = branch.block_types();
            let mut allowed = def.allowed_block_types.clone();
            generated.sort();
            allowed.sort();
            assert_eq!(generated, allowed, "branch {}", branch.id);
        }
        assert_eq!(config.template_id, "empty");
        assert_eq!(config.project_id, "project-1");
    }

    #[test]
    fn test_mandatory_blocks_always_enabled() {
        let registry = BlockRegistry::standard();
        let config = generate(&WorkflowPreset::new("none", "None"), "p").unwrap();

        for block in config.branches.iter().flat_map(|b| &b.blocks) {
            if !registry.can_be_disabled(block.block_type) {
                assert!(block.is_enabled, "{} must be enabled", block.block_type);
            }
        }
    }

    #[test]
    fn test_config_deep_merge() {
        let preset = WorkflowPreset::new("p", "Preset").configure(
            BlockType::ProAssigning,
            BlockConfig::ProAssigning(ProAssigningConfig {
                photographers: Some(ShootSlots {
                    count: Some(2),
                    default_duration_minutes: None,
                }),
                ..Default::default()
            }),
        );
        let config = generate(&preset, "p").unwrap();
        let block = config.branches[0]
            .block_of_type(BlockType::ProAssigning)
            .unwrap();

        let Some(BlockConfig::ProAssigning(pro)) = &block.config else {
            panic!("Expected ProAssigning config");
        };
        let photographers = pro.photographers.as_ref().unwrap();
        assert_eq!(photographers.count, Some(2));
        assert_eq!(photographers.default_duration_minutes, Some(60));
        assert_eq!(pro.require_confirmation, Some(true));
    }

    #[test]
    fn test_override_values_survive_generation() {
        let preset = WorkflowPreset::new("p", "Preset")
            .configure(
                BlockType::ProAssigning,
                BlockConfig::ProAssigning(ProAssigningConfig {
                    min_pro_level: Some(0),
                    ..Default::default()
                }),
            )
            .configure(
                BlockType::Moderation,
                BlockConfig::Moderation(ModerationConfig {
                    outcomes: Some([ModerationOutcome::Reject].into_iter().collect()),
                    ..Default::default()
                }),
            );
        let registry = BlockRegistry::standard();
        let config = generate(&preset, "p").unwrap();

        for block in config.branches.iter().flat_map(|b| &b.blocks) {
            let expected = merge_configs(
                registry.get(block.block_type).unwrap().default_config.clone(),
                preset.block_configs.get(&block.block_type).cloned(),
            );
            assert_eq!(block.config, expected, "{}", block.block_type);
        }

        let photo = &config.branches[0];
        let Some(BlockConfig::ProAssigning(pro)) =
            &photo.block_of_type(BlockType::ProAssigning).unwrap().config
        else {
            panic!("Expected ProAssigning config");
        };
        assert_eq!(pro.min_pro_level, Some(0));

        let Some(BlockConfig::Moderation(moderation)) =
            &photo.block_of_type(BlockType::Moderation).unwrap().config
        else {
            panic!("Expected Moderation config");
        };
        assert_eq!(
            moderation.outcomes,
            Some([ModerationOutcome::Reject].into_iter().collect())
        );
    }

    #[test]
    fn test_blocks_without_config_omit_it() {
        let config = generate(&WorkflowPreset::new("p", "Preset"), "p").unwrap();
        let photo = &config.branches[0];
        assert!(photo.block_of_type(BlockType::OrderCreated).unwrap().config.is_none());
        assert!(photo.block_of_type(BlockType::IfElse).unwrap().config.is_none());
        assert!(photo.block_of_type(BlockType::FileStorage).unwrap().config.is_some());
    }

    #[test]
    fn test_override_only_config_is_kept() {
        let preset = WorkflowPreset::new("p", "Preset").configure(
            BlockType::IfElse,
            BlockConfig::IfElse(crate::block_config::IfElseConfig {
                condition: Some("client_paid".to_string()),
                ..Default::default()
            }),
        );
        let config = generate(&preset, "p").unwrap();
        let block = config.branches[0].block_of_type(BlockType::IfElse).unwrap();
        assert!(matches!(block.config, Some(BlockConfig::IfElse(_))));
    }

    #[test]
    fn test_ordering_is_deterministic() {
        let preset = WorkflowPreset::new("p", "Preset")
            .position(BlockType::SendNotification, 5)
            .position(BlockType::ExternalProcess, 5);

        let first = generate(&preset, "p").unwrap();
        let second = generate(&preset, "p").unwrap();
        for (a, b) in first.branches.iter().zip(&second.branches) {
            assert_eq!(a.block_types(), b.block_types());
        }

        // Tie at position 5 keeps declaration order (external process first)
        assert_eq!(
            &first.branches[0].block_types()[..3],
            &[
                BlockType::OrderCreated,
                BlockType::ExternalProcess,
                BlockType::SendNotification
            ]
        );
    }

    #[test]
    fn test_instance_ids() {
        let config = generate(&WorkflowPreset::new("p", "Preset"), "p").unwrap();
        let photo = &config.branches[0];
        let order = photo.block_of_type(BlockType::OrderCreated).unwrap();
        assert!(order.id.starts_with("order_created-photo-"));
        assert_eq!(order.id.len(), "order_created-photo-".len() + defaults::ID_SUFFIX_LENGTH);

        let ids: HashSet<&str> = config
            .branches
            .iter()
            .flat_map(|b| b.blocks.iter().map(|x| x.id.as_str()))
            .collect();
        assert_eq!(ids.len(), config.block_count());
    }

    #[test]
    fn test_unknown_block_type_is_fatal() {
        let mut registry = BlockRegistry::new();
        registry.register(crate::descriptor::standard_definition(BlockType::OrderCreated));
        let branches = general_only();

        let result = WorkflowGenerator::new(&registry, &branches)
            .generate(&WorkflowPreset::new("p", "Preset"), "p");
        assert!(matches!(
            result,
            Err(EngineError::UnknownBlockType(BlockType::WaitPayment))
        ));
    }

    #[test]
    fn test_config_kind_mismatch_is_fatal() {
        let preset = WorkflowPreset::new("p", "Preset").configure(
            BlockType::FileStorage,
            BlockConfig::Sst(SstConfig::default()),
        );
        let result = generate(&preset, "p");
        assert!(matches!(
            result,
            Err(EngineError::ConfigKindMismatch {
                block_type: BlockType::FileStorage,
                ..
            })
        ));

        let preset = WorkflowPreset::new("p", "Preset").configure(
            BlockType::Merge,
            BlockConfig::FileStorage(FileStorageConfig::default()),
        );
        assert!(generate(&preset, "p").is_err());
    }
}
