//! Ordering validation for project workflows
//!
//! Checks each branch's block order against three rules, in precedence
//! order:
//!
//! 1. Pinned blocks (Order Created) lead their branch.
//! 2. No production step follows a delivery step.
//! 3. Declared `must_come_after` predecessors that are present in the branch
//!    sit at a lower index than their dependent.
//!
//! [`validate`] collects every violation across a config, followed by
//! non-blocking warnings: disabled prerequisites, mandatory blocks that are
//! switched off, step references that leave the branch and config values out
//! of range. [`check_move`] simulates a drag and reports only the first
//! violated rule.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::controller::reorder;
use crate::registry::{standard_registry, BlockRegistry};
use crate::types::{
    BlockCategory, BlockType, ProjectWorkflowConfig, WorkflowBlock, WorkflowBranch,
};

/// Message for a displaced pinned block
const PINNED_FIRST_SUFFIX: &str = "must always be the first step.";
const CATEGORY_ORDER_MESSAGE: &str = "Production steps must come before delivery steps.";

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// The ordering is invalid
    Error,
    /// Worth fixing, but the workflow still runs
    Warning,
}

/// Which rule produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorKind {
    PinnedFirst,
    CategoryOrder,
    Dependency,
    DisabledDependency,
    LockedBlockDisabled,
    DanglingStepReference,
    InvalidConfigValue,
}

/// A single validation finding with location context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub kind: ValidationErrorKind,
    pub level: Severity,
    /// Human-readable message
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub branch_id: String,
    /// Offending block, when the finding is about one block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
}

impl ValidationError {
    fn new(
        kind: ValidationErrorKind,
        level: Severity,
        branch_id: &str,
        block: &WorkflowBlock,
        message: String,
    ) -> Self {
        Self {
            kind,
            level,
            message,
            suggestion: None,
            branch_id: branch_id.to_string(),
            block_id: Some(block.id.clone()),
        }
    }

    fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == Severity::Error
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Outcome of a global validation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// False when any finding has [`Severity::Error`]
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: !errors.iter().any(ValidationError::is_error),
            errors,
        }
    }

    pub fn has_warnings(&self) -> bool {
        self.errors.iter().any(|e| e.level == Severity::Warning)
    }

    /// Findings for one branch
    pub fn for_branch<'a>(
        &'a self,
        branch_id: &'a str,
    ) -> impl Iterator<Item = &'a ValidationError> + 'a {
        self.errors.iter().filter(move |e| e.branch_id == branch_id)
    }
}

/// Validate a config against the standard registry
pub fn validate(config: &ProjectWorkflowConfig) -> ValidationResult {
    WorkflowValidator::new(standard_registry()).validate(config)
}

/// Check a proposed drag against the standard registry
///
/// Returns the first violated rule's message, or `None` if the move is
/// acceptable. Unknown ids are not an error and yield `None`.
pub fn check_move(
    active_block_id: &str,
    over_block_id: &str,
    blocks: &[WorkflowBlock],
) -> Option<String> {
    WorkflowValidator::new(standard_registry()).check_move(active_block_id, over_block_id, blocks)
}

/// Validates block ordering using a block registry
pub struct WorkflowValidator<'a> {
    registry: &'a BlockRegistry,
}

impl<'a> WorkflowValidator<'a> {
    /// Create a new validator with access to the block registry
    pub fn new(registry: &'a BlockRegistry) -> Self {
        Self { registry }
    }

    /// Validate an entire config
    ///
    /// Returns all findings (not just the first), branch by branch.
    pub fn validate(&self, config: &ProjectWorkflowConfig) -> ValidationResult {
        let mut errors = Vec::new();
        for branch in &config.branches {
            self.validate_branch(branch, &mut errors);
        }
        ValidationResult::from_errors(errors)
    }

    /// Collect ordering errors and warnings for one branch
    pub fn validate_branch(&self, branch: &WorkflowBranch, errors: &mut Vec<ValidationError>) {
        self.check_ordering(&branch.id, &branch.blocks, errors);
        self.check_disabled_dependencies(&branch.id, &branch.blocks, errors);
        self.check_locked_enabled(&branch.id, &branch.blocks, errors);
        check_step_references(&branch.id, &branch.blocks, errors);
        check_config_values(&branch.id, &branch.blocks, errors);
    }

    /// Simulate moving `active_block_id` onto `over_block_id` and report the
    /// first violated ordering rule
    pub fn check_move(
        &self,
        active_block_id: &str,
        over_block_id: &str,
        blocks: &[WorkflowBlock],
    ) -> Option<String> {
        let from = blocks.iter().position(|b| b.id == active_block_id)?;
        let to = blocks.iter().position(|b| b.id == over_block_id)?;
        if from == to {
            return None;
        }

        let moved = reorder(blocks, from, to);
        self.first_violation(&moved).map(|e| e.message)
    }

    /// First ordering rule violated by a block sequence, in precedence order
    pub fn first_violation(&self, blocks: &[WorkflowBlock]) -> Option<ValidationError> {
        let mut errors = Vec::new();
        self.check_ordering("", blocks, &mut errors);
        errors.into_iter().next()
    }

    /// The three ordering rules, appended in precedence order
    fn check_ordering(
        &self,
        branch_id: &str,
        blocks: &[WorkflowBlock],
        errors: &mut Vec<ValidationError>,
    ) {
        self.check_pinned_first(branch_id, blocks, errors);
        check_category_order(branch_id, blocks, errors);
        self.check_dependencies(branch_id, blocks, errors);
    }

    /// Pinned blocks must sit at index 0
    fn check_pinned_first(
        &self,
        branch_id: &str,
        blocks: &[WorkflowBlock],
        errors: &mut Vec<ValidationError>,
    ) {
        for block in blocks.iter().skip(1) {
            if self.registry.is_pinned_first(block.block_type) {
                errors.push(
                    ValidationError::new(
                        ValidationErrorKind::PinnedFirst,
                        Severity::Error,
                        branch_id,
                        block,
                        format!("{} {}", block.label, PINNED_FIRST_SUFFIX),
                    )
                    .with_suggestion(format!(
                        "Move {} back to the top of the branch.",
                        block.label
                    )),
                );
            }
        }
    }

    /// Present predecessors must come strictly earlier
    fn check_dependencies(
        &self,
        branch_id: &str,
        blocks: &[WorkflowBlock],
        errors: &mut Vec<ValidationError>,
    ) {
        let positions = index_by_type(blocks);

        for (index, block) in blocks.iter().enumerate() {
            for predecessor in self.registry.dependencies_of(block.block_type) {
                let Some(&pred_index) = positions.get(predecessor) else {
                    continue;
                };
                if pred_index > index {
                    let pred_label = &blocks[pred_index].label;
                    errors.push(
                        ValidationError::new(
                            ValidationErrorKind::Dependency,
                            Severity::Error,
                            branch_id,
                            block,
                            format!("{} must come after {}.", block.label, pred_label),
                        )
                        .with_suggestion(format!("Move {} below {}.", block.label, pred_label)),
                    );
                }
            }
        }
    }

    /// Enabled blocks whose present predecessor is switched off
    fn check_disabled_dependencies(
        &self,
        branch_id: &str,
        blocks: &[WorkflowBlock],
        errors: &mut Vec<ValidationError>,
    ) {
        let positions = index_by_type(blocks);

        for block in blocks.iter().filter(|b| b.is_enabled) {
            for predecessor in self.registry.dependencies_of(block.block_type) {
                let Some(pred) = positions.get(predecessor).map(|&i| &blocks[i]) else {
                    continue;
                };
                if !pred.is_enabled {
                    errors.push(
                        ValidationError::new(
                            ValidationErrorKind::DisabledDependency,
                            Severity::Warning,
                            branch_id,
                            block,
                            format!(
                                "{} is enabled but {} is disabled.",
                                block.label, pred.label
                            ),
                        )
                        .with_suggestion(format!(
                            "Enable {} or disable {}.",
                            pred.label, block.label
                        )),
                    );
                }
            }
        }
    }

    /// Mandatory blocks must stay enabled
    fn check_locked_enabled(
        &self,
        branch_id: &str,
        blocks: &[WorkflowBlock],
        errors: &mut Vec<ValidationError>,
    ) {
        let switched_off = blocks
            .iter()
            .filter(|b| !b.is_enabled && !self.registry.can_be_disabled(b.block_type));

        for block in switched_off {
            errors.push(
                ValidationError::new(
                    ValidationErrorKind::LockedBlockDisabled,
                    Severity::Warning,
                    branch_id,
                    block,
                    format!("{} is required but disabled.", block.label),
                )
                .with_suggestion(format!("Enable {}.", block.label)),
            );
        }
    }
}

/// No processing block after the first finalisation block
fn check_category_order(
    branch_id: &str,
    blocks: &[WorkflowBlock],
    errors: &mut Vec<ValidationError>,
) {
    let mut first_delivery: Option<&WorkflowBlock> = None;

    for block in blocks {
        match block.category {
            BlockCategory::Finalisation => {
                first_delivery.get_or_insert(block);
            }
            BlockCategory::Processing => {
                if let Some(delivery) = first_delivery {
                    errors.push(
                        ValidationError::new(
                            ValidationErrorKind::CategoryOrder,
                            Severity::Error,
                            branch_id,
                            block,
                            CATEGORY_ORDER_MESSAGE.to_string(),
                        )
                        .with_suggestion(format!("Move {} above {}.", block.label, delivery.label)),
                    );
                }
            }
            BlockCategory::Starting | BlockCategory::Universal => {}
        }
    }
}

/// Enabled blocks routing to ids that are not in the branch
fn check_step_references(
    branch_id: &str,
    blocks: &[WorkflowBlock],
    errors: &mut Vec<ValidationError>,
) {
    let ids: HashSet<&str> = blocks.iter().map(|b| b.id.as_str()).collect();

    for block in blocks.iter().filter(|b| b.is_enabled) {
        let Some(config) = &block.config else {
            continue;
        };
        for (field, target) in config.step_references() {
            if !ids.contains(target) {
                errors.push(
                    ValidationError::new(
                        ValidationErrorKind::DanglingStepReference,
                        Severity::Warning,
                        branch_id,
                        block,
                        format!(
                            "{} points to a step that is not part of this branch.",
                            block.label
                        ),
                    )
                    .with_suggestion(format!("Update {} on {}.", field, block.label)),
                );
            }
        }
    }
}

/// Enabled blocks whose config holds values outside their allowed range
fn check_config_values(
    branch_id: &str,
    blocks: &[WorkflowBlock],
    errors: &mut Vec<ValidationError>,
) {
    for block in blocks.iter().filter(|b| b.is_enabled) {
        let Some(config) = &block.config else {
            continue;
        };
        for field in config.invalid_fields() {
            errors.push(
                ValidationError::new(
                    ValidationErrorKind::InvalidConfigValue,
                    Severity::Warning,
                    branch_id,
                    block,
                    format!("{} has an invalid {} value.", block.label, field),
                )
                .with_suggestion(format!("Correct {} on {}.", field, block.label)),
            );
        }
    }
}

fn index_by_type(blocks: &[WorkflowBlock]) -> HashMap<BlockType, usize> {
    blocks
        .iter()
        .enumerate()
        .map(|(i, b)| (b.block_type, i))
        .collect()
}
