//! Reordering and toggling of blocks
//!
//! Drag-and-drop is reduced to [`reorder`] plus a small state machine:
//! [`ReorderController`] tracks the block being dragged, re-checks the
//! tentative order on every hover and commits or refuses on drop. It works
//! the same for pointer, keyboard or command-line driven reordering.
//!
//! Every operation takes the current config by reference and returns a new
//! one. Addressing a branch or block that does not exist is not an error; it
//! yields an unchanged copy.

use crate::block_config::BlockConfig;
use crate::registry::{standard_registry, BlockRegistry};
use crate::types::{BlockId, BranchId, ProjectWorkflowConfig};
use crate::validation::WorkflowValidator;

/// Move the element at `from` so it ends up at `to`
///
/// Out-of-range indices return an unchanged copy.
pub fn reorder<T: Clone>(list: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = list.to_vec();
    if from >= out.len() || to >= out.len() {
        return out;
    }
    let item = out.remove(from);
    out.insert(to, item);
    out
}

/// Flip a block's enabled flag using the standard registry
pub fn toggle(
    config: &ProjectWorkflowConfig,
    branch_id: &str,
    block_id: &str,
) -> ProjectWorkflowConfig {
    toggle_with(standard_registry(), config, branch_id, block_id)
}

/// Flip a block's enabled flag
///
/// Blocks the registry marks as locked can only be switched back on; an
/// enabled locked block keeps its state.
pub fn toggle_with(
    registry: &BlockRegistry,
    config: &ProjectWorkflowConfig,
    branch_id: &str,
    block_id: &str,
) -> ProjectWorkflowConfig {
    let mut next = config.clone();
    let Some(block) = next
        .find_branch_mut(branch_id)
        .and_then(|b| b.find_block_mut(block_id))
    else {
        log::debug!("toggle: no block '{}' in branch '{}'", block_id, branch_id);
        return next;
    };

    if !registry.can_be_disabled(block.block_type) && block.is_enabled {
        log::debug!("toggle: {} is locked", block.block_type);
        return next;
    }
    block.is_enabled = !block.is_enabled;
    next
}

/// Replace a block's config wholesale
///
/// No merge happens: the new payload is taken as is, and `None` clears it.
pub fn update_config(
    config: &ProjectWorkflowConfig,
    branch_id: &str,
    block_id: &str,
    new_config: Option<BlockConfig>,
) -> ProjectWorkflowConfig {
    let mut next = config.clone();
    match next
        .find_branch_mut(branch_id)
        .and_then(|b| b.find_block_mut(block_id))
    {
        Some(block) => block.config = new_config,
        None => log::debug!("update_config: no block '{}' in branch '{}'", block_id, branch_id),
    }
    next
}

/// Where a drag currently stands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        branch_id: BranchId,
        active_block_id: BlockId,
        over_block_id: Option<BlockId>,
        /// Reason the current hover position would be refused
        rejection: Option<String>,
    },
}

/// Result of dropping a dragged block
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// The move passed validation; the new config
    Committed(ProjectWorkflowConfig),
    /// The move broke an ordering rule; config unchanged
    Rejected(String),
    /// Nothing to do (no drag, unknown ids, dropped in place)
    Ignored,
}

impl DropOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Drag-and-drop state machine over one config
pub struct ReorderController<'a> {
    registry: &'a BlockRegistry,
    state: DragState,
}

impl ReorderController<'static> {
    /// Controller backed by the standard registry
    pub fn new() -> Self {
        Self::with_registry(standard_registry())
    }
}

impl Default for ReorderController<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ReorderController<'a> {
    pub fn with_registry(registry: &'a BlockRegistry) -> Self {
        Self {
            registry,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Pick up a block
    ///
    /// Locked blocks and unknown ids cannot be dragged; returns whether the
    /// drag started. Any drag already in progress is abandoned.
    pub fn start_drag(
        &mut self,
        config: &ProjectWorkflowConfig,
        branch_id: &str,
        active_block_id: &str,
    ) -> bool {
        self.state = DragState::Idle;

        let Some(block) = config.find_block(branch_id, active_block_id) else {
            log::debug!("start_drag: no block '{}' in branch '{}'", active_block_id, branch_id);
            return false;
        };
        if !self.registry.can_be_disabled(block.block_type) {
            log::debug!("start_drag: {} is locked", block.block_type);
            return false;
        }

        self.state = DragState::Dragging {
            branch_id: branch_id.to_string(),
            active_block_id: active_block_id.to_string(),
            over_block_id: None,
            rejection: None,
        };
        true
    }

    /// Hover over a block
    ///
    /// Re-checks the tentative order against `config` (always the latest
    /// committed one) and returns the reason the drop would be refused.
    /// Locked blocks are not drop targets: hovering one clears the hover.
    pub fn drag_over(
        &mut self,
        config: &ProjectWorkflowConfig,
        over_block_id: &str,
    ) -> Option<&str> {
        let DragState::Dragging {
            branch_id,
            active_block_id,
            over_block_id: over,
            rejection,
        } = &mut self.state
        else {
            return None;
        };

        let blocks = config
            .find_branch(branch_id)
            .map(|b| b.blocks.as_slice())
            .unwrap_or(&[]);
        let target = blocks.iter().find(|b| b.id == over_block_id);
        if target.is_some_and(|b| !self.registry.can_be_disabled(b.block_type)) {
            *over = None;
            *rejection = None;
            return None;
        }

        *over = target.map(|b| b.id.clone());
        *rejection = WorkflowValidator::new(self.registry).check_move(
            active_block_id,
            over_block_id,
            blocks,
        );
        rejection.as_deref()
    }

    /// Release the dragged block over `over_block_id`
    ///
    /// Always returns the controller to [`DragState::Idle`].
    pub fn drop(&mut self, config: &ProjectWorkflowConfig, over_block_id: &str) -> DropOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Idle => DropOutcome::Ignored,
            DragState::Dragging {
                branch_id,
                active_block_id,
                ..
            } => move_within(self.registry, config, &branch_id, &active_block_id, over_block_id),
        }
    }

    /// Abandon the drag without touching the config
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Move a block onto the position of another block in the same branch
///
/// One-shot variant of a full drag for keyboard or command-line reordering.
/// Locked blocks are neither drag sources nor drop targets, like in
/// [`ReorderController`].
pub fn move_block(
    registry: &BlockRegistry,
    config: &ProjectWorkflowConfig,
    branch_id: &str,
    active_block_id: &str,
    over_block_id: &str,
) -> DropOutcome {
    let mut controller = ReorderController::with_registry(registry);
    if !controller.start_drag(config, branch_id, active_block_id) {
        return DropOutcome::Ignored;
    }
    controller.drop(config, over_block_id)
}

fn move_within(
    registry: &BlockRegistry,
    config: &ProjectWorkflowConfig,
    branch_id: &str,
    active_block_id: &str,
    over_block_id: &str,
) -> DropOutcome {
    let Some(branch) = config.find_branch(branch_id) else {
        return DropOutcome::Ignored;
    };
    let (Some(from), Some(to)) = (
        branch.position_of(active_block_id),
        branch.position_of(over_block_id),
    ) else {
        log::debug!(
            "drop: '{}' or '{}' not in branch '{}'",
            active_block_id,
            over_block_id,
            branch_id
        );
        return DropOutcome::Ignored;
    };
    if from == to {
        return DropOutcome::Ignored;
    }
    let target = &branch.blocks[to];
    if !registry.can_be_disabled(target.block_type) {
        log::debug!("drop: {} is locked and cannot be dropped on", target.block_type);
        return DropOutcome::Ignored;
    }

    let reordered = reorder(&branch.blocks, from, to);
    if let Some(error) = WorkflowValidator::new(registry).first_violation(&reordered) {
        log::debug!("drop: refused moving '{}' in '{}': {}", active_block_id, branch_id, error);
        return DropOutcome::Rejected(error.message);
    }

    let mut next = config.clone();
    if let Some(target) = next.find_branch_mut(branch_id) {
        target.blocks = reordered;
    }
    DropOutcome::Committed(next)
}
