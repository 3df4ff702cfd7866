//! Editing session
//!
//! [`WorkflowSession`] owns the config being edited. Every committed edit
//! goes through one path: snapshot into the undo stack, re-validate, then
//! emit [`WorkflowEvent::ConfigUpdated`] followed by
//! [`WorkflowEvent::ValidationChanged`]. Edits that change nothing (unknown
//! ids, locked blocks, rejected drops) leave history and events alone.
//!
//! Event delivery is best effort: a failing sink is logged and never fails
//! the edit.

use std::sync::Arc;

use crate::block_config::BlockConfig;
use crate::branches::standard_branches;
use crate::controller::{self, DropOutcome, ReorderController};
use crate::error::Result;
use crate::events::{EventSink, WorkflowEvent};
use crate::generator::WorkflowGenerator;
use crate::preset::WorkflowPreset;
use crate::registry::BlockRegistry;
use crate::settings::EngineSettings;
use crate::store::WorkflowRepository;
use crate::types::ProjectWorkflowConfig;
use crate::undo::{Edit, UndoStack};
use crate::validation::{ValidationResult, WorkflowValidator};

/// Owner of one project's workflow while it is being edited
pub struct WorkflowSession<'a, R: WorkflowRepository> {
    registry: &'a BlockRegistry,
    repository: R,
    event_sink: Arc<dyn EventSink>,
    settings: EngineSettings,
    config: Option<ProjectWorkflowConfig>,
    validation: ValidationResult,
    history: UndoStack,
    drag: ReorderController<'a>,
}

impl<'a, R: WorkflowRepository> WorkflowSession<'a, R> {
    pub fn new(
        registry: &'a BlockRegistry,
        repository: R,
        event_sink: Arc<dyn EventSink>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            registry,
            repository,
            event_sink,
            history: UndoStack::new(settings.max_undo_snapshots),
            settings,
            config: None,
            validation: ValidationResult::default(),
            drag: ReorderController::with_registry(registry),
        }
    }

    /// The config being edited, if one is open
    pub fn config(&self) -> Option<&ProjectWorkflowConfig> {
        self.config.as_ref()
    }

    /// Validation result for the current config
    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The edit [`undo`](Self::undo) would revert
    pub fn next_undo(&self) -> Option<Edit> {
        self.history.next_undo()
    }

    /// The edit [`redo`](Self::redo) would re-apply
    pub fn next_redo(&self) -> Option<Edit> {
        self.history.next_redo()
    }

    /// Load a project's stored workflow, starting a fresh history
    ///
    /// Returns `false` if the repository has nothing for the project.
    pub fn open(&mut self, project_id: &str) -> Result<bool> {
        let Some(config) = self.repository.get(project_id)? else {
            log::debug!("No stored workflow for project '{}'", project_id);
            return Ok(false);
        };

        self.drag.cancel();
        self.history.clear();
        self.commit(Edit::Open, config)?;
        Ok(true)
    }

    /// Replace the current config with one generated from a preset
    pub fn apply_preset(&mut self, preset: &WorkflowPreset, project_id: &str) -> Result<()> {
        let branches = standard_branches();
        let config = WorkflowGenerator::new(self.registry, &branches)
            .with_id_suffix_length(self.settings.id_suffix_length)
            .generate(preset, project_id)?;

        self.drag.cancel();
        self.commit(Edit::ApplyPreset, config)?;
        Ok(())
    }

    /// Flip a block's enabled flag; returns whether anything changed
    pub fn toggle(&mut self, branch_id: &str, block_id: &str) -> Result<bool> {
        let Some(current) = &self.config else {
            return Ok(false);
        };
        let next = controller::toggle_with(self.registry, current, branch_id, block_id);
        self.commit(Edit::Toggle, next)
    }

    /// Replace a block's config; returns whether anything changed
    pub fn update_config(
        &mut self,
        branch_id: &str,
        block_id: &str,
        new_config: Option<BlockConfig>,
    ) -> Result<bool> {
        let Some(current) = &self.config else {
            return Ok(false);
        };
        let next = controller::update_config(current, branch_id, block_id, new_config);
        self.commit(Edit::UpdateConfig, next)
    }

    /// Pick up a block; returns whether the drag started
    pub fn begin_drag(&mut self, branch_id: &str, block_id: &str) -> bool {
        match &self.config {
            Some(config) => self.drag.start_drag(config, branch_id, block_id),
            None => false,
        }
    }

    /// Hover the dragged block over another
    ///
    /// Returns why a drop here would be refused.
    pub fn drag_over(&mut self, over_block_id: &str) -> Option<String> {
        let config = self.config.as_ref()?;
        self.drag.drag_over(config, over_block_id).map(str::to_string)
    }

    /// Drop the dragged block over another
    pub fn end_drag(&mut self, over_block_id: &str) -> Result<DropOutcome> {
        let Some(config) = &self.config else {
            self.drag.cancel();
            return Ok(DropOutcome::Ignored);
        };

        let active = match self.drag.state() {
            controller::DragState::Dragging {
                branch_id,
                active_block_id,
                ..
            } => Some((branch_id.clone(), active_block_id.clone())),
            controller::DragState::Idle => None,
        };

        let outcome = self.drag.drop(config, over_block_id);
        match &outcome {
            DropOutcome::Committed(next) => {
                self.commit(Edit::Move, next.clone())?;
            }
            DropOutcome::Rejected(reason) => {
                if let Some((branch_id, block_id)) = active {
                    self.emit(WorkflowEvent::MoveRejected {
                        branch_id,
                        block_id,
                        reason: reason.clone(),
                    });
                }
            }
            DropOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    /// Abandon the current drag
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Step back one edit; returns whether there was one
    pub fn undo(&mut self) -> Result<bool> {
        let Some((edit, config)) = self.history.undo()? else {
            return Ok(false);
        };
        log::debug!("Undo {}", edit);
        self.restore(config);
        Ok(true)
    }

    /// Re-apply an undone edit; returns whether there was one
    pub fn redo(&mut self) -> Result<bool> {
        let Some((edit, config)) = self.history.redo()? else {
            return Ok(false);
        };
        log::debug!("Redo {}", edit);
        self.restore(config);
        Ok(true)
    }

    /// Write the current config to the repository
    ///
    /// Returns `false` if no config is open.
    pub fn save(&mut self) -> Result<bool> {
        let Some(config) = &self.config else {
            return Ok(false);
        };
        self.repository.save(config)?;
        log::debug!("Saved workflow for project '{}'", config.project_id);
        self.emit(WorkflowEvent::ConfigSaved {
            project_id: config.project_id.clone(),
        });
        Ok(true)
    }

    /// Record and publish `config`; returns `false` if it matches the current state
    fn commit(&mut self, edit: Edit, config: ProjectWorkflowConfig) -> Result<bool> {
        if !self.history.push(edit, &config)? {
            log::debug!("{} left the workflow unchanged", edit);
            return Ok(false);
        }
        self.publish(config);
        Ok(true)
    }

    fn restore(&mut self, config: ProjectWorkflowConfig) {
        self.drag.cancel();
        self.publish(config);
    }

    fn publish(&mut self, config: ProjectWorkflowConfig) {
        self.validation = WorkflowValidator::new(self.registry).validate(&config);
        self.emit(WorkflowEvent::config_updated(&config));
        self.emit(WorkflowEvent::validation_changed(&config.project_id, &self.validation));
        self.config = Some(config);
    }

    fn emit(&self, event: WorkflowEvent) {
        if let Err(e) = self.event_sink.send(event) {
            log::warn!("Failed to deliver workflow event: {}", e);
        }
    }
}
