//! Workflow Engine - production workflow configuration for photo/video projects
//!
//! This crate turns a preset into a project's workflow and keeps it valid
//! while it is edited. It supports:
//!
//! - A closed catalogue of block types with master definitions
//! - Preset-to-workflow generation with deep-merged block configs
//! - Ordering validation (pinned first block, category order, dependencies)
//! - Tentative validation for drag-and-drop with commit or refuse on drop
//! - Compressed snapshot-based undo/redo with labelled edits
//! - Pluggable persistence and event delivery
//!
//! # Architecture
//!
//! Everything below the session is a pure function over values:
//!
//! - `BlockRegistry`: `BlockType` to `MasterBlockDefinition` lookup
//! - `WorkflowGenerator`: expands a `WorkflowPreset` over the branch structure
//! - `WorkflowValidator`: global validation and single-move checks
//! - `ReorderController`: drag state machine built on `reorder`
//! - `WorkflowSession`: owns the edited config, history, events and storage
//!
//! # Example
//!
//! ```ignore
//! use workflow_engine::{find_builtin_preset, generate, validate};
//!
//! let preset = find_builtin_preset("standard-photo").unwrap();
//! let config = generate(&preset, "project-42")?;
//! assert!(validate(&config).is_valid);
//! ```

pub mod block_config;
pub mod branches;
pub mod builder;
pub mod constants;
pub mod controller;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod generator;
pub mod preset;
pub mod registry;
pub mod session;
pub mod settings;
pub mod store;
pub mod types;
pub mod undo;
pub mod validation;

// Re-export key types
pub use block_config::{merge_configs, BlockConfig, ConfigKind, Merge};
pub use branches::{standard_branches, BranchDefinition};
pub use builder::{BranchBuilder, ConfigBuilder};
pub use controller::{
    move_block, reorder, toggle, update_config, DragState, DropOutcome, ReorderController,
};
pub use descriptor::MasterBlockDefinition;
pub use error::{EngineError, Result};
pub use events::{EventSink, NullEventSink, VecEventSink, WorkflowEvent};
pub use generator::{generate, WorkflowGenerator};
pub use preset::{builtin_presets, find_builtin_preset, WorkflowPreset};
pub use registry::{standard_registry, BlockRegistry};
pub use session::WorkflowSession;
pub use settings::EngineSettings;
pub use store::{WorkflowRepository, WorkflowStore};
pub use types::{
    BlockCategory, BlockId, BlockType, BranchId, BranchType, ProjectWorkflowConfig, WorkflowBlock,
    WorkflowBranch,
};
pub use undo::{Edit, UndoStack};
pub use validation::{
    check_move, validate, Severity, ValidationError, ValidationErrorKind, ValidationResult,
    WorkflowValidator,
};
