//! Error types for the workflow engine
//!
//! Only data-integrity problems and I/O surface as errors. Ordering-rule
//! violations are reported as data through [`crate::validation`], and
//! addressing a missing branch or block is a silent no-op.

use thiserror::Error;

use crate::block_config::ConfigKind;
use crate::types::{BlockType, BranchType};

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur in the workflow engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// A branch allows a block type the registry has no definition for
    #[error("Block type {0} is not defined in the block registry")]
    UnknownBlockType(BlockType),

    /// A branch lists a block type whose definition forbids that branch type
    #[error("Block type {block_type} is not allowed in {branch_type} branch '{branch_id}'")]
    BlockNotAllowedInBranch {
        branch_id: String,
        branch_type: BranchType,
        block_type: BlockType,
    },

    /// A preset or default config payload has the wrong shape for its block
    #[error("Config for {block_type} must be {expected:?}, got {actual:?}")]
    ConfigKindMismatch {
        block_type: BlockType,
        expected: Option<ConfigKind>,
        actual: ConfigKind,
    },

    /// A project id that cannot be used as a file name
    #[error("Invalid project id '{0}'")]
    InvalidProjectId(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Compression error
    #[error("Compression error: {0}")]
    Compression(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
