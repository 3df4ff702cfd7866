//! Engine-wide constants
//!
//! Single source of truth for configuration defaults and file names.

/// Default values for engine settings
pub mod defaults {
    /// Undo snapshots kept per session
    pub const MAX_UNDO_SNAPSHOTS: usize = 100;
    /// Hex characters in the random part of a block instance id
    pub const ID_SUFFIX_LENGTH: usize = 8;
}

/// File names used for persistence
pub mod files {
    /// Settings file looked up by hosts
    pub const SETTINGS: &str = "workflow-settings.json";
    /// Extension of persisted workflow configs
    pub const CONFIG_EXTENSION: &str = "json";
}
