//! Workflow config storage with file persistence
//!
//! [`WorkflowRepository`] is the seam the editing session loads from and
//! saves to. [`WorkflowStore`] is the bundled implementation: configs live
//! in memory, and a store created with a directory also writes each config
//! to `<projectId>.json` there.
//!
//! # Example
//!
//! ```ignore
//! use workflow_engine::{WorkflowRepository, WorkflowStore};
//!
//! let mut store = WorkflowStore::with_persistence(".workflows");
//! let count = store.load_from_disk()?;
//! println!("Loaded {} workflows", count);
//!
//! store.save(&config)?;
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::files;
use crate::error::{EngineError, Result};
use crate::types::ProjectWorkflowConfig;

/// Where project workflows are loaded from and saved to
pub trait WorkflowRepository {
    /// The stored config for a project, if any
    fn get(&self, project_id: &str) -> Result<Option<ProjectWorkflowConfig>>;

    /// Insert or replace the config for its project
    fn save(&mut self, config: &ProjectWorkflowConfig) -> Result<()>;
}

/// Summary of a stored workflow (for listing)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetadata {
    pub project_id: String,
    pub template_id: String,
    pub branch_count: usize,
    pub block_count: usize,
}

/// In-memory workflow store with optional file persistence
#[derive(Debug, Default)]
pub struct WorkflowStore {
    configs: HashMap<String, ProjectWorkflowConfig>,
    persist_path: Option<PathBuf>,
}

impl WorkflowStore {
    /// Create a new in-memory store without persistence
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that persists to the given directory
    ///
    /// The directory is created on first save.
    pub fn with_persistence(path: impl AsRef<Path>) -> Self {
        Self {
            configs: HashMap::new(),
            persist_path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Load every config from the persistence directory
    ///
    /// Files that fail to parse are skipped with a warning. Returns the
    /// number of configs loaded.
    pub fn load_from_disk(&mut self) -> Result<usize> {
        let Some(ref path) = self.persist_path else {
            return Ok(0);
        };
        if !path.exists() {
            return Ok(0);
        }

        let mut count = 0;
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if file_path.extension().map_or(true, |e| e != files::CONFIG_EXTENSION) {
                continue;
            }

            let content = std::fs::read_to_string(&file_path)?;
            match serde_json::from_str::<ProjectWorkflowConfig>(&content) {
                Ok(config) => {
                    log::info!("Loaded workflow '{}' from {:?}", config.project_id, file_path);
                    self.configs.insert(config.project_id.clone(), config);
                    count += 1;
                }
                Err(e) => {
                    log::warn!("Failed to parse workflow from {:?}: {}", file_path, e);
                }
            }
        }
        Ok(count)
    }

    /// Remove a project's config from memory and disk
    pub fn remove(&mut self, project_id: &str) -> Result<Option<ProjectWorkflowConfig>> {
        if let Some(file_path) = self.file_path(project_id)? {
            if file_path.exists() {
                std::fs::remove_file(&file_path)?;
                log::debug!("Deleted workflow '{}' from {:?}", project_id, file_path);
            }
        }
        Ok(self.configs.remove(project_id))
    }

    /// Summaries of every stored workflow, ordered by project id
    pub fn list(&self) -> Vec<WorkflowMetadata> {
        let mut list: Vec<WorkflowMetadata> = self
            .configs
            .values()
            .map(|c| WorkflowMetadata {
                project_id: c.project_id.clone(),
                template_id: c.template_id.clone(),
                branch_count: c.branches.len(),
                block_count: c.block_count(),
            })
            .collect();
        list.sort_by(|a, b| a.project_id.cmp(&b.project_id));
        list
    }

    pub fn contains(&self, project_id: &str) -> bool {
        self.configs.contains_key(project_id)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    fn save_to_disk(&self, config: &ProjectWorkflowConfig) -> Result<()> {
        let Some(file_path) = self.file_path(&config.project_id)? else {
            return Ok(());
        };
        if let Some(dir) = file_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&file_path, serde_json::to_string_pretty(config)?)?;
        log::debug!("Saved workflow '{}' to {:?}", config.project_id, file_path);
        Ok(())
    }

    /// `<dir>/<projectId>.json`, or `None` for an in-memory store
    fn file_path(&self, project_id: &str) -> Result<Option<PathBuf>> {
        let Some(ref dir) = self.persist_path else {
            return Ok(None);
        };
        if project_id.is_empty()
            || project_id.starts_with('.')
            || project_id.contains(['/', '\\'])
        {
            return Err(EngineError::InvalidProjectId(project_id.to_string()));
        }
        Ok(Some(
            dir.join(format!("{}.{}", project_id, files::CONFIG_EXTENSION)),
        ))
    }
}

impl WorkflowRepository for WorkflowStore {
    fn get(&self, project_id: &str) -> Result<Option<ProjectWorkflowConfig>> {
        Ok(self.configs.get(project_id).cloned())
    }

    fn save(&mut self, config: &ProjectWorkflowConfig) -> Result<()> {
        self.save_to_disk(config)?;
        self.configs
            .insert(config.project_id.clone(), config.clone());
        Ok(())
    }
}
