//! Edit history
//!
//! Each entry pairs the [`Edit`] that produced it with a zstd-compressed JSON
//! snapshot of the resulting [`ProjectWorkflowConfig`]. The entry under the
//! cursor always matches the live config, so an edit that serialises to the
//! same bytes is not recorded at all. Pushing after an undo discards the redo
//! tail; the oldest entries fall off once the limit is reached.

use std::fmt;

use crate::constants::defaults;
use crate::error::{EngineError, Result};
use crate::types::ProjectWorkflowConfig;

const COMPRESSION_LEVEL: i32 = 3;

/// What produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Open,
    ApplyPreset,
    Toggle,
    UpdateConfig,
    Move,
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Open => "open",
            Self::ApplyPreset => "apply preset",
            Self::Toggle => "toggle block",
            Self::UpdateConfig => "update block config",
            Self::Move => "move block",
        };
        f.write_str(label)
    }
}

struct Entry {
    edit: Edit,
    snapshot: Vec<u8>,
}

/// Bounded undo/redo history of config snapshots
pub struct UndoStack {
    entries: Vec<Entry>,
    cursor: usize,
    limit: usize,
}

impl UndoStack {
    /// History keeping at most `limit` states (at least one)
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Record the state produced by `edit`
    ///
    /// Returns `false` without touching the history when `config` is the
    /// state under the cursor.
    pub fn push(&mut self, edit: Edit, config: &ProjectWorkflowConfig) -> Result<bool> {
        let snapshot = compress(config)?;
        if self
            .entries
            .get(self.cursor)
            .is_some_and(|current| current.snapshot == snapshot)
        {
            return Ok(false);
        }

        self.entries.truncate(self.cursor + 1);
        self.entries.push(Entry { edit, snapshot });

        let excess = self.entries.len().saturating_sub(self.limit);
        self.entries.drain(..excess);
        self.cursor = self.entries.len() - 1;
        Ok(true)
    }

    /// Step back over the latest edit
    ///
    /// Returns the edit undone and the state before it.
    pub fn undo(&mut self) -> Result<Option<(Edit, ProjectWorkflowConfig)>> {
        let Some(edit) = self.next_undo() else {
            return Ok(None);
        };
        let config = decompress(&self.entries[self.cursor - 1].snapshot)?;
        self.cursor -= 1;
        Ok(Some((edit, config)))
    }

    /// Re-apply the edit after the cursor
    pub fn redo(&mut self) -> Result<Option<(Edit, ProjectWorkflowConfig)>> {
        let Some(edit) = self.next_redo() else {
            return Ok(None);
        };
        let config = decompress(&self.entries[self.cursor + 1].snapshot)?;
        self.cursor += 1;
        Ok(Some((edit, config)))
    }

    /// The edit [`undo`](Self::undo) would revert
    pub fn next_undo(&self) -> Option<Edit> {
        if self.cursor == 0 {
            return None;
        }
        self.entries.get(self.cursor).map(|e| e.edit)
    }

    /// The edit [`redo`](Self::redo) would re-apply
    pub fn next_redo(&self) -> Option<Edit> {
        self.entries.get(self.cursor + 1).map(|e| e.edit)
    }

    pub fn can_undo(&self) -> bool {
        self.next_undo().is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.next_redo().is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(defaults::MAX_UNDO_SNAPSHOTS)
    }
}

fn compress(config: &ProjectWorkflowConfig) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(config)?;
    zstd::encode_all(&json[..], COMPRESSION_LEVEL)
        .map_err(|e| EngineError::Compression(e.to_string()))
}

fn decompress(snapshot: &[u8]) -> Result<ProjectWorkflowConfig> {
    let json =
        zstd::decode_all(snapshot).map_err(|e| EngineError::Compression(e.to_string()))?;
    Ok(serde_json::from_slice(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(template: &str) -> ProjectWorkflowConfig {
        ProjectWorkflowConfig::new("project", template)
    }

    fn template_of(step: Option<(Edit, ProjectWorkflowConfig)>) -> (Edit, String) {
        let (edit, config) = step.unwrap();
        (edit, config.template_id)
    }

    #[test]
    fn test_undo_reports_reverted_edit() {
        let mut stack = UndoStack::new(10);
        stack.push(Edit::Open, &make_config("first")).unwrap();
        stack.push(Edit::Toggle, &make_config("second")).unwrap();
        stack.push(Edit::Move, &make_config("third")).unwrap();

        assert_eq!(stack.next_undo(), Some(Edit::Move));
        assert_eq!(
            template_of(stack.undo().unwrap()),
            (Edit::Move, "second".to_string())
        );
        assert_eq!(
            template_of(stack.undo().unwrap()),
            (Edit::Toggle, "first".to_string())
        );
        assert!(stack.undo().unwrap().is_none());
        assert_eq!(stack.next_redo(), Some(Edit::Toggle));
    }

    #[test]
    fn test_redo() {
        let mut stack = UndoStack::new(10);
        stack.push(Edit::Open, &make_config("first")).unwrap();
        stack.push(Edit::UpdateConfig, &make_config("second")).unwrap();

        stack.undo().unwrap();
        assert_eq!(
            template_of(stack.redo().unwrap()),
            (Edit::UpdateConfig, "second".to_string())
        );
        assert!(stack.redo().unwrap().is_none());
    }

    #[test]
    fn test_unchanged_state_is_not_recorded() {
        let mut stack = UndoStack::new(10);
        assert!(stack.push(Edit::Open, &make_config("first")).unwrap());
        assert!(!stack.push(Edit::Toggle, &make_config("first")).unwrap());
        assert_eq!(stack.len(), 1);
        assert!(!stack.can_undo());

        assert!(stack.push(Edit::Toggle, &make_config("second")).unwrap());
        stack.undo().unwrap();
        // Matching the state under the cursor keeps the redo tail
        assert!(!stack.push(Edit::Move, &make_config("first")).unwrap());
        assert!(stack.can_redo());
    }

    #[test]
    fn test_push_truncates_redo() {
        let mut stack = UndoStack::new(10);
        stack.push(Edit::Open, &make_config("first")).unwrap();
        stack.push(Edit::Toggle, &make_config("second")).unwrap();
        stack.undo().unwrap();

        stack.push(Edit::Move, &make_config("third")).unwrap();
        assert!(!stack.can_redo());
        assert_eq!(stack.len(), 2);
        assert_eq!(
            template_of(stack.undo().unwrap()),
            (Edit::Move, "first".to_string())
        );
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut stack = UndoStack::new(3);
        for i in 0..5 {
            stack
                .push(Edit::Toggle, &make_config(&format!("config_{}", i)))
                .unwrap();
        }
        assert_eq!(stack.len(), 3);

        assert_eq!(stack.undo().unwrap().unwrap().1.template_id, "config_3");
        assert_eq!(stack.undo().unwrap().unwrap().1.template_id, "config_2");
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_empty_stack() {
        let mut stack = UndoStack::default();
        assert!(stack.is_empty());
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
        assert!(stack.undo().unwrap().is_none());
        assert!(stack.redo().unwrap().is_none());
    }

    #[test]
    fn test_edit_labels() {
        assert_eq!(Edit::ApplyPreset.to_string(), "apply preset");
        assert_eq!(Edit::Move.to_string(), "move block");
    }
}
