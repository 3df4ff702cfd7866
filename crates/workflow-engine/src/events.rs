//! Events emitted while a workflow is being edited
//!
//! The editing session reports every committed change to the host through an
//! [`EventSink`]: first the full replacement config, then the validation
//! result computed for it. The sink abstracts over the transport (a UI
//! channel, an mpsc queue, a test buffer).

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::types::ProjectWorkflowConfig;
use crate::validation::ValidationResult;

/// Trait for delivering workflow events
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be delivered (e.g., channel closed)
    fn send(&self, event: WorkflowEvent) -> Result<(), EventError>;
}

/// Error when delivering an event fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// Events emitted by an editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkflowEvent {
    /// The whole config after a committed edit
    #[serde(rename_all = "camelCase")]
    ConfigUpdated { config: ProjectWorkflowConfig },

    /// Validation result for the config just published
    #[serde(rename_all = "camelCase")]
    ValidationChanged {
        project_id: String,
        result: ValidationResult,
    },

    /// A drop was refused; the config is unchanged
    #[serde(rename_all = "camelCase")]
    MoveRejected {
        branch_id: String,
        block_id: String,
        reason: String,
    },

    /// The config was written to the repository
    #[serde(rename_all = "camelCase")]
    ConfigSaved { project_id: String },
}

impl WorkflowEvent {
    /// Create a config update event
    pub fn config_updated(config: &ProjectWorkflowConfig) -> Self {
        Self::ConfigUpdated {
            config: config.clone(),
        }
    }

    /// Create a validation event
    pub fn validation_changed(project_id: &str, result: &ValidationResult) -> Self {
        Self::ValidationChanged {
            project_id: project_id.to_string(),
            result: result.clone(),
        }
    }
}

/// A no-op event sink that discards all events
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: WorkflowEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted in order.
pub struct VecEventSink {
    events: Mutex<Vec<WorkflowEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.lock().clone()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<WorkflowEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: WorkflowEvent) -> Result<(), EventError> {
        self.lock().push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_event_sink() {
        let sink = VecEventSink::new();
        let config = ProjectWorkflowConfig::new("p1", "t1");

        sink.send(WorkflowEvent::config_updated(&config)).unwrap();
        sink.send(WorkflowEvent::validation_changed("p1", &ValidationResult::from_errors(vec![])))
            .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 2);

        match &events[1] {
            WorkflowEvent::ValidationChanged { project_id, result } => {
                assert_eq!(project_id, "p1");
                assert!(result.is_valid);
            }
            _ => panic!("Expected ValidationChanged event"),
        }

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_null_event_sink() {
        let sink = NullEventSink;
        sink.send(WorkflowEvent::ConfigSaved {
            project_id: "p1".to_string(),
        })
        .unwrap();
    }

    #[test]
    fn test_event_json_tag() {
        let event = WorkflowEvent::MoveRejected {
            branch_id: "photo".to_string(),
            block_id: "b1".to_string(),
            reason: "nope".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "moveRejected");
        assert_eq!(json["branchId"], "photo");
    }
}
