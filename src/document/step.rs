//! Wire types for documents, steps, and per-step run state

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::collection::StepCollection;

/// Identifier of a step within a document
pub type StepId = Uuid;

/// Kinds of content blocks a document can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    /// Input fields defined by an embedded field list
    Form,
    /// Rendered markup
    Markdown,
    /// Runnable command text
    Script,
}

/// One ordered content block in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Step {
    /// Unique id within the owning document
    pub id: StepId,
    /// Kind of block this step renders as
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// Payload: markup for markdown steps, the serialized field list for
    /// form steps, command text for script steps
    #[serde(default)]
    pub content: String,
    /// Names of upstream form fields feeding a script step's arguments.
    /// Dangling names are tolerated and resolve to "absent" at use time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Whether completing this step gates everything after it
    #[serde(default)]
    pub required: bool,
}

impl Step {
    /// Create an empty step of the given type with a fresh id
    pub fn new(step_type: StepType) -> Self {
        Self {
            id: Uuid::new_v4(),
            step_type,
            content: String::new(),
            args: Vec::new(),
            required: false,
        }
    }

    /// Create a step with initial content
    pub fn with_content(step_type: StepType, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::new(step_type)
        }
    }
}

/// Execution status reported by the script runner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Done,
}

/// Per-step runtime state produced by the execution collaborator.
/// The model reads it for gating and only ever writes `completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StepInstanceValue {
    /// Whether the step has been checked off / finished successfully
    #[serde(default)]
    pub completed: bool,
    /// Script run status (idle for non-script steps)
    #[serde(default)]
    pub status: RunStatus,
}

/// Runtime state for a whole document, keyed by step id
pub type StepValues = HashMap<StepId, StepInstanceValue>;

/// A runbook document: ordered steps plus display metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    /// Locked documents reject structural edits in consumers
    #[serde(default)]
    pub locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub steps: StepCollection,
}

impl Document {
    /// Create an empty document with a fresh id
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            locked: false,
            created_at: now,
            updated_at: now,
            steps: StepCollection::default(),
        }
    }

    /// Record that the document was modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
