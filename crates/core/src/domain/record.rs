// Status Record Domain Model
//
// The status record is the externally visible contract of the pipeline.
// It is stored as a JSON object and only ever updated by shallow merge,
// so unknown keys written by other tooling survive a rewrite.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::{DomainError, Result};

/// Job lifecycle state. `Queued` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Ready,
    Error,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Ready | JobState::Error)
    }

    /// Legal transitions: out of `Queued` to anything, and idempotent
    /// rewrites of a terminal state. A terminal state never changes to a
    /// different terminal state.
    pub fn can_transition_to(self, next: JobState) -> bool {
        match (self, next) {
            (JobState::Queued, _) => true,
            (from, to) => from == to,
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Queued => write!(f, "queued"),
            JobState::Ready => write!(f, "ready"),
            JobState::Error => write!(f, "error"),
        }
    }
}

/// Terminal result of a conversion run.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertOutcome {
    Ready {
        /// Detected source format, e.g. "png"
        image_type: String,
        /// Dimensions of the original image (width, height)
        image_size: (u32, u32),
        /// Wall-clock conversion duration in seconds
        convert_time: f64,
    },
    Error {
        message: String,
    },
}

impl ConvertOutcome {
    pub fn ready(image_type: impl Into<String>, image_size: (u32, u32), convert_time: f64) -> Self {
        ConvertOutcome::Ready {
            image_type: image_type.into(),
            image_size,
            convert_time,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ConvertOutcome::Error {
            message: message.into(),
        }
    }

    pub fn state(&self) -> JobState {
        match self {
            ConvertOutcome::Ready { .. } => JobState::Ready,
            ConvertOutcome::Error { .. } => JobState::Error,
        }
    }

    /// Render the outcome as a merge patch for the status record.
    pub fn into_fields(self) -> Map<String, Value> {
        let value = match self {
            ConvertOutcome::Ready {
                image_type,
                image_size,
                convert_time,
            } => serde_json::json!({
                "state": JobState::Ready,
                "image_type": image_type,
                "image_size": image_size,
                "convert_time": convert_time,
            }),
            ConvertOutcome::Error { message } => serde_json::json!({
                "state": JobState::Error,
                "error": message,
            }),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// Typed view of a job's status record.
///
/// `extra` captures keys this version does not know about, so a
/// deserialize/serialize round trip never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub state: JobState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Submission time, unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<(u32, u32)>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convert_time: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatusRecord {
    /// Initial record written at submission time.
    pub fn queued(filename: impl Into<String>, created_unix: i64) -> Self {
        Self {
            state: JobState::Queued,
            filename: Some(filename.into()),
            created: Some(created_unix),
            image_type: None,
            image_size: None,
            convert_time: None,
            error: None,
            extra: Map::new(),
        }
    }

    /// Apply a terminal outcome, enforcing the transition rules.
    pub fn finish(&mut self, outcome: &ConvertOutcome) -> Result<()> {
        let next = outcome.state();
        if !self.state.can_transition_to(next) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        match outcome {
            ConvertOutcome::Ready {
                image_type,
                image_size,
                convert_time,
            } => {
                self.image_type = Some(image_type.clone());
                self.image_size = Some(*image_size);
                self.convert_time = Some(*convert_time);
            }
            ConvertOutcome::Error { message } => {
                self.error = Some(message.clone());
            }
        }
        self.state = next;
        Ok(())
    }

    /// Render the record as a merge patch (absent fields are omitted,
    /// never written as null).
    pub fn into_fields(self) -> serde_json::Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}
