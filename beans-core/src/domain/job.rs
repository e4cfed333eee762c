//! Pipeline job domain types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::parameter::ParameterSet;
use crate::domain::request::JobRequest;

/// Lifecycle state reported by the orchestration service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineState {
    #[serde(rename = "PIPELINE_STATE_QUEUED")]
    Queued,
    #[serde(rename = "PIPELINE_STATE_PENDING")]
    Pending,
    #[serde(rename = "PIPELINE_STATE_RUNNING")]
    Running,
    #[serde(rename = "PIPELINE_STATE_SUCCEEDED")]
    Succeeded,
    #[serde(rename = "PIPELINE_STATE_FAILED")]
    Failed,
    #[serde(rename = "PIPELINE_STATE_CANCELLING")]
    Cancelling,
    #[serde(rename = "PIPELINE_STATE_CANCELLED")]
    Cancelled,
    #[serde(rename = "PIPELINE_STATE_PAUSED")]
    Paused,
    /// Also used for state names this build does not know
    #[default]
    #[serde(rename = "PIPELINE_STATE_UNSPECIFIED", other)]
    Unspecified,
}

impl PipelineState {
    /// Service-side name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Unspecified => "PIPELINE_STATE_UNSPECIFIED",
            PipelineState::Queued => "PIPELINE_STATE_QUEUED",
            PipelineState::Pending => "PIPELINE_STATE_PENDING",
            PipelineState::Running => "PIPELINE_STATE_RUNNING",
            PipelineState::Succeeded => "PIPELINE_STATE_SUCCEEDED",
            PipelineState::Failed => "PIPELINE_STATE_FAILED",
            PipelineState::Cancelling => "PIPELINE_STATE_CANCELLING",
            PipelineState::Cancelled => "PIPELINE_STATE_CANCELLED",
            PipelineState::Paused => "PIPELINE_STATE_PAUSED",
        }
    }

    /// Whether polling can stop on this state
    ///
    /// Only `Running` and `Failed` count. Later states such as `Succeeded`
    /// are never expected inside the polling window and keep the loop going.
    pub fn is_decided(&self) -> bool {
        matches!(self, PipelineState::Running | PipelineState::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pipeline run, owned by the request that submits it
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineJob {
    /// Resource name assigned by the service once submitted
    pub name: Option<String>,
    pub display_name: String,
    pub template_path: String,
    pub parameters: ParameterSet,
    pub state: PipelineState,
}

impl PipelineJob {
    pub fn new(request: &JobRequest, parameters: ParameterSet) -> Self {
        Self {
            name: None,
            display_name: request.pipeline_display_name.clone(),
            template_path: request.template_path(),
            parameters,
            state: PipelineState::Unspecified,
        }
    }
}
