//! Response envelope for pipeline runs

use serde::{Deserialize, Serialize};

use crate::domain::job::{PipelineJob, PipelineState};

/// Coarse pipeline status reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStatus {
    Running,
    Failed,
}

/// Body of every `/run-beans-pipeline` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPipelineResponse {
    pub status_code: u16,
    pub pipeline_status: PipelineStatus,
    pub message: String,
    pub job_name: Option<String>,
}

impl RunPipelineResponse {
    /// Failure envelope for errors that happen before or during a run
    pub fn failure(status_code: u16, message: impl Into<String>, job_name: Option<String>) -> Self {
        Self {
            status_code,
            pipeline_status: PipelineStatus::Failed,
            message: message.into(),
            job_name,
        }
    }

    /// Maps the state observed by the poller to a response
    pub fn from_decision(job: &PipelineJob) -> Self {
        let job_name = job.name.clone();
        match job.state {
            PipelineState::Running => Self {
                status_code: 200,
                pipeline_status: PipelineStatus::Running,
                message: format!("Pipeline job {} is running.", job.display_name),
                job_name,
            },
            PipelineState::Failed => Self::failure(
                400,
                format!("Pipeline job {} failed.", job.display_name),
                job_name,
            ),
            other => Self::failure(
                500,
                format!(
                    "Pipeline job {} in unexpected state: {}.",
                    job.display_name, other
                ),
                job_name,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parameter::ParameterSet;

    fn job(state: PipelineState) -> PipelineJob {
        PipelineJob {
            name: Some("projects/p/locations/l/pipelineJobs/123".to_string()),
            display_name: "beans-nightly".to_string(),
            template_path: "l-kfp.pkg.dev/p/r/n/v1".to_string(),
            parameters: ParameterSet::new(),
            state,
        }
    }

    #[test]
    fn test_running_maps_to_ok() {
        let resp = RunPipelineResponse::from_decision(&job(PipelineState::Running));
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.pipeline_status, PipelineStatus::Running);
        assert_eq!(resp.message, "Pipeline job beans-nightly is running.");
        assert_eq!(
            resp.job_name.as_deref(),
            Some("projects/p/locations/l/pipelineJobs/123")
        );
    }

    #[test]
    fn test_failed_maps_to_bad_request() {
        let resp = RunPipelineResponse::from_decision(&job(PipelineState::Failed));
        assert_eq!(resp.status_code, 400);
        assert_eq!(resp.pipeline_status, PipelineStatus::Failed);
        assert_eq!(resp.message, "Pipeline job beans-nightly failed.");
    }

    #[test]
    fn test_other_state_maps_to_internal_error() {
        let resp = RunPipelineResponse::from_decision(&job(PipelineState::Cancelled));
        assert_eq!(resp.status_code, 500);
        assert_eq!(
            resp.message,
            "Pipeline job beans-nightly in unexpected state: PIPELINE_STATE_CANCELLED."
        );
    }

    #[test]
    fn test_envelope_keys() {
        let resp = RunPipelineResponse::failure(400, "Missing required parameter: location", None);
        let value = serde_json::to_value(&resp).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 4);
        assert_eq!(obj["statusCode"], 400);
        assert_eq!(obj["pipelineStatus"], "FAILED");
        assert_eq!(obj["message"], "Missing required parameter: location");
        assert!(obj["jobName"].is_null());
    }
}
