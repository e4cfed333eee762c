//! Job request domain type

use serde::{Deserialize, Serialize};

/// Validated configuration needed to start one pipeline run.
///
/// Every field is guaranteed non-empty once produced by
/// [`crate::validation::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    pub project_id: String,
    pub location: String,
    pub staging_bucket: String,
    /// Credential reference handed through to the orchestration client
    pub service_account: String,
    pub pipeline_display_name: String,
    pub pipeline_repo: String,
    pub pipeline_name: String,
    pub pipeline_tag: String,
}

impl JobRequest {
    /// Artifact Registry root of the pipeline template, without the tag
    pub fn template_root(&self) -> String {
        format!(
            "{}-kfp.pkg.dev/{}/{}/{}",
            self.location, self.project_id, self.pipeline_repo, self.pipeline_name
        )
    }

    /// Full template path including the version tag
    pub fn template_path(&self) -> String {
        format!("{}/{}", self.template_root(), self.pipeline_tag)
    }

    /// Resource parent the job is created under
    pub fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project_id, self.location)
    }
}
