//! Pipeline job endpoints

use crate::PipelineServiceClient;
use crate::error::Result;
use crate::types::{CreatePipelineJob, PipelineJobResource};

const API_VERSION: &str = "v1";

impl PipelineServiceClient {
    /// Create a pipeline job under `parent`
    ///
    /// # Arguments
    /// * `parent` - `projects/<project>/locations/<location>`
    /// * `job` - Display name, template, parameters and service account
    ///
    /// # Returns
    /// The created job; its `name` is the resource name used for polling
    pub async fn create_pipeline_job(
        &self,
        parent: &str,
        job: &CreatePipelineJob,
    ) -> Result<PipelineJobResource> {
        let url = self.pipeline_jobs_url(parent);
        let token = self.bearer_token().await?;

        tracing::debug!("Creating pipeline job {} at {}", job.display_name, url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&job.to_body())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a pipeline job by resource name
    ///
    /// # Arguments
    /// * `name` - `projects/<project>/locations/<location>/pipelineJobs/<id>`
    pub async fn get_pipeline_job(&self, name: &str) -> Result<PipelineJobResource> {
        let url = self.resource_url(name);
        let token = self.bearer_token().await?;

        let response = self.client.get(&url).bearer_auth(token).send().await?;

        self.handle_response(response).await
    }

    fn pipeline_jobs_url(&self, parent: &str) -> String {
        format!("{}/pipelineJobs", self.resource_url(parent))
    }

    fn resource_url(&self, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            API_VERSION,
            name.trim_start_matches('/')
        )
    }
}
