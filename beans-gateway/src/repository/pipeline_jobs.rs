//! Pipeline jobs repository
//!
//! Handles communication with the pipeline service:
//! - Creating a pipeline job
//! - Reading a job's current state

use async_trait::async_trait;
use beans_client::{ClientError, CreatePipelineJob, PipelineServiceClient};
use beans_core::domain::job::PipelineState;
use beans_core::domain::request::JobRequest;

/// Repository trait for pipeline job operations
#[async_trait]
pub trait PipelineJobRepository: Send + Sync {
    /// Creates a job under `parent` and returns its resource name
    async fn create_job(&self, parent: &str, job: &CreatePipelineJob)
    -> Result<String, ClientError>;

    /// Fetches the current state of the job named `name`
    async fn get_job_state(&self, name: &str) -> Result<PipelineState, ClientError>;
}

/// Opens a repository handle scoped to one request
#[async_trait]
pub trait RepositoryConnector: Send + Sync {
    /// Connects using the request's location and credential reference
    async fn connect(
        &self,
        request: &JobRequest,
    ) -> Result<Box<dyn PipelineJobRepository>, ClientError>;
}

#[async_trait]
impl PipelineJobRepository for PipelineServiceClient {
    async fn create_job(
        &self,
        parent: &str,
        job: &CreatePipelineJob,
    ) -> Result<String, ClientError> {
        let created = self.create_pipeline_job(parent, job).await?;
        Ok(created.name)
    }

    async fn get_job_state(&self, name: &str) -> Result<PipelineState, ClientError> {
        let job = self.get_pipeline_job(name).await?;
        Ok(job.state)
    }
}

/// Connector for the regional Vertex AI endpoints
#[derive(Debug, Clone, Default)]
pub struct VertexConnector {
    /// Fixed endpoint used instead of the regional one (emulators, proxies)
    endpoint_override: Option<String>,
}

impl VertexConnector {
    pub fn new(endpoint_override: Option<String>) -> Self {
        Self { endpoint_override }
    }

    fn endpoint_for(&self, location: &str) -> String {
        self.endpoint_override
            .clone()
            .unwrap_or_else(|| PipelineServiceClient::regional_endpoint(location))
    }
}

#[async_trait]
impl RepositoryConnector for VertexConnector {
    async fn connect(
        &self,
        request: &JobRequest,
    ) -> Result<Box<dyn PipelineJobRepository>, ClientError> {
        let endpoint = self.endpoint_for(&request.location);
        tracing::debug!("Connecting to pipeline service at {}", endpoint);

        let client = PipelineServiceClient::connect(endpoint, &request.service_account).await?;
        Ok(Box::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_selection() {
        let regional = VertexConnector::default();
        assert_eq!(
            regional.endpoint_for("europe-west1"),
            "https://europe-west1-aiplatform.googleapis.com"
        );

        let fixed = VertexConnector::new(Some("http://localhost:9090".to_string()));
        assert_eq!(fixed.endpoint_for("europe-west1"), "http://localhost:9090");
    }
}
