//! Pipeline run service
//!
//! Drives one request end to end: validate, connect, submit, poll.

use std::sync::Arc;

use beans_client::ClientError;
use beans_core::domain::job::PipelineJob;
use beans_core::domain::parameter::UnsupportedParameterType;
use beans_core::validation::{self, ValidationError};
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::info;

use crate::repository::RepositoryConnector;
use crate::service::poller::{JobPoller, PollError, PollSettings, Sleeper};
use crate::service::submission::{self, SubmitError};

/// Service error type
///
/// Every variant ends the request; the display text is what the caller sees.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error initializing AIPlatform client: {0}")]
    Connection(#[source] ClientError),

    #[error("Error submitting pipeline job: {0}")]
    UnsupportedParameterType(#[source] UnsupportedParameterType),

    #[error("Error submitting pipeline job: {0}")]
    Submission(#[source] SubmitError),

    #[error("Error waiting for pipeline job state: {source}")]
    Polling { job_name: String, source: PollError },
}

impl From<SubmitError> for RunError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::UnsupportedParameterType(e) => RunError::UnsupportedParameterType(e),
            other => RunError::Submission(other),
        }
    }
}

impl RunError {
    /// Resource name of the job, once one exists
    pub fn job_name(&self) -> Option<&str> {
        match self {
            RunError::Polling { job_name, .. } => Some(job_name),
            _ => None,
        }
    }
}

/// Submits and watches pipeline runs
#[derive(Clone)]
pub struct PipelineRunner {
    connector: Arc<dyn RepositoryConnector>,
    sleeper: Arc<dyn Sleeper>,
    settings: PollSettings,
}

impl PipelineRunner {
    pub fn new(
        connector: Arc<dyn RepositoryConnector>,
        sleeper: Arc<dyn Sleeper>,
        settings: PollSettings,
    ) -> Self {
        Self {
            connector,
            sleeper,
            settings,
        }
    }

    /// Runs one request body through validation, submission and polling
    ///
    /// Returns the job with the state polling stopped on. The repository
    /// handle opened here lives only for the duration of this call.
    pub async fn run(&self, body: &JsonValue) -> Result<PipelineJob, RunError> {
        let (request, parameters) = validation::normalize(body)?;

        info!(
            "Running pipeline {} from {}",
            request.pipeline_display_name,
            request.template_path()
        );

        let repository = self
            .connector
            .connect(&request)
            .await
            .map_err(RunError::Connection)?;

        let mut job = PipelineJob::new(&request, parameters);
        let job_name = submission::submit(repository.as_ref(), &request, &mut job).await?;

        let poller = JobPoller::new(repository.as_ref(), self.sleeper.as_ref(), self.settings);
        let outcome = poller.wait_for_decision(&job_name, &mut job).await;
        outcome.map_err(|source| RunError::Polling { job_name, source })?;

        Ok(job)
    }
}
