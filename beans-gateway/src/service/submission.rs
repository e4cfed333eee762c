//! Submission service
//!
//! Marshals the merged parameter set into tagged service parameters and
//! creates the remote pipeline job. Failures are returned as-is; nothing here
//! retries.

use beans_client::{ClientError, CreatePipelineJob, PipelineParameter, TaggedValue};
use beans_core::domain::job::PipelineJob;
use beans_core::domain::parameter::{ParameterSet, ParameterValue, UnsupportedParameterType};
use beans_core::domain::request::JobRequest;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::repository::PipelineJobRepository;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    UnsupportedParameterType(#[from] UnsupportedParameterType),

    #[error("pipeline template {template_path} not found: {source}")]
    TemplateNotFound {
        template_path: String,
        source: ClientError,
    },

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Converts every parameter to its tagged wire form
///
/// List values are sent as their first element only. A list of recipients
/// therefore reaches the pipeline as a single address.
pub fn marshal_parameters(
    parameters: &ParameterSet,
) -> Result<Vec<PipelineParameter>, UnsupportedParameterType> {
    parameters
        .iter()
        .map(|(name, raw)| -> Result<PipelineParameter, UnsupportedParameterType> {
            let value = ParameterValue::try_from(raw)?;
            if let ParameterValue::List(items) = &value {
                if items.len() > 1 {
                    warn!(
                        "Parameter {} has {} values, only the first is submitted",
                        name,
                        items.len()
                    );
                }
            }

            Ok(PipelineParameter {
                name: name.clone(),
                value: TaggedValue::from(&value),
            })
        })
        .collect()
}

/// Creates the pipeline job and records its resource name on `job`
pub async fn submit(
    repository: &dyn PipelineJobRepository,
    request: &JobRequest,
    job: &mut PipelineJob,
) -> Result<String, SubmitError> {
    let parameters = marshal_parameters(&job.parameters)?;

    let create = CreatePipelineJob {
        display_name: job.display_name.clone(),
        template_path: job.template_path.clone(),
        parameters,
        service_account: request.service_account.clone(),
        output_directory: Some(request.staging_bucket.clone()),
    };

    let name = repository
        .create_job(&request.parent(), &create)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                error!(
                    "Pipeline template {} not found, check pipeline_name and pipeline_tag",
                    job.template_path
                );
                SubmitError::TemplateNotFound {
                    template_path: job.template_path.clone(),
                    source: e,
                }
            } else {
                SubmitError::Client(e)
            }
        })?;

    info!("Pipeline job {} submitted as {}", job.display_name, name);

    job.name = Some(name.clone());
    Ok(name)
}
