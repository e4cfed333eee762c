//! Request validation
//!
//! Turns the untyped `/run-beans-pipeline` body into a [`JobRequest`] and the
//! merged [`ParameterSet`]. Checks run in a fixed order and stop at the first
//! problem, so the reported field is always the earliest one that is wrong.

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::domain::parameter::{ParameterSet, json_type_name};
use crate::domain::request::JobRequest;

pub const CONFIG_VALUES_KEY: &str = "config_values";
pub const PARAMETER_VALUES_KEY: &str = "parameter_values";

/// Mandatory `config_values` fields, in the order they are checked
pub const REQUIRED_CONFIG_FIELDS: [&str; 8] = [
    "project_id",
    "location",
    "staging_bucket",
    "service_account",
    "pipeline_display_name",
    "pipeline_repo",
    "pipeline_name",
    "pipeline_tag",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid required parameter {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
}

/// Validates a request body and builds the merged parameter set
pub fn normalize(body: &JsonValue) -> Result<(JobRequest, ParameterSet), ValidationError> {
    let body = body.as_object().ok_or_else(|| {
        ValidationError::InvalidBody(format!(
            "expected a JSON object, got {}",
            json_type_name(body)
        ))
    })?;

    // Presence of both sections is checked before either is inspected
    for key in [CONFIG_VALUES_KEY, PARAMETER_VALUES_KEY] {
        if !body.contains_key(key) {
            return Err(ValidationError::MissingParameter(key));
        }
    }

    let config_values = object_field(body, CONFIG_VALUES_KEY)?;
    let parameter_values = object_field(body, PARAMETER_VALUES_KEY)?;

    let [
        project_id,
        location,
        staging_bucket,
        service_account,
        pipeline_display_name,
        pipeline_repo,
        pipeline_name,
        pipeline_tag,
    ] = required_config(config_values)?;

    let request = JobRequest {
        project_id,
        location,
        staging_bucket,
        service_account,
        pipeline_display_name,
        pipeline_repo,
        pipeline_name,
        pipeline_tag,
    };

    let mut parameters: ParameterSet = parameter_values
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    parameters.ensure_email_addresses();
    parameters.merge_overriding(config_values);

    tracing::debug!(
        "Validated request for pipeline {} ({} parameters)",
        request.pipeline_display_name,
        parameters.len()
    );

    Ok((request, parameters))
}

fn object_field<'a>(
    body: &'a Map<String, JsonValue>,
    key: &'static str,
) -> Result<&'a Map<String, JsonValue>, ValidationError> {
    match body.get(key) {
        None => Err(ValidationError::MissingParameter(key)),
        Some(JsonValue::Object(map)) => Ok(map),
        Some(other) => Err(ValidationError::InvalidParameter {
            field: key,
            reason: format!("expected an object, got {}", json_type_name(other)),
        }),
    }
}

fn required_config(config: &Map<String, JsonValue>) -> Result<[String; 8], ValidationError> {
    let mut values: [String; 8] = Default::default();
    for (slot, field) in values.iter_mut().zip(REQUIRED_CONFIG_FIELDS) {
        *slot = required_string(config, field)?;
    }
    Ok(values)
}

fn required_string(
    config: &Map<String, JsonValue>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match config.get(field) {
        None => Err(ValidationError::MissingParameter(field)),
        Some(JsonValue::String(s)) if s.is_empty() => Err(ValidationError::InvalidParameter {
            field,
            reason: "must not be empty".to_string(),
        }),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(other) => Err(ValidationError::InvalidParameter {
            field,
            reason: format!("expected a string, got {}", json_type_name(other)),
        }),
    }
}
