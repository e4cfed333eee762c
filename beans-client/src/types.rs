//! Wire types for the pipeline service
//!
//! Parameters travel as tagged values (`{"stringValue": ...}` and friends).
//! The conversions between [`ParameterValue`] and [`TaggedValue`] live here
//! so the lossy list handling sits next to the wire format it exists for.

use std::collections::BTreeMap;

use beans_core::domain::job::PipelineState;
use beans_core::domain::parameter::ParameterValue;
use serde::{Deserialize, Serialize};

/// Tagged parameter value as accepted by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaggedValue {
    StringValue(String),
    IntValue(i64),
    DoubleValue(f64),
}

impl From<&ParameterValue> for TaggedValue {
    /// Lists only keep their first element; the service parameter is scalar.
    fn from(value: &ParameterValue) -> Self {
        match value {
            ParameterValue::String(s) => TaggedValue::StringValue(s.clone()),
            ParameterValue::Int(i) => TaggedValue::IntValue(*i),
            ParameterValue::Float(f) => TaggedValue::DoubleValue(*f),
            ParameterValue::List(items) => {
                TaggedValue::StringValue(items.first().cloned().unwrap_or_default())
            }
        }
    }
}

impl From<TaggedValue> for ParameterValue {
    fn from(value: TaggedValue) -> Self {
        match value {
            TaggedValue::StringValue(s) => ParameterValue::String(s),
            TaggedValue::IntValue(i) => ParameterValue::Int(i),
            TaggedValue::DoubleValue(f) => ParameterValue::Float(f),
        }
    }
}

/// A single marshaled pipeline parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineParameter {
    pub name: String,
    pub value: TaggedValue,
}

/// Everything needed to create a pipeline job
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePipelineJob {
    pub display_name: String,
    /// Template path without scheme, e.g. `<loc>-kfp.pkg.dev/<project>/<repo>/<name>/<tag>`
    pub template_path: String,
    pub parameters: Vec<PipelineParameter>,
    pub service_account: String,
    /// Where the service writes run artifacts
    pub output_directory: Option<String>,
}

impl CreatePipelineJob {
    /// Request body for `pipelineJobs.create`
    pub fn to_body(&self) -> PipelineJobBody {
        let template_uri = if self.template_path.contains("://") {
            self.template_path.clone()
        } else {
            format!("https://{}", self.template_path)
        };

        PipelineJobBody {
            display_name: self.display_name.clone(),
            template_uri,
            service_account: self.service_account.clone(),
            runtime_config: RuntimeConfig {
                parameters: self
                    .parameters
                    .iter()
                    .map(|p| (p.name.clone(), p.value.clone()))
                    .collect(),
                gcs_output_directory: self.output_directory.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineJobBody {
    pub display_name: String,
    pub template_uri: String,
    pub service_account: String,
    pub runtime_config: RuntimeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    pub parameters: BTreeMap<String, TaggedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcs_output_directory: Option<String>,
}

/// Pipeline job as returned by the service
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineJobResource {
    pub name: String,
    #[serde(default)]
    pub state: PipelineState,
}
