//! Scripted pipeline service and instant sleeper for tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use beans_client::{ClientError, CreatePipelineJob};
use beans_core::domain::job::{PipelineJob, PipelineState};
use beans_core::domain::parameter::ParameterSet;
use beans_core::domain::request::JobRequest;
use serde_json::{Value as JsonValue, json};

use crate::repository::{PipelineJobRepository, RepositoryConnector};
use crate::service::poller::Sleeper;

const JOB_NAME: &str = "projects/beans-prod/locations/europe-west1/pipelineJobs/4242";

#[derive(Default)]
struct Inner {
    states: Mutex<VecDeque<PipelineState>>,
    created: Mutex<Vec<(String, CreatePipelineJob)>>,
    observations: AtomicUsize,
    connections: AtomicUsize,
    create_error: Option<(u16, String)>,
    status_error: Option<(usize, u16, String)>,
    connect_error: Option<String>,
}

/// In-memory pipeline service replaying a fixed sequence of states
///
/// Once the script runs out every further observation is `Pending`.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    inner: Arc<Inner>,
}

impl ScriptedBackend {
    pub fn new(states: Vec<PipelineState>) -> Self {
        Self {
            inner: Arc::new(Inner {
                states: Mutex::new(states.into()),
                ..Default::default()
            }),
        }
    }

    fn configure(self, f: impl FnOnce(&mut Inner)) -> Self {
        let mut inner = Arc::try_unwrap(self.inner)
            .unwrap_or_else(|_| panic!("configure the backend before sharing it"));
        f(&mut inner);
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn failing_create(self, status: u16, message: &str) -> Self {
        let message = message.to_string();
        self.configure(|inner| inner.create_error = Some((status, message)))
    }

    /// Fails the `observation`-th status call (1-based)
    pub fn failing_status_at(self, observation: usize, status: u16, message: &str) -> Self {
        let message = message.to_string();
        self.configure(|inner| inner.status_error = Some((observation, status, message)))
    }

    pub fn failing_connect(self, message: &str) -> Self {
        let message = message.to_string();
        self.configure(|inner| inner.connect_error = Some(message))
    }

    pub fn job_name(&self) -> &'static str {
        JOB_NAME
    }

    pub fn observations(&self) -> usize {
        self.inner.observations.load(Ordering::SeqCst)
    }

    pub fn connections(&self) -> usize {
        self.inner.connections.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<(String, CreatePipelineJob)> {
        self.inner.created.lock().unwrap().clone()
    }

    pub fn connector(&self) -> ScriptedConnector {
        ScriptedConnector {
            backend: self.clone(),
        }
    }
}

#[async_trait]
impl PipelineJobRepository for ScriptedBackend {
    async fn create_job(
        &self,
        parent: &str,
        job: &CreatePipelineJob,
    ) -> Result<String, ClientError> {
        if let Some((status, message)) = &self.inner.create_error {
            return Err(ClientError::api_error(*status, message.clone()));
        }
        self.inner
            .created
            .lock()
            .unwrap()
            .push((parent.to_string(), job.clone()));
        Ok(JOB_NAME.to_string())
    }

    async fn get_job_state(&self, name: &str) -> Result<PipelineState, ClientError> {
        assert_eq!(name, JOB_NAME);
        let observation = self.inner.observations.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some((at, status, message)) = &self.inner.status_error {
            if *at == observation {
                return Err(ClientError::api_error(*status, message.clone()));
            }
        }

        Ok(self
            .inner
            .states
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PipelineState::Pending))
    }
}

/// Hands out handles to a shared [`ScriptedBackend`]
pub struct ScriptedConnector {
    backend: ScriptedBackend,
}

#[async_trait]
impl RepositoryConnector for ScriptedConnector {
    async fn connect(
        &self,
        _request: &JobRequest,
    ) -> Result<Box<dyn PipelineJobRepository>, ClientError> {
        if let Some(message) = &self.backend.inner.connect_error {
            return Err(ClientError::Credentials(message.clone()));
        }
        self.backend.inner.connections.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.backend.clone()))
    }
}

/// Records requested pauses and returns immediately
#[derive(Default)]
pub struct InstantSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl InstantSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for InstantSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

pub fn config_values() -> JsonValue {
    json!({
        "project_id": "beans-prod",
        "location": "europe-west1",
        "staging_bucket": "gs://beans-staging",
        "service_account": "/secrets/sa.json",
        "pipeline_display_name": "beans-nightly",
        "pipeline_repo": "kfp-repo",
        "pipeline_name": "beans-pipeline",
        "pipeline_tag": "v3"
    })
}

pub fn request_body(parameter_values: JsonValue) -> JsonValue {
    json!({
        "config_values": config_values(),
        "parameter_values": parameter_values,
    })
}

pub fn job_request() -> JobRequest {
    serde_json::from_value(config_values()).unwrap()
}

pub fn submitted_job(name: &str) -> PipelineJob {
    let mut job = PipelineJob::new(&job_request(), ParameterSet::new());
    job.name = Some(name.to_string());
    job
}
