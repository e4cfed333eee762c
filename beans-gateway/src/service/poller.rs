//! Job state poller
//!
//! Watches a freshly submitted job until it is either running or failed.
//! The loop is bounded: one initial observation plus `max_attempts` retries,
//! with a fixed pause between observations. A failed status call ends the
//! loop immediately.

use std::time::Duration;

use async_trait::async_trait;
use beans_client::ClientError;
use beans_core::domain::job::{PipelineJob, PipelineState};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::repository::PipelineJobRepository;

/// Pause between observations
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(20);

/// Retries after the first observation
pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;

/// Sleep abstraction so tests can run the loop without waiting
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollSettings {
    /// Total number of status observations the loop may make
    pub fn max_observations(&self) -> u32 {
        self.max_attempts.saturating_add(1)
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error("pipeline job {display_name} did not reach a running or failed state within the timeout")]
    TimedOut { display_name: String },

    #[error(transparent)]
    Call(#[from] ClientError),
}

/// Polls one job through a repository handle
pub struct JobPoller<'a> {
    repository: &'a dyn PipelineJobRepository,
    sleeper: &'a dyn Sleeper,
    settings: PollSettings,
}

impl<'a> JobPoller<'a> {
    pub fn new(
        repository: &'a dyn PipelineJobRepository,
        sleeper: &'a dyn Sleeper,
        settings: PollSettings,
    ) -> Self {
        Self {
            repository,
            sleeper,
            settings,
        }
    }

    /// Observes the job named `name` until it is running or failed,
    /// updating `job.state`
    ///
    /// A `Failed` job is a successful outcome here: the loop only decides
    /// when to stop watching, not whether the pipeline worked.
    pub async fn wait_for_decision(
        &self,
        name: &str,
        job: &mut PipelineJob,
    ) -> Result<PipelineState, PollError> {
        let total = self.settings.max_observations();

        for observation in 1..=total {
            let state = self.repository.get_job_state(name).await?;
            job.state = state;

            debug!(
                "Pipeline job {} observation {}/{}: {}",
                name, observation, total, state
            );

            if state.is_decided() {
                info!("Pipeline job {} reached {}", job.display_name, state);
                return Ok(state);
            }

            // No pause after the final observation
            if observation < total {
                self.sleeper.sleep(self.settings.interval).await;
            }
        }

        warn!(
            "Pipeline job {} still {} after {} observations",
            job.display_name, job.state, total
        );

        Err(PollError::TimedOut {
            display_name: job.display_name.clone(),
        })
    }
}
