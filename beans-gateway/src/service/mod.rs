//! Service Module
//!
//! Business logic for the gateway: submitting pipeline jobs and polling
//! them until the service reports a decision.

pub mod poller;
pub mod run;
pub mod submission;

#[cfg(test)]
pub mod testing;

// Re-export for convenience
pub use poller::{JobPoller, PollSettings, Sleeper, TokioSleeper};
pub use run::{PipelineRunner, RunError};
