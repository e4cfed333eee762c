//! Repository layer
//!
//! Repositories abstract communication with the pipeline service. A
//! connector opens one repository handle per request; the handle is dropped
//! when the request finishes, whichever way it ends.
//!
//! Both seams are trait-based to enable testing with scripted backends.

mod pipeline_jobs;

// Re-export traits
pub use pipeline_jobs::{PipelineJobRepository, RepositoryConnector};

// Re-export implementations
pub use pipeline_jobs::VertexConnector;
