//! Beans Pipeline Service Client
//!
//! A small, typed HTTP client for the managed pipeline service (Vertex AI
//! Pipelines REST API). It covers exactly what the gateway needs: creating a
//! pipeline job and reading its state back.
//!
//! # Example
//!
//! ```no_run
//! use beans_client::PipelineServiceClient;
//!
//! # async fn example() -> beans_client::Result<()> {
//! let client = PipelineServiceClient::connect(
//!     PipelineServiceClient::regional_endpoint("europe-west1"),
//!     "/secrets/service-account.json",
//! )
//! .await?;
//!
//! let job = client
//!     .get_pipeline_job("projects/p/locations/europe-west1/pipelineJobs/123")
//!     .await?;
//! println!("{} is {}", job.name, job.state);
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod error;
mod jobs;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use credentials::{ServiceAccountKey, TokenSource};
pub use error::{ClientError, Result};
pub use types::{CreatePipelineJob, PipelineJobResource, PipelineParameter, TaggedValue};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the pipeline service
#[derive(Debug)]
pub struct PipelineServiceClient {
    /// Base URL of the service (e.g., "https://europe-west1-aiplatform.googleapis.com")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Bearer tokens for every call
    tokens: TokenSource,
}

impl PipelineServiceClient {
    /// Regional API endpoint for a location
    pub fn regional_endpoint(location: &str) -> String {
        format!("https://{}-aiplatform.googleapis.com", location)
    }

    /// Create a client authenticated with a service-account key file
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service API
    /// * `credentials_path` - Path to a service-account JSON key
    pub async fn connect(base_url: impl Into<String>, credentials_path: &str) -> Result<Self> {
        let key = ServiceAccountKey::from_file(credentials_path).await?;
        tracing::debug!("Loaded service account {}", key.client_email);

        let tokens = TokenSource::service_account(key)?;
        Ok(Self::with_token_source(base_url, Client::new(), tokens))
    }

    /// Create a client with a custom HTTP client and token source
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, or to
    /// point the client at an emulator with a static token.
    pub fn with_token_source(
        base_url: impl Into<String>,
        client: Client,
        tokens: TokenSource,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            tokens,
        }
    }

    async fn bearer_token(&self) -> Result<String> {
        self.tokens.token(&self.client).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
