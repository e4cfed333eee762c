//! Local stand-in for the pipeline service and token endpoint

use axum::Router;
use tokio::net::TcpListener;

use crate::ServiceAccountKey;

/// Throwaway RSA key used only to sign test grants
pub const TEST_PRIVATE_KEY: &str = include_str!("../testdata/service-account-key.pem");

pub const PARENT: &str = "projects/beans-prod/locations/europe-west1";
pub const JOB_NAME: &str = "projects/beans-prod/locations/europe-west1/pipelineJobs/4242";
pub const PIPELINE_JOBS_PATH: &str = "/v1/projects/beans-prod/locations/europe-west1/pipelineJobs";
pub const JOB_PATH: &str = "/v1/projects/beans-prod/locations/europe-west1/pipelineJobs/4242";

/// Serves `router` on an ephemeral local port and returns its base URL
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn service_account_key(token_uri: String) -> ServiceAccountKey {
    ServiceAccountKey {
        client_email: "runner@beans-prod.iam.gserviceaccount.com".to_string(),
        private_key: TEST_PRIVATE_KEY.to_string(),
        private_key_id: Some("beans-test-key".to_string()),
        token_uri,
    }
}
