//! Infrastructure implementation of the `CiServer` port over the Drone HTTP API.

use std::time::Duration;

use anyhow::{Context, Result};
use drode_common::{Build, Environment};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::application::ports::CiServer;
use crate::domain::{ApiError, BuildError, DroneSettings};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Drone API client authenticated with a bearer token.
pub struct DroneClient {
    client: Client,
    base_url: String,
    token: String,
}

impl DroneClient {
    /// Create a client for the server in `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(settings: &DroneSettings) -> Result<Self> {
        // Without an overall timeout a stalled server would hang the wait loop forever.
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("drode/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<reqwest::Response, ApiError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ApiError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        tracing::debug!(url, status = %response.status(), "drone response");
        check_status(response.status(), url)?;
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<T, ApiError> {
        self.send(request, url)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Network {
                url: url.to_string(),
                reason: format!("invalid response body: {e}"),
            })
    }
}

/// Map an HTTP status to the matching `ApiError`.
///
/// # Errors
///
/// Returns an error for every non-2xx status.
pub fn check_status(status: StatusCode, url: &str) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Authentication {
            service: "Drone",
            detail: format!(
                "{status} from {url}. Please make sure the drone url and token are correct"
            ),
        },
        StatusCode::NOT_FOUND => ApiError::NotFound {
            url: url.to_string(),
        },
        _ => ApiError::UnexpectedResponse {
            url: url.to_string(),
            status: status.as_u16(),
        },
    })
}

impl CiServer for DroneClient {
    async fn check_configuration(&self) -> Result<()> {
        let url = self.url("user/repos");
        self.send(self.client.get(&url), &url).await?;
        Ok(())
    }

    async fn build_info(&self, pipeline: &str, number: u64) -> Result<Build> {
        let url = self.url(&format!("repos/{pipeline}/builds/{number}"));
        match self.json(self.client.get(&url), &url).await {
            Ok(build) => Ok(build),
            Err(ApiError::NotFound { .. }) => Err(BuildError::NotFound {
                number,
                pipeline: pipeline.to_string(),
            }
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    async fn builds(&self, pipeline: &str) -> Result<Vec<Build>> {
        let url = self.url(&format!("repos/{pipeline}/builds"));
        Ok(self.json(self.client.get(&url), &url).await?)
    }

    async fn promote(
        &self,
        pipeline: &str,
        number: u64,
        environment: Environment,
    ) -> Result<Build> {
        let url = self.url(&format!("repos/{pipeline}/builds/{number}/promote"));
        let request = self
            .client
            .post(&url)
            .query(&[("target", environment.as_str())]);
        Ok(self.json(request, &url).await?)
    }
}
