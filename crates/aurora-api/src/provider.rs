//! HTTP data fetcher for the auroras.live v1 API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::instrument;
use url::Url;

use crate::types::{Coordinates, DataSnapshot, FetchError};

const USER_AGENT: &str = "AuroraWatch/0.1.0";

#[derive(Debug, Clone)]
pub struct AuroraProvider {
    client: Arc<Client>,
    base_url: Url,
    source: String,
    tz_offset_minutes: i32,
}

impl AuroraProvider {
    /// `tz_offset_minutes` is computed once at startup and sent unchanged on
    /// every request.
    pub fn new(
        base_url: &str,
        source: &str,
        timeout: Duration,
        tz_offset_minutes: i32,
    ) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url,
            source: source.to_string(),
            tz_offset_minutes,
        })
    }

    pub fn tz_offset_minutes(&self) -> i32 {
        self.tz_offset_minutes
    }

    /// Full request URL for a position. Parameter order is fixed.
    pub fn request_url(&self, position: &Coordinates) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.query_pairs_mut()
            .append_pair("source", &self.source)
            .append_pair("tz", &self.tz_offset_minutes.to_string())
            .append_pair("type", "all")
            .append_pair("images", "false")
            .append_pair("forecast", "false")
            .append_pair("lat", &position.latitude.to_string())
            .append_pair("long", &position.longitude.to_string());
        url
    }

    /// Fetch and parse the full payload for a position.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, position: &Coordinates) -> Result<DataSnapshot, FetchError> {
        let url = self.request_url(position);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        tracing::debug!("Data returned. {} bytes returned", body.len());

        serde_json::from_slice(&body).map_err(|e| FetchError::Parse(e.to_string()))
    }
}
