/// External data source clients module
use crate::domain::{LaunchDocument, SatelliteDocument};
use crate::errors::ApiResult;
use reqwest::Client;
use std::time::Duration;

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("launchboard-service/1.0")
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// Launch archive client
pub struct LaunchArchiveClient {
    http_client: HttpClient,
    url: String,
}

impl LaunchArchiveClient {
    pub fn new(url: String) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new()?,
            url,
        })
    }

    /// Get source URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the launch archive document
    pub async fn fetch(&self) -> ApiResult<LaunchDocument> {
        let resp = self
            .http_client
            .get_client()
            .get(&self.url)
            .send()
            .await?;

        let doc = resp.error_for_status()?.json().await?;
        Ok(doc)
    }
}

/// Satellite catalog client
pub struct SatelliteCatalogClient {
    http_client: HttpClient,
    url: String,
}

impl SatelliteCatalogClient {
    pub fn new(url: String) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new()?,
            url,
        })
    }

    /// Get source URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the satellite catalog document
    pub async fn fetch(&self) -> ApiResult<SatelliteDocument> {
        let resp = self
            .http_client
            .get_client()
            .get(&self.url)
            .send()
            .await?;

        let doc = resp.error_for_status()?.json().await?;
        Ok(doc)
    }
}
