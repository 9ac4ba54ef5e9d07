//! Lock store HTTP client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::error::{LockStoreError, LockStoreResult};
use crate::types::{BlackoutEntry, CreateLockRecord, LockRecord, UpdateRedactedLocator};

/// Configuration for the lock store client.
#[derive(Debug, Clone)]
pub struct LockStoreConfig {
    /// Base URL of the lock store service.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for LockStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl LockStoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> LockStoreResult<Self> {
        Ok(Self {
            base_url: std::env::var("VREDACT_LOCKSTORE_URL")
                .map_err(|_| LockStoreError::config("VREDACT_LOCKSTORE_URL not set"))?,
            timeout: Duration::from_secs(
                std::env::var("VREDACT_LOCKSTORE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: String,
}

/// Client for the external lock store REST API.
#[derive(Clone)]
pub struct LockStoreClient {
    http: Client,
    config: LockStoreConfig,
}

impl LockStoreClient {
    /// Create a new client.
    pub fn new(config: LockStoreConfig) -> LockStoreResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(LockStoreError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> LockStoreResult<Self> {
        Self::new(LockStoreConfig::from_env()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Create a lock record; returns the store-assigned id.
    pub async fn create(&self, record: &CreateLockRecord) -> LockStoreResult<String> {
        let url = self.url("/locks");
        debug!("Creating lock record at {}", url);

        let response = self.http.post(&url).json(record).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LockStoreError::request_failed(format!(
                "create returned {}: {}",
                status, body
            )));
        }

        let created: CreatedResponse = response.json().await?;
        Ok(created.id)
    }

    /// Look up the record for a content id.
    pub async fn find_by_content_id(&self, content_id: &str) -> LockStoreResult<LockRecord> {
        let url = self.url(&format!("/locks/by-content/{}", content_id));
        debug!("Fetching lock record from {}", url);

        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(LockStoreError::not_found(content_id));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LockStoreError::request_failed(format!(
                "lookup returned {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    /// Update the redacted locator and interval list after a republish.
    pub async fn update_redacted_locator(
        &self,
        record_id: &str,
        redacted_locator: &str,
        intervals: Vec<BlackoutEntry>,
    ) -> LockStoreResult<()> {
        let url = self.url(&format!("/locks/{}/redacted", record_id));
        debug!("Updating redacted locator at {}", url);

        let payload = UpdateRedactedLocator {
            redacted_locator: redacted_locator.to_string(),
            blackout_intervals: intervals,
        };

        let response = self.http.patch(&url).json(&payload).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(LockStoreError::not_found(record_id));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LockStoreError::request_failed(format!(
                "update returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> LockStoreClient {
        LockStoreClient::new(LockStoreConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn record_json() -> serde_json::Value {
        json!({
            "id": "rec-1",
            "platformId": "plat-1",
            "userId": "user-1",
            "contentId": "content-1",
            "originalLocator": "https://cdn.example.com/vods/content-1/output.m3u8",
            "redactedLocator": "https://cdn.example.com/vods/content-1/blackout.m3u8",
            "blackoutIntervals": [
                {"id": "iv-1", "start": 30.0, "end": 45.0}
            ],
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_create_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/locks"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "rec-9"})))
            .mount(&server)
            .await;

        let record = CreateLockRecord {
            platform_id: "p".to_string(),
            user_id: "u".to_string(),
            content_id: "c".to_string(),
            original_locator: "o".to_string(),
            redacted_locator: "r".to_string(),
            blackout_intervals: vec![],
        };

        let id = client_for(&server).create(&record).await.unwrap();
        assert_eq!(id, "rec-9");
    }

    #[tokio::test]
    async fn test_find_by_content_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/locks/by-content/content-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(record_json()))
            .mount(&server)
            .await;

        let record = client_for(&server)
            .find_by_content_id("content-1")
            .await
            .unwrap();
        assert_eq!(record.id, "rec-1");
        assert_eq!(record.content_id, "content-1");
        assert_eq!(record.blackout_intervals.len(), 1);
        assert_eq!(record.blackout_intervals[0].start, 30.0);
    }

    #[tokio::test]
    async fn test_find_missing_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/locks/by-content/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .find_by_content_id("missing")
            .await
            .unwrap_err();
        assert!(matches!(err, LockStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_redacted_locator() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/locks/rec-1/redacted"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        client_for(&server)
            .update_redacted_locator(
                "rec-1",
                "https://cdn.example.com/vods/content-1/blackout.m3u8",
                vec![],
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_server_error_is_request_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/locks/by-content/content-1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .find_by_content_id("content-1")
            .await
            .unwrap_err();
        assert!(matches!(err, LockStoreError::RequestFailed(_)));
    }
}
