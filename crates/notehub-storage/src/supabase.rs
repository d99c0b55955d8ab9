//! Hosted object storage backend (Supabase Storage REST API).

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Error body returned by the storage API
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageApiError {
    #[serde(default)]
    status_code: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl StorageApiError {
    fn describe(&self, status: StatusCode) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| format!("storage API returned {}", status))
    }

    fn is_not_found(&self, status: StatusCode) -> bool {
        status == StatusCode::NOT_FOUND
            || self.status_code.as_deref() == Some("404")
            || self.error.as_deref() == Some("not_found")
    }
}

#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStorage {
    /// # Arguments
    /// * `project_url` - Project URL, e.g. "https://abc.supabase.co"
    /// * `service_key` - Service-role key used for both `apikey` and bearer auth
    /// * `bucket` - Bucket holding note files
    pub fn new(project_url: &str, service_key: String, bucket: String) -> StorageResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                StorageError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self::with_client(client, project_url, service_key, bucket))
    }

    pub fn with_client(
        client: Client,
        project_url: &str,
        service_key: String,
        bucket: String,
    ) -> Self {
        Self {
            client,
            base_url: format!("{}/storage/v1", project_url.trim_end_matches('/')),
            service_key,
            bucket,
        }
    }

    fn encoded_key(storage_key: &str) -> String {
        storage_key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn object_url(&self, storage_key: &str) -> String {
        format!(
            "{}/object/{}/{}",
            self.base_url,
            self.bucket,
            Self::encoded_key(storage_key)
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", self.service_key.as_str())
            .header("Authorization", format!("Bearer {}", self.service_key))
    }

    async fn api_error(response: reqwest::Response) -> (StatusCode, StorageApiError) {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<StorageApiError>(&body).unwrap_or_else(|_| {
            StorageApiError {
                message: (!body.is_empty()).then_some(body),
                ..Default::default()
            }
        });
        (status, parsed)
    }
}

#[async_trait]
impl Storage for SupabaseStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let response = self
            .authorized(self.client.post(self.object_url(storage_key)))
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let (status, err) = Self::api_error(response).await;
            return Err(StorageError::UploadFailed(err.describe(status)));
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object storage upload successful"
        );

        Ok(self.public_url(storage_key))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        validate_key(storage_key)?;
        let start = std::time::Instant::now();

        let response = self
            .authorized(self.client.delete(self.object_url(storage_key)))
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let (status, err) = Self::api_error(response).await;
            if err.is_not_found(status) {
                return Err(StorageError::NotFound(err.describe(status)));
            }
            return Err(StorageError::DeleteFailed(err.describe(status)));
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object storage delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        validate_key(storage_key)?;
        let url = format!(
            "{}/object/authenticated/{}/{}",
            self.base_url,
            self.bucket,
            Self::encoded_key(storage_key)
        );

        let response = self
            .authorized(self.client.head(url))
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Ok(false),
            s => Err(StorageError::BackendError(format!(
                "storage API returned {}",
                s
            ))),
        }
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!(
            "{}/object/public/{}/{}",
            self.base_url,
            self.bucket,
            Self::encoded_key(storage_key)
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Supabase
    }
}
