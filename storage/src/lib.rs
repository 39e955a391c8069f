//! Client for the blob storage REST API (`/storage/v1`).
//!
//! Only the calls the application needs: bucket creation, listing, raw
//! uploads, removal and public URLs.

use common::error::AppError;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use url::Url;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("URL is outside the bucket: {0}")]
    ForeignUrl(String),

    #[error("Object larger than {0} bytes")]
    TooLarge(usize),
}

impl From<StorageError> for AppError {
    fn from(error: StorageError) -> Self {
        AppError::Storage(error.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileObject {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default)]
pub struct BucketOptions {
    pub public: bool,
    pub allowed_mime_types: Vec<String>,
    pub file_size_limit: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub limit: Option<u32>,
    pub search: Option<String>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }
}

pub struct StorageClient {
    base_url: String,
    api_key: String,
    http_client: Client,
}

pub struct StorageBucketClient<'a> {
    parent: &'a StorageClient,
    bucket_id: String,
}

impl StorageClient {
    pub fn new(base_url: &str, api_key: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http_client,
        }
    }

    pub fn from<'a>(&'a self, bucket_id: &str) -> StorageBucketClient<'a> {
        StorageBucketClient {
            parent: self,
            bucket_id: bucket_id.to_string(),
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", &self.api_key))
    }

    pub async fn create_bucket(&self, bucket_id: &str, options: BucketOptions) -> Result<()> {
        let url = Url::parse(&format!("{}/storage/v1/bucket", self.base_url))?;

        let mut payload = json!({
            "id": bucket_id,
            "name": bucket_id,
            "public": options.public,
        });
        if !options.allowed_mime_types.is_empty() {
            payload["allowed_mime_types"] = json!(options.allowed_mime_types);
        }
        if let Some(limit) = options.file_size_limit {
            payload["file_size_limit"] = json!(limit);
        }

        let response = self
            .authorized(self.http_client.post(url))
            .json(&payload)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

impl StorageBucketClient<'_> {
    pub async fn list(&self, prefix: &str, options: ListOptions) -> Result<Vec<FileObject>> {
        let url = Url::parse(&format!(
            "{}/storage/v1/object/list/{}",
            self.parent.base_url, self.bucket_id
        ))?;

        let mut payload = json!({
            "prefix": prefix,
            "limit": options.limit.unwrap_or(100),
            "offset": 0,
            "sortBy": { "column": "name", "order": "asc" },
        });
        if let Some(search) = &options.search {
            payload["search"] = json!(search);
        }

        let response = self
            .parent
            .authorized(self.parent.http_client.post(url))
            .json(&payload)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        Ok(response.json::<Vec<FileObject>>().await?)
    }

    /// Uploads raw bytes. Fails if the object exists.
    pub async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let url = Url::parse(&format!(
            "{}/storage/v1/object/{}/{}",
            self.parent.base_url, self.bucket_id, path
        ))?;

        let response = self
            .parent
            .authorized(self.parent.http_client.post(url))
            .header("Content-Type", content_type)
            .header("cache-control", "max-age=3600")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    pub async fn remove(&self, paths: &[String]) -> Result<()> {
        let url = Url::parse(&format!(
            "{}/storage/v1/object/{}",
            self.parent.base_url, self.bucket_id
        ))?;

        let response = self
            .parent
            .authorized(self.parent.http_client.delete(url))
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Downloads a public object of this bucket by its absolute URL.
    ///
    /// URLs outside the bucket's public prefix are refused without a request.
    /// Bodies over `max_bytes` are rejected, declared or streamed.
    pub async fn fetch_public(&self, url: &str, max_bytes: usize) -> Result<Vec<u8>> {
        let parsed = Url::parse(url)?;
        if !parsed.as_str().starts_with(&self.get_public_url("")) {
            return Err(StorageError::ForeignUrl(url.to_string()));
        }

        let mut response =
            ensure_success(self.parent.http_client.get(parsed).send().await?).await?;
        if response
            .content_length()
            .is_some_and(|len| len > max_bytes as u64)
        {
            return Err(StorageError::TooLarge(max_bytes));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > max_bytes {
                return Err(StorageError::TooLarge(max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    pub fn get_public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.parent.base_url, self.bucket_id, path
        )
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StorageError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> StorageClient {
        StorageClient::new(&server.uri(), "service-key", Client::new())
    }

    #[tokio::test]
    async fn lists_objects_with_search() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/storage/v1/object/list/marketing-images"))
            .and(header("apikey", "service-key"))
            .and(body_partial_json(json!({ "prefix": "", "search": "new-" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "new-7-1700000000000.png", "id": "a", "updated_at": "2024-01-02T00:00:00Z" },
                { "name": "new-3-1600000000000.png", "id": "b", "updated_at": "2024-01-01T00:00:00Z" }
            ])))
            .mount(&server)
            .await;

        let storage = client(&server);
        let files = storage
            .from("marketing-images")
            .list("", ListOptions::new().search("new-"))
            .await
            .unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "new-7-1700000000000.png");
        assert_eq!(files[1].updated_at.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn upload_sends_raw_body_with_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/storage/v1/object/marketing-images/new-1-42.png"))
            .and(header("Content-Type", "image/png"))
            .and(header("Authorization", "Bearer service-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": "x" })))
            .expect(1)
            .mount(&server)
            .await;

        let storage = client(&server);
        storage
            .from("marketing-images")
            .upload("new-1-42.png", vec![0x89, 0x50, 0x4e, 0x47], "image/png")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn api_failures_surface_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/storage/v1/object/marketing-images"))
            .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
            .mount(&server)
            .await;

        let storage = client(&server);
        let error = storage
            .from("marketing-images")
            .remove(&["new-1-42.png".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(error, StorageError::Api { status: 403, ref message } if message == "denied"));
        assert!(matches!(AppError::from(error), AppError::Storage(_)));
    }

    #[tokio::test]
    async fn fetch_public_reads_bucket_objects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/storage/v1/object/public/marketing-images/new-1-42.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .expect(1)
            .mount(&server)
            .await;

        let storage = client(&server);
        let bucket = storage.from("marketing-images");
        let bytes = bucket
            .fetch_public(&bucket.get_public_url("new-1-42.png"), 16)
            .await
            .unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn fetch_public_refuses_other_hosts_and_paths() {
        let server = MockServer::start().await;
        let elsewhere = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8]))
            .expect(0)
            .mount(&elsewhere)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8]))
            .expect(0)
            .mount(&server)
            .await;

        let storage = client(&server);
        let bucket = storage.from("marketing-images");

        let foreign = format!("{}/storage/v1/object/public/marketing-images/x.png", elsewhere.uri());
        let error = bucket.fetch_public(&foreign, 16).await.unwrap_err();
        assert!(matches!(error, StorageError::ForeignUrl(_)));

        let escaped = format!(
            "{}/storage/v1/object/public/marketing-images/../private/x.png",
            server.uri()
        );
        let error = bucket.fetch_public(&escaped, 16).await.unwrap_err();
        assert!(matches!(error, StorageError::ForeignUrl(_)));

        let other_bucket = format!("{}/storage/v1/object/public/secrets/x.png", server.uri());
        let error = bucket.fetch_public(&other_bucket, 16).await.unwrap_err();
        assert!(matches!(error, StorageError::ForeignUrl(_)));
    }

    #[tokio::test]
    async fn fetch_public_caps_body_size() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/storage/v1/object/public/marketing-images/big.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
            .mount(&server)
            .await;

        let storage = client(&server);
        let bucket = storage.from("marketing-images");
        let error = bucket
            .fetch_public(&bucket.get_public_url("big.png"), 16)
            .await
            .unwrap_err();
        assert!(matches!(error, StorageError::TooLarge(16)));
    }

    #[test]
    fn public_url_layout() {
        let storage = StorageClient::new("https://proj.example.co/", "k", Client::new());
        assert_eq!(
            storage.from("marketing-images").get_public_url("new-1-42.png"),
            "https://proj.example.co/storage/v1/object/public/marketing-images/new-1-42.png"
        );
    }
}
