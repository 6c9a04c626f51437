//! Blob Store for Media Uploads
//!
//! Opaque object storage boundary: upload bytes, get back a public URL plus
//! an object id that can later be destroyed. From the caller's point of view
//! this is a plain call/result/error contract.

use async_trait::async_trait;
use thiserror::Error;

/// Media storage errors
#[derive(Debug, Error)]
pub enum MediaError {
    /// Upload did not complete
    #[error("Media upload failed: {0}")]
    UploadFailed(String),

    /// Deletion did not complete
    #[error("Media deletion failed: {0}")]
    DeleteFailed(String),
}

/// A stored media object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaObject {
    /// Public delivery URL
    pub url: String,
    /// Storage-side identifier, needed to destroy the object later
    pub object_id: String,
}

/// Blob store abstraction
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload raw bytes, returning the stored object
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<MediaObject, MediaError>;

    /// Destroy a previously uploaded object
    async fn destroy(&self, object_id: &str) -> Result<(), MediaError>;
}

// ============================================================================
// HTTP media store (Cloudinary-style API)
// ============================================================================

/// Configuration for the media upload API
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Upload endpoint
    pub upload_url: String,
    /// Destroy endpoint
    pub destroy_url: String,
    pub api_key: String,
}

/// Media store backed by an HTTP upload API
#[derive(Debug, Clone)]
pub struct HttpMediaStore {
    client: reqwest::Client,
    config: MediaConfig,
}

#[derive(Debug, serde::Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

impl HttpMediaStore {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<MediaObject, MediaError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.config.upload_url)
            .header("api-key", &self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::UploadFailed(format!(
                "upload API returned status {}",
                status
            )));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::UploadFailed(e.to_string()))?;

        Ok(MediaObject {
            url: parsed.secure_url,
            object_id: parsed.public_id,
        })
    }

    async fn destroy(&self, object_id: &str) -> Result<(), MediaError> {
        let response = self
            .client
            .post(&self.config.destroy_url)
            .header("api-key", &self.config.api_key)
            .json(&serde_json::json!({ "public_id": object_id }))
            .send()
            .await
            .map_err(|e| MediaError::DeleteFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::DeleteFailed(format!(
                "destroy API returned status {}",
                status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_parsing() {
        let json = r#"{"secure_url":"https://cdn.example.com/a.jpg","public_id":"a1b2c3","bytes":1024}"#;
        let parsed: UploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.secure_url, "https://cdn.example.com/a.jpg");
        assert_eq!(parsed.public_id, "a1b2c3");
    }
}
