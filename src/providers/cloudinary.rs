// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cloudinary-compatible media host integration for image uploads.

use std::{fmt, time::Duration};

use base64ct::{Base64, Encoding};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::info;

/// Content type assumed when the uploaded part does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "image/png";

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);
const SIGNATURE_ALGORITHM: &str = "sha256";

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("media request failed: {0}")]
    Request(String),

    #[error("media host rejected upload ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("media response was invalid: {0}")]
    InvalidResponse(String),
}

/// Credentials and destination for the media host.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub base_url: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

impl fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("base_url", &self.base_url)
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("folder", &self.folder)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    config: CloudinaryConfig,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Result<Self, MediaError> {
        let http = Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .map_err(|e| MediaError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    pub fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/auto/upload",
            self.config.base_url, self.config.cloud_name
        )
    }

    /// Upload raw image bytes and return the hosted HTTPS URL.
    pub async fn upload(&self, bytes: &[u8], content_type: Option<&str>) -> Result<String, MediaError> {
        let file = data_uri(bytes, content_type);
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[
                ("folder", self.config.folder.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &self.config.api_secret,
        );

        let form = [
            ("file", file.as_str()),
            ("folder", self.config.folder.as_str()),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("signature", signature.as_str()),
            ("signature_algorithm", SIGNATURE_ALGORITHM),
        ];

        let response = self
            .http
            .post(self.upload_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(MediaError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        info!(
            bytes = bytes.len(),
            folder = %self.config.folder,
            "Image uploaded to media host"
        );

        Ok(parsed.secure_url)
    }
}

/// Encode bytes as `data:<content-type>;base64,<payload>`.
pub fn data_uri(bytes: &[u8], content_type: Option<&str>) -> String {
    let content_type = content_type
        .map(str::trim)
        .filter(|ct| !ct.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    format!("data:{content_type};base64,{}", Base64::encode_string(bytes))
}

/// Sign request parameters: `k1=v1&k2=v2` sorted by key, followed by the
/// secret, hashed with SHA-256 and hex encoded.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Pull the human readable message out of an error body, falling back to the
/// raw text.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> CloudinaryConfig {
        CloudinaryConfig {
            base_url: "https://api.cloudinary.com".to_string(),
            cloud_name: "demo".to_string(),
            api_key: "1234".to_string(),
            api_secret: "shh".to_string(),
            folder: "weblearn".to_string(),
        }
    }

    #[test]
    fn upload_url_includes_cloud_name() {
        let client = CloudinaryClient::new(test_config()).unwrap();
        assert_eq!(
            client.upload_url(),
            "https://api.cloudinary.com/v1_1/demo/auto/upload"
        );
    }

    #[test]
    fn data_uri_defaults_content_type() {
        assert_eq!(data_uri(b"hi", None), "data:image/png;base64,aGk=");
        assert_eq!(data_uri(b"hi", Some(" ")), "data:image/png;base64,aGk=");
        assert_eq!(
            data_uri(b"hi", Some("image/jpeg")),
            "data:image/jpeg;base64,aGk="
        );
    }

    #[test]
    fn signature_sorts_params_before_hashing() {
        let a = sign_params(&[("timestamp", "1"), ("folder", "f")], "secret");
        let b = sign_params(&[("folder", "f"), ("timestamp", "1")], "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let mut hasher = Sha256::new();
        hasher.update(b"folder=f&timestamp=1secret");
        assert_eq!(a, format!("{:x}", hasher.finalize()));

        assert_ne!(a, sign_params(&[("folder", "f"), ("timestamp", "1")], "other"));
    }

    #[test]
    fn upstream_message_prefers_error_field() {
        assert_eq!(
            upstream_message(r#"{"error":{"message":"Invalid Signature"}}"#),
            "Invalid Signature"
        );
        assert_eq!(upstream_message("bad gateway\n"), "bad gateway");
    }

    #[test]
    fn debug_hides_api_secret() {
        let debug = format!("{:?}", test_config());
        assert!(!debug.contains("shh"));
    }
}
