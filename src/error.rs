// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthError;
use crate::providers::MediaError;
use crate::storage::{StorageError, StorageResult};

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Extra detail returned to the client under `error`.
    pub detail: Option<String>,
    /// Machine-readable code for authentication failures.
    pub code: Option<&'static str>,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
            code: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Duplicate resource. Reported as 400 to match existing clients.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Internal failure. The detail is logged and never returned.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }

    /// Failure reported by an upstream service; its text is passed through.
    pub fn upstream(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message).with_detail(detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            message: self.message,
            error: self.detail,
            error_code: self.code,
        });
        (self.status, body).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => Self::not_found(format!("{what} not found")),
            StorageError::AlreadyExists(what) => Self::conflict(format!("{what} already exists")),
            other => Self::internal(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = err.status_code();
        let code = err.error_code();
        let mut api = match err {
            AuthError::InternalError(detail) => Self::internal(detail),
            other => Self::new(status, other.to_string()),
        };
        api.code = Some(code);
        api
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        let detail = match err {
            MediaError::Upstream { message, .. } => message,
            other => other.to_string(),
        };
        tracing::warn!(error = %detail, "Media upload failed");
        Self::upstream("Error uploading image", detail)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("Invalid request body").with_detail(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request("Invalid query parameters").with_detail(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request("Invalid path parameter").with_detail(rejection.body_text())
    }
}

/// Map a storage `NotFound` to a 404 carrying a caller-chosen message.
pub trait NotFoundExt<T> {
    fn or_not_found(self, message: &str) -> Result<T, ApiError>;
}

impl<T> NotFoundExt<T> for StorageResult<T> {
    fn or_not_found(self, message: &str) -> Result<T, ApiError> {
        self.map_err(|err| match err {
            StorageError::NotFound(_) => ApiError::not_found(message),
            other => other.into(),
        })
    }
}

/// JSON body extractor that rejects with the API error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor that rejects with the API error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Path extractor that rejects with the API error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde::Deserialize;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let dup = ApiError::conflict("User already exists");
        assert_eq!(dup.status, StatusCode::BAD_REQUEST);

        let unauth = ApiError::unauthorized("nope");
        assert_eq!(unauth.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn into_response_returns_envelope() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"success":false,"message":"bad data"}"#);
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_detail() {
        let err: ApiError = StorageError::Task("thread panicked at secret.rs".into()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(err.into_response()).await;
        assert_eq!(body["message"], "Internal server error");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn upstream_errors_expose_text() {
        let err: ApiError = MediaError::Upstream {
            status: 401,
            message: "Invalid Signature".into(),
        }
        .into();

        let body = body_json(err.into_response()).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Error uploading image");
        assert_eq!(body["error"], "Invalid Signature");
    }

    #[tokio::test]
    async fn auth_errors_keep_code() {
        let err: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        let body = body_json(err.into_response()).await;
        assert_eq!(body["message"], "Invalid email or password");
        assert_eq!(body["error_code"], "invalid_credentials");
    }

    #[test]
    fn or_not_found_overrides_message() {
        let missing: StorageResult<()> = Err(StorageError::NotFound("Supply x".into()));
        let err = missing.or_not_found("Supply not found").unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Supply not found");

        let exists: StorageResult<()> = Err(StorageError::AlreadyExists("x".into()));
        let err = exists.or_not_found("Supply not found").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        name: String,
    }

    #[tokio::test]
    async fn json_rejection_becomes_bad_request() {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"nom":"x"}"#))
            .unwrap();

        let err = ApiJson::<Payload>::from_request(request, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid request body");
        assert!(err.detail.unwrap().contains("name"));
    }
}
