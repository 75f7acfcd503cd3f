// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Image upload, proxied to the media host.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

use crate::{
    auth::Auth,
    error::ApiError,
    models::UploadResponse,
    state::AppState,
};

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

const NO_FILE: &str = "No file uploaded";

/// Upload the `image` part of a multipart form and return its hosted URL.
#[utoipa::path(
    post,
    path = "/api/v1/upload",
    request_body(content_type = "multipart/form-data", description = "Form with an `image` file field"),
    tag = "Upload",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Image uploaded", body = UploadResponse),
        (status = 400, description = "No file uploaded"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Media host failed or is not configured")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    Auth(user): Auth,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Upload without multipart body");
        ApiError::bad_request(NO_FILE)
    })?;

    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(NO_FILE).with_detail(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(NO_FILE).with_detail(e.body_text()))?;
        image = Some((bytes, content_type));
        break;
    }

    let (bytes, content_type) = image
        .filter(|(bytes, _)| !bytes.is_empty())
        .ok_or_else(|| ApiError::bad_request(NO_FILE))?;

    let Some(media) = state.media.as_ref() else {
        warn!("Upload attempted without media host credentials");
        return Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Media host is not configured",
        ));
    };

    let url = media.upload(&bytes, content_type.as_deref()).await?;

    info!(email = %user.email, bytes = bytes.len(), "Image uploaded");
    Ok(Json(UploadResponse {
        success: true,
        message: "Image uploaded successfully".to_string(),
        url,
    }))
}
