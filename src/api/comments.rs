// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::info;

use crate::{
    auth::Auth,
    error::{ApiError, ApiJson, ApiQuery},
    models::{
        display_date, new_document_id, Comment, CommentQuery, CreateCommentRequest, DataResponse,
        InsertResult, ResultResponse,
    },
    state::AppState,
    storage::CommentRepository,
};

/// Post a comment. The post reference in `id` is stored as given.
#[utoipa::path(
    post,
    path = "/api/v1/comment",
    request_body = CreateCommentRequest,
    tag = "Community",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "`{success, message, result}` with the inserted id", body = InsertResult),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_comment(
    State(state): State<AppState>,
    Auth(user): Auth,
    ApiJson(request): ApiJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ResultResponse<InsertResult>>), ApiError> {
    let comment = Comment {
        id: new_document_id(),
        name: request.name,
        email: request.email,
        comment: request.comment,
        time: display_date(Utc::now()),
        post_id: request.post_id,
    };
    let comment_id = comment.id.clone();
    let post_id = comment.post_id.clone();

    state
        .db
        .call(move |db| CommentRepository::new(db).create(&comment))
        .await?;

    info!(comment_id = %comment_id, post_id = %post_id, email = %user.email, "Comment posted");
    Ok((
        StatusCode::CREATED,
        Json(ResultResponse::ok(
            "Comment Posted Successfully!",
            InsertResult::new(comment_id),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/comment",
    params(CommentQuery),
    tag = "Community",
    responses(
        (status = 200, description = "`{success, message, data}` with matching comments", body = [Comment])
    )
)]
pub async fn list_comments(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CommentQuery>,
) -> Result<Json<DataResponse<Vec<Comment>>>, ApiError> {
    let comments = state
        .db
        .call(move |db| CommentRepository::new(db).list(query.post_filter()))
        .await?;

    Ok(Json(DataResponse::ok(
        "Successfully retrieve comments!",
        comments,
    )))
}
