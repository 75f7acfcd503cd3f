// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::info;

use super::validate_id;
use crate::{
    auth::Auth,
    error::{ApiError, ApiJson, ApiPath, ApiQuery, NotFoundExt},
    models::{
        display_date, new_document_id, CommunityPost, CreateCommunityPostRequest, DataResponse,
        InsertResult, LimitQuery, ResultResponse,
    },
    state::AppState,
    storage::CommunityRepository,
};

/// Publish a community post. `createdAt` is stamped with today's date.
#[utoipa::path(
    post,
    path = "/api/v1/community",
    request_body = CreateCommunityPostRequest,
    tag = "Community",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "`{success, message, result}` with the inserted id", body = InsertResult),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    Auth(user): Auth,
    ApiJson(request): ApiJson<CreateCommunityPostRequest>,
) -> Result<(StatusCode, Json<ResultResponse<InsertResult>>), ApiError> {
    let post = CommunityPost {
        id: new_document_id(),
        image: request.image,
        title: request.title,
        description: request.description,
        created_at: display_date(Utc::now()),
    };
    let post_id = post.id.clone();

    state
        .db
        .call(move |db| CommunityRepository::new(db).create(&post))
        .await?;

    info!(post_id = %post_id, email = %user.email, "Community post created");
    Ok((
        StatusCode::CREATED,
        Json(ResultResponse::ok(
            "Create community Successfully",
            InsertResult::new(post_id),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/community",
    params(LimitQuery),
    tag = "Community",
    responses(
        (status = 200, description = "`{success, message, data}` with posts in creation order", body = [CommunityPost]),
        (status = 400, description = "Invalid limit")
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<Json<DataResponse<Vec<CommunityPost>>>, ApiError> {
    let limit = query.cap();
    let posts = state
        .db
        .call(move |db| CommunityRepository::new(db).list(limit))
        .await?;

    Ok(Json(DataResponse::ok(
        "Successfully retrieve community!",
        posts,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/community/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    tag = "Community",
    responses(
        (status = 200, description = "`{success, message, data}` with the post", body = CommunityPost),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<DataResponse<CommunityPost>>, ApiError> {
    let post_id = validate_id(&id)?;
    let post = state
        .db
        .call(move |db| CommunityRepository::new(db).get(&post_id))
        .await
        .or_not_found("community post are not found")?;

    Ok(Json(DataResponse::ok("Successfully retrieved community", post)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use crate::state::test_state;

    fn auth() -> Auth {
        Auth(AuthenticatedUser {
            email: "a@x.com".to_string(),
            expires_at: 0,
        })
    }

    fn request(title: &str) -> CreateCommunityPostRequest {
        CreateCommunityPostRequest {
            image: "https://img/p.png".to_string(),
            title: title.to_string(),
            description: "Shelter opening".to_string(),
        }
    }

    #[tokio::test]
    async fn create_post_sets_display_date() {
        let (state, _dir) = test_state();

        let (status, Json(body)) = create_post(State(state.clone()), auth(), ApiJson(request("Shelter")))
            .await
            .expect("post creation succeeds");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.message, "Create community Successfully");

        let Json(fetched) = get_post(State(state), ApiPath(body.result.inserted_id))
            .await
            .unwrap();
        assert_eq!(fetched.data.title, "Shelter");
        assert_eq!(fetched.data.created_at, display_date(Utc::now()));
        assert_eq!(fetched.message, "Successfully retrieved community");
    }

    #[tokio::test]
    async fn list_posts_in_creation_order() {
        let (state, _dir) = test_state();
        for title in ["a", "b", "c"] {
            let (status, _) = create_post(State(state.clone()), auth(), ApiJson(request(title)))
                .await
                .unwrap();
            assert_eq!(status, StatusCode::CREATED);
        }

        let Json(body) = list_posts(State(state), ApiQuery(LimitQuery::default()))
            .await
            .unwrap();
        let titles: Vec<_> = body.data.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn get_post_missing_and_malformed() {
        let (state, _dir) = test_state();

        let err = get_post(State(state.clone()), ApiPath(new_document_id()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "community post are not found");

        let err = get_post(State(state), ApiPath("123".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
