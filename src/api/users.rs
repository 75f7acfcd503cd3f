// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.
//!
//! Both routes require a token and never return password hashes.

use axum::{extract::State, Json};

use crate::{
    auth::Auth,
    error::{ApiError, ApiPath},
    models::{DataResponse, PublicUser},
    state::AppState,
    storage::UserRepository,
};

#[utoipa::path(
    get,
    path = "/api/v1/user",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "`{success, message, data}` with every user", body = [PublicUser]),
        (status = 401, description = "Unauthorized - invalid or missing token")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Auth(_user): Auth,
) -> Result<Json<DataResponse<Vec<PublicUser>>>, ApiError> {
    let users = state
        .db
        .call(|db| UserRepository::new(db).list_all())
        .await?;

    Ok(Json(DataResponse::ok(
        "successfully retrieve user!",
        users.into_iter().map(PublicUser::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/user/{email}",
    params(("email" = String, Path, description = "Email of the user")),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "`{success, message, data}` with the user", body = PublicUser),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Auth(_user): Auth,
    ApiPath(email): ApiPath<String>,
) -> Result<Json<DataResponse<PublicUser>>, ApiError> {
    let user = state
        .db
        .call(move |db| UserRepository::new(db).find_by_email(&email))
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(DataResponse::ok(
        "successfully retrieve user!",
        PublicUser::from(user),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use crate::models::{new_document_id, User};
    use crate::state::test_state;
    use axum::http::StatusCode;

    fn auth() -> Auth {
        Auth(AuthenticatedUser {
            email: "a@x.com".to_string(),
            expires_at: 0,
        })
    }

    fn seed(state: &AppState, email: &str) {
        UserRepository::new(&state.db)
            .create(&User {
                id: new_document_id(),
                name: "A".to_string(),
                email: email.to_string(),
                password: "$2b$10$hash".to_string(),
            })
            .unwrap();
    }

    #[tokio::test]
    async fn list_users_redacts_passwords() {
        let (state, _dir) = test_state();
        seed(&state, "a@x.com");
        seed(&state, "b@x.com");

        let Json(body) = list_users(State(state), auth()).await.unwrap();
        assert_eq!(body.data.len(), 2);

        let json = serde_json::to_value(&body.data).unwrap();
        assert!(json[0].get("password").is_none());
        assert!(json[0].get("_id").is_some());
    }

    #[tokio::test]
    async fn get_user_by_email() {
        let (state, _dir) = test_state();
        seed(&state, "a@x.com");

        let Json(body) = get_user(State(state.clone()), auth(), ApiPath("a@x.com".to_string()))
            .await
            .unwrap();
        assert_eq!(body.data.email, "a@x.com");

        let err = get_user(State(state), auth(), ApiPath("nobody@x.com".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
