// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login.

use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, warn};

use crate::{
    auth::{hash_password, verify_password, AuthError},
    error::{ApiError, ApiJson},
    models::{new_document_id, LoginRequest, MessageResponse, RegisterRequest, TokenResponse, User},
    state::AppState,
    storage::{StorageError, UserRepository},
};

const USER_EXISTS: &str = "User already exists";

/// Register a new account.
///
/// The password is stored as a bcrypt hash. Emails are unique.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "User already exists or body is invalid")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let RegisterRequest {
        name,
        email,
        password,
    } = request;

    // Early exit before hashing; the insert re-checks atomically
    let lookup = email.clone();
    let existing = state
        .db
        .call(move |db| UserRepository::new(db).find_by_email(&lookup))
        .await?;
    if existing.is_some() {
        return Err(ApiError::conflict(USER_EXISTS));
    }

    let hashed = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(ApiError::internal)??;

    let user = User {
        id: new_document_id(),
        name,
        email: email.clone(),
        password: hashed,
    };
    state
        .db
        .call(move |db| UserRepository::new(db).create(&user))
        .await
        .map_err(|e| match e {
            StorageError::AlreadyExists(_) => ApiError::conflict(USER_EXISTS),
            other => other.into(),
        })?;

    info!(email = %email, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok("User registered successfully")),
    ))
}

/// Exchange email and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let LoginRequest { email, password } = request;

    let lookup = email.clone();
    let Some(user) = state
        .db
        .call(move |db| UserRepository::new(db).find_by_email(&lookup))
        .await?
    else {
        warn!(email = %email, "Login for unknown email");
        return Err(AuthError::InvalidCredentials.into());
    };

    let hash = user.password;
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(ApiError::internal)??;
    if !valid {
        warn!(email = %email, "Login with wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.issue(&user.email)?;
    info!(email = %user.email, "User logged in");

    Ok(Json(TokenResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    fn register_request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: "A".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_stores_hashed_password() {
        let (state, _dir) = test_state();

        let (status, Json(body)) =
            register(State(state.clone()), ApiJson(register_request("a@x.com", "p")))
                .await
                .expect("registration succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert!(body.success);
        assert_eq!(body.message, "User registered successfully");

        let stored = UserRepository::new(&state.db)
            .find_by_email("a@x.com")
            .unwrap()
            .unwrap();
        assert_ne!(stored.password, "p");
        assert!(verify_password("p", &stored.password).unwrap());
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let (state, _dir) = test_state();
        let (status, _) = register(State(state.clone()), ApiJson(register_request("a@x.com", "p")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let err = register(State(state.clone()), ApiJson(register_request("a@x.com", "q")))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "User already exists");

        assert_eq!(UserRepository::new(&state.db).list_all().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn login_issues_token_for_email() {
        let (state, _dir) = test_state();
        let (status, _) = register(State(state.clone()), ApiJson(register_request("a@x.com", "p")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(body) = login(State(state.clone()), ApiJson(login_request("a@x.com", "p")))
            .await
            .expect("login succeeds");

        assert_eq!(body.message, "Login successful");
        let claims = state.tokens.decode(&body.token).unwrap();
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn login_failures_share_one_message() {
        let (state, _dir) = test_state();
        let (status, _) = register(State(state.clone()), ApiJson(register_request("a@x.com", "p")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let wrong_password = login(State(state.clone()), ApiJson(login_request("a@x.com", "x")))
            .await
            .unwrap_err();
        let unknown_email = login(State(state), ApiJson(login_request("b@x.com", "p")))
            .await
            .unwrap_err();

        for err in [wrong_password, unknown_email] {
            assert_eq!(err.status, StatusCode::UNAUTHORIZED);
            assert_eq!(err.message, "Invalid email or password");
        }
    }
}
