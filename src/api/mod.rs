// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    error::ApiError,
    models::{
        Comment, CommunityPost, CreateCommentRequest, CreateCommunityPostRequest,
        CreateSupplyRequest, CreateVolunteerRequest, DeleteResult, InsertResult, LoginRequest,
        MessageResponse, PublicUser, RegisterRequest, Supply, TokenResponse, UpdateSupplyRequest,
        UploadResponse, Volunteer,
    },
    state::AppState,
};

pub mod account;
pub mod comments;
pub mod community;
pub mod health;
pub mod supplies;
pub mod upload;
pub mod users;
pub mod volunteers;

/// Maximum request body accepted by the upload route (10 MiB).
pub const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Build the application router.
///
/// An empty `cors_origins` allows any origin; otherwise only the listed
/// origins are allowed, with credentials.
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let v1_routes = Router::new()
        .route("/register", post(account::register))
        .route("/login", post(account::login))
        .route("/create-supply", post(supplies::create_supply))
        .route("/supplies", get(supplies::list_supplies))
        .route(
            "/supply/{id}",
            get(supplies::get_supply)
                .put(supplies::update_supply)
                .delete(supplies::delete_supply),
        )
        .route(
            "/volunteer",
            get(volunteers::list_volunteers).post(volunteers::create_volunteer),
        )
        .route(
            "/community",
            get(community::list_posts).post(community::create_post),
        )
        .route("/community/{id}", get(community::get_post))
        .route("/user", get(users::list_users))
        .route("/user/{email}", get(users::get_user))
        .route(
            "/comment",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/upload",
            post(upload::upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        );

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::readiness))
        .nest("/api/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Reject ids that are not well-formed document ids.
pub(crate) fn validate_id(raw: &str) -> Result<String, ApiError> {
    Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| ApiError::bad_request("Invalid id"))
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let bearer = HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .build();
            components.add_security_scheme("bearer", SecurityScheme::Http(bearer));
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::root,
        health::readiness,
        account::register,
        account::login,
        supplies::create_supply,
        supplies::list_supplies,
        supplies::get_supply,
        supplies::update_supply,
        supplies::delete_supply,
        volunteers::create_volunteer,
        volunteers::list_volunteers,
        community::create_post,
        community::list_posts,
        community::get_post,
        users::list_users,
        users::get_user,
        comments::create_comment,
        comments::list_comments,
        upload::upload_image
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            MessageResponse,
            PublicUser,
            AuthenticatedUser,
            Supply,
            CreateSupplyRequest,
            UpdateSupplyRequest,
            Volunteer,
            CreateVolunteerRequest,
            CommunityPost,
            CreateCommunityPostRequest,
            Comment,
            CreateCommentRequest,
            InsertResult,
            DeleteResult,
            UploadResponse,
            health::RootResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Auth", description = "Registration and login"),
        (name = "Supplies", description = "Relief supply listings"),
        (name = "Volunteers", description = "Volunteer sign-ups"),
        (name = "Community", description = "Community posts and comments"),
        (name = "Users", description = "Registered users"),
        (name = "Upload", description = "Image upload to the media host")
    )
)]
pub struct ApiDoc;
