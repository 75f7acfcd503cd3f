// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::{
    auth::Auth,
    error::{ApiError, ApiJson, ApiQuery},
    models::{
        new_document_id, CreateVolunteerRequest, DataResponse, InsertResult, LimitQuery,
        ResultResponse, Volunteer,
    },
    state::AppState,
    storage::VolunteerRepository,
};

#[utoipa::path(
    post,
    path = "/api/v1/volunteer",
    request_body = CreateVolunteerRequest,
    tag = "Volunteers",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "`{success, message, result}` with the inserted id", body = InsertResult),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_volunteer(
    State(state): State<AppState>,
    Auth(user): Auth,
    ApiJson(request): ApiJson<CreateVolunteerRequest>,
) -> Result<(StatusCode, Json<ResultResponse<InsertResult>>), ApiError> {
    let volunteer = request.into_volunteer(new_document_id());
    let volunteer_id = volunteer.id.clone();

    state
        .db
        .call(move |db| VolunteerRepository::new(db).create(&volunteer))
        .await?;

    info!(volunteer_id = %volunteer_id, email = %user.email, "Volunteer signed up");
    Ok((
        StatusCode::CREATED,
        Json(ResultResponse::ok(
            "Create volunteer Successfully",
            InsertResult::new(volunteer_id),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/volunteer",
    params(LimitQuery),
    tag = "Volunteers",
    responses(
        (status = 200, description = "`{success, message, data}` with volunteers in creation order", body = [Volunteer]),
        (status = 400, description = "Invalid limit")
    )
)]
pub async fn list_volunteers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<Json<DataResponse<Vec<Volunteer>>>, ApiError> {
    let limit = query.cap();
    let volunteers = state
        .db
        .call(move |db| VolunteerRepository::new(db).list(limit))
        .await?;

    Ok(Json(DataResponse::ok(
        "Successfully retrieve volunteer!",
        volunteers,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use crate::state::test_state;

    fn request(name: &str) -> CreateVolunteerRequest {
        CreateVolunteerRequest {
            image: "https://img/v.png".to_string(),
            name: name.to_string(),
            email: "v@x.com".to_string(),
            mobile: "555-0100".to_string(),
            location: "Sylhet".to_string(),
            passion: "Cooking".to_string(),
        }
    }

    fn auth() -> Auth {
        Auth(AuthenticatedUser {
            email: "a@x.com".to_string(),
            expires_at: 0,
        })
    }

    #[tokio::test]
    async fn create_then_list_volunteers() {
        let (state, _dir) = test_state();

        for name in ["Sam", "Rae"] {
            let (status, Json(body)) = create_volunteer(State(state.clone()), auth(), ApiJson(request(name)))
                .await
                .expect("volunteer creation succeeds");
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body.message, "Create volunteer Successfully");
        }

        let Json(body) = list_volunteers(State(state.clone()), ApiQuery(LimitQuery::default()))
            .await
            .unwrap();
        let names: Vec<_> = body.data.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["Sam", "Rae"]);
        assert_eq!(body.message, "Successfully retrieve volunteer!");

        let Json(body) = list_volunteers(State(state), ApiQuery(LimitQuery { limit: Some(1) }))
            .await
            .unwrap();
        assert_eq!(body.data.len(), 1);
    }
}
