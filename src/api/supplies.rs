// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use super::validate_id;
use crate::{
    auth::Auth,
    error::{ApiError, ApiJson, ApiPath, ApiQuery, NotFoundExt},
    models::{
        new_document_id, CreateSupplyRequest, DataResponse, DeleteResult, InsertResult,
        LimitQuery, MessageResponse, ResultResponse, Supply, UpdateSupplyRequest,
    },
    state::AppState,
    storage::SupplyRepository,
};

const SUPPLY_NOT_FOUND: &str = "Supply not found";

#[utoipa::path(
    post,
    path = "/api/v1/create-supply",
    request_body = CreateSupplyRequest,
    tag = "Supplies",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "`{success, message, result}` with the inserted id", body = InsertResult),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_supply(
    State(state): State<AppState>,
    Auth(user): Auth,
    ApiJson(request): ApiJson<CreateSupplyRequest>,
) -> Result<(StatusCode, Json<ResultResponse<InsertResult>>), ApiError> {
    let supply = request.into_supply(new_document_id());
    let supply_id = supply.id.clone();

    state
        .db
        .call(move |db| SupplyRepository::new(db).create(&supply))
        .await?;

    info!(supply_id = %supply_id, email = %user.email, "Supply created");
    Ok((
        StatusCode::CREATED,
        Json(ResultResponse::ok(
            "Successfully supply create",
            InsertResult::new(supply_id),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/supplies",
    params(LimitQuery),
    tag = "Supplies",
    responses(
        (status = 200, description = "`{success, message, data}` with supplies in creation order", body = [Supply]),
        (status = 400, description = "Invalid limit")
    )
)]
pub async fn list_supplies(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<Json<DataResponse<Vec<Supply>>>, ApiError> {
    let limit = query.cap();
    let supplies = state
        .db
        .call(move |db| SupplyRepository::new(db).list(limit))
        .await?;

    Ok(Json(DataResponse::ok(
        "Successfully retrieve supplies!",
        supplies,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/supply/{id}",
    params(("id" = String, Path, description = "Supply identifier")),
    tag = "Supplies",
    responses(
        (status = 200, description = "`{success, message, data}` with the supply", body = Supply),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Supply not found")
    )
)]
pub async fn get_supply(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<DataResponse<Supply>>, ApiError> {
    let supply_id = validate_id(&id)?;
    let supply = state
        .db
        .call(move |db| SupplyRepository::new(db).get(&supply_id))
        .await
        .or_not_found(SUPPLY_NOT_FOUND)?;

    Ok(Json(DataResponse::ok("Successfully retrieved supply", supply)))
}

/// Update the supplied fields of a supply; omitted fields keep their values.
#[utoipa::path(
    put,
    path = "/api/v1/supply/{id}",
    params(("id" = String, Path, description = "Supply identifier")),
    request_body = UpdateSupplyRequest,
    tag = "Supplies",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Supply updated", body = MessageResponse),
        (status = 400, description = "Malformed id or body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Supply not found")
    )
)]
pub async fn update_supply(
    State(state): State<AppState>,
    Auth(user): Auth,
    ApiPath(id): ApiPath<String>,
    ApiJson(changes): ApiJson<UpdateSupplyRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let supply_id = validate_id(&id)?;
    let target = supply_id.clone();
    state
        .db
        .call(move |db| SupplyRepository::new(db).update(&target, changes))
        .await
        .or_not_found(SUPPLY_NOT_FOUND)?;

    info!(supply_id = %supply_id, email = %user.email, "Supply updated");
    Ok(Json(MessageResponse::ok("Successfully updated supply")))
}

#[utoipa::path(
    delete,
    path = "/api/v1/supply/{id}",
    params(("id" = String, Path, description = "Supply identifier")),
    tag = "Supplies",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "`{success, message, data}` with the delete result", body = DeleteResult),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Supply not found")
    )
)]
pub async fn delete_supply(
    State(state): State<AppState>,
    Auth(user): Auth,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<DataResponse<DeleteResult>>, ApiError> {
    let supply_id = validate_id(&id)?;
    let target = supply_id.clone();
    let deleted_count = state
        .db
        .call(move |db| SupplyRepository::new(db).delete(&target))
        .await?;

    if deleted_count == 0 {
        return Err(ApiError::not_found(SUPPLY_NOT_FOUND));
    }

    info!(supply_id = %supply_id, email = %user.email, "Supply deleted");
    Ok(Json(DataResponse::ok(
        "Successfully deleted supply!",
        DeleteResult {
            acknowledged: true,
            deleted_count,
        },
    )))
}
