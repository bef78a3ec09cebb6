use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, MaybeAuthUser};
use crate::extractors::input::{AppJson, AppQuery};
use crate::models::resource::*;
use crate::models::shared::Pagination;
use crate::state::AppState;
use crate::workflow::{ListParams, SortKey};

#[utoipa::path(
    get,
    path = "/api/v1/resources",
    tag = "Resources",
    operation_id = "listResources",
    summary = "List all resources (admin)",
    description = "Returns every row not hidden by an admin, including pending and rejected resources and supplement audit records, newest first.",
    params(PageQuery),
    responses(
        (status = 200, description = "List of resources", body = ResourceListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_resources(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> Result<Json<ResourceListResponse>, AppError> {
    auth_user.require_admin()?;

    let params = ListParams {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
        ..Default::default()
    };
    let page = state.resources().list_admin(&params).await?;

    Ok(Json(ResourceListResponse {
        data: page.items.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(params.page, params.per_page, page.total),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/resources/public",
    tag = "Resources",
    operation_id = "listPublicResources",
    summary = "List approved resources",
    description = "Returns approved resources with optional case-insensitive search on both titles. Sort by `created_at` (default) or `like_count`, descending unless `sort_order=asc`.",
    params(PublicListQuery),
    responses(
        (status = 200, description = "List of approved resources", body = ResourceListResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_public_resources(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PublicListQuery>,
) -> Result<Json<ResourceListResponse>, AppError> {
    let sort = match query.sort_by.as_deref().unwrap_or("created_at") {
        "created_at" => SortKey::CreatedAt,
        "like_count" => SortKey::LikeCount,
        _ => {
            return Err(AppError::Validation(
                "sort_by must be one of: created_at, like_count".into(),
            ));
        }
    };
    let params = ListParams {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
        search: query.search,
        sort,
        descending: query.sort_order.as_deref() != Some("asc"),
    };

    let page = state.resources().list_public(&params).await?;

    Ok(Json(ResourceListResponse {
        data: page.items.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(params.page, params.per_page, page.total),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/resources/pending",
    tag = "Moderation",
    operation_id = "listPendingResources",
    summary = "List everything awaiting a decision",
    description = "Returns pending submissions together with approved resources that carry a pending supplement.",
    responses(
        (status = 200, description = "Pending resources", body = Vec<ResourceResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_pending(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ResourceResponse>>, AppError> {
    auth_user.require_admin()?;
    let rows = state.resources().list_pending().await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/resources/pending-supplements",
    tag = "Moderation",
    operation_id = "listPendingSupplements",
    summary = "List resources with a pending supplement",
    responses(
        (status = 200, description = "Resources with a pending supplement", body = Vec<ResourceResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_pending_supplements(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ResourceResponse>>, AppError> {
    auth_user.require_admin()?;
    let rows = state.resources().list_pending_supplements().await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/resources",
    tag = "Resources",
    operation_id = "createResource",
    summary = "Submit a resource",
    description = "Creates a pending resource. No authentication required. Unknown link categories and malformed link entries are dropped and reported in `warnings`.",
    request_body = CreateResourceRequest,
    responses(
        (status = 201, description = "Resource submitted", body = ResourceResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title))]
pub async fn create_resource(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateResourceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let written = state.resources().submit(payload.into()).await?;
    let body = ResourceResponse::from(written.resource).with_warnings(&written.warnings);
    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    get,
    path = "/api/v1/resources/{id}",
    tag = "Resources",
    operation_id = "getResource",
    summary = "Get a resource by ID",
    description = "Public view: an audit record redirects to the resource it belongs to, and only approved resources are visible. With `admin_view=true` (admin token required) the row is returned as stored.",
    params(("id" = i32, Path, description = "Resource ID"), DetailQuery),
    responses(
        (status = 200, description = "Resource details", body = ResourceResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Resource not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user, query), fields(id))]
pub async fn get_resource(
    MaybeAuthUser(auth_user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppQuery(query): AppQuery<DetailQuery>,
) -> Result<Json<ResourceResponse>, AppError> {
    if query.admin_view {
        auth_user.ok_or(AppError::TokenMissing)?.require_admin()?;
    }
    let model = state.resources().get(id, query.admin_view).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/resources/{id}",
    tag = "Resources",
    operation_id = "updateResource",
    summary = "Edit a resource",
    description = "Partially updates content fields. Links are normalized like a submission. Status and supplement are not editable here.",
    params(("id" = i32, Path, description = "Resource ID")),
    request_body = UpdateResourceRequest,
    responses(
        (status = 200, description = "Resource updated", body = ResourceResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Resource not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_resource(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateResourceRequest>,
) -> Result<Json<ResourceResponse>, AppError> {
    auth_user.require_admin()?;
    let written = state.resources().update(id, payload.into()).await?;
    Ok(Json(
        ResourceResponse::from(written.resource).with_warnings(&written.warnings),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/resources/{id}",
    tag = "Resources",
    operation_id = "deleteResource",
    summary = "Delete a resource",
    description = "Permanently removes the row. Canonical files are left on disk.",
    params(("id" = i32, Path, description = "Resource ID")),
    responses(
        (status = 204, description = "Resource deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Resource not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_resource(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    auth_user.require_admin()?;
    state.resources().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/v1/resources/{id}/record",
    tag = "Moderation",
    operation_id = "hideResourceRecord",
    summary = "Hide a row from the admin list",
    description = "Soft delete: the row stays in the database and public views are unaffected.",
    params(("id" = i32, Path, description = "Resource ID")),
    responses(
        (status = 204, description = "Row hidden"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Resource not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn hide_resource(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    auth_user.require_admin()?;
    state.resources().hide(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/v1/resources/{id}/decision",
    tag = "Moderation",
    operation_id = "decideResource",
    summary = "Approve or reject",
    description = "Applies to the pending supplement if there is one, otherwise to the pending resource itself. Approved images are moved into the resource's canonical directory. Supplement decisions create an audit record.",
    params(("id" = i32, Path, description = "Resource ID")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Decision applied", body = DecisionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Resource not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Nothing to decide (INVALID_STATE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, status = %payload.status))]
pub async fn decide_resource(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<DecisionRequest>,
) -> Result<Json<DecisionResponse>, AppError> {
    auth_user.require_admin()?;
    let outcome = state
        .resources()
        .decide(id, payload.into_decision(auth_user.user_id))
        .await?;
    Ok(Json(outcome.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/resources/{id}/supplement",
    tag = "Moderation",
    operation_id = "submitSupplement",
    summary = "Propose extra images or links",
    description = "Attaches a pending supplement to an approved resource. No authentication required.",
    params(("id" = i32, Path, description = "Resource ID")),
    request_body = SupplementRequest,
    responses(
        (status = 200, description = "Supplement recorded", body = ResourceResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Resource not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Resource does not accept supplements (INVALID_STATE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn submit_supplement(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<SupplementRequest>,
) -> Result<Json<ResourceResponse>, AppError> {
    let written = state
        .resources()
        .submit_supplement(id, payload.images, payload.links)
        .await?;
    Ok(Json(
        ResourceResponse::from(written.resource).with_warnings(&written.warnings),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/resources/{id}/supplement",
    tag = "Moderation",
    operation_id = "getSupplement",
    summary = "Get the stored supplement",
    params(("id" = i32, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "Supplement, or null", body = SupplementDetailResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Resource not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_supplement(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SupplementDetailResponse>, AppError> {
    auth_user.require_admin()?;
    let supplement = state.resources().supplement_of(id).await?;
    Ok(Json(SupplementDetailResponse {
        resource_id: id,
        supplement: supplement.map(Into::into),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/resources/{id}/history",
    tag = "Moderation",
    operation_id = "getResourceHistory",
    summary = "Audit records and decision log of a resource",
    params(("id" = i32, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "History", body = HistoryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Resource not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_history(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<HistoryResponse>, AppError> {
    auth_user.require_admin()?;
    let history = state.resources().history(id).await?;
    Ok(Json(HistoryResponse {
        resource_id: id,
        audit_records: history.audit_records.into_iter().map(Into::into).collect(),
        decisions: history.decisions.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/resources/{id}/like",
    tag = "Resources",
    operation_id = "likeResource",
    summary = "Like a resource",
    params(("id" = i32, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "New like count", body = LikeResponse),
        (status = 404, description = "Resource not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn like_resource(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<LikeResponse>, AppError> {
    let like_count = state.resources().like(id).await?;
    Ok(Json(LikeResponse {
        success: true,
        like_count,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/resources/{id}/unlike",
    tag = "Resources",
    operation_id = "unlikeResource",
    summary = "Withdraw a like",
    description = "Decrements the like count. The count never goes below zero.",
    params(("id" = i32, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "New like count", body = LikeResponse),
        (status = 404, description = "Resource not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn unlike_resource(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<LikeResponse>, AppError> {
    let like_count = state.resources().unlike(id).await?;
    Ok(Json(LikeResponse {
        success: true,
        like_count,
    }))
}
