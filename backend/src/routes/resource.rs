//! Resource routes
//!
//! One set of generic handlers serves every table. Mutations answer 200
//! with an empty body; existing clients re-list afterwards.

use crate::auth::AuthenticatedIdentity;
use crate::error::ApiResult;
use crate::repositories::{Collection, Wash};
use crate::services::ResourceService;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, MethodRouter},
    Json,
};

/// GET/POST/PUT/DELETE on a resource collection
pub fn resource<E: Collection>() -> MethodRouter<AppState> {
    get(list::<E>)
        .post(create::<E>)
        .put(update::<E>)
        .delete(delete::<E>)
}

/// GET - every row visible to the caller, oldest first
async fn list<E: Collection>(
    State(state): State<AppState>,
    identity: Option<AuthenticatedIdentity>,
) -> ApiResult<Json<Vec<E>>> {
    let scope = ResourceService::scope::<E>(identity.as_ref())?;
    let rows = ResourceService::list(E::repository(state.store()), scope).await?;
    Ok(Json(rows))
}

/// POST - insert a row owned by the caller
async fn create<E: Collection>(
    State(state): State<AppState>,
    identity: Option<AuthenticatedIdentity>,
    payload: Result<Json<E>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(row) = payload?;
    let scope = ResourceService::scope::<E>(identity.as_ref())?;
    ResourceService::create(E::repository(state.store()), row, scope).await?;
    Ok(StatusCode::OK)
}

/// PUT - update the row named by the body's `id`
async fn update<E: Collection>(
    State(state): State<AppState>,
    identity: Option<AuthenticatedIdentity>,
    payload: Result<Json<E>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(patch) = payload?;
    let scope = ResourceService::scope::<E>(identity.as_ref())?;
    ResourceService::update(E::repository(state.store()), patch, scope).await?;
    Ok(StatusCode::OK)
}

/// DELETE - remove the row named by the body's `id`
async fn delete<E: Collection>(
    State(state): State<AppState>,
    identity: Option<AuthenticatedIdentity>,
    payload: Result<Json<E>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(target) = payload?;
    let scope = ResourceService::scope::<E>(identity.as_ref())?;
    ResourceService::delete(E::repository(state.store()), target, scope).await?;
    Ok(StatusCode::OK)
}

/// GET /api/wash/:toiletid - the caller's washes of one litter box
pub async fn list_washes_by_toilet(
    State(state): State<AppState>,
    identity: AuthenticatedIdentity,
    toilet_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<Wash>>> {
    let Path(toilet_id) = toilet_id?;
    let scope = ResourceService::scope::<Wash>(Some(&identity))?;
    let washes =
        ResourceService::list_by_toilet(state.store().washes.as_ref(), toilet_id, scope).await?;
    Ok(Json(washes))
}
