use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    audit,
    auth::{jwt::AuthUser, repo},
    entries::{
        dto::{EntryRequest, SearchParams},
        repo::{self as entry_repo, Entry},
        search::filter_entries,
        services,
    },
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries))
        .route("/entries/mine", get(list_my_entries))
        .route("/entries/:id", get(get_entry))
        .route("/stats", get(get_stats))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/entries", post(create_entry))
        .route("/entries/:id", put(update_entry))
        .route("/entries/:id", delete(delete_entry))
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Entry>>> {
    let entries = Entry::list_active(&state.db).await?;
    Ok(Json(filter_entries(entries, &params.search)))
}

#[instrument(skip(state))]
pub async fn list_my_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<Entry>>> {
    let user = repo::load_user(&state.db, user_id).await?;
    let entries = Entry::list_by_creator(&state.db, &user.username).await?;
    Ok(Json(entries))
}

#[instrument(skip(state))]
pub async fn get_entry(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Entry>> {
    let entry = Entry::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Entry not found".into()))?;
    Ok(Json(entry))
}

#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<EntryRequest>,
) -> ApiResult<(StatusCode, Json<Entry>)> {
    let user = repo::load_user(&state.db, user_id).await?;
    let entry = services::create_entry(&state, &user, &payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Admin-only. The stored reference code is never recomputed, even though
/// the fields it was derived from may change here.
#[instrument(skip(state, payload))]
pub async fn update_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EntryRequest>,
) -> ApiResult<Json<Entry>> {
    let admin = repo::require_admin(&state.db, user_id).await?;
    services::validate_request(&payload)?;

    let entry = Entry::update_fields(
        &state.db,
        id,
        &payload.particulars,
        &payload.client_code,
        payload.capacity_mw,
        &payload.state_code,
        &payload.site_code,
        &admin.username,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Entry not found".into()))?;

    audit::record(
        &state.db,
        admin.id,
        &admin.username,
        audit::actions::UPDATE,
        audit::entities::ENTRY,
        &entry.id.to_string(),
        &entry.reference_code,
    )
    .await;

    info!(entry_id = %entry.id, by = %admin.username, "entry updated");
    Ok(Json(entry))
}

/// Admin-only soft delete. Repeating the call on an inactive entry is a
/// no-op with the same observable outcome.
#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let admin = repo::require_admin(&state.db, user_id).await?;

    let existed = Entry::soft_delete(&state.db, id).await?;
    if !existed {
        return Err(ApiError::NotFound("Entry not found".into()));
    }

    audit::record(
        &state.db,
        admin.id,
        &admin.username,
        audit::actions::DELETE,
        audit::entities::ENTRY,
        &id.to_string(),
        "soft deleted",
    )
    .await;

    info!(entry_id = %id, by = %admin.username, "entry soft deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_stats(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> ApiResult<Json<entry_repo::EntryStats>> {
    let stats = entry_repo::stats(&state.db).await?;
    Ok(Json(stats))
}
