use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    audit,
    auth::{jwt::AuthUser, repo},
    error::{is_unique_violation, ApiError, ApiResult},
    options::{
        dto::{AddOptionRequest, SetActiveRequest},
        is_known_type,
        repo::DropdownOption,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/options/:type", get(list_options))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/options", post(add_option))
        .route("/options/:id/active", put(set_option_active))
}

#[instrument(skip(state))]
pub async fn list_options(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(option_type): Path<String>,
) -> ApiResult<Json<Vec<DropdownOption>>> {
    if !is_known_type(&option_type) {
        return Err(ApiError::Validation(format!(
            "Unknown option type: {option_type}"
        )));
    }
    let options = DropdownOption::list_active_by_type(&state.db, &option_type).await?;
    Ok(Json(options))
}

/// Any authenticated user may add a custom option. Values are stored
/// uppercase; a duplicate active (type, value) pair is a conflict.
#[instrument(skip(state, payload))]
pub async fn add_option(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddOptionRequest>,
) -> ApiResult<(StatusCode, Json<DropdownOption>)> {
    let user = repo::load_user(&state.db, user_id).await?;

    if !is_known_type(&payload.option_type) {
        return Err(ApiError::Validation(format!(
            "Unknown option type: {}",
            payload.option_type
        )));
    }
    let value = payload.value.trim().to_uppercase();
    if value.is_empty() {
        return Err(ApiError::Validation("Option value is required".into()));
    }

    let option = match DropdownOption::insert(
        &state.db,
        &payload.option_type,
        &value,
        payload.display_name.as_deref(),
        true,
        &user.username,
    )
    .await
    {
        Ok(o) => o,
        Err(ApiError::Store(e)) if is_unique_violation(&e) => {
            warn!(option_type = %payload.option_type, %value, "duplicate option value");
            return Err(ApiError::Conflict("Option value already exists".into()));
        }
        Err(e) => return Err(e),
    };

    audit::record(
        &state.db,
        user.id,
        &user.username,
        audit::actions::CREATE,
        audit::entities::DROPDOWN_OPTION,
        &option.id.to_string(),
        &format!("{}={}", option.option_type, option.value),
    )
    .await;

    info!(option_id = %option.id, option_type = %option.option_type, value = %option.value, "custom option added");
    Ok((StatusCode::CREATED, Json(option)))
}

/// Admin-only toggle of an option's active flag.
#[instrument(skip(state, payload))]
pub async fn set_option_active(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActiveRequest>,
) -> ApiResult<Json<DropdownOption>> {
    let admin = repo::require_admin(&state.db, user_id).await?;

    let option = DropdownOption::set_active(&state.db, id, payload.active)
        .await?
        .ok_or_else(|| ApiError::NotFound("Option not found".into()))?;

    audit::record(
        &state.db,
        admin.id,
        &admin.username,
        audit::actions::UPDATE,
        audit::entities::DROPDOWN_OPTION,
        &option.id.to_string(),
        if option.is_active {
            "activated"
        } else {
            "deactivated"
        },
    )
    .await;

    Ok(Json(option))
}
