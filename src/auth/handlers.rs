use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    audit,
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest, RoleRequest},
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo::{self, User, ROLE_ADMIN, ROLE_USER},
        session::AuthState,
    },
    error::{is_unique_violation, ApiError, ApiResult},
    state::AppState,
    validate,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/users/:id/role", post(assign_role))
}

/// Maps the violated unique constraint to the message the pre-checks would
/// have produced, so a lost race reads the same as a plain duplicate.
fn registration_conflict_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_email_key") => "Email already registered",
        _ => "Username already exists",
    }
}

fn issue_tokens(state: &AppState, user: User) -> ApiResult<AuthResponse> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;
    state.auth_events.publish(AuthState::SignedIn {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role.clone(),
    });
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    validate::username(&payload.username)?;
    validate::email(&payload.email)?;
    validate::password(&payload.password)?;

    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already exists");
        return Err(ApiError::Conflict("Username already exists".into()));
    }
    if User::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let role = if state.config.is_bootstrap_admin(&payload.email) {
        ROLE_ADMIN
    } else {
        ROLE_USER
    };

    let hash = hash_password(&payload.password)?;
    let user = match User::create(&state.db, &payload.username, &payload.email, &hash, role).await
    {
        Ok(u) => u,
        // Concurrent registration of the same name/email loses the race here.
        Err(ApiError::Store(e)) if is_unique_violation(&e) => {
            let constraint = e.as_database_error().and_then(|d| d.constraint());
            return Err(ApiError::Conflict(
                registration_conflict_message(constraint).into(),
            ));
        }
        Err(e) => return Err(e),
    };

    audit::record(
        &state.db,
        user.id,
        &user.username,
        audit::actions::REGISTER,
        audit::entities::USER,
        &user.id.to_string(),
        if user.is_admin() {
            "registered as bootstrap admin"
        } else {
            "registered"
        },
    )
    .await;

    info!(user_id = %user.id, username = %user.username, role = %user.role, "user registered");
    let response = issue_tokens(&state, user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let identifier = payload.identifier.trim();

    let user = if identifier.contains('@') {
        User::find_by_email(&state.db, identifier).await?
    } else {
        User::find_by_username(&state.db, identifier).await?
    };
    let mut user = match user {
        Some(u) => u,
        None => {
            warn!(%identifier, "login with unknown identifier");
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }
    if !user.is_active {
        return Err(ApiError::Unauthorized("Account is disabled".into()));
    }

    // Bootstrap promotion: explicit, audited, never a silent flag flip.
    if !user.is_admin() && state.config.is_bootstrap_admin(&user.email) {
        User::set_role(&state.db, user.id, ROLE_ADMIN).await?;
        audit::record(
            &state.db,
            user.id,
            &user.username,
            audit::actions::ROLE_CHANGE,
            audit::entities::USER,
            &user.id.to_string(),
            "promoted to admin at login (bootstrap admin email)",
        )
        .await;
        info!(user_id = %user.id, "bootstrap admin promoted at login");
        user.role = ROLE_ADMIN.to_string();
    }

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(issue_tokens(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let user = repo::load_user(&state.db, claims.sub).await?;
    Ok(Json(issue_tokens(&state, user)?))
}

#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<StatusCode> {
    state.auth_events.publish(AuthState::SignedOut);
    info!(%user_id, "user logged out");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<PublicUser>> {
    let user = repo::load_user(&state.db, user_id).await?;
    Ok(Json(user.into()))
}

/// Explicit admin-assignment operation. Upgrades only; every change lands in
/// the audit log.
#[instrument(skip(state, payload))]
pub async fn assign_role(
    State(state): State<AppState>,
    AuthUser(caller_id): AuthUser,
    Path(target_id): Path<Uuid>,
    Json(payload): Json<RoleRequest>,
) -> ApiResult<Json<PublicUser>> {
    let caller = repo::require_admin(&state.db, caller_id).await?;

    if payload.role != ROLE_USER && payload.role != ROLE_ADMIN {
        return Err(ApiError::Validation(format!(
            "Unknown role: {}",
            payload.role
        )));
    }

    let mut target = User::find_by_id(&state.db, target_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    if target.is_admin() && payload.role == ROLE_USER {
        return Err(ApiError::Validation(
            "Role downgrades are not supported".into(),
        ));
    }

    if target.role != payload.role {
        User::set_role(&state.db, target.id, &payload.role).await?;
        audit::record(
            &state.db,
            caller.id,
            &caller.username,
            audit::actions::ROLE_CHANGE,
            audit::entities::USER,
            &target.id.to_string(),
            &format!("role set to {}", payload.role),
        )
        .await;
        info!(target = %target.id, role = %payload.role, by = %caller.id, "role assigned");
        target.role = payload.role;
    }

    Ok(Json(target.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_constraint_reports_email_conflict() {
        assert_eq!(
            registration_conflict_message(Some("users_email_key")),
            "Email already registered"
        );
    }

    #[test]
    fn other_constraints_report_username_conflict() {
        assert_eq!(
            registration_conflict_message(Some("users_username_key")),
            "Username already exists"
        );
        assert_eq!(
            registration_conflict_message(None),
            "Username already exists"
        );
    }
}
