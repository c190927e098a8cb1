//! User management API endpoints

use api_types::user::{PasswordChange, Role as ApiRole, UserNew};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Actor, Role, User};

use crate::{ServerError, server::ServerState};

fn map_role(role: ApiRole) -> Role {
    match role {
        ApiRole::Admin => Role::Admin,
        ApiRole::Staff => Role::Staff,
    }
}

pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<User>), ServerError> {
    let cmd = engine::NewUser {
        username: payload.username,
        password: payload.password,
        role: map_role(payload.role),
    };
    let user = state.engine.create_user(&actor, cmd).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<User>>, ServerError> {
    Ok(Json(state.engine.list_users(&actor).await?))
}

pub async fn delete(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_user(&actor, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_password(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(username): Path<String>,
    Json(payload): Json<PasswordChange>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .change_password(
            &actor,
            &username,
            payload.current_password.as_deref(),
            &payload.new_password,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
