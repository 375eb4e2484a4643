use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::db;
use crate::error::AppError;
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::state::AppState;

pub async fn list_users(state: State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = db::users::list_users(&state.db).await?;
    Ok(Json(users))
}

pub async fn get_user(
    state: State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = db::users::get_user(&state.db, &user_id).await?;
    Ok(Json(user))
}

pub async fn create_user(
    state: State<AppState>,
    Json(input): Json<CreateUser>,
) -> Result<Json<User>, AppError> {
    let user = db::users::create_user(&state.db, &input).await?;
    tracing::debug!(user_id = %user.id, "user created");
    Ok(Json(user))
}

pub async fn update_user(
    state: State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<User>, AppError> {
    let user = db::users::update_user(&state.db, &user_id, &input).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    state: State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if db::users::delete_user(&state.db, &user_id).await? {
        tracing::debug!(user_id = %user_id, "user deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}
