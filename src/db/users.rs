use sqlx::{Row, SqlitePool};

use crate::error::AppError;
use crate::models::user::{CreateUser, UpdateUser, User};

fn row_to_user(row: sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
    }
}

fn required_email(email: Option<&str>) -> Result<&str, AppError> {
    match email.map(str::trim) {
        Some(email) if !email.is_empty() => Ok(email),
        _ => Err(AppError::BadRequest("email is required".to_string())),
    }
}

pub async fn get_user(pool: &SqlitePool, user_id: &str) -> Result<User, AppError> {
    let row = sqlx::query("SELECT id, email FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("unknown_user".to_string()))?;

    Ok(row_to_user(row))
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, AppError> {
    let rows = sqlx::query("SELECT id, email FROM users ORDER BY rowid")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(row_to_user).collect())
}

pub async fn create_user(pool: &SqlitePool, input: &CreateUser) -> Result<User, AppError> {
    let email = required_email(input.email.as_deref())?;
    let id = uuid::Uuid::new_v4().simple().to_string();

    sqlx::query("INSERT INTO users (id, email) VALUES (?, ?)")
        .bind(&id)
        .bind(email)
        .execute(pool)
        .await?;

    get_user(pool, &id).await
}

/// Without an email in `input` the record is returned unchanged.
pub async fn update_user(
    pool: &SqlitePool,
    user_id: &str,
    input: &UpdateUser,
) -> Result<User, AppError> {
    if input.email.is_none() {
        return get_user(pool, user_id).await;
    }
    let email = required_email(input.email.as_deref())?;

    let result = sqlx::query("UPDATE users SET email = ? WHERE id = ?")
        .bind(email)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("unknown_user".to_string()));
    }

    get_user(pool, user_id).await
}

/// Returns whether a record was removed.
pub async fn delete_user(pool: &SqlitePool, user_id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
