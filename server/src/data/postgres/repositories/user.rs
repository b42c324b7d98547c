//! User repository

use super::{decode_first, decode_returning, run};
use crate::data::error::DataError;
use crate::data::executor::{QueryExecutor, SqlValue};
use crate::data::types::{NewUser, UserRow};

/// Get a single user by email
pub async fn get_user_with_email(
    executor: &dyn QueryExecutor,
    email: &str,
) -> Result<Option<UserRow>, DataError> {
    let rows = run(
        executor,
        "get_user_with_email",
        "SELECT * FROM users WHERE email = $1",
        &[SqlValue::from(email)],
    )
    .await?;
    decode_first(rows)
}

/// Get a single user by id
pub async fn get_user_with_id(
    executor: &dyn QueryExecutor,
    id: i64,
) -> Result<Option<UserRow>, DataError> {
    let rows = run(
        executor,
        "get_user_with_id",
        "SELECT * FROM users WHERE id = $1",
        &[SqlValue::Int(id)],
    )
    .await?;
    decode_first(rows)
}

/// Insert a user and return the stored row
pub async fn add_user(executor: &dyn QueryExecutor, user: &NewUser) -> Result<UserRow, DataError> {
    let rows = run(
        executor,
        "add_user",
        "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING *",
        &[
            SqlValue::from(user.name.as_str()),
            SqlValue::from(user.email.as_str()),
            SqlValue::from(user.password.as_str()),
        ],
    )
    .await?;
    let created: UserRow = decode_returning("add_user", rows)?;
    tracing::debug!(id = created.id, "User created");
    Ok(created)
}
