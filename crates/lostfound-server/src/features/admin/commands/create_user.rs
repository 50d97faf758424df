//! Create user command
//!
//! Administrators create accounts for staff and members. The request is
//! validated before the session is checked, so an anonymous caller with a
//! malformed payload sees the validation failure first.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::{AuthenticatedUser, PasswordHashError, PasswordHasher};
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{
    validate_email, validate_name, validate_password, validate_role, UserValidationError,
};
use crate::models::{Role, User};

/// Command to create a new user
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CreateUserCommand {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

impl std::fmt::Debug for CreateUserCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserCommand")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error("{0}")]
    Validation(#[from] UserValidationError),

    #[error("Unauthorized. You must be logged in to create a user.")]
    Unauthorized,

    #[error("{0}")]
    Hashing(#[from] PasswordHashError),

    #[error("Password hashing task failed: {0}")]
    HashingTask(#[from] tokio::task::JoinError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateUserCommand {
    /// Validate fields in order: name, email, password, role. The first failure wins.
    pub fn validate(&self) -> Result<Role, CreateUserError> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        let role = validate_role(&self.role)?;
        Ok(role)
    }
}

#[tracing::instrument(
    skip(pool, hasher, actor, command),
    fields(email = %command.email, role = %command.role, actor = ?actor.map(|a| a.id))
)]
pub async fn handle(
    pool: PgPool,
    hasher: Arc<dyn PasswordHasher>,
    actor: Option<AuthenticatedUser>,
    command: CreateUserCommand,
) -> Result<CreateUserResponse, CreateUserError> {
    let role = command.validate()?;

    let taken: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
        .bind(&command.email)
        .fetch_one(&pool)
        .await?;
    if taken {
        return Err(UserValidationError::EmailTaken.into());
    }

    if actor.is_none() {
        return Err(CreateUserError::Unauthorized);
    }

    let CreateUserCommand {
        name,
        email,
        password,
        ..
    } = command;

    // bcrypt blocks for the whole work factor
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, password, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, role, last_login_at, created_at, updated_at
        "#,
    )
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .bind(role.as_str())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            CreateUserError::Validation(UserValidationError::EmailTaken),
            CreateUserError::Database,
        )
    })?;

    tracing::info!(user_id = user.id, "User created");

    Ok(CreateUserResponse {
        message: "User created successfully".to_string(),
        user,
    })
}
