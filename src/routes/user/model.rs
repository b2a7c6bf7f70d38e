use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::forms::RegisterForm;
use crate::utils::{hash_password, verify_password};

#[derive(Debug, Serialize, FromRow)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    /// Register a user: hash the password, then persist the profile.
    /// Uniqueness is pre-checked by the handler; the database constraints
    /// remain the backstop (see `unique_violation_field`).
    pub async fn create(
        pool: &PgPool,
        form: &RegisterForm,
        bcrypt_cost: u32,
    ) -> Result<Self, sqlx::Error> {
        let password_hash = hash_password(&form.password, bcrypt_cost)
            .map_err(|e| sqlx::Error::Protocol(format!("Failed to hash password: {}", e)))?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, email, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING username, password_hash, email, first_name, last_name
            "#,
        )
        .bind(&form.username)
        .bind(&password_hash)
        .bind(&form.email)
        .bind(&form.first_name)
        .bind(&form.last_name)
        .fetch_one(pool)
        .await?;

        tracing::info!("Registered user: {}", user.username);
        Ok(user)
    }

    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT username, password_hash, email, first_name, last_name
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    /// Look up a user and verify the password against the stored bcrypt
    /// hash. Returns `None` for a missing user and for a wrong password
    /// alike; callers must not tell the two apart.
    pub async fn authenticate(
        pool: &PgPool,
        username: &str,
        password: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let Some(user) = Self::find_by_username(pool, username).await? else {
            return Ok(None);
        };

        let matches = verify_password(password, &user.password_hash)
            .map_err(|e| sqlx::Error::Protocol(format!("Failed to verify password: {}", e)))?;

        Ok(if matches { Some(user) } else { None })
    }

    pub async fn username_taken(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await
    }

    pub async fn email_taken(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Delete a user and all of their feedback in one transaction, so a
    /// failed commit leaves neither half behind.
    pub async fn delete(pool: &PgPool, username: &str) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM feedback WHERE username = $1")
            .bind(username)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        tx.commit().await?;

        tracing::info!("Deleted user and their feedback: {}", username);
        Ok(())
    }
}

/// Maps a unique-constraint violation from the insert to the form field it
/// belongs to, so a race lost after the pre-check still renders as a
/// field error rather than a 500.
pub fn unique_violation_field(e: &sqlx::Error) -> Option<&'static str> {
    match e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            match db.constraint() {
                Some(c) if c.contains("email") => Some("email"),
                _ => Some("username"),
            }
        }
        _ => None,
    }
}
