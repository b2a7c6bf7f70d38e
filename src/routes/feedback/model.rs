use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Serialize, FromRow)]
pub struct Feedback {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub username: String,
}

impl Feedback {
    pub async fn create(
        pool: &PgPool,
        username: &str,
        title: &str,
        content: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (title, content, username)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, username
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(username)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            r#"
            SELECT id, title, content, username
            FROM feedback
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn for_user(pool: &PgPool, username: &str) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            r#"
            SELECT id, title, content, username
            FROM feedback
            WHERE username = $1
            ORDER BY id
            "#,
        )
        .bind(username)
        .fetch_all(pool)
        .await
    }

    /// Only title and content are mutable; the owner is fixed at creation.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        title: &str,
        content: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            r#"
            UPDATE feedback
            SET title = $1, content = $2
            WHERE id = $3
            RETURNING id, title, content, username
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: i32) -> Result<(), sqlx::Error> {
        let result = sqlx::query("DELETE FROM feedback WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok(())
    }
}
