use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use redis::{AsyncCommands, Client as RedisClient};
use serde::{Deserialize, Serialize};

use crate::AppState;

pub const SESSION_COOKIE: &str = "session_id";

/// Server-side session record; the client only ever sees the opaque id.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionRecord {
    pub username: String,
    pub created_at: i64,
}

/// Per-request identity, extracted once by `session_middleware` and passed
/// to handlers as an extension. An absent username means anonymous.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub session_id: Option<String>,
    pub username: Option<String>,
}

impl SessionContext {
    pub fn current_user(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_none()
    }
}

pub struct SessionStore;

impl SessionStore {
    /// Start a session for a user, always under a freshly generated id.
    pub async fn create(
        redis: &Arc<RedisClient>,
        username: &str,
        ttl: u64,
    ) -> Result<String, redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let session_id = uuid::Uuid::new_v4().to_string();
        let record = SessionRecord {
            username: username.to_string(),
            created_at: chrono::Utc::now().timestamp(),
        };
        let json = serde_json::to_string(&record).map_err(|e| {
            redis::RedisError::from((redis::ErrorKind::IoError, "serialize error", e.to_string()))
        })?;

        let _: () = conn
            .set_ex(format!("session:{}", session_id), json, ttl)
            .await?;

        Ok(session_id)
    }

    pub async fn get(
        redis: &Arc<RedisClient>,
        session_id: &str,
    ) -> Result<Option<SessionRecord>, redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let result: Option<String> = conn.get(format!("session:{}", session_id)).await?;

        match result {
            Some(json) => {
                let record = serde_json::from_str(&json).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::IoError,
                        "deserialize error",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Idempotent: deleting an absent session is not an error.
    pub async fn destroy(
        redis: &Arc<RedisClient>,
        session_id: &str,
    ) -> Result<(), redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let _: () = conn.del(format!("session:{}", session_id)).await?;

        Ok(())
    }
}

/// Resolves the session cookie into a `SessionContext` for every request.
/// A stale or unknown cookie degrades to an anonymous context.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let mut ctx = SessionContext::default();

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let session_id = cookie.value().to_string();
        match SessionStore::get(&state.redis, &session_id).await {
            Ok(Some(record)) => ctx.username = Some(record.username),
            Ok(None) => {}
            Err(e) => tracing::error!("Failed to load session {}: {}", session_id, e),
        }
        ctx.session_id = Some(session_id);
    }

    req.extensions_mut().insert(ctx);
    next.run(req).await
}

pub fn session_cookie(session_id: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, session_id);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

/// Expired cookie with the same name/path, used to clear the client state.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_is_anonymous() {
        let ctx = SessionContext::default();
        assert!(ctx.is_anonymous());
        assert_eq!(ctx.current_user(), None);
    }

    #[test]
    fn context_with_identity_reports_current_user() {
        let ctx = SessionContext {
            session_id: Some("abc".into()),
            username: Some("alice".into()),
        };
        assert!(!ctx.is_anonymous());
        assert_eq!(ctx.current_user(), Some("alice"));
    }

    #[test]
    fn stale_cookie_without_record_stays_anonymous() {
        // Mirrors what the middleware builds when the store has no record:
        // the id is kept (so logout can clear it) but no identity attaches.
        let ctx = SessionContext {
            session_id: Some("expired".into()),
            username: None,
        };
        assert!(ctx.is_anonymous());
    }

    #[test]
    fn session_record_round_trips_through_json() {
        let record = SessionRecord {
            username: "alice".into(),
            created_at: 1_700_000_000,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: SessionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.username, "alice");
        assert_eq!(back.created_at, 1_700_000_000);
    }
}
