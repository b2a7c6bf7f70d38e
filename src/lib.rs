use config::Config;
use redis::Client as RedisClient;
use sqlx::PgPool;
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod policy;
pub mod session;
pub mod utils;
pub mod views;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub redis: Arc<RedisClient>,
}
