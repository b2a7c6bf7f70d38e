use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use feedback_backend::{
    AppState,
    config::Config,
    middleware::log_errors,
    routes,
    session::session_middleware,
};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'feedback_backend';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let redis_client =
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client");

    let state = AppState {
        pool,
        config: config.clone(),
        redis: Arc::new(redis_client),
    };

    let router = Router::new()
        .route("/", get(routes::user::index))
        .route(
            "/register",
            get(routes::user::register_form).post(routes::user::register),
        )
        .route(
            "/login",
            get(routes::user::login_form).post(routes::user::login),
        )
        .route("/logout", get(routes::user::logout))
        .route("/users/{username}", get(routes::user::show_user))
        .route("/users/{username}/delete", post(routes::user::delete_user))
        .route(
            "/users/{username}/feedback/add",
            get(routes::feedback::add_form).post(routes::feedback::add),
        )
        .route(
            "/feedback/{feedback_id}/update",
            get(routes::feedback::update_form).post(routes::feedback::update),
        )
        .route(
            "/feedback/{feedback_id}/delete",
            post(routes::feedback::delete),
        )
        // Every request gets its session context resolved up front.
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    let router = router.layer(axum::middleware::from_fn(log_errors));

    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(CorsLayer::permissive())
    };

    let app = router.with_state(state.clone());

    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service(),
    )
    .await
    .expect("Failed to start server");
}
