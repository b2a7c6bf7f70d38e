use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::error;

pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    if response.status().is_server_error() {
        error!(
            "Server error occurred - {} {} -> {}",
            method,
            uri,
            response.status()
        );
    }

    response
}
