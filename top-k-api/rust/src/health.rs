use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};

pub(crate) const PATH: &str = "/health";

pub(crate) fn router() -> Router {
    Router::new().route("/", get(get_endpoint))
}

async fn get_endpoint() -> impl IntoResponse {
    (StatusCode::OK, "Healthy")
}
