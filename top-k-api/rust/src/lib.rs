use axum::{extract::DefaultBodyLimit, Router};

mod error;
mod health;
pub mod infra;
pub mod openapi;
pub mod top_k;

use infra::config::Config;

pub fn app(config: &Config) -> Router {
    Router::new()
        .nest(health::PATH, health::router())
        .nest(top_k::PATH, top_k::router())
        .nest(openapi::PATH, openapi::router())
        .layer(DefaultBodyLimit::max(config.max_body_bytes()))
        .layer(infra::telemetry::tracing_middleware())
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use super::*;

    /// Serves the full router on an ephemeral port.
    pub(crate) async fn spawn_app() -> SocketAddr {
        let config = Config::from_lookup(|_| None).unwrap();
        spawn_app_with(&config).await
    }

    pub(crate) async fn spawn_app_with(config: &Config) -> SocketAddr {
        let server = axum::Server::bind(&"127.0.0.1:0".parse().unwrap()).serve(app(config).into_make_service());
        let addr = server.local_addr();
        tokio::spawn(server);
        addr
    }

    #[tokio::test]
    async fn unknown_route() {
        let addr = spawn_app().await;

        let response = reqwest::get(format!("http://{addr}/nope")).await.unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let config = Config::from_lookup(|key| (key == "MAX_BODY_BYTES").then(|| "64".to_string())).unwrap();
        let addr = spawn_app_with(&config).await;
        let nums: Vec<i64> = (0..100).collect();

        let response = reqwest::Client::new()
            .post(format!("http://{addr}{}", top_k::PATH))
            .json(&serde_json::json!({ "nums": nums, "k": 1 }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::PAYLOAD_TOO_LARGE);
    }
}
