use anyhow::Result;
use tracing::info;

use top_k_api::infra;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine, the environment may be set directly.
    dotenv::dotenv().ok();
    let config = infra::config::init()?;
    infra::telemetry::init(config)?;

    info!(%config, "initialized config");

    let router = top_k_api::app(config);

    info!("initialized router");

    let server = axum::Server::try_bind(&config.address())?.serve(router.into_make_service());

    info!(address = %server.local_addr(), "listening");

    server.with_graceful_shutdown(infra::os::shutdown_signal()).await?;

    infra::telemetry::shutdown();
    Ok(())
}
