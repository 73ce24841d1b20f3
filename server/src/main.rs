mod handlers;
mod routes;
mod state;

use std::env;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use search_digest_cli::config::ScraperConfig;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::EnvFilter;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ScraperConfig::from_env()?;
    let addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    let origin = match env::var("CLIENT_URL") {
        Ok(url) => AllowOrigin::exact(
            url.parse::<HeaderValue>()
                .with_context(|| format!("CLIENT_URL is not a valid origin: {url}"))?,
        ),
        Err(_) => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = routes::app(AppState::new(config)).layer(cors);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
