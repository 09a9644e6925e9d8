use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use localseva::config::AppConfig;
use localseva::services::clock::SystemClock;
use localseva::services::remote::rest::RestBookingApi;
use localseva::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let api = RestBookingApi::new(config.api_base_url.clone(), config.request_timeout)?;
    tracing::info!(
        "using booking service at {} (timeout {:?}, cache ttl {:?})",
        config.api_base_url,
        config.request_timeout,
        config.cache_ttl
    );

    let cors = match config.cors_allow_origin.as_deref() {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("invalid CORS_ALLOW_ORIGIN: {origin}"))?,
            )
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        None => CorsLayer::permissive(),
    };

    let state = Arc::new(AppState::new(
        config.clone(),
        Box::new(api),
        Box::new(SystemClock),
    ));

    let app = localseva::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
