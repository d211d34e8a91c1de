mod config;
mod error;
mod hub;
mod protocol;
mod routes;
mod state;

use std::sync::Arc;
use axum::{Router, Extension};
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

use crate::{config::Config, hub::Hub, state::ChatState};
use error::AppErr;

#[tokio::main]
async fn main() -> Result<(), AppErr> {
    let cfg = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let state: ChatState = Arc::new(Mutex::new(Hub::default()));

    // 頁面與靜態檔交給前端，這裡只負責轉發事件
    let app = Router::new()
        .merge(routes::router())
        .fallback_service(ServeDir::new(&cfg.static_dir))
        .layer(Extension(state));

    let listener = tokio::net::TcpListener::bind(cfg.addr).await?;
    tracing::info!(addr = %cfg.addr, "listening");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
