use axum::Router;

pub mod ws;

pub fn router() -> Router {
    Router::new().nest("/ws", ws::router())
}
