use axum::{
    Router, routing::get, response::IntoResponse,
    extract::{ws::{WebSocketUpgrade, WebSocket, Message}, Extension},
};
use futures_util::{SinkExt, StreamExt};
use tracing::warn;
use uuid::Uuid;

use crate::state::ChatState;

pub fn router() -> Router {
    Router::new().route("/chat", get(ws_handler))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Extension(state): Extension<ChatState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |s| user_ws(s, state))
}

/* ---------------- per connection ---------------- */
async fn user_ws(sock: WebSocket, state: ChatState) {
    let conn = Uuid::new_v4().to_string();
    let mut outbox = state.lock().await.attach(&conn);
    let (mut sink, mut stream) = sock.split();

    /* 出站：佇列 → socket */
    let writer = tokio::spawn(async move {
        while let Some(ev) = outbox.recv().await {
            let text = match ev.to_json() {
                Ok(t)  => t,
                Err(e) => { warn!(error = %e, "unencodable event"); continue; }
            };
            if sink.send(Message::Text(text)).await.is_err() { break; }
        }
    });

    /* 入站：一次一個事件，整段持鎖 */
    while let Some(Ok(msg)) = stream.next().await {
        match msg {
            Message::Text(raw) => state.lock().await.handle_raw(&conn, &raw),
            Message::Close(_)  => break,
            _                  => {}
        }
    }

    state.lock().await.disconnect(&conn);
    writer.abort();
}
