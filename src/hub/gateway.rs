use std::collections::HashMap;
use tokio::sync::mpsc;

use crate::{protocol::ServerEvent, state::ConnId};

pub type Outbox = mpsc::Receiver<ServerEvent>;

/// Events queued per connection before further ones are dropped.
pub const OUTBOX_CAP: usize = 256;

/// Per-connection outbound queues. Room fan-out is always resolved from the
/// membership list the caller passes in at emit time.
#[derive(Default)]
pub struct Gateway {
    conns: HashMap<ConnId, mpsc::Sender<ServerEvent>>,
}

impl Gateway {
    pub fn attach(&mut self, conn: &str) -> Outbox {
        let (tx, rx) = mpsc::channel(OUTBOX_CAP);
        self.conns.insert(conn.to_owned(), tx);
        rx
    }

    pub fn detach(&mut self, conn: &str) { self.conns.remove(conn); }

    #[cfg(test)]
    pub fn is_attached(&self, conn: &str) -> bool { self.conns.contains_key(conn) }

    pub fn emit_to(&self, conn: &str, ev: ServerEvent) {
        if let Some(tx) = self.conns.get(conn) {
            tx.try_send(ev).ok();           // 斷線或塞滿就丟掉
        }
    }

    pub fn emit_many<'a>(&self, ids: impl IntoIterator<Item = &'a ConnId>, ev: &ServerEvent) {
        for id in ids {
            self.emit_to(id, ev.clone());
        }
    }

    pub fn emit_all(&self, ev: &ServerEvent) {
        for tx in self.conns.values() {
            tx.try_send(ev.clone()).ok();
        }
    }
}
