use std::sync::Arc;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::hub::Hub;

pub type ConnId = String;
pub type RoomId = String;

/// The whole relay. Every inbound event runs to completion under this lock.
pub type ChatState = Arc<Mutex<Hub>>;

pub const PRIVATE_LABEL: &str = "Private Chat";

/* ------------ 連線中的使用者 ------------ */
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id:           ConnId,
    pub name:         String,
    pub avatar_ref:   String,
    pub current_room: Option<RoomId>,
}

/* ------------ 房間 ------------ */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomKind {
    /// Creator is recorded once and survives their departure.
    Group { password: Option<String>, creator: ConnId },
    /// Keyed by the participant pair; nobody is privileged and nobody else
    /// gets in.
    Private { a: ConnId, b: ConnId },
}

#[derive(Debug, Clone)]
pub struct Room {
    pub id:      RoomId,
    pub name:    String,
    pub kind:    RoomKind,
    pub members: Vec<ConnId>,              // join order
}

impl Room {
    pub fn group(id: RoomId, name: String, password: Option<String>, creator: ConnId) -> Self {
        Self { id, name, kind: RoomKind::Group { password, creator }, members: Vec::new() }
    }

    pub fn private(id: RoomId, a: ConnId, b: ConnId) -> Self {
        Self { id, name: PRIVATE_LABEL.into(), kind: RoomKind::Private { a, b }, members: Vec::new() }
    }

    pub fn is_private(&self) -> bool { matches!(self.kind, RoomKind::Private { .. }) }

    /// Group rooms admit anyone; private rooms only their pair.
    pub fn admits(&self, id: &str) -> bool {
        match &self.kind {
            RoomKind::Group { .. }     => true,
            RoomKind::Private { a, b } => a == id || b == id,
        }
    }

    pub fn creator(&self) -> Option<&str> {
        match &self.kind {
            RoomKind::Group { creator, .. } => Some(creator),
            RoomKind::Private { .. }        => None,
        }
    }

    pub fn is_creator(&self, id: &str) -> bool { self.creator() == Some(id) }

    pub fn has_password(&self) -> bool {
        matches!(&self.kind, RoomKind::Group { password: Some(p), .. } if !p.is_empty())
    }

    /// Exact string match; open rooms accept anything.
    pub fn accepts(&self, given: Option<&str>) -> bool {
        match &self.kind {
            RoomKind::Group { password: Some(p), .. } if !p.is_empty() => given == Some(p.as_str()),
            _ => true,
        }
    }

    pub fn contains(&self, id: &str) -> bool { self.members.iter().any(|m| m == id) }

    pub fn add(&mut self, id: &str) {
        if !self.contains(id) { self.members.push(id.to_owned()); }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != id);
        self.members.len() != before
    }
}
