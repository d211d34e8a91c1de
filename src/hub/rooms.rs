//! Room registry: metadata, membership storage and the emptiness rule.

use std::collections::BTreeMap;
use uuid::Uuid;

use crate::{
    error::{ChatErr, ChatResult},
    protocol::RoomSummary,
    state::{ConnId, Room, RoomId},
};
use super::private::canonical_pair_id;

#[derive(Default)]
pub struct Rooms {
    map: BTreeMap<RoomId, Room>,
}

impl Rooms {
    pub fn create_group(&mut self, creator: &str, name: &str, password: Option<String>) -> ChatResult<RoomId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChatErr::RoomNameRequired);
        }
        let password = password.filter(|p| !p.is_empty());

        let id = Uuid::now_v7().to_string();
        self.map.insert(id.clone(), Room::group(id.clone(), name.to_owned(), password, creator.to_owned()));
        Ok(id)
    }

    /// Same pair, same room, whatever the argument order.
    pub fn get_or_create_private(&mut self, a: &str, b: &str) -> RoomId {
        let id = canonical_pair_id(a, b);
        self.map
            .entry(id.clone())
            .or_insert_with(|| Room::private(id.clone(), a.to_owned(), b.to_owned()));
        id
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> { self.map.values() }

    pub fn list_public(&self) -> Vec<RoomSummary> {
        self.iter()
            .filter(|r| !r.is_private())
            .map(|r| RoomSummary { id: r.id.clone(), name: r.name.clone(), has_password: r.has_password() })
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Room> { self.map.get(id) }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Room> { self.map.get_mut(id) }

    pub fn members(&self, id: &str) -> &[ConnId] {
        self.map.get(id).map(|r| r.members.as_slice()).unwrap_or_default()
    }

    /// Drops a group room with no members. Private rooms are kept.
    /// Returns whether anything was deleted.
    pub fn delete_if_empty(&mut self, id: &str) -> bool {
        let empty_group = self.map.get(id).is_some_and(|r| !r.is_private() && r.members.is_empty());
        if empty_group {
            self.map.remove(id);
        }
        empty_group
    }
}
