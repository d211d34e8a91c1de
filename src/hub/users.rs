//! Connection registry: one profile per live connection.

use std::collections::BTreeMap;

use crate::{
    error::{ChatErr, ChatResult},
    state::{ConnId, RoomId, User},
};

#[derive(Default)]
pub struct Users {
    map: BTreeMap<ConnId, User>,
}

pub fn default_name(conn: &str) -> String {
    format!("User-{}", conn.chars().take(4).collect::<String>())
}

pub fn default_avatar(name: &str) -> String {
    format!("https://ui-avatars.com/api/?name={}&background=random", urlencoding::encode(name))
}

fn filled(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

impl Users {
    /// Creates or overwrites the profile. An existing room membership is kept.
    pub fn register(&mut self, conn: &str, name: Option<String>, avatar: Option<String>) -> User {
        let name   = filled(name).unwrap_or_else(|| default_name(conn));
        let avatar = filled(avatar).unwrap_or_else(|| default_avatar(&name));
        let current_room = self.map.get(conn).and_then(|u| u.current_room.clone());

        let user = User { id: conn.to_owned(), name, avatar_ref: avatar, current_room };
        self.map.insert(conn.to_owned(), user.clone());
        user
    }

    /// Display fields only. A blank name keeps the old one; a blank avatar
    /// falls back to the generated one.
    pub fn update(&mut self, conn: &str, name: String, avatar: String) -> ChatResult<&User> {
        let user = self.map.get_mut(conn).ok_or(ChatErr::NotRegistered)?;
        if let Some(name) = filled(Some(name)) { user.name = name; }
        user.avatar_ref = filled(Some(avatar)).unwrap_or_else(|| default_avatar(&user.name));
        Ok(user)
    }

    pub fn remove(&mut self, conn: &str) -> Option<User> { self.map.remove(conn) }

    pub fn get(&self, conn: &str) -> Option<&User> { self.map.get(conn) }

    pub fn contains(&self, conn: &str) -> bool { self.map.contains_key(conn) }

    pub fn current_room(&self, conn: &str) -> Option<&RoomId> {
        self.map.get(conn).and_then(|u| u.current_room.as_ref())
    }

    pub fn set_room(&mut self, conn: &str, room: Option<RoomId>) {
        if let Some(u) = self.map.get_mut(conn) { u.current_room = room; }
    }

    pub fn list(&self) -> Vec<User> { self.map.values().cloned().collect() }
}
