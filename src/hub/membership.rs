//! Join / leave / kick / disconnect. A user is in at most one room; switching
//! is a full leave followed by a join.

use tracing::info;

use crate::{
    error::{ChatErr, ChatResult},
    protocol::{JoinedRoom, ServerEvent},
};
use super::Hub;

impl Hub {
    pub fn join(&mut self, conn: &str, room_id: &str, password: Option<&str>) -> ChatResult<()> {
        let user = self.users.get(conn).ok_or(ChatErr::NotRegistered)?;
        let name = user.name.clone();
        let already_here = user.current_room.as_deref() == Some(room_id);

        // outsiders are not told a private room exists
        let room = self
            .rooms
            .get(room_id)
            .filter(|r| r.admits(conn))
            .ok_or(ChatErr::RoomNotFound)?;
        if !room.accepts(password) {
            return Err(ChatErr::IncorrectPassword);
        }

        if !already_here {
            self.leave(conn)?;
            // target differs from the room just left, so it cannot have been deleted
            self.rooms.get_mut(room_id).ok_or(ChatErr::RoomNotFound)?.add(conn);
            self.users.set_room(conn, Some(room_id.to_owned()));
        }

        let room = self.rooms.get(room_id).ok_or(ChatErr::RoomNotFound)?;
        self.gateway.emit_to(conn, ServerEvent::JoinedRoom(JoinedRoom {
            id:           room.id.clone(),
            name:         room.name.clone(),
            is_private:   room.is_private(),
            am_i_creator: room.is_creator(conn),
        }));
        if !already_here {
            self.notify_room(room_id, format!("{name} joined."));
        }
        self.broadcast_members(room_id);
        Ok(())
    }

    pub fn leave(&mut self, conn: &str) -> ChatResult<()> {
        let user = self.users.get(conn).ok_or(ChatErr::NotRegistered)?;
        let Some(room_id) = user.current_room.clone() else { return Ok(()) };
        let name = user.name.clone();

        if let Some(room) = self.rooms.get_mut(&room_id) {
            room.remove(conn);
        }
        self.users.set_room(conn, None);

        self.notify_room(&room_id, format!("{name} left."));
        self.broadcast_members(&room_id);

        if self.rooms.delete_if_empty(&room_id) {
            info!(room = %room_id, "room deleted");
            self.broadcast_rooms();
        }
        Ok(())
    }

    /// Creator-only; anything else is `NotAuthorized`, which stays silent.
    pub fn kick(&mut self, actor: &str, target: &str) -> ChatResult<()> {
        if !self.users.contains(actor) {
            return Err(ChatErr::NotRegistered);
        }
        let room = self
            .users
            .current_room(actor)
            .and_then(|id| self.rooms.get(id))
            .ok_or(ChatErr::NotAuthorized)?;
        if !room.is_creator(actor) || actor == target || !room.contains(target) {
            return Err(ChatErr::NotAuthorized);
        }
        let reason = format!("You were removed from \"{}\" by its creator.", room.name);
        let room_id = room.id.clone();

        self.leave(target)?;
        self.gateway.emit_to(target, ServerEvent::Kicked { reason });
        info!(%actor, %target, room = %room_id, "kicked");
        Ok(())
    }

    /// Leave first, then forget the profile and the outbound queue.
    pub fn disconnect(&mut self, conn: &str) {
        if self.users.contains(conn) {
            self.leave(conn).ok();
            self.users.remove(conn);
            self.gateway.detach(conn);
            self.broadcast_users();
        } else {
            self.gateway.detach(conn);
        }
        info!(%conn, "disconnected");
    }
}
