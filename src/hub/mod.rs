//! In-memory relay state and the single dispatch point for client events.
//!
//! `Hub` owns both registries and the outbound gateway. Callers hold the
//! `ChatState` lock for the whole of one event, so every transition below is
//! observed either completely or not at all.

mod gateway;
mod membership;
mod private;
mod rooms;
mod users;

pub use gateway::Outbox;

use gateway::Gateway;
use rooms::Rooms;
use users::Users;

use chrono::Local;
use tracing::{debug, info};

use crate::{
    error::{ChatErr, ChatResult},
    protocol::{ChatLine, ClientEvent, Member, Sender, ServerEvent},
    state::{RoomId, User},
};

#[derive(Default)]
pub struct Hub {
    pub(crate) users:   Users,
    pub(crate) rooms:   Rooms,
    pub(crate) gateway: Gateway,
}

impl Hub {
    /* ---------------- 連線 ---------------- */
    pub fn attach(&mut self, conn: &str) -> Outbox {
        info!(%conn, "connected");
        self.gateway.attach(conn)
    }

    /// Decodes and handles one text frame.
    pub fn handle_raw(&mut self, conn: &str, raw: &str) {
        match ClientEvent::parse(raw) {
            Ok(ev) => self.handle(conn, ev),
            Err(e) => {
                tracing::warn!(%conn, error = ?e, "malformed frame");
                self.report(conn, e);
            }
        }
    }

    pub fn handle(&mut self, conn: &str, ev: ClientEvent) {
        let res = match ev {
            ClientEvent::Login(req)         => { self.login(conn, req.name, req.avatar_ref); Ok(()) }
            ClientEvent::UpdateProfile(req) => self.update_profile(conn, req.name, req.avatar_ref),
            ClientEvent::CreateRoom(req)    => self.create_room(conn, &req.name, req.password).map(drop),
            ClientEvent::StartPm(target)    => self.start_private_chat(conn, &target).map(drop),
            ClientEvent::JoinRoom(req)      => self.join(conn, &req.room_id, req.password.as_deref()),
            ClientEvent::SendMessage(text)  => self.send_message(conn, &text),
            ClientEvent::KickUser(target)   => self.kick(conn, &target),
            ClientEvent::LeaveRoom          => self.leave(conn),
        };
        if let Err(e) = res {
            self.report(conn, e);
        }
    }

    fn report(&self, conn: &str, e: ChatErr) {
        if e.is_visible() {
            self.gateway.emit_to(conn, ServerEvent::ErrorMsg(e.to_string()));
        } else {
            debug!(%conn, error = %e, "dropped");
        }
    }

    /* ---------------- 個人資料 ---------------- */
    pub fn login(&mut self, conn: &str, name: Option<String>, avatar: Option<String>) -> User {
        let user = self.users.register(conn, name, avatar);
        info!(%conn, name = %user.name, "login");

        self.gateway.emit_to(conn, ServerEvent::LoginSuccess(user.clone()));
        self.broadcast_users();
        self.broadcast_rooms();
        if let Some(room) = &user.current_room {
            self.broadcast_members(room);
        }
        user
    }

    pub fn update_profile(&mut self, conn: &str, name: String, avatar: String) -> ChatResult<()> {
        let room = self.users.update(conn, name, avatar)?.current_room.clone();
        self.broadcast_users();
        if let Some(room) = room {
            self.broadcast_members(&room);
        }
        Ok(())
    }

    /* ---------------- 房間 ---------------- */
    pub fn create_room(&mut self, conn: &str, name: &str, password: Option<String>) -> ChatResult<RoomId> {
        if !self.users.contains(conn) {
            return Err(ChatErr::NotRegistered);
        }
        let id = self.rooms.create_group(conn, name, password)?;
        info!(%conn, room = %id, "room created");

        self.broadcast_rooms();
        self.gateway.emit_to(conn, ServerEvent::RoomCreated(id.clone()));
        Ok(id)
    }

    pub fn send_message(&mut self, conn: &str, text: &str) -> ChatResult<()> {
        let user = self.users.get(conn).ok_or(ChatErr::NotRegistered)?;
        let text = text.trim();
        let Some(room) = &user.current_room else { return Ok(()) };
        if text.is_empty() {
            return Ok(());
        }

        let line = ChatLine {
            user: Sender { id: user.id.clone(), name: user.name.clone(), avatar_ref: user.avatar_ref.clone() },
            text: text.to_owned(),
            time: Local::now().format("%H:%M").to_string(),
        };
        self.gateway.emit_many(self.rooms.members(room), &ServerEvent::ChatMessage(line));
        Ok(())
    }

    /* ---------------- 廣播 ---------------- */
    fn broadcast_users(&self) {
        self.gateway.emit_all(&ServerEvent::UpdateUserList(self.users.list()));
    }

    fn broadcast_rooms(&self) {
        self.gateway.emit_all(&ServerEvent::UpdateRoomList(self.rooms.list_public()));
    }

    fn notify_room(&self, room: &str, text: String) {
        self.gateway.emit_many(self.rooms.members(room), &ServerEvent::SystemMessage(text));
    }

    fn broadcast_members(&self, room: &str) {
        let Some(r) = self.rooms.get(room) else { return };
        let list = r
            .members
            .iter()
            .filter_map(|id| self.users.get(id))
            .map(|u| Member {
                id:         u.id.clone(),
                name:       u.name.clone(),
                avatar_ref: u.avatar_ref.clone(),
                is_creator: r.is_creator(&u.id),
            })
            .collect();
        self.gateway.emit_many(&r.members, &ServerEvent::RoomUsers(list));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn drain(rx: &mut Outbox) -> Vec<ServerEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev);
        }
        out
    }

    /// Attached, logged in, and with the login chatter drained.
    pub(crate) fn online(hub: &mut Hub, id: &str, name: &str) -> Outbox {
        let mut rx = hub.attach(id);
        hub.login(id, Some(name.into()), Some(format!("{name}.png")));
        drain(&mut rx);
        rx
    }

    pub(crate) fn quiet(rxs: &mut [&mut Outbox]) {
        for rx in rxs.iter_mut() {
            drain(rx);
        }
    }

    #[test]
    fn login_acks_and_broadcasts_presence() {
        let mut hub = Hub::default();
        let mut a = online(&mut hub, "a", "Ann");
        let mut b = hub.attach("b");

        let bob = hub.login("b", None, None);
        assert_eq!(bob.name, "User-b");

        let to_b = drain(&mut b);
        assert_eq!(to_b[0], ServerEvent::LoginSuccess(bob.clone()));
        assert!(matches!(&to_b[1], ServerEvent::UpdateUserList(l) if l.len() == 2));
        assert_eq!(to_b[2], ServerEvent::UpdateRoomList(vec![]));

        let to_a = drain(&mut a);
        assert_eq!(to_a.len(), 2);
        assert!(matches!(&to_a[0], ServerEvent::UpdateUserList(l) if l.contains(&bob)));
    }

    #[test]
    fn profile_update_refreshes_room_members() {
        let mut hub = Hub::default();
        let mut a = online(&mut hub, "a", "Ann");
        let mut b = online(&mut hub, "b", "Bob");
        let room = hub.create_room("a", "Lobby", None).unwrap();
        hub.join("a", &room, None).unwrap();
        hub.join("b", &room, None).unwrap();
        quiet(&mut [&mut a, &mut b]);

        hub.update_profile("b", "Bobby".into(), "new.png".into()).unwrap();
        let to_a = drain(&mut a);
        assert!(matches!(&to_a[0], ServerEvent::UpdateUserList(_)));
        assert_eq!(
            to_a[1],
            ServerEvent::RoomUsers(vec![
                Member { id: "a".into(), name: "Ann".into(), avatar_ref: "Ann.png".into(), is_creator: true },
                Member { id: "b".into(), name: "Bobby".into(), avatar_ref: "new.png".into(), is_creator: false },
            ])
        );
    }

    #[test]
    fn unregistered_update_is_silent() {
        let mut hub = Hub::default();
        let mut ghost = hub.attach("ghost");
        let mut a = online(&mut hub, "a", "Ann");

        hub.handle_raw("ghost", r#"{"event":"update_profile","data":{"name":"x","avatarRef":"y"}}"#);
        assert!(drain(&mut ghost).is_empty());
        assert!(drain(&mut a).is_empty());
    }

    #[test]
    fn create_room_acks_creator_and_updates_everyone() {
        let mut hub = Hub::default();
        let mut a = online(&mut hub, "a", "Ann");
        let mut b = online(&mut hub, "b", "Bob");

        hub.handle_raw("a", r#"{"event":"create_room","data":{"name":"Test","password":"x"}}"#);
        let list = hub.rooms.list_public();
        assert_eq!(list.len(), 1);
        assert!(list[0].has_password);

        assert_eq!(
            drain(&mut a),
            vec![ServerEvent::UpdateRoomList(list.clone()), ServerEvent::RoomCreated(list[0].id.clone())]
        );
        assert_eq!(drain(&mut b), vec![ServerEvent::UpdateRoomList(list)]);
    }

    #[test]
    fn visible_errors_go_to_the_originator_only() {
        let mut hub = Hub::default();
        let mut a = online(&mut hub, "a", "Ann");
        let mut b = online(&mut hub, "b", "Bob");

        hub.handle_raw("a", "not json");
        hub.handle_raw("a", r#"{"event":"create_room","data":{"name":"  "}}"#);
        hub.handle_raw("a", r#"{"event":"join_room","data":{"roomId":"nope"}}"#);
        assert_eq!(
            drain(&mut a),
            vec![
                ServerEvent::ErrorMsg("Malformed request.".into()),
                ServerEvent::ErrorMsg("Room name required.".into()),
                ServerEvent::ErrorMsg("Room not found.".into()),
            ]
        );
        assert!(drain(&mut b).is_empty());
    }

    #[test]
    fn chat_reaches_current_room_only() {
        let mut hub = Hub::default();
        let mut a = online(&mut hub, "a", "Ann");
        let mut b = online(&mut hub, "b", "Bob");
        let mut c = online(&mut hub, "c", "Cid");
        let room = hub.create_room("a", "Lobby", None).unwrap();
        hub.join("a", &room, None).unwrap();
        hub.join("b", &room, None).unwrap();
        quiet(&mut [&mut a, &mut b, &mut c]);

        hub.handle_raw("b", r#"{"event":"send_message","data":"  hello  "}"#);
        hub.handle_raw("b", r#"{"event":"send_message","data":"   "}"#);
        hub.handle_raw("c", r#"{"event":"send_message","data":"nobody hears"}"#);

        for rx in [&mut a, &mut b] {
            let got = drain(rx);
            assert_eq!(got.len(), 1);
            let ServerEvent::ChatMessage(line) = &got[0] else { panic!("{got:?}") };
            assert_eq!(line.text, "hello");
            assert_eq!(line.user.name, "Bob");
            assert_eq!(line.time.len(), 5);
        }
        assert!(drain(&mut c).is_empty());
    }

    #[test]
    fn relogin_while_in_room_refreshes_members() {
        let mut hub = Hub::default();
        let mut a = online(&mut hub, "a", "Ann");
        let room = hub.create_room("a", "Lobby", None).unwrap();
        hub.join("a", &room, None).unwrap();
        drain(&mut a);

        let user = hub.login("a", Some("Anna".into()), None);
        assert_eq!(user.current_room.as_deref(), Some(room.as_str()));
        let got = drain(&mut a);
        assert!(matches!(got.last(), Some(ServerEvent::RoomUsers(m)) if m[0].name == "Anna"));
    }
}
