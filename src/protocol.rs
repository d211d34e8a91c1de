//! JSON event frames: `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::{
    error::{ChatErr, ChatResult},
    state::{ConnId, RoomId, User},
};

/* ---------------- client → server ---------------- */
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    Login(LoginReq),
    UpdateProfile(ProfileReq),
    CreateRoom(CreateRoomReq),
    StartPm(ConnId),
    JoinRoom(JoinReq),
    SendMessage(String),
    KickUser(ConnId),
    LeaveRoom,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginReq {
    #[serde(default)] pub name:       Option<String>,
    #[serde(default)] pub avatar_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileReq {
    pub name:       String,
    pub avatar_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateRoomReq {
    pub name: String,
    #[serde(default)] pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinReq {
    pub room_id: RoomId,
    #[serde(default)] pub password: Option<String>,
}

impl ClientEvent {
    pub fn parse(raw: &str) -> ChatResult<Self> {
        serde_json::from_str(raw).map_err(|e| ChatErr::Malformed(e.to_string()))
    }
}

/* ---------------- server → client ---------------- */
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    LoginSuccess(User),
    UpdateUserList(Vec<User>),
    UpdateRoomList(Vec<RoomSummary>),
    RoomCreated(RoomId),
    JoinPmSuccess(RoomId),
    RequestPmJoin(RoomId),
    JoinedRoom(JoinedRoom),
    SystemMessage(String),
    RoomUsers(Vec<Member>),
    ChatMessage(ChatLine),
    ErrorMsg(String),
    Kicked { reason: String },
}

impl ServerEvent {
    pub fn to_json(&self) -> serde_json::Result<String> { serde_json::to_string(self) }
}

/// Public room list entry; the password itself never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id:           RoomId,
    pub name:         String,
    pub has_password: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedRoom {
    pub id:           RoomId,
    pub name:         String,
    pub is_private:   bool,
    pub am_i_creator: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id:         ConnId,
    pub name:       String,
    pub avatar_ref: String,
    pub is_creator: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sender {
    pub id:         ConnId,
    pub name:       String,
    pub avatar_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatLine {
    pub user: Sender,
    pub text: String,
    pub time: String,
}
