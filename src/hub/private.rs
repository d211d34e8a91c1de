use tracing::debug;

use crate::{
    error::{ChatErr, ChatResult},
    protocol::ServerEvent,
    state::RoomId,
};
use super::Hub;

const PRIVATE_PREFIX: &str = "pm";
const SEP: char = ':';

/// Order-independent room id for a pair of connections. Connection ids are
/// hyphenated uuids and never contain `SEP`.
pub fn canonical_pair_id(a: &str, b: &str) -> RoomId {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("{PRIVATE_PREFIX}{SEP}{lo}{SEP}{hi}")
}

impl Hub {
    /// The requester is told the room is ready; the target is asked to join
    /// on its own. Nobody is joined here.
    pub fn start_private_chat(&mut self, requester: &str, target: &str) -> ChatResult<RoomId> {
        if !self.users.contains(requester) {
            return Err(ChatErr::NotRegistered);
        }
        if requester == target || !self.users.contains(target) {
            return Err(ChatErr::TargetNotConnected);
        }

        let room = self.rooms.get_or_create_private(requester, target);
        debug!(%requester, %target, %room, "private chat resolved");

        self.gateway.emit_to(requester, ServerEvent::JoinPmSuccess(room.clone()));
        self.gateway.emit_to(target, ServerEvent::RequestPmJoin(room.clone()));
        Ok(room)
    }
}
