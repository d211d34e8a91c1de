pub type ChatResult<T> = Result<T, ChatErr>;

/* ── 聊天事件的失敗：Display 就是給使用者看的文字 ── */
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatErr {
    #[error("Room not found.")]
    RoomNotFound,

    #[error("Incorrect password.")]
    IncorrectPassword,

    #[error("Only the room creator can do that.")]
    NotAuthorized,

    #[error("That user is no longer connected.")]
    TargetNotConnected,

    #[error("Please log in first.")]
    NotRegistered,

    #[error("Room name required.")]
    RoomNameRequired,

    #[error("Malformed request.")]
    Malformed(String),
}

impl ChatErr {
    /// Whether the originating connection receives an `error_msg`.
    /// The other kinds are dropped without feedback.
    pub fn is_visible(&self) -> bool {
        matches!(
            self,
            ChatErr::RoomNotFound
                | ChatErr::IncorrectPassword
                | ChatErr::RoomNameRequired
                | ChatErr::Malformed(_)
        )
    }
}

/* ── 啟動階段的錯誤 ── */
#[derive(thiserror::Error, Debug)]
pub enum AppErr {
    #[error("Config: {0}")]
    Config(String),

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

pub fn config<E: std::fmt::Display>(e: E) -> AppErr { AppErr::Config(e.to_string()) }
