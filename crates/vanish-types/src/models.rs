use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name carried by engine-authored notices.
pub const SYSTEM_USERNAME: &str = "System";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Author id used for system notices. Never present in the roster.
    pub const SYSTEM: UserId = UserId(Uuid::nil());
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Opaque message identifier. Unique for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub Uuid);

impl MessageId {
    /// First eight hex digits, enough to tell messages apart on screen.
    pub fn short(&self) -> String {
        let mut s = self.0.simple().to_string();
        s.truncate(8);
        s
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(MessageId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub online: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Chat,
    System,
}

/// A single timeline entry. Immutable once created: the only state change a
/// message ever sees is removal from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub kind: MessageKind,
    pub author_id: UserId,
    pub author_username: String,
    pub content: String,
    /// Authored by the local session rather than a peer.
    pub is_own: bool,
    pub created_at: DateTime<Utc>,
    /// Time-to-live in whole seconds. `None` means the message is permanent.
    pub vanish_after_secs: Option<u32>,
}

impl Message {
    pub fn is_system(&self) -> bool {
        self.kind == MessageKind::System
    }

    pub fn vanishes(&self) -> bool {
        self.vanish_after_secs.is_some()
    }

    pub fn vanish_after(&self) -> Option<Duration> {
        self.vanish_after_secs.map(|secs| Duration::from_secs(u64::from(secs)))
    }

    /// Wall-clock instant after which the message must be gone.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.vanish_after_secs
            .map(|secs| self.created_at + chrono::Duration::seconds(i64::from(secs)))
    }
}
