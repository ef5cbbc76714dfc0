use serde::{Deserialize, Serialize};

use crate::models::{Message, MessageId};

/// Why a message left the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// Its vanish timer fired.
    Expired,
    /// Someone raised a delete intent.
    Deleted,
}

/// Committed store mutations, delivered to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TimelineEvent {
    /// A message was appended at the end of the timeline
    MessageAppended { message: Message, revision: u64 },

    /// A message was removed from the timeline
    MessageRemoved {
        id: MessageId,
        reason: RemovalReason,
        revision: u64,
    },
}

impl TimelineEvent {
    /// Store revision after this mutation was applied.
    pub fn revision(&self) -> u64 {
        match self {
            Self::MessageAppended { revision, .. } | Self::MessageRemoved { revision, .. } => {
                *revision
            }
        }
    }

    pub fn message_id(&self) -> MessageId {
        match self {
            Self::MessageAppended { message, .. } => message.id,
            Self::MessageRemoved { id, .. } => *id,
        }
    }
}

/// Cosmetic countdown update for a vanishing message. Never drives removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownTick {
    pub id: MessageId,
    pub remaining_secs: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn removal_event_exposes_revision_and_id() {
        let id = MessageId(Uuid::new_v4());
        let event = TimelineEvent::MessageRemoved {
            id,
            reason: RemovalReason::Expired,
            revision: 7,
        };
        assert_eq!(event.revision(), 7);
        assert_eq!(event.message_id(), id);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "MessageRemoved");
        assert_eq!(json["data"]["reason"], "expired");
    }
}
