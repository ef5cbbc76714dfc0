use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::debug;

use vanish_types::events::{RemovalReason, TimelineEvent};
use vanish_types::models::{Message, MessageId};

/// Buffered timeline events per subscriber before it starts lagging.
const EVENT_CAPACITY: usize = 1024;

/// Ordered, in-memory message timeline. Single source of truth for a session.
#[derive(Clone)]
pub struct MessageStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    /// Every committed mutation is published here
    events_tx: broadcast::Sender<TimelineEvent>,

    timeline: Mutex<Timeline>,
}

#[derive(Default)]
struct Timeline {
    /// Insertion order is display order.
    messages: Vec<Message>,
    revision: u64,
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageStore {
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(StoreInner {
                events_tx,
                timeline: Mutex::new(Timeline::default()),
            }),
        }
    }

    /// Subscribe to committed mutations. Only events after this call are seen.
    pub fn subscribe(&self) -> broadcast::Receiver<TimelineEvent> {
        self.inner.events_tx.subscribe()
    }

    /// Append at the end of the timeline. Returns the new revision.
    pub fn append(&self, message: Message) -> u64 {
        let mut timeline = self.lock();
        timeline.revision += 1;
        let revision = timeline.revision;

        debug!(message_id = %message.id, revision, "message appended");
        timeline.messages.push(message.clone());

        // Published under the lock so subscribers see revisions in order
        let _ = self
            .inner
            .events_tx
            .send(TimelineEvent::MessageAppended { message, revision });
        revision
    }

    /// Remove the message with `id`. Returns `false`, and changes nothing,
    /// when it is not in the timeline.
    pub fn remove_by_id(&self, id: MessageId, reason: RemovalReason) -> bool {
        let mut timeline = self.lock();
        let Some(pos) = timeline.messages.iter().position(|m| m.id == id) else {
            return false;
        };

        timeline.messages.remove(pos);
        timeline.revision += 1;
        let revision = timeline.revision;

        debug!(message_id = %id, ?reason, revision, "message removed");
        let _ = self.inner.events_tx.send(TimelineEvent::MessageRemoved {
            id,
            reason,
            revision,
        });
        true
    }

    /// Current timeline, oldest first.
    pub fn snapshot(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    /// Number of committed mutations so far.
    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    pub fn get(&self, id: MessageId) -> Option<Message> {
        self.lock().messages.iter().find(|m| m.id == id).cloned()
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.lock().messages.iter().any(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.lock().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().messages.is_empty()
    }

    // A panic elsewhere can't leave the timeline half-written: every
    // mutation is a single push or remove.
    fn lock(&self) -> MutexGuard<'_, Timeline> {
        self.inner
            .timeline
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
