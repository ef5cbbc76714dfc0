use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

use vanish_types::events::{CountdownTick, RemovalReason};
use vanish_types::models::{Message, MessageId};

use crate::store::MessageStore;

const COUNTDOWN_CAPACITY: usize = 256;

/// Owns one expiry timer per vanishing message.
///
/// Removal is driven only by the expiry timer. The countdown published on
/// [`subscribe_countdown`](Self::subscribe_countdown) is derived from the
/// same deadline but is purely for display.
#[derive(Clone)]
pub struct VanishScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    store: MessageStore,

    /// message_id -> armed timer
    pending: Mutex<HashMap<MessageId, PendingExpiry>>,

    countdown_tx: broadcast::Sender<CountdownTick>,
}

struct PendingExpiry {
    deadline: Instant,
    timer: AbortHandle,
}

impl VanishScheduler {
    pub fn new(store: MessageStore) -> Self {
        let (countdown_tx, _) = broadcast::channel(COUNTDOWN_CAPACITY);
        Self {
            inner: Arc::new(SchedulerInner {
                store,
                pending: Mutex::new(HashMap::new()),
                countdown_tx,
            }),
        }
    }

    pub fn subscribe_countdown(&self) -> broadcast::Receiver<CountdownTick> {
        self.inner.countdown_tx.subscribe()
    }

    /// Arm the expiry timer for `message`, measured from now. Returns `false`
    /// for permanent messages, which never get a timer.
    ///
    /// A zero duration expires the message immediately, through the same
    /// path a firing timer takes. Must be called inside a tokio runtime.
    pub fn schedule(&self, message: &Message) -> bool {
        let Some(ttl) = message.vanish_after() else {
            return false;
        };
        let id = message.id;

        if ttl.is_zero() {
            debug!(message_id = %id, "zero vanish duration, expiring now");
            self.expire(id);
            return true;
        }

        let deadline = Instant::now() + ttl;
        let this = self.clone();

        // Held across the spawn so the timer can't fire before it is recorded
        let mut pending = self.lock();
        let timer = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            this.expire(id);
        })
        .abort_handle();

        if let Some(previous) = pending.insert(id, PendingExpiry { deadline, timer }) {
            previous.timer.abort();
        }
        drop(pending);

        debug!(message_id = %id, ttl_secs = ttl.as_secs(), "expiry scheduled");
        true
    }

    /// Disarm the timer for `id`. Returns whether one was pending.
    pub fn cancel(&self, id: MessageId) -> bool {
        match self.lock().remove(&id) {
            Some(pending) => {
                pending.timer.abort();
                debug!(message_id = %id, "expiry cancelled");
                true
            }
            None => false,
        }
    }

    /// Disarm every pending timer.
    pub fn cancel_all(&self) {
        let drained: Vec<_> = self.lock().drain().collect();
        for (_, pending) in &drained {
            pending.timer.abort();
        }
        if !drained.is_empty() {
            debug!("cancelled {} pending expiries", drained.len());
        }
    }

    pub fn is_scheduled(&self, id: MessageId) -> bool {
        self.lock().contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    /// Whole seconds left before `id` vanishes, rounded up. `None` when no
    /// timer is armed for it.
    pub fn remaining_secs(&self, id: MessageId) -> Option<u32> {
        let now = Instant::now();
        self.lock()
            .get(&id)
            .map(|pending| ceil_secs(pending.deadline.saturating_duration_since(now)))
    }

    /// Publish one countdown update per pending message and return them.
    pub fn tick_countdowns(&self) -> Vec<CountdownTick> {
        let now = Instant::now();
        let ticks: Vec<CountdownTick> = self
            .lock()
            .iter()
            .map(|(id, pending)| CountdownTick {
                id: *id,
                remaining_secs: ceil_secs(pending.deadline.saturating_duration_since(now)),
            })
            .collect();

        for tick in &ticks {
            let _ = self.inner.countdown_tx.send(*tick);
        }
        trace!("countdown tick for {} messages", ticks.len());
        ticks
    }

    /// Background ticker that refreshes countdowns every `period`.
    /// Its cadence has no influence on when messages are removed.
    pub fn spawn_countdown(&self, period: Duration) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await;

            loop {
                interval.tick().await;
                this.tick_countdowns();
            }
        })
    }

    fn expire(&self, id: MessageId) {
        self.lock().remove(&id);
        if self.inner.store.remove_by_id(id, RemovalReason::Expired) {
            debug!(message_id = %id, "message vanished");
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<MessageId, PendingExpiry>> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn ceil_secs(d: Duration) -> u32 {
    let secs = d.as_secs() + u64::from(d.subsec_nanos() > 0);
    u32::try_from(secs).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;
    use vanish_types::events::TimelineEvent;
    use vanish_types::models::{MessageKind, UserId};

    fn message(vanish_after_secs: Option<u32>) -> Message {
        Message {
            id: MessageId(Uuid::new_v4()),
            kind: MessageKind::Chat,
            author_id: UserId(Uuid::new_v4()),
            author_username: "BraveOwl7".into(),
            content: "psst".into(),
            is_own: true,
            created_at: Utc::now(),
            vanish_after_secs,
        }
    }

    fn setup() -> (MessageStore, VanishScheduler) {
        let store = MessageStore::new();
        let scheduler = VanishScheduler::new(store.clone());
        (store, scheduler)
    }

    #[test]
    fn ceil_secs_rounds_up() {
        assert_eq!(ceil_secs(Duration::ZERO), 0);
        assert_eq!(ceil_secs(Duration::from_millis(1)), 1);
        assert_eq!(ceil_secs(Duration::from_secs(10)), 10);
        assert_eq!(ceil_secs(Duration::from_millis(9_001)), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_message_gets_no_timer() {
        let (store, scheduler) = setup();
        let msg = message(None);
        store.append(msg.clone());

        assert!(!scheduler.schedule(&msg));
        assert_eq!(scheduler.pending_count(), 0);

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert!(store.contains(msg.id));
    }

    #[tokio::test(start_paused = true)]
    async fn message_vanishes_at_deadline() {
        let (store, scheduler) = setup();
        let msg = message(Some(10));
        store.append(msg.clone());
        assert!(scheduler.schedule(&msg));
        assert_eq!(scheduler.remaining_secs(msg.id), Some(10));

        tokio::time::sleep(Duration::from_millis(9_900)).await;
        assert!(store.contains(msg.id));
        assert_eq!(scheduler.remaining_secs(msg.id), Some(1));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!store.contains(msg.id));
        assert!(!scheduler.is_scheduled(msg.id));
        assert_eq!(scheduler.remaining_secs(msg.id), None);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_expires_immediately() {
        let (store, scheduler) = setup();
        let msg = message(Some(0));
        store.append(msg.clone());
        let mut rx = store.subscribe();

        assert!(scheduler.schedule(&msg));
        assert!(!store.contains(msg.id));
        assert_eq!(
            rx.try_recv().unwrap(),
            TimelineEvent::MessageRemoved {
                id: msg.id,
                reason: RemovalReason::Expired,
                revision: 2,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_releases_timer() {
        let (store, scheduler) = setup();
        let msg = message(Some(5));
        store.append(msg.clone());
        scheduler.schedule(&msg);

        assert!(scheduler.cancel(msg.id));
        assert!(!scheduler.cancel(msg.id));
        assert_eq!(scheduler.pending_count(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        // Cancelled timer never removed it
        assert!(store.contains(msg.id));
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_ticks_follow_deadline() {
        let (store, scheduler) = setup();
        let msg = message(Some(3));
        store.append(msg.clone());
        scheduler.schedule(&msg);
        let mut rx = scheduler.subscribe_countdown();
        let ticker = scheduler.spawn_countdown(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(
            rx.try_recv().unwrap(),
            CountdownTick {
                id: msg.id,
                remaining_secs: 2
            }
        );

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(rx.try_recv().unwrap().remaining_secs, 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!store.contains(msg.id));
        // Once the timer fired there is nothing left to count down
        assert!(scheduler.tick_countdowns().is_empty());

        ticker.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_disarms_everything() {
        let (store, scheduler) = setup();
        let a = message(Some(10));
        let b = message(Some(30));
        store.append(a.clone());
        store.append(b.clone());
        scheduler.schedule(&a);
        scheduler.schedule(&b);
        assert_eq!(scheduler.pending_count(), 2);

        scheduler.cancel_all();
        assert_eq!(scheduler.pending_count(), 0);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(store.len(), 2);
    }
}
