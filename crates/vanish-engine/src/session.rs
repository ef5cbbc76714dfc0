use std::fmt::Display;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use vanish_types::api::{Intent, VanishPreset};
use vanish_types::events::{CountdownTick, RemovalReason, TimelineEvent};
use vanish_types::models::{Message, MessageId, MessageKind, User};

use crate::bootstrap::bootstrap;
use crate::composer::{Composer, validate_content};
use crate::config::EngineConfig;
use crate::error::ComposeError;
use crate::random::{self, RandomSource};
use crate::roster::{Presence, Roster};
use crate::scheduler::VanishScheduler;
use crate::store::MessageStore;
use crate::view::{MessageView, RosterView, timeline_view};

/// What handling an intent did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    Sent(Message),
    /// Send turned away; nothing changed.
    Rejected(ComposeError),
    Deleted(MessageId),
    /// Delete for a message that is already gone; nothing changed.
    AlreadyGone(MessageId),
}

/// One running chat session: local identity, roster, timeline and timers.
///
/// Dropping the session cancels every pending expiry and the countdown.
pub struct ChatSession {
    config: EngineConfig,
    local_user: Arc<User>,
    roster: Roster,
    store: MessageStore,
    scheduler: VanishScheduler,
    composer: Composer,
    rng: Box<dyn RandomSource + Send>,
    countdown: Option<JoinHandle<()>>,
}

impl ChatSession {
    /// Bootstrap a session from `config`. Must be called inside a tokio runtime.
    pub fn start(config: EngineConfig) -> Self {
        let rng: Box<dyn RandomSource + Send> = match config.seed {
            Some(seed) => Box::new(random::seeded(seed)),
            None => Box::new(random::from_os()),
        };
        Self::start_with(config, rng, Utc::now())
    }

    /// Bootstrap with an explicit random source, seeding the timeline
    /// relative to `now`.
    pub fn start_with(
        config: EngineConfig,
        mut rng: Box<dyn RandomSource + Send>,
        now: DateTime<Utc>,
    ) -> Self {
        let boot = bootstrap(rng.as_mut(), now);
        let local_user = Arc::new(boot.local_user);
        let roster = Roster::new(local_user.clone(), boot.peers);

        let store = MessageStore::new();
        for message in boot.seed_messages {
            store.append(message);
        }

        let scheduler = VanishScheduler::new(store.clone());
        let countdown = Some(scheduler.spawn_countdown(config.countdown_tick));

        info!(
            user_id = %local_user.id,
            "Session started as {}",
            local_user.username
        );

        Self {
            composer: Composer::new(config.max_message_len),
            config,
            local_user,
            roster,
            store,
            scheduler,
            rng,
            countdown,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn local_user(&self) -> &User {
        &self.local_user
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn presence(&self) -> Presence {
        self.roster.presence()
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn scheduler(&self) -> &VanishScheduler {
        &self.scheduler
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimelineEvent> {
        self.store.subscribe()
    }

    pub fn subscribe_countdown(&self) -> broadcast::Receiver<CountdownTick> {
        self.scheduler.subscribe_countdown()
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.store.snapshot()
    }

    /// Send `text` as the local user with the chosen preset.
    pub fn send(&mut self, text: &str, vanish: VanishPreset) -> Result<Message, ComposeError> {
        self.post(text, vanish.secs())
    }

    /// Send `text` as the local user, vanishing after `vanish_after_secs`
    /// when given. Rejected text leaves the store untouched.
    pub fn post(
        &mut self,
        text: &str,
        vanish_after_secs: Option<u32>,
    ) -> Result<Message, ComposeError> {
        validate_content(text, self.config.max_message_len)?;

        let message = Message {
            id: MessageId(self.rng.uuid()),
            kind: MessageKind::Chat,
            author_id: self.local_user.id,
            author_username: self.local_user.username.clone(),
            content: text.to_string(),
            is_own: self.roster.is_local(self.local_user.id),
            created_at: Utc::now(),
            vanish_after_secs,
        };

        self.store.append(message.clone());
        self.scheduler.schedule(&message);
        Ok(message)
    }

    /// Send whatever is in the composer, resetting it on success.
    pub fn submit(&mut self) -> Result<Message, ComposeError> {
        let (text, vanish) = self.composer.take()?;
        self.send(&text, vanish)
    }

    /// Delete a message ahead of its expiry. Returns `false` if it was
    /// already gone.
    pub fn delete(&self, id: MessageId) -> bool {
        self.scheduler.cancel(id);
        self.store.remove_by_id(id, RemovalReason::Deleted)
    }

    pub fn handle(&mut self, intent: Intent) -> IntentOutcome {
        match intent {
            Intent::Send { text, vanish } => match self.send(&text, vanish) {
                Ok(message) => IntentOutcome::Sent(message),
                Err(e) => {
                    debug!("send intent rejected: {}", e);
                    IntentOutcome::Rejected(e)
                }
            },
            Intent::Delete { message_id } => {
                if self.delete(message_id) {
                    IntentOutcome::Deleted(message_id)
                } else {
                    IntentOutcome::AlreadyGone(message_id)
                }
            }
        }
    }

    pub fn timeline_view<Tz>(&self, tz: &Tz) -> Vec<MessageView>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        timeline_view(&self.store.snapshot(), &self.scheduler, tz)
    }

    pub fn roster_view(&self) -> RosterView {
        RosterView::new(&self.roster)
    }

    /// Stop the countdown and release every pending expiry timer.
    pub fn shutdown(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            countdown.abort();
            self.scheduler.cancel_all();
            info!("Session for {} ended", self.local_user.username);
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
