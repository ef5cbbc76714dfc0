use chrono::{DateTime, Duration, Utc};
use tracing::info;

use vanish_types::models::{Message, MessageId, MessageKind, SYSTEM_USERNAME, User, UserId};

use crate::random::RandomSource;

const ADJECTIVES: [&str; 10] = [
    "Swift", "Clever", "Bright", "Cosmic", "Silent", "Happy", "Brave", "Mystic", "Lucky", "Witty",
];

const NOUNS: [&str; 10] = [
    "Fox", "Owl", "Tiger", "Panda", "Falcon", "Otter", "Wolf", "Raven", "Lynx", "Koala",
];

/// Demo peers and their presence. Membership never changes during a session.
const PEERS: [(&str, bool); 5] = [
    ("Alice", true),
    ("Bob", true),
    ("Charlie", false),
    ("Diana", true),
    ("Eve", false),
];

/// Everything a fresh session starts with.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    pub local_user: User,
    pub peers: Vec<User>,
    /// Permanent messages, oldest first.
    pub seed_messages: Vec<Message>,
}

/// Adjective + noun + number, e.g. `CosmicOtter417`.
pub fn generate_username(rng: &mut dyn RandomSource) -> String {
    let adjective = ADJECTIVES[rng.pick(ADJECTIVES.len())];
    let noun = NOUNS[rng.pick(NOUNS.len())];
    let number = rng.number(1, 999);
    format!("{adjective}{noun}{number}")
}

/// Build the local identity, the peer roster and the seed timeline.
/// Seed messages are stamped relative to `now`, oldest first.
pub fn bootstrap(rng: &mut dyn RandomSource, now: DateTime<Utc>) -> Bootstrap {
    let local_user = User {
        id: UserId(rng.uuid()),
        username: generate_username(rng),
        online: true,
    };

    let peers: Vec<User> = PEERS
        .iter()
        .map(|(username, online)| User {
            id: UserId(rng.uuid()),
            username: (*username).to_string(),
            online: *online,
        })
        .collect();

    let mut seed_messages = Vec::with_capacity(3);
    seed_messages.push(seed_message(
        rng,
        MessageKind::System,
        UserId::SYSTEM,
        SYSTEM_USERNAME,
        "Welcome to the chat! Messages can be set to vanish automatically.",
        now - Duration::minutes(3),
    ));
    if let [alice, bob, ..] = peers.as_slice() {
        seed_messages.push(seed_message(
            rng,
            MessageKind::Chat,
            alice.id,
            &alice.username,
            "Hey everyone! 👋",
            now - Duration::minutes(2),
        ));
        seed_messages.push(seed_message(
            rng,
            MessageKind::Chat,
            bob.id,
            &bob.username,
            "Try the ⚡ button to send a message that disappears on its own.",
            now - Duration::minutes(1),
        ));
    }

    info!(
        "Session bootstrapped for {} with {} peers",
        local_user.username,
        peers.len()
    );

    Bootstrap {
        local_user,
        peers,
        seed_messages,
    }
}

fn seed_message(
    rng: &mut dyn RandomSource,
    kind: MessageKind,
    author_id: UserId,
    author_username: &str,
    content: &str,
    created_at: DateTime<Utc>,
) -> Message {
    Message {
        id: MessageId(rng.uuid()),
        kind,
        author_id,
        author_username: author_username.to_string(),
        content: content.to_string(),
        is_own: false,
        created_at,
        vanish_after_secs: None,
    }
}
