//! End-to-end message lifecycle: send, countdown, expiry and manual delete,
//! driven on virtual time so every deadline is exact.

use std::time::Duration;

use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;

use vanish_engine::random::seeded;
use vanish_engine::{ChatSession, ComposeError, EngineConfig};
use vanish_types::api::VanishPreset;
use vanish_types::events::{RemovalReason, TimelineEvent};

fn session(seed: u64) -> ChatSession {
    ChatSession::start_with(
        EngineConfig::default(),
        Box::new(seeded(seed)),
        chrono::Utc::now(),
    )
}

fn drain(rx: &mut Receiver<TimelineEvent>) -> Vec<TimelineEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty) => return events,
            Err(e) => panic!("receiver failed: {e}"),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn appended_text_lands_at_the_end() {
    let mut session = session(1);
    for text in ["hi", "  padded  ", "multi\nline", "ünïcödé ✨"] {
        let before = session.snapshot();
        session.send(text, VanishPreset::Forever).unwrap();
        let after = session.snapshot();

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(after.last().unwrap().content, text);
        assert_eq!(after.iter().filter(|m| m.content == text).count(), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn blank_text_never_mutates_the_store() {
    let mut session = session(2);
    let mut rx = session.subscribe();
    let before = session.snapshot();
    let revision = session.store().revision();

    for text in ["", "   ", "\t\n", "\u{3000}"] {
        assert_eq!(
            session.send(text, VanishPreset::TenSeconds),
            Err(ComposeError::Empty)
        );
    }
    session.composer_mut().set_draft("   ");
    assert_eq!(session.submit(), Err(ComposeError::Empty));

    assert_eq!(session.snapshot(), before);
    assert_eq!(session.store().revision(), revision);
    assert_eq!(session.scheduler().pending_count(), 0);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn vanishing_messages_are_gone_after_their_duration() {
    let mut session = session(3);
    let start = tokio::time::Instant::now();
    let mut sent = Vec::new();
    for secs in [0u32, 1, 7, 10, 30] {
        sent.push((secs, session.post("ephemeral", Some(secs)).unwrap()));
    }

    for (secs, message) in &sent {
        let deadline = start + Duration::from_secs(u64::from(*secs));
        tokio::time::sleep_until(deadline + Duration::from_millis(1)).await;
        assert!(
            !session.store().contains(message.id),
            "{secs}s message still present"
        );
    }
    assert_eq!(session.scheduler().pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn message_outlives_its_countdown_only_until_deadline() {
    let mut session = session(4);
    let msg = session.send("tick tock", VanishPreset::TenSeconds).unwrap();

    tokio::time::sleep(Duration::from_millis(9_999)).await;
    assert!(session.store().contains(msg.id));

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(!session.store().contains(msg.id));
}

#[tokio::test(start_paused = true)]
async fn delete_before_expiry_suppresses_the_timer() {
    let mut session = session(5);
    let mut rx = session.subscribe();
    let m1 = session.post("M1", Some(10)).unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(session.delete(m1.id));
    assert!(!session.snapshot().iter().any(|m| m.id == m1.id));
    assert!(!session.scheduler().is_scheduled(m1.id));

    tokio::time::sleep(Duration::from_secs(10)).await;

    let events = drain(&mut rx);
    let removals: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            TimelineEvent::MessageRemoved { id, reason, .. } if *id == m1.id => Some(*reason),
            _ => None,
        })
        .collect();
    assert_eq!(removals, vec![RemovalReason::Deleted]);
}

#[tokio::test(start_paused = true)]
async fn permanent_message_stays_without_a_timer() {
    let mut session = session(6);
    let m2 = session.send("M2", VanishPreset::Forever).unwrap();
    assert_eq!(session.scheduler().pending_count(), 0);

    tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
    assert!(session.store().contains(m2.id));
}

#[tokio::test(start_paused = true)]
async fn every_mutation_is_published_in_revision_order() {
    let mut session = session(7);
    let mut rx = session.subscribe();
    let start = session.store().revision();

    let a = session.post("a", Some(2)).unwrap();
    let b = session.post("b", None).unwrap();
    session.delete(b.id);
    tokio::time::sleep(Duration::from_secs(3)).await;

    let events = drain(&mut rx);
    let revisions: Vec<u64> = events.iter().map(TimelineEvent::revision).collect();
    assert_eq!(revisions, vec![start + 1, start + 2, start + 3, start + 4]);
    assert_eq!(
        events.last(),
        Some(&TimelineEvent::MessageRemoved {
            id: a.id,
            reason: RemovalReason::Expired,
            revision: start + 4,
        })
    );
}

#[tokio::test(start_paused = true)]
async fn countdown_is_published_while_pending() {
    let mut session = session(8);
    let mut ticks = session.subscribe_countdown();
    let msg = session.send("soon gone", VanishPreset::TenSeconds).unwrap();

    tokio::time::sleep(Duration::from_millis(3_500)).await;
    let mut seen = Vec::new();
    while let Ok(tick) = ticks.try_recv() {
        assert_eq!(tick.id, msg.id);
        seen.push(tick.remaining_secs);
    }
    assert_eq!(seen, vec![9, 8, 7]);
}
