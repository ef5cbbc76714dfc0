//! Display-ready projections of the timeline and roster.

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

use vanish_types::models::{Message, MessageId, User, UserId};

use crate::roster::Roster;
use crate::scheduler::VanishScheduler;

/// Countdowns at or below this are highlighted.
pub const URGENT_THRESHOLD_SECS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownView {
    pub remaining_secs: u32,
    pub label: String,
    pub urgent: bool,
}

impl CountdownView {
    pub fn new(remaining_secs: u32) -> Self {
        let label = if remaining_secs > 0 {
            format!("Vanishes in {remaining_secs}s")
        } else {
            "Vanishing...".to_string()
        };
        Self {
            remaining_secs,
            label,
            urgent: remaining_secs <= URGENT_THRESHOLD_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub id: MessageId,
    pub short_id: String,
    /// "You" for own messages, the author's name otherwise.
    pub author: String,
    pub avatar_initial: char,
    pub time_label: String,
    pub content: String,
    pub is_own: bool,
    pub is_system: bool,
    pub countdown: Option<CountdownView>,
    /// Only own messages offer a delete affordance.
    pub deletable: bool,
}

impl MessageView {
    pub fn new<Tz>(message: &Message, remaining_secs: Option<u32>, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let author = if message.is_own {
            "You".to_string()
        } else {
            message.author_username.clone()
        };

        Self {
            id: message.id,
            short_id: message.id.short(),
            author,
            avatar_initial: initial(&message.author_username),
            time_label: format_clock(&message.created_at, tz),
            content: message.content.clone(),
            is_own: message.is_own,
            is_system: message.is_system(),
            countdown: remaining_secs.map(CountdownView::new),
            deletable: message.is_own && !message.is_system(),
        }
    }
}

/// Project a timeline snapshot, attaching countdowns for pending expiries.
pub fn timeline_view<Tz>(messages: &[Message], scheduler: &VanishScheduler, tz: &Tz) -> Vec<MessageView>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    messages
        .iter()
        .map(|m| MessageView::new(m, scheduler.remaining_secs(m.id), tz))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub initial: char,
    pub status: &'static str,
    pub is_you: bool,
}

impl UserView {
    fn new(user: &User, is_you: bool) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            initial: initial(&user.username),
            status: if user.online { "Online" } else { "Offline" },
            is_you,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterView {
    /// e.g. "4 online, 2 offline"
    pub header: String,
    pub you: UserView,
    /// Online peers, local user excluded.
    pub online: Vec<UserView>,
    pub offline: Vec<UserView>,
}

impl RosterView {
    pub fn new(roster: &Roster) -> Self {
        let presence = roster.presence();
        Self {
            header: format!(
                "{} online, {} offline",
                presence.online.len(),
                presence.offline.len()
            ),
            you: UserView::new(roster.local_user(), true),
            online: roster
                .online_peers()
                .into_iter()
                .map(|u| UserView::new(u, false))
                .collect(),
            offline: roster
                .offline_peers()
                .into_iter()
                .map(|u| UserView::new(u, false))
                .collect(),
        }
    }
}

/// 12-hour clock, e.g. `03:07 PM`.
pub fn format_clock<Tz>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(tz).format("%I:%M %p").to_string()
}

fn initial(name: &str) -> char {
    name.chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}
