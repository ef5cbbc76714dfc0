use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::MessageId;

/// Auto-vanish choices offered by the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VanishPreset {
    TenSeconds,
    ThirtySeconds,
    OneMinute,
    FiveMinutes,
    #[default]
    Forever,
}

impl VanishPreset {
    pub const ALL: [VanishPreset; 5] = [
        Self::TenSeconds,
        Self::ThirtySeconds,
        Self::OneMinute,
        Self::FiveMinutes,
        Self::Forever,
    ];

    /// Time-to-live in seconds, `None` for `Forever`.
    pub fn secs(self) -> Option<u32> {
        match self {
            Self::TenSeconds => Some(10),
            Self::ThirtySeconds => Some(30),
            Self::OneMinute => Some(60),
            Self::FiveMinutes => Some(300),
            Self::Forever => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TenSeconds => "10s",
            Self::ThirtySeconds => "30s",
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::Forever => "Forever",
        }
    }

    /// Case-insensitive lookup by label (`"1m"`, `"forever"`, ...).
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for VanishPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Intents raised by a render surface and handled by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Intent {
    /// Submit the given text, optionally vanishing after the preset elapses.
    Send { text: String, vanish: VanishPreset },

    /// Remove a message before it expires.
    Delete { message_id: MessageId },
}
