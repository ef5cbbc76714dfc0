use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Character limit shown by the composer counter.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 500;

/// Cadence of the cosmetic countdown.
pub const DEFAULT_COUNTDOWN_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Seed for the session's random source. `None` draws from the OS.
    pub seed: Option<u64>,
    /// Maximum message length in characters.
    pub max_message_len: usize,
    /// Period between countdown ticks.
    pub countdown_tick: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            countdown_tick: DEFAULT_COUNTDOWN_TICK,
        }
    }
}

impl EngineConfig {
    /// Read `VANISH_SEED`, `VANISH_MAX_MESSAGE_LEN` and `VANISH_COUNTDOWN_TICK_MS`
    /// from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with a caller-supplied lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let seed = parse_var(&lookup, "VANISH_SEED")?;

        let max_message_len = parse_var(&lookup, "VANISH_MAX_MESSAGE_LEN")?
            .unwrap_or(defaults.max_message_len);
        if max_message_len == 0 {
            return Err(ConfigError::Invalid {
                key: "VANISH_MAX_MESSAGE_LEN",
                value: "0".into(),
            });
        }

        let countdown_tick = match parse_var::<u64, _>(&lookup, "VANISH_COUNTDOWN_TICK_MS")? {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    key: "VANISH_COUNTDOWN_TICK_MS",
                    value: "0".into(),
                });
            }
            Some(ms) => Duration::from_millis(ms),
            None => defaults.countdown_tick,
        };

        Ok(Self {
            seed,
            max_message_len,
            countdown_tick,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
