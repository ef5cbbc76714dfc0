use thiserror::Error;

/// Reasons a send intent is turned away. Rejection never touches the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("message is empty")]
    Empty,

    #[error("message too long ({len} chars, max {max})")]
    TooLong { len: usize, max: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}
