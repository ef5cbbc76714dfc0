use thiserror::Error;

#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("invalid widget config: {0}")]
    InvalidConfig(String),

    #[error("failed to load widget script: {0}")]
    Load(#[from] reqwest::Error),

    #[error("widget script returned HTTP {0}")]
    Status(u16),

    #[error("widget init failed: {0}")]
    Init(String),
}
