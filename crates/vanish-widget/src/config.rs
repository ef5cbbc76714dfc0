use reqwest::Url;
use serde::Serialize;

use crate::error::WidgetError;

pub const DEFAULT_TARGET: &str = "#n8n-chat";

/// Global the script is expected to expose.
pub const DEFAULT_ENTRY_POINT: &str = "n8nChat";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetMode {
    Embedded,
    Window,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub script_url: String,
    pub webhook_url: String,
    pub target: String,
    pub mode: WidgetMode,
    pub entry_point: String,
}

/// Argument handed to the widget's init entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitOptions {
    pub webhook_url: String,
    pub target: String,
    pub mode: WidgetMode,
}

impl WidgetConfig {
    pub fn new(script_url: impl Into<String>, webhook_url: impl Into<String>) -> Self {
        Self {
            script_url: script_url.into(),
            webhook_url: webhook_url.into(),
            target: DEFAULT_TARGET.to_string(),
            mode: WidgetMode::Embedded,
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), WidgetError> {
        for (name, raw) in [("script_url", &self.script_url), ("webhook_url", &self.webhook_url)] {
            let url = Url::parse(raw)
                .map_err(|e| WidgetError::InvalidConfig(format!("{name} {raw:?}: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(WidgetError::InvalidConfig(format!(
                    "{name} must be http(s), got {raw:?}"
                )));
            }
        }
        if self.target.len() < 2 || !self.target.starts_with('#') {
            return Err(WidgetError::InvalidConfig(format!(
                "target must be an id selector, got {:?}",
                self.target
            )));
        }
        if self.entry_point.is_empty() {
            return Err(WidgetError::InvalidConfig("entry point is empty".into()));
        }
        Ok(())
    }

    pub fn init_options(&self) -> InitOptions {
        InitOptions {
            webhook_url: self.webhook_url.clone(),
            target: self.target.clone(),
            mode: self.mode,
        }
    }
}
