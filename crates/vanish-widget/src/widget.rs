use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::WidgetConfig;
use crate::error::WidgetError;
use crate::host::WidgetHost;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetState {
    /// Not activated yet
    Idle,
    Loading,
    Ready,
    /// Load or init failed; stays here until [`EmbeddedWidget::reset`]
    Error(String),
}

impl WidgetState {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready | Self::Error(_))
    }
}

/// Activation state machine for the embedded widget.
pub struct EmbeddedWidget {
    config: WidgetConfig,
    state_tx: watch::Sender<WidgetState>,
}

impl EmbeddedWidget {
    pub fn new(config: WidgetConfig) -> Self {
        let (state_tx, _) = watch::channel(WidgetState::Idle);
        Self { config, state_tx }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn state(&self) -> WidgetState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.state_tx.subscribe()
    }

    /// Load the script and call its entry point once. Calling again after
    /// activation started returns the current state without retrying.
    pub async fn activate<H: WidgetHost>(&self, host: &H) -> WidgetState {
        let started = self.state_tx.send_if_modified(|state| {
            if *state == WidgetState::Idle {
                *state = WidgetState::Loading;
                true
            } else {
                false
            }
        });
        if !started {
            return self.state();
        }

        info!("Loading chat widget from {}", self.config.script_url);

        let result = match self.config.validate() {
            Ok(()) => match host.load_script(&self.config.script_url).await {
                Ok(()) => host.init(&self.config.entry_point, &self.config.init_options()),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        let state = match result {
            Ok(()) => {
                info!("Chat widget ready in {}", self.config.target);
                WidgetState::Ready
            }
            Err(e) => {
                warn!("Chat widget failed: {}", e);
                WidgetState::Error(e.to_string())
            }
        };
        self.state_tx.send_replace(state.clone());
        state
    }

    /// Record a failure that happened before activation could start, such as
    /// the host itself failing to come up.
    pub fn mark_failed(&self, error: &WidgetError) -> WidgetState {
        warn!("Chat widget failed: {}", error);
        self.state_tx.send_if_modified(|state| {
            if *state == WidgetState::Ready {
                false
            } else {
                *state = WidgetState::Error(error.to_string());
                true
            }
        });
        self.state()
    }

    /// Return a failed widget to `Idle` so it can be activated again.
    pub fn reset(&self) -> bool {
        self.state_tx.send_if_modified(|state| {
            if matches!(state, WidgetState::Error(_)) {
                *state = WidgetState::Idle;
                true
            } else {
                false
            }
        })
    }
}
