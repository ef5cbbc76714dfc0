//! Ephemeral message lifecycle engine.
//!
//! A session owns one local timeline: messages are appended by the composer
//! or the bootstrap, optionally scheduled to vanish, and removed either by
//! their expiry timer or by a delete intent. Render surfaces observe the
//! store through [`MessageStore::subscribe`] and read the roster directly.

pub mod bootstrap;
pub mod composer;
pub mod config;
pub mod error;
pub mod random;
pub mod roster;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod view;

pub use config::EngineConfig;
pub use error::{ComposeError, ConfigError};
pub use session::{ChatSession, IntentOutcome};
pub use store::MessageStore;
pub use scheduler::VanishScheduler;
