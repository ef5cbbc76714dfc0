//! Embedded third-party chat widget.
//!
//! The widget is an independent collaborator of the chat engine: a remote
//! script is loaded, then its init entry point is called with a target
//! selector and webhook endpoint. Activation is observable as
//! `Idle → Loading → Ready | Error` and never panics.

pub mod config;
pub mod error;
pub mod host;
pub mod widget;

pub use config::WidgetConfig;
pub use error::WidgetError;
pub use host::{HttpWidgetHost, WidgetHost};
pub use widget::{EmbeddedWidget, WidgetState};
