use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::config::InitOptions;
use crate::error::WidgetError;

const LOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// Environment able to load the widget script and call its entry point.
pub trait WidgetHost {
    fn load_script(&self, url: &str) -> impl Future<Output = Result<(), WidgetError>> + Send;

    fn init(&self, entry_point: &str, options: &InitOptions) -> Result<(), WidgetError>;
}

/// Host that fetches the script over HTTP and checks it exposes the entry
/// point before accepting the init call.
pub struct HttpWidgetHost {
    client: reqwest::Client,
    script: Mutex<Option<String>>,
}

impl HttpWidgetHost {
    pub fn new() -> Result<Self, WidgetError> {
        let client = reqwest::Client::builder().timeout(LOAD_TIMEOUT).build()?;
        Ok(Self {
            client,
            script: Mutex::new(None),
        })
    }
}

impl WidgetHost for HttpWidgetHost {
    async fn load_script(&self, url: &str) -> Result<(), WidgetError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(WidgetError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        debug!("Loaded widget script from {} ({} bytes)", url, body.len());
        *self.script.lock().unwrap_or_else(PoisonError::into_inner) = Some(body);
        Ok(())
    }

    fn init(&self, entry_point: &str, options: &InitOptions) -> Result<(), WidgetError> {
        let script = self.script.lock().unwrap_or_else(PoisonError::into_inner);
        match script.as_deref() {
            None => Err(WidgetError::Init("script not loaded".into())),
            Some(body) if !body.contains(entry_point) => Err(WidgetError::Init(format!(
                "script does not expose {entry_point}"
            ))),
            Some(_) => {
                debug!(selector = %options.target, "widget initialized");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;

    #[test]
    fn init_before_load_fails() {
        let host = HttpWidgetHost::new().unwrap();
        let options = WidgetConfig::new("https://a.example/x.js", "https://b.example/hook").init_options();
        assert!(matches!(
            host.init("n8nChat", &options),
            Err(WidgetError::Init(_))
        ));
    }

    #[test]
    fn init_checks_entry_point() {
        let host = HttpWidgetHost::new().unwrap();
        *host.script.lock().unwrap() = Some("window.n8nChat = { init() {} };".into());
        let options = WidgetConfig::new("https://a.example/x.js", "https://b.example/hook").init_options();

        assert!(host.init("n8nChat", &options).is_ok());
        assert!(host.init("otherChat", &options).is_err());
    }
}
