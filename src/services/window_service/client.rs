use crate::catalog::WindowCatalog;
use crate::error::{SwitcherError, Result};
use crate::events::WindowRecord;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::r#trait::WindowService;

/// Единственный статус Activate, который считается успехом
pub const ACTIVATE_OK: &str = "OK";

/// Request/response wrapper over a `WindowService`.
///
/// Owns no state between calls. Adds the call timeout, catalog construction
/// (shell filtering + stable title sort) and interpretation of the Activate status.
pub struct WindowCatalogClient {
    service: Box<dyn WindowService>,
    shell_class: String,
    call_timeout: Duration,
}

impl WindowCatalogClient {
    pub fn new(service: Box<dyn WindowService>, shell_class: impl Into<String>, call_timeout: Duration) -> Self {
        Self {
            service,
            shell_class: shell_class.into(),
            call_timeout,
        }
    }

    pub async fn list(&self) -> Result<WindowCatalog> {
        let raw = self.bounded("List", self.service.list()).await?;
        let received = raw.len();

        let catalog = WindowCatalog::build(raw.into_iter().map(WindowRecord::from), &self.shell_class);
        debug!("Каталог: {} из {} окон", catalog.len(), received);

        Ok(catalog)
    }

    pub async fn activate(&self, id: i32) -> Result<()> {
        let status = self.bounded("Activate", self.service.activate(id)).await?;

        if status == ACTIVATE_OK {
            debug!("Окно {} активировано", id);
            Ok(())
        } else {
            Err(SwitcherError::ActivationRejected { id, status })
        }
    }

    async fn bounded<T, F>(&self, method: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!("{} не ответил за {:?}", method, self.call_timeout);
                Err(SwitcherError::Timeout {
                    method: method.to_string(),
                    timeout_ms: self.call_timeout.as_millis() as u64,
                })
            }
        }
    }
}
