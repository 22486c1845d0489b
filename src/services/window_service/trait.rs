use crate::config::EndpointConfig;
use crate::error::Result;
use zbus::Connection;

/// Сырая строка ответа List: (id, title, class, icon)
pub type RawWindow = (i32, String, String, String);

/// Transport to the window-management service.
///
/// Implementations only move data: no filtering, no status interpretation,
/// no timeouts. Those belong to `WindowCatalogClient`.
#[async_trait::async_trait]
pub trait WindowService: Send + Sync {
    /// `List() -> a(isss)`
    async fn list(&self) -> Result<Vec<RawWindow>>;

    /// `Activate(i) -> s`
    async fn activate(&self, id: i32) -> Result<String>;
}

/// Factory function to create an appropriate window service based on the dry_run flag
pub async fn create_window_service(
    endpoint: &EndpointConfig,
    connection: Option<&Connection>,
    dry_run: bool,
) -> Result<Box<dyn WindowService>> {
    if dry_run {
        return Ok(Box::new(super::dry_run::DryRunWindowService::new()));
    }

    let service = match connection {
        Some(connection) => super::dbus::DbusWindowService::new(connection, endpoint).await?,
        None => super::dbus::DbusWindowService::connect(endpoint).await?,
    };
    Ok(Box::new(service))
}
