use crate::config::EndpointConfig;
use crate::error::{SwitcherError, Result};
use tracing::{debug, info};
use zbus::{Connection, Proxy};

use super::r#trait::{RawWindow, WindowService};

/// Клиент сервиса TabFix на сессионной шине
pub struct DbusWindowService {
    proxy: Proxy<'static>,
}

impl DbusWindowService {
    pub async fn connect(endpoint: &EndpointConfig) -> Result<Self> {
        info!("Подключение к сессионной шине D-Bus");

        let connection = Connection::session().await.map_err(SwitcherError::DBus)?;

        Self::new(&connection, endpoint).await
    }

    pub async fn new(connection: &Connection, endpoint: &EndpointConfig) -> Result<Self> {
        let proxy = Proxy::new(
            connection,
            endpoint.bus_name.clone(),
            endpoint.object_path.clone(),
            endpoint.interface.clone(),
        )
        .await?;

        info!(
            "Сервис окон: {} {} ({})",
            endpoint.bus_name, endpoint.object_path, endpoint.interface
        );

        Ok(Self { proxy })
    }
}

#[async_trait::async_trait]
impl WindowService for DbusWindowService {
    async fn list(&self) -> Result<Vec<RawWindow>> {
        debug!("Вызов List");
        let windows: Vec<RawWindow> = self
            .proxy
            .call("List", &())
            .await
            .map_err(|e| SwitcherError::transport("List", e))?;

        debug!("List вернул {} окон", windows.len());
        Ok(windows)
    }

    async fn activate(&self, id: i32) -> Result<String> {
        debug!("Вызов Activate({})", id);
        let status: String = self
            .proxy
            .call("Activate", &(id,))
            .await
            .map_err(|e| SwitcherError::transport("Activate", e))?;

        Ok(status)
    }
}
