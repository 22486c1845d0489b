use crate::config::HotkeyConfig;
use crate::error::Result;
use crate::events::SwitcherEvent;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};
use zbus::{connection, interface, Connection};

/// Точка входа для внешнего процесса горячей клавиши.
///
/// ShowWindow ничего не возвращает и не ждёт контроллер: запрос только
/// ставится в очередь событий.
pub struct HotkeyService {
    events: mpsc::Sender<SwitcherEvent>,
}

impl HotkeyService {
    pub fn new(events: mpsc::Sender<SwitcherEvent>) -> Self {
        Self { events }
    }

    fn request_show(&self) {
        match self.events.try_send(SwitcherEvent::Show) {
            Ok(()) => debug!("ShowWindow поставлен в очередь"),
            Err(TrySendError::Full(_)) => warn!("Очередь событий переполнена, ShowWindow отброшен"),
            Err(TrySendError::Closed(_)) => warn!("Контроллер остановлен, ShowWindow проигнорирован"),
        }
    }
}

#[interface(name = "org.phnk.TabFixHotkey")]
impl HotkeyService {
    async fn show_window(&self) {
        info!("Получен ShowWindow");
        self.request_show();
    }
}

/// Регистрирует имя на сессионной шине и публикует HotkeyService.
///
/// Возвращённое соединение нужно держать живым, им же пользуется клиент TabFix.
pub async fn serve_hotkey(config: &HotkeyConfig, events: mpsc::Sender<SwitcherEvent>) -> Result<Connection> {
    info!(
        "Регистрация сервиса горячей клавиши {} по пути {}",
        config.bus_name, config.object_path
    );

    let connection = connection::Builder::session()?
        .name(config.bus_name.as_str())?
        .serve_at(config.object_path.as_str(), HotkeyService::new(events))?
        .build()
        .await?;

    info!("Сервис горячей клавиши зарегистрирован");
    Ok(connection)
}
