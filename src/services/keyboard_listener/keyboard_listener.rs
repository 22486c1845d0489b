use crate::config::Config;
use crate::error::{SwitcherError, Result};
use crate::events::SwitcherEvent;
use crate::utils::DeviceFinder;
use evdev::{Device, EventStream, EventType, KeyCode};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use super::key_forwarder::{Forwarded, KeyForwarder};
use super::r#trait::KeyboardListenerTrait;

/// Источник событий клавиш с возможностью эксклюзивного захвата
#[async_trait::async_trait]
pub trait KeySource: Send {
    /// Следующее событие клавиши: код и значение (0, 1 или 2)
    async fn next_key(&mut self) -> io::Result<(KeyCode, i32)>;

    fn set_grab(&mut self, grab: bool) -> io::Result<()>;
}

#[async_trait::async_trait]
impl KeySource for EventStream {
    async fn next_key(&mut self) -> io::Result<(KeyCode, i32)> {
        loop {
            let event = self.next_event().await?;
            if event.event_type() == EventType::KEY {
                return Ok((KeyCode::new(event.code()), event.value()));
            }
        }
    }

    fn set_grab(&mut self, grab: bool) -> io::Result<()> {
        let device = self.device_mut();
        if grab {
            device.grab()
        } else {
            device.ungrab()
        }
    }
}

pub struct RealKeyboardListener<S: KeySource = EventStream> {
    source: S,
    device_path: PathBuf,
    forwarder: KeyForwarder,
    visibility: watch::Receiver<bool>,
    grab_enabled: bool,
    grabbed: bool,
}

impl RealKeyboardListener {
    pub fn new(
        config: Arc<Config>,
        events: mpsc::Sender<SwitcherEvent>,
        visibility: watch::Receiver<bool>,
    ) -> Result<Self> {
        info!("Инициализация RealKeyboardListener");

        let device_path = DeviceFinder::find_keyboard_device(&config.input.device_path)?;

        let device = Device::open(&device_path).map_err(|e| {
            SwitcherError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        Self::log_device(&device);

        // Поток событий регистрируется в реакторе tokio, поэтому создаётся внутри runtime
        let stream = device.into_event_stream()?;

        Ok(Self::with_source(
            stream,
            device_path,
            events,
            visibility,
            config.input.grab,
        ))
    }

    fn log_device(device: &Device) {
        info!("Устройство: {}", device.name().unwrap_or("Unknown"));
        info!("Физический путь: {:?}", device.physical_path());
        info!("Уникальный ID: {:?}", device.unique_name());
    }
}

impl<S: KeySource> RealKeyboardListener<S> {
    pub fn with_source(
        source: S,
        device_path: PathBuf,
        events: mpsc::Sender<SwitcherEvent>,
        visibility: watch::Receiver<bool>,
        grab_enabled: bool,
    ) -> Self {
        Self {
            source,
            device_path,
            forwarder: KeyForwarder::new(events, visibility.clone()),
            visibility,
            grab_enabled,
            grabbed: false,
        }
    }

    /// Чтение событий и захват устройства в одном цикле.
    ///
    /// Ожидание асинхронное, поэтому abort задачи останавливает чтение сразу,
    /// а Drop отпускает захваченное устройство.
    async fn run_impl(mut self) -> Result<()> {
        info!("RealKeyboardListener запущен, начинаем чтение событий");

        self.sync_grab();

        loop {
            tokio::select! {
                changed = self.visibility.changed() => {
                    if changed.is_err() {
                        info!("Контроллер остановлен, завершаем чтение клавиатуры");
                        return Ok(());
                    }
                    self.sync_grab();
                }
                key = self.source.next_key() => {
                    let (key_code, value) = key.map_err(|e| {
                        error!("Ошибка чтения событий: {}", e);
                        SwitcherError::Io(e)
                    })?;

                    if self.forwarder.forward(key_code, value).await == Forwarded::Closed {
                        info!("Контроллер остановлен, завершаем чтение клавиатуры");
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Захватываем устройство, пока переключатель показан, и отпускаем после скрытия
    fn sync_grab(&mut self) {
        if !self.grab_enabled {
            return;
        }

        let visible = *self.visibility.borrow_and_update();
        if visible == self.grabbed {
            return;
        }

        match self.source.set_grab(visible) {
            Ok(()) => {
                self.grabbed = visible;
                debug!("Устройство {}", if visible { "захвачено" } else { "освобождено" });
            }
            Err(e) => {
                Self::log_grab_error(&self.device_path, &e);
                // Не повторяем попытку при каждой смене видимости
                self.grab_enabled = false;
            }
        }
    }

    fn log_grab_error(device_path: &Path, e: &io::Error) {
        warn!(
            "Не удалось захватить устройство {}: {}",
            device_path.display(),
            e
        );
        warn!("Ввод будет доступен и другим приложениям. Попробуйте:");
        warn!("1. Добавить пользователя в группу input: sudo usermod -a -G input $USER");
        warn!("2. Перезайти в систему после добавления в группу");
    }
}

#[async_trait::async_trait]
impl<S: KeySource + 'static> KeyboardListenerTrait for RealKeyboardListener<S> {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}

impl<S: KeySource> Drop for RealKeyboardListener<S> {
    fn drop(&mut self) {
        if self.grabbed {
            info!("Освобождение захваченного устройства");
            if let Err(e) = self.source.set_grab(false) {
                error!("Не удалось освободить устройство: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::KeyInput;
    use crate::services::keyboard_listener::key_forwarder::KEY_PRESSED;
    use parking_lot::Mutex;
    use tokio::time::{sleep, Duration};

    /// Клавиатура без железа: события приходят из канала, захваты записываются
    struct FakeKeyboard {
        keys: mpsc::UnboundedReceiver<(KeyCode, i32)>,
        grabs: Arc<Mutex<Vec<bool>>>,
    }

    #[async_trait::async_trait]
    impl KeySource for FakeKeyboard {
        async fn next_key(&mut self) -> io::Result<(KeyCode, i32)> {
            match self.keys.recv().await {
                Some(key) => Ok(key),
                None => std::future::pending().await,
            }
        }

        fn set_grab(&mut self, grab: bool) -> io::Result<()> {
            self.grabs.lock().push(grab);
            Ok(())
        }
    }

    struct Harness {
        keys: mpsc::UnboundedSender<(KeyCode, i32)>,
        grabs: Arc<Mutex<Vec<bool>>>,
        events: mpsc::Receiver<SwitcherEvent>,
        visibility: watch::Sender<bool>,
        handle: tokio::task::JoinHandle<Result<()>>,
    }

    fn spawn_listener() -> Harness {
        let (keys_tx, keys_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::channel(8);
        let (visibility_tx, visibility_rx) = watch::channel(false);
        let grabs = Arc::new(Mutex::new(Vec::new()));

        let listener = RealKeyboardListener::with_source(
            FakeKeyboard { keys: keys_rx, grabs: grabs.clone() },
            PathBuf::from("/dev/input/fake"),
            events_tx,
            visibility_rx,
            true,
        );
        let handle = tokio::spawn(Box::new(listener).run());

        Harness {
            keys: keys_tx,
            grabs,
            events: events_rx,
            visibility: visibility_tx,
            handle,
        }
    }

    async fn settle() {
        sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_grab_follows_visibility_without_key_events() {
        let harness = spawn_listener();
        settle().await;
        assert!(harness.grabs.lock().is_empty());

        harness.visibility.send_replace(true);
        settle().await;
        assert_eq!(*harness.grabs.lock(), vec![true]);

        harness.visibility.send_replace(false);
        settle().await;
        assert_eq!(*harness.grabs.lock(), vec![true, false]);

        harness.handle.abort();
    }

    #[tokio::test]
    async fn test_abort_stops_reading_and_releases_grab() {
        let harness = spawn_listener();
        harness.visibility.send_replace(true);
        settle().await;

        harness.handle.abort();
        let result = tokio::time::timeout(Duration::from_secs(1), harness.handle).await;
        assert!(result.expect("чтение не остановилось").unwrap_err().is_cancelled());
        assert_eq!(*harness.grabs.lock(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_only_keys_typed_while_visible_are_forwarded() {
        let mut harness = spawn_listener();

        harness.keys.send((KeyCode::KEY_P, KEY_PRESSED)).unwrap();
        settle().await;
        assert!(harness.events.try_recv().is_err());

        harness.visibility.send_replace(true);
        settle().await;
        harness.keys.send((KeyCode::KEY_G, KEY_PRESSED)).unwrap();
        harness.keys.send((KeyCode::KEY_G, 0)).unwrap();

        let event = tokio::time::timeout(Duration::from_secs(1), harness.events.recv())
            .await
            .unwrap();
        assert_eq!(event, Some(SwitcherEvent::Key(KeyInput::Char('g'))));
        settle().await;
        assert!(harness.events.try_recv().is_err());

        harness.handle.abort();
    }

    #[tokio::test]
    async fn test_stops_when_controller_is_gone() {
        let harness = spawn_listener();
        drop(harness.visibility);

        let result = tokio::time::timeout(Duration::from_secs(1), harness.handle).await;
        assert!(result.unwrap().unwrap().is_ok());
    }
}
