use crate::catalog::{MnemonicAssigner, WindowCatalog};
use crate::error::{SwitcherError, Result};
use crate::events::{KeyInput, SwitcherEvent};
use crate::services::window_service::WindowCatalogClient;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use super::feedback::FlashTimer;
use super::matcher::{InputMatcher, MatchOutcome};
use super::presenter::{Presenter, SwitcherView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    /// Каталог получен, переключатель показан с указанным числом окон
    Shown(usize),
    /// Переключатель уже был показан, только подняли его
    Raised,
}

#[derive(Debug)]
pub enum KeyOutcome {
    /// Переключатель скрыт, нажатие не обрабатывается
    Ignored,
    Pending,
    Flashed,
    Dismissed,
    Activated(i32),
    ActivationFailed { id: i32, error: SwitcherError },
}

/// Glue between the triggers (ShowWindow, key presses) and the core.
///
/// The only owner of lifecycle state: current catalog, matcher (mapping +
/// buffer) and visibility. Everything runs on the task that calls into it, so
/// none of this state is shared or locked.
pub struct SwitcherController {
    client: WindowCatalogClient,
    presenter: Arc<dyn Presenter>,
    flash: FlashTimer,
    catalog: WindowCatalog,
    matcher: InputMatcher,
    visibility: watch::Sender<bool>,
}

impl SwitcherController {
    pub fn new(client: WindowCatalogClient, presenter: Arc<dyn Presenter>, flash: FlashTimer) -> Self {
        let (visibility, _) = watch::channel(false);

        Self {
            client,
            presenter,
            flash,
            catalog: WindowCatalog::empty(),
            matcher: InputMatcher::new(),
            visibility,
        }
    }

    /// Подписка на видимость, нужна слушателю клавиатуры для захвата устройства
    pub fn subscribe_visibility(&self) -> watch::Receiver<bool> {
        self.visibility.subscribe()
    }

    pub fn is_visible(&self) -> bool {
        *self.visibility.borrow()
    }

    pub fn view(&self) -> SwitcherView {
        if self.is_visible() {
            SwitcherView::project(&self.catalog, self.matcher.mapping(), self.matcher.buffer())
        } else {
            SwitcherView::hidden()
        }
    }

    pub async fn show(&mut self) -> Result<ShowOutcome> {
        if self.is_visible() {
            self.presenter.raise();
            return Ok(ShowOutcome::Raised);
        }

        // При ошибке остаёмся скрытыми: каталог и карта уже пусты после прошлого hide
        let catalog = self.client.list().await?;
        let mapping = MnemonicAssigner::assign(&catalog);

        info!(
            "Показ переключателя: {} окон, {} кодов",
            catalog.len(),
            mapping.len()
        );

        self.catalog = catalog;
        self.matcher.load(mapping);
        self.visibility.send_replace(true);
        self.render();

        Ok(ShowOutcome::Shown(self.catalog.len()))
    }

    pub async fn handle_key(&mut self, key: KeyInput) -> KeyOutcome {
        // Содержимое нажатий вне показа не логируется
        if !self.is_visible() {
            return KeyOutcome::Ignored;
        }

        match self.matcher.feed(key) {
            None => {
                self.render();
                KeyOutcome::Pending
            }
            Some(MatchOutcome::Invalid) => {
                self.flash.trigger();
                self.render();
                KeyOutcome::Flashed
            }
            Some(MatchOutcome::Reset) => {
                self.hide();
                KeyOutcome::Dismissed
            }
            Some(MatchOutcome::Resolved(id)) => {
                // Скрываемся до вызова: неудачная активация переключатель не возвращает
                self.hide();
                match self.client.activate(id).await {
                    Ok(()) => KeyOutcome::Activated(id),
                    Err(error) => KeyOutcome::ActivationFailed { id, error },
                }
            }
        }
    }

    /// Скрытие всегда очищает строки, карту и буфер
    pub fn hide(&mut self) {
        if !self.is_visible() {
            return;
        }

        self.flash.cancel();
        self.catalog = WindowCatalog::empty();
        self.matcher.clear();
        self.visibility.send_replace(false);
        self.presenter.render(&SwitcherView::hidden());
    }

    pub async fn handle_event(&mut self, event: SwitcherEvent) {
        match event {
            SwitcherEvent::Show => match self.show().await {
                Ok(ShowOutcome::Shown(count)) => debug!("Показано {} окон", count),
                Ok(ShowOutcome::Raised) => {}
                Err(e) if e.is_transport() => {
                    warn!("Не удалось получить список окон, переключатель не открыт: {}", e)
                }
                Err(e) => error!("Ошибка показа переключателя: {}", e),
            },
            SwitcherEvent::Key(key) => match self.handle_key(key).await {
                KeyOutcome::Activated(id) => info!("Активировано окно {}", id),
                KeyOutcome::ActivationFailed { id, error } if error.is_transport() => {
                    error!("Activate({}) не выполнен: {}", id, error)
                }
                KeyOutcome::ActivationFailed { error, .. } => warn!("{}", error),
                KeyOutcome::Dismissed => debug!("Переключатель закрыт по Escape"),
                KeyOutcome::Flashed => debug!("Неверный код"),
                KeyOutcome::Pending | KeyOutcome::Ignored => {}
            },
        }
    }

    /// Главный цикл: события обрабатываются строго по одному в порядке поступления
    pub async fn run(mut self, mut events: mpsc::Receiver<SwitcherEvent>) {
        info!("SwitcherController запущен");

        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }

        self.hide();
        info!("SwitcherController остановлен: источники событий закрыты");
    }

    fn render(&self) {
        self.presenter.render(&self.view());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::window_service::{RawWindow, WindowService};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// None в очереди ответов List означает ошибку транспорта
    #[derive(Default)]
    struct FakeState {
        list_replies: VecDeque<Option<Vec<RawWindow>>>,
        list_calls: usize,
        activations: Vec<i32>,
        status: Option<String>,
    }

    #[derive(Clone, Default)]
    struct FakeService(Arc<Mutex<FakeState>>);

    impl FakeService {
        fn reply(&self, windows: Option<Vec<RawWindow>>) -> &Self {
            self.0.lock().list_replies.push_back(windows);
            self
        }

        fn set_status(&self, status: &str) {
            self.0.lock().status = Some(status.to_string());
        }

        fn list_calls(&self) -> usize {
            self.0.lock().list_calls
        }

        fn activations(&self) -> Vec<i32> {
            self.0.lock().activations.clone()
        }
    }

    #[async_trait::async_trait]
    impl WindowService for FakeService {
        async fn list(&self) -> Result<Vec<RawWindow>> {
            let mut state = self.0.lock();
            state.list_calls += 1;
            match state.list_replies.pop_front().flatten() {
                Some(windows) => Ok(windows),
                None => Err(SwitcherError::transport("List", "ServiceUnknown")),
            }
        }

        async fn activate(&self, id: i32) -> Result<String> {
            let mut state = self.0.lock();
            state.activations.push(id);
            Ok(state.status.clone().unwrap_or_else(|| "OK".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        views: Mutex<Vec<SwitcherView>>,
        raises: Mutex<usize>,
        flashes: Mutex<Vec<bool>>,
    }

    impl Presenter for RecordingPresenter {
        fn render(&self, view: &SwitcherView) {
            self.views.lock().push(view.clone());
        }

        fn raise(&self) {
            *self.raises.lock() += 1;
        }

        fn set_flash(&self, active: bool) {
            self.flashes.lock().push(active);
        }
    }

    fn raw(id: i32, title: &str, class: &str) -> RawWindow {
        (id, title.to_string(), class.to_string(), String::new())
    }

    fn example_windows() -> Vec<RawWindow> {
        vec![raw(10, "", "Firefox"), raw(11, "", "firefox"), raw(12, "", "Gimp")]
    }

    fn controller(service: &FakeService) -> (SwitcherController, Arc<RecordingPresenter>) {
        let presenter = Arc::new(RecordingPresenter::default());
        let client = WindowCatalogClient::new(
            Box::new(service.clone()),
            "Gnome-shell",
            Duration::from_millis(200),
        );
        let flash = FlashTimer::new(presenter.clone(), Duration::from_millis(200));
        (SwitcherController::new(client, presenter.clone(), flash), presenter)
    }

    async fn type_keys(controller: &mut SwitcherController, keys: &str) -> Vec<KeyOutcome> {
        let mut outcomes = Vec::new();
        for c in keys.chars() {
            outcomes.push(controller.handle_key(KeyInput::char(c)).await);
        }
        outcomes
    }

    #[tokio::test]
    async fn test_show_then_select_second_firefox() {
        let service = FakeService::default();
        service.reply(Some(example_windows()));
        let (mut controller, presenter) = controller(&service);

        assert_eq!(controller.show().await.unwrap(), ShowOutcome::Shown(3));
        assert!(controller.is_visible());

        let codes: Vec<String> = controller
            .view()
            .rows
            .iter()
            .map(|row| row.code.map(|c| c.to_string()).unwrap_or_default())
            .collect();
        assert_eq!(codes, vec!["fa", "fb", "ga"]);

        let outcomes = type_keys(&mut controller, "fB").await;
        assert!(matches!(outcomes[0], KeyOutcome::Pending));
        assert!(matches!(outcomes[1], KeyOutcome::Activated(11)));
        assert!(!controller.is_visible());
        assert_eq!(service.activations(), vec![11]);
        assert_eq!(presenter.views.lock().last(), Some(&SwitcherView::hidden()));
    }

    #[tokio::test]
    async fn test_invalid_code_flashes_and_session_continues() {
        let service = FakeService::default();
        service.reply(Some(example_windows()));
        let (mut controller, presenter) = controller(&service);
        controller.show().await.unwrap();

        let outcomes = type_keys(&mut controller, "fz").await;
        assert!(matches!(outcomes[1], KeyOutcome::Flashed));
        assert!(controller.is_visible());
        assert!(controller.view().typed.is_empty());
        assert_eq!(presenter.flashes.lock().first(), Some(&true));

        let outcomes = type_keys(&mut controller, "ga").await;
        assert!(matches!(outcomes[1], KeyOutcome::Activated(12)));
        // Скрытие гасит вспышку
        assert_eq!(presenter.flashes.lock().last(), Some(&false));
    }

    #[tokio::test]
    async fn test_second_show_only_raises() {
        let service = FakeService::default();
        service.reply(Some(example_windows()));
        let (mut controller, presenter) = controller(&service);

        controller.show().await.unwrap();
        type_keys(&mut controller, "f").await;

        assert_eq!(controller.show().await.unwrap(), ShowOutcome::Raised);
        assert_eq!(service.list_calls(), 1);
        assert_eq!(*presenter.raises.lock(), 1);
        assert_eq!(controller.view().typed, "f");

        let outcomes = type_keys(&mut controller, "a").await;
        assert!(matches!(outcomes[0], KeyOutcome::Activated(10)));
    }

    #[tokio::test]
    async fn test_escape_hides_and_later_keys_are_ignored() {
        let service = FakeService::default();
        service.reply(Some(example_windows()));
        let (mut controller, _presenter) = controller(&service);
        controller.show().await.unwrap();

        type_keys(&mut controller, "f").await;
        assert!(matches!(controller.handle_key(KeyInput::Escape).await, KeyOutcome::Dismissed));
        assert!(!controller.is_visible());

        let outcomes = type_keys(&mut controller, "fa").await;
        assert!(outcomes.iter().all(|o| matches!(o, KeyOutcome::Ignored)));
        assert!(service.activations().is_empty());
    }

    #[tokio::test]
    async fn test_list_failure_keeps_switcher_hidden() {
        let service = FakeService::default();
        service.reply(None);
        let (mut controller, presenter) = controller(&service);

        let err = controller.show().await.unwrap_err();
        assert!(err.is_transport());
        assert!(!controller.is_visible());
        assert!(presenter.views.lock().is_empty());
        assert!(matches!(controller.handle_key(KeyInput::char('f')).await, KeyOutcome::Ignored));
    }

    #[tokio::test]
    async fn test_rejected_activation_is_reported_and_stays_hidden() {
        let service = FakeService::default();
        service.reply(Some(example_windows())).reply(Some(example_windows()));
        service.set_status("FAIL");
        let (mut controller, _presenter) = controller(&service);
        controller.show().await.unwrap();

        let outcomes = type_keys(&mut controller, "ga").await;
        match &outcomes[1] {
            KeyOutcome::ActivationFailed { id, error: SwitcherError::ActivationRejected { status, .. } } => {
                assert_eq!(*id, 12);
                assert_eq!(status, "FAIL");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!controller.is_visible());

        // Следующий показ снова запрашивает каталог
        assert_eq!(controller.show().await.unwrap(), ShowOutcome::Shown(3));
        assert_eq!(service.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_reopen_never_matches_stale_code() {
        let service = FakeService::default();
        service
            .reply(Some(example_windows()))
            .reply(Some(vec![raw(20, "only", "Firefox")]));
        let (mut controller, _presenter) = controller(&service);

        controller.show().await.unwrap();
        type_keys(&mut controller, "g").await;
        controller.handle_key(KeyInput::Escape).await;

        controller.show().await.unwrap();
        assert!(controller.view().typed.is_empty());
        let outcomes = type_keys(&mut controller, "ga").await;
        assert!(matches!(outcomes[1], KeyOutcome::Flashed));
        assert!(service.activations().is_empty());
    }

    #[tokio::test]
    async fn test_shell_windows_are_not_listed() {
        let service = FakeService::default();
        service.reply(Some(vec![raw(1, "bar", "Gnome-shell"), raw(2, "term", "kitty")]));
        let (mut controller, _presenter) = controller(&service);

        assert_eq!(controller.show().await.unwrap(), ShowOutcome::Shown(1));
        assert_eq!(controller.view().rows[0].id, 2);
    }

    #[tokio::test]
    async fn test_run_processes_events_in_order() {
        let service = FakeService::default();
        service.reply(Some(example_windows()));
        let (controller, _presenter) = controller(&service);
        let visibility = controller.subscribe_visibility();

        let (tx, rx) = mpsc::channel(16);
        for event in [
            SwitcherEvent::Show,
            KeyInput::char('f').into(),
            SwitcherEvent::Show,
            KeyInput::char('b').into(),
        ] {
            tx.send(event).await.unwrap();
        }
        drop(tx);

        controller.run(rx).await;
        assert_eq!(service.activations(), vec![11]);
        assert_eq!(service.list_calls(), 1);
        assert!(!*visibility.borrow());
    }
}
