use super::presenter::Presenter;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::debug;

/// Вспышка при неверном коде.
///
/// Одновременно живёт не больше одной задачи гашения: повторный trigger
/// отменяет предыдущую и отсчитывает интервал заново.
pub struct FlashTimer {
    presenter: Arc<dyn Presenter>,
    duration: Duration,
    pending: Option<JoinHandle<()>>,
}

impl FlashTimer {
    pub fn new(presenter: Arc<dyn Presenter>, duration: Duration) -> Self {
        Self {
            presenter,
            duration,
            pending: None,
        }
    }

    pub fn trigger(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            debug!("Предыдущая вспышка перезапущена");
        }

        self.presenter.set_flash(true);

        let presenter = Arc::clone(&self.presenter);
        let duration = self.duration;
        self.pending = Some(tokio::spawn(async move {
            sleep(duration).await;
            presenter.set_flash(false);
        }));
    }

    /// Гасит вспышку сразу, например при скрытии переключателя
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            self.presenter.set_flash(false);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for FlashTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::switcher::presenter::SwitcherView;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct FlashLog {
        changes: Mutex<Vec<bool>>,
    }

    impl Presenter for FlashLog {
        fn render(&self, _view: &SwitcherView) {}
        fn raise(&self) {}
        fn set_flash(&self, active: bool) {
            self.changes.lock().push(active);
        }
    }

    #[tokio::test]
    async fn test_flash_reverts_after_duration() {
        let log = Arc::new(FlashLog::default());
        let mut timer = FlashTimer::new(log.clone(), Duration::from_millis(20));

        timer.trigger();
        assert_eq!(*log.changes.lock(), vec![true]);

        sleep(Duration::from_millis(100)).await;
        assert_eq!(*log.changes.lock(), vec![true, false]);
        assert!(!timer.is_pending());
    }

    #[tokio::test]
    async fn test_retrigger_supersedes_pending_revert() {
        let log = Arc::new(FlashLog::default());
        let mut timer = FlashTimer::new(log.clone(), Duration::from_millis(300));

        timer.trigger();
        sleep(Duration::from_millis(150)).await;
        timer.trigger();
        // Гашение от первой вспышки отменено, вторая ещё горит
        sleep(Duration::from_millis(250)).await;
        assert_eq!(*log.changes.lock(), vec![true, true]);

        sleep(Duration::from_millis(300)).await;
        assert_eq!(*log.changes.lock(), vec![true, true, false]);
    }

    #[tokio::test]
    async fn test_cancel_turns_flash_off_once() {
        let log = Arc::new(FlashLog::default());
        let mut timer = FlashTimer::new(log.clone(), Duration::from_secs(5));

        timer.cancel();
        assert!(log.changes.lock().is_empty());

        timer.trigger();
        timer.cancel();
        assert_eq!(*log.changes.lock(), vec![true, false]);
        assert!(!timer.is_pending());
    }
}
