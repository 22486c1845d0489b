use crate::error::Result;
use crate::events::{KeyInput, SwitcherEvent};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::info;

use super::r#trait::KeyboardListenerTrait;

/// Эмулирует пользователя: показ, ошибочный ввод, затем выбор или сброс
pub struct DryRunKeyboardListener {
    events: mpsc::Sender<SwitcherEvent>,
}

impl DryRunKeyboardListener {
    pub fn new(events: mpsc::Sender<SwitcherEvent>) -> Self {
        info!("Инициализация DryRunKeyboardListener");
        Self { events }
    }

    /// Сценарии для каталога DryRunWindowService
    fn scripts() -> Vec<Vec<SwitcherEvent>> {
        let keys = |s: &str| -> Vec<SwitcherEvent> {
            std::iter::once(SwitcherEvent::Show)
                .chain(s.chars().map(|c| KeyInput::char(c).into()))
                .collect()
        };

        vec![
            keys("fzfb"),
            keys("aa"),
            {
                let mut escape = keys("c");
                escape.push(KeyInput::Escape.into());
                escape
            },
        ]
    }

    async fn run_impl(self) -> Result<()> {
        info!("Dry-run режим - KeyboardListener работает в режиме эмуляции");

        let scripts = Self::scripts();
        let mut script_index = 0;
        let mut interval = interval(Duration::from_secs(10));

        loop {
            interval.tick().await;

            info!("Dry-run: сценарий #{}", script_index + 1);
            for event in &scripts[script_index] {
                if self.events.send(*event).await.is_err() {
                    info!("Контроллер остановлен, dry-run ввод завершён");
                    return Ok(());
                }
            }

            script_index = (script_index + 1) % scripts.len();
        }
    }
}

#[async_trait::async_trait]
impl KeyboardListenerTrait for DryRunKeyboardListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_script_starts_with_show() {
        for script in DryRunKeyboardListener::scripts() {
            assert_eq!(script.first(), Some(&SwitcherEvent::Show));
            assert!(script.len() > 1);
        }
    }
}
