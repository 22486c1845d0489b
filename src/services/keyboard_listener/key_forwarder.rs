use crate::debug_if_enabled;
use crate::events::SwitcherEvent;
use evdev::KeyCode;
use tokio::sync::{mpsc, watch};

use super::key_mapping::KeyMapper;

/// Значение evdev для нажатия (0 - отпускание, 2 - автоповтор)
pub const KEY_PRESSED: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forwarded {
    Sent,
    Skipped,
    /// Контроллер остановлен, читать дальше незачем
    Closed,
}

/// Решает, какие нажатия уходят контроллеру.
///
/// Пока переключатель скрыт, ничего не пересылается и не логируется.
pub struct KeyForwarder {
    events: mpsc::Sender<SwitcherEvent>,
    visibility: watch::Receiver<bool>,
}

impl KeyForwarder {
    pub fn new(events: mpsc::Sender<SwitcherEvent>, visibility: watch::Receiver<bool>) -> Self {
        Self { events, visibility }
    }

    pub async fn forward(&self, key_code: KeyCode, value: i32) -> Forwarded {
        if value != KEY_PRESSED {
            return Forwarded::Skipped;
        }

        let visible = *self.visibility.borrow();
        if !visible {
            return Forwarded::Skipped;
        }

        let Some(key) = KeyMapper::translate(key_code) else {
            debug_if_enabled!("Клавиша {:?} не участвует в выборе окна", key_code);
            return Forwarded::Skipped;
        };

        match self.events.send(key.into()).await {
            Ok(()) => Forwarded::Sent,
            Err(_) => Forwarded::Closed,
        }
    }
}
