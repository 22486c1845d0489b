pub mod keyboard;
pub mod window;

pub use keyboard::KeyInput;
pub use window::WindowRecord;

/// Внешние триггеры, которые обслуживает контроллер переключателя
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitcherEvent {
    /// ShowWindow пришёл по D-Bus
    Show,
    Key(KeyInput),
}

impl From<KeyInput> for SwitcherEvent {
    fn from(key: KeyInput) -> Self {
        SwitcherEvent::Key(key)
    }
}
