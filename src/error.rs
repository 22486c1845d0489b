use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwitcherError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка D-Bus: {0}")]
    DBus(#[from] zbus::Error),

    #[error("Ошибка транспорта при вызове {method}: {reason}")]
    Transport { method: String, reason: String },

    #[error("Таймаут вызова {method} ({timeout_ms}мс)")]
    Timeout { method: String, timeout_ms: u64 },

    #[error("Activate({id}) отклонён сервисом со статусом '{status}'")]
    ActivationRejected { id: i32, status: String },

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl SwitcherError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(SwitcherError::DeviceNotFound(msg.into()))
    }

    pub fn transport(method: &str, reason: impl ToString) -> Self {
        SwitcherError::Transport {
            method: method.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Вызов не состоялся: сервис недоступен, ответ искажён или истёк таймаут.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SwitcherError::Transport { .. } | SwitcherError::Timeout { .. } | SwitcherError::DBus(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SwitcherError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! switcher_error {
    (device_not_found, $($arg:tt)*) => {
        $crate::error::SwitcherError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::SwitcherError::Permission(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::SwitcherError::Internal(format!($($arg)*))
    };
}
