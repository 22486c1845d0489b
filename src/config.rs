use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub service: EndpointConfig,
    pub hotkey: HotkeyConfig,
    pub catalog: CatalogConfig,
    pub input: InputConfig,
    pub feedback: FeedbackConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Адрес сервиса TabFix, у которого запрашиваем список окон.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub bus_name: String,
    pub object_path: String,
    pub interface: String,
    pub call_timeout_ms: u64,
}

/// Имя и путь, под которыми мы сами принимаем ShowWindow.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HotkeyConfig {
    pub bus_name: String,
    pub object_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Класс окна самой оболочки; такие окна в каталог не попадают.
    pub shell_class: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub device_path: String,
    pub grab: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub flash_ms: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            bus_name: "org.phnk.TabFix".to_string(),
            object_path: "/org/phnk/TabFix".to_string(),
            interface: "org.phnk.TabFix".to_string(),
            call_timeout_ms: 2000,
        }
    }
}

impl EndpointConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            bus_name: "org.phnk.TabFixHotkey".to_string(),
            object_path: "/org/phnk/TabFixHotkey".to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            shell_class: "Gnome-shell".to_string(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            device_path: "auto".to_string(),
            grab: true,
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self { flash_ms: 200 }
    }
}

impl FeedbackConfig {
    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        // Отсутствующий файл не ошибка: остаются значения по умолчанию
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("TABFIX_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.service.call_timeout_ms == 0 {
            anyhow::bail!("service.call_timeout_ms должно быть больше 0");
        }

        for (field, value) in [
            ("service.bus_name", &self.service.bus_name),
            ("service.object_path", &self.service.object_path),
            ("service.interface", &self.service.interface),
            ("hotkey.bus_name", &self.hotkey.bus_name),
            ("hotkey.object_path", &self.hotkey.object_path),
        ] {
            if value.is_empty() {
                anyhow::bail!("Пустое значение {}", field);
            }
        }

        for (field, path) in [
            ("service.object_path", &self.service.object_path),
            ("hotkey.object_path", &self.hotkey.object_path),
        ] {
            if !path.starts_with('/') {
                anyhow::bail!("{} должен начинаться с '/': {}", field, path);
            }
        }

        if self.input.device_path.is_empty() {
            anyhow::bail!("input.device_path не может быть пустым (используйте \"auto\")");
        }

        if self.feedback.flash_ms == 0 {
            anyhow::bail!("feedback.flash_ms должно быть больше 0");
        }

        Ok(())
    }
}
