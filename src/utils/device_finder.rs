use crate::error::{SwitcherError, Result};
use evdev::KeyCode;
use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Клавиши, без которых устройство не годится для набора кодов
const REQUIRED_KEYS: [KeyCode; 3] = [KeyCode::KEY_A, KeyCode::KEY_Z, KeyCode::KEY_ESC];

/// Подстроки имён, которые почти наверняка принадлежат не клавиатуре
const NON_KEYBOARD_HINTS: [&str; 4] = ["mouse", "touchpad", "trackpoint", "deathadder"];

pub struct DeviceFinder;

impl DeviceFinder {
    /// Путь к клавиатуре: явно заданный или найденный автоматически ("auto")
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                SwitcherError::device_not_found(format!("Указанное устройство не найдено: {:?}", path))
            };
        }

        info!("Автопоиск клавиатурного устройства...");

        // Стабильные имена by-id предпочтительнее event* с плавающей нумерацией
        let mut candidates = Self::by_id_candidates();
        candidates.extend(Self::event_candidates()?);

        let best = candidates
            .into_iter()
            .filter(|(path, _)| Self::is_keyboard_device(path))
            // Первый из кандидатов с наибольшим приоритетом
            .min_by_key(|(_, priority)| Reverse(*priority));

        match best {
            Some((path, priority)) => {
                info!("Выбрано устройство {:?} (приоритет {})", path, priority);
                Ok(path)
            }
            None => SwitcherError::device_not_found(
                "Не удалось найти клавиатурное устройство. \
                 Убедитесь, что пользователь добавлен в группу 'input'",
            ),
        }
    }

    fn by_id_candidates() -> Vec<(PathBuf, u32)> {
        let Ok(entries) = fs::read_dir("/dev/input/by-id") else {
            debug!("Директория /dev/input/by-id недоступна");
            return Vec::new();
        };

        entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                let priority = if name.ends_with("event-kbd") {
                    100
                } else if name.to_lowercase().contains("keyboard") && name.contains("event") {
                    50
                } else {
                    return None;
                };
                Some((path, priority))
            })
            .collect()
    }

    fn event_candidates() -> Result<Vec<(PathBuf, u32)>> {
        let entries = fs::read_dir("/dev/input")
            .map_err(|e| SwitcherError::Permission(format!("Нет доступа к /dev/input: {}", e)))?;

        let mut devices = Vec::new();
        for entry in entries {
            let path = entry.map_err(SwitcherError::Io)?.path();
            let is_event = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("event"));
            if is_event {
                devices.push((path, 10));
            }
        }

        // Младшие номера обычно встроенная клавиатура
        devices.sort();
        Ok(devices)
    }

    fn is_keyboard_device(path: &Path) -> bool {
        let device = match evdev::Device::open(path) {
            Ok(device) => device,
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", path, e);
                return false;
            }
        };

        let name = device.name().unwrap_or("Unknown").to_lowercase();
        if NON_KEYBOARD_HINTS.iter().any(|hint| name.contains(hint)) {
            debug!("Исключаем устройство {:?} ({})", path, name);
            return false;
        }

        let has_keys = device
            .supported_keys()
            .is_some_and(|keys| REQUIRED_KEYS.iter().all(|key| keys.contains(*key)));

        debug!("Устройство {:?} ({}): клавиатура = {}", path, name, has_keys);
        has_keys
    }
}
