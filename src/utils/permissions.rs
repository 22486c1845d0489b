use crate::error::{SwitcherError, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const INPUT_DIR: &str = "/dev/input";

/// Проверить доступ к устройствам ввода до того, как открывать клавиатуру
pub fn check_permissions() -> Result<()> {
    info!("Проверка прав доступа...");

    check_input_dir_access(Path::new(INPUT_DIR))?;
    check_not_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_dir_access(input_dir: &Path) -> Result<()> {
    if !input_dir.exists() {
        return Err(SwitcherError::Permission(format!(
            "Директория {} не существует",
            input_dir.display()
        )));
    }

    fs::read_dir(input_dir).map_err(|e| {
        SwitcherError::Permission(format!(
            "Нет доступа к {}: {}. Добавьте пользователя в группу 'input'",
            input_dir.display(),
            e
        ))
    })?;

    info!("Доступ к {} подтвержден", input_dir.display());
    Ok(())
}

fn check_not_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            // От root сессионная шина пользователя обычно недоступна
            warn!("Приложение запущено от имени root: сервис TabFix на сессионной шине может быть не виден");
            warn!("Рекомендуется: sudo usermod -a -G input $USER и запуск от обычного пользователя");
        }
        Ok(user) => info!("Приложение запущено от имени пользователя: {}", user),
        Err(_) => warn!("Не удалось определить пользователя"),
    }
}
