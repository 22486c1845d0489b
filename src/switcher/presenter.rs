use crate::catalog::mnemonic::MnemonicCode;
use crate::catalog::{MnemonicMap, WindowCatalog};
use parking_lot::Mutex;
use std::fmt;
use tracing::info;

/// Строка списка окон в том виде, в каком её рисует слой отображения
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub id: i32,
    /// None у окон, которым код не достался (сверх лимита или непечатаемая буква)
    pub code: Option<MnemonicCode>,
    pub title: String,
    pub class_name: String,
    pub icons: Vec<String>,
}

impl fmt::Display for ViewRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} | {} | {}", code, self.title, self.class_name),
            None => write!(f, "-- | {} | {}", self.title, self.class_name),
        }
    }
}

/// Snapshot of everything a UI needs: `(catalog, mapping, buffer, visibility)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitcherView {
    pub visible: bool,
    pub rows: Vec<ViewRow>,
    pub typed: String,
}

impl SwitcherView {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn project(catalog: &WindowCatalog, mapping: &MnemonicMap, typed: &[char]) -> Self {
        let rows = catalog
            .iter()
            .map(|record| ViewRow {
                id: record.id,
                code: mapping.code_for(record.id),
                title: record.title.clone(),
                class_name: record.class_name.clone(),
                icons: record.icon_candidates().into_iter().map(str::to_string).collect(),
            })
            .collect();

        Self {
            visible: true,
            rows,
            typed: typed.iter().collect(),
        }
    }
}

/// Слой отображения. Вызывается с потока контроллера, а set_flash ещё и из таймера вспышки.
pub trait Presenter: Send + Sync {
    fn render(&self, view: &SwitcherView);

    /// Повторный ShowWindow при уже показанном переключателе
    fn raise(&self);

    fn set_flash(&self, active: bool);
}

/// Presenter по умолчанию: пишет строки в лог
#[derive(Default)]
pub struct LogPresenter {
    flashing: Mutex<bool>,
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for LogPresenter {
    fn render(&self, view: &SwitcherView) {
        if !view.visible {
            info!("Переключатель скрыт");
            return;
        }

        info!("Переключатель показан: {} окон", view.rows.len());
        for row in &view.rows {
            info!("  {}", row);
        }
        if !view.typed.is_empty() {
            info!("  > {}", view.typed);
        }
    }

    fn raise(&self) {
        info!("Переключатель уже показан, поднимаем наверх");
    }

    fn set_flash(&self, active: bool) {
        let mut flashing = self.flashing.lock();
        if *flashing != active {
            *flashing = active;
            info!("Вспышка {}", if active { "включена" } else { "погашена" });
        }
    }
}
