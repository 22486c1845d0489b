use serde::{Deserialize, Serialize};
use std::fmt;

/// Запись об окне в том виде, в каком её отдаёт сервис TabFix (`isss`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: i32,
    pub title: String,
    pub class_name: String,
    pub icon_hint: String,
}

impl WindowRecord {
    pub fn new(id: i32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            class_name: String::new(),
            icon_hint: String::new(),
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_icon_hint(mut self, icon_hint: impl Into<String>) -> Self {
        self.icon_hint = icon_hint.into();
        self
    }

    /// Кандидаты иконок для слоя отображения, пустые элементы отброшены
    pub fn icon_candidates(&self) -> Vec<&str> {
        self.icon_hint
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }
}

impl From<(i32, String, String, String)> for WindowRecord {
    fn from((id, title, class_name, icon_hint): (i32, String, String, String)) -> Self {
        Self {
            id,
            title,
            class_name,
            icon_hint,
        }
    }
}

impl fmt::Display for WindowRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.class_name.is_empty() {
            write!(f, "#{} \"{}\"", self.id, self.title)
        } else {
            write!(f, "#{} \"{}\" ({})", self.id, self.title, self.class_name)
        }
    }
}
