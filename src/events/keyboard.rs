use std::fmt;

/// Нажатие клавиши, уже переведённое в термины переключателя
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyInput {
    /// Печатный символ, всегда в нижнем регистре
    Char(char),
    /// Зарезервированная клавиша сброса
    Escape,
}

impl KeyInput {
    pub fn char(c: char) -> Self {
        // to_lowercase может вернуть несколько символов, берём первый
        Self::Char(c.to_lowercase().next().unwrap_or(c))
    }

    pub fn is_escape(&self) -> bool {
        matches!(self, KeyInput::Escape)
    }
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyInput::Char(c) => write!(f, "'{}'", c),
            KeyInput::Escape => write!(f, "<esc>"),
        }
    }
}
