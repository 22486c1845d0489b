use super::WindowCatalog;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Двухсимвольный код окна: первая буква класса + буква-суффикс
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MnemonicCode([char; 2]);

impl MnemonicCode {
    pub const LEN: usize = 2;

    pub fn new(first: char, suffix: char) -> Self {
        Self([first, suffix])
    }

    pub fn from_chars(chars: &[char]) -> Option<Self> {
        match chars {
            [first, suffix] => Some(Self::new(*first, *suffix)),
            _ => None,
        }
    }

    pub fn chars(&self) -> [char; 2] {
        self.0
    }
}

impl fmt::Display for MnemonicCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0], self.0[1])
    }
}

/// Соответствие код -> id окна для одного цикла показа
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MnemonicMap {
    // Порядок назначения сохраняется для отображения строк
    entries: Vec<(MnemonicCode, i32)>,
    by_code: HashMap<MnemonicCode, i32>,
    unassigned: Vec<i32>,
}

impl MnemonicMap {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, code: &MnemonicCode) -> Option<i32> {
        self.by_code.get(code).copied()
    }

    /// Точное совпадение буфера ввода с одним из кодов
    pub fn lookup(&self, typed: &[char]) -> Option<i32> {
        MnemonicCode::from_chars(typed).and_then(|code| self.get(&code))
    }

    pub fn code_for(&self, id: i32) -> Option<MnemonicCode> {
        self.entries
            .iter()
            .find(|(_, mapped)| *mapped == id)
            .map(|(code, _)| *code)
    }

    pub fn entries(&self) -> &[(MnemonicCode, i32)] {
        &self.entries
    }

    /// Окна без кода: не хватило суффикса (больше 26 на одну букву)
    /// или первую букву класса нельзя набрать с клавиатуры
    pub fn unassigned(&self) -> &[i32] {
        &self.unassigned
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, code: MnemonicCode, id: i32) {
        self.entries.push((code, id));
        self.by_code.insert(code, id);
    }
}

pub struct MnemonicAssigner;

impl MnemonicAssigner {
    /// Суффиксы 'a'..='z'; окна сверх лимита остаются без кода
    pub const MAX_PER_LETTER: u8 = 26;

    pub fn assign(catalog: &WindowCatalog) -> MnemonicMap {
        let mut map = MnemonicMap::empty();
        let mut counters: HashMap<char, u8> = HashMap::new();

        for record in catalog.iter() {
            let Some(first_char) = record.class_name.chars().next() else {
                // Окно без класса не получает кода
                continue;
            };
            let first = first_char.to_lowercase().next().unwrap_or(first_char);

            // Набирается только то, что выдаёт клавиатура: a-z и 0-9
            if !Self::is_typeable(first) {
                warn!("Первую букву '{}' нельзя набрать: окно {} останется без кода", first, record);
                map.unassigned.push(record.id);
                continue;
            }

            let counter = counters.entry(first).or_insert(0);
            if *counter >= Self::MAX_PER_LETTER {
                warn!(
                    "Закончились суффиксы для буквы '{}': окно {} останется без кода",
                    first, record
                );
                map.unassigned.push(record.id);
                continue;
            }

            let suffix = char::from(b'a' + *counter);
            *counter += 1;

            let code = MnemonicCode::new(first, suffix);
            debug!("Назначен код {} для окна {}", code, record);
            map.insert(code, record.id);
        }

        map
    }

    fn is_typeable(c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit()
    }
}
