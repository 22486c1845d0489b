use crate::catalog::mnemonic::{MnemonicCode, MnemonicMap};
use crate::events::KeyInput;
use smallvec::SmallVec;
use tracing::debug;

/// Итог обработки одного нажатия
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Resolved(i32),
    Invalid,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherState {
    Idle,
    Pending,
}

/// Накапливает нажатия и сопоставляет их с текущей картой кодов.
///
/// Коды ровно двухсимвольные, поэтому буфер длины 2 без совпадения
/// сбрасывается сразу и никогда не растёт дальше.
#[derive(Debug, Default)]
pub struct InputMatcher {
    mapping: MnemonicMap,
    buffer: SmallVec<[char; MnemonicCode::LEN]>,
}

impl InputMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Загрузка новой карты всегда возвращает автомат в Idle
    pub fn load(&mut self, mapping: MnemonicMap) {
        self.mapping = mapping;
        self.buffer.clear();
    }

    /// Полный сброс: пустая карта и пустой буфер
    pub fn clear(&mut self) {
        self.load(MnemonicMap::empty());
    }

    pub fn state(&self) -> MatcherState {
        if self.buffer.is_empty() {
            MatcherState::Idle
        } else {
            MatcherState::Pending
        }
    }

    pub fn buffer(&self) -> &[char] {
        &self.buffer
    }

    pub fn mapping(&self) -> &MnemonicMap {
        &self.mapping
    }

    pub fn feed(&mut self, key: KeyInput) -> Option<MatchOutcome> {
        let c = match key {
            KeyInput::Escape => {
                self.buffer.clear();
                return Some(MatchOutcome::Reset);
            }
            KeyInput::Char(c) => c,
        };

        self.buffer.push(c);

        if let Some(id) = self.mapping.lookup(&self.buffer) {
            debug!("Буфер {:?} совпал с окном {}", self.buffer.as_slice(), id);
            self.buffer.clear();
            return Some(MatchOutcome::Resolved(id));
        }

        if self.buffer.len() >= MnemonicCode::LEN {
            debug!("Буфер {:?} не совпал ни с одним кодом", self.buffer.as_slice());
            self.buffer.clear();
            return Some(MatchOutcome::Invalid);
        }

        None
    }
}
