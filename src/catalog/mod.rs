//! Каталог окон одного цикла показа и назначение мнемонических кодов.
//!
//! Catalog construction (shell and empty-class filtering + stable title sort) lives here and not in
//! the presentation layer: mnemonic suffixes depend on catalog order, so the order
//! is part of the observable contract.

pub mod mnemonic;

pub use mnemonic::{MnemonicAssigner, MnemonicCode, MnemonicMap};

use crate::events::WindowRecord;

/// Отфильтрованный и отсортированный снимок окон
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowCatalog {
    records: Vec<WindowRecord>,
}

impl WindowCatalog {
    /// Строит каталог из ответа List: выбрасывает окна оболочки и окна без класса,
    /// затем сортирует по заголовку.
    ///
    /// Сортировка побайтовая и стабильная, при равных заголовках сохраняется порядок ответа.
    pub fn build<I>(records: I, shell_class: &str) -> Self
    where
        I: IntoIterator<Item = WindowRecord>,
    {
        let mut records: Vec<WindowRecord> = records
            .into_iter()
            .filter(|record| !record.class_name.is_empty() && record.class_name != shell_class)
            .collect();

        // sort_by стабилен; String::cmp сравнивает байты UTF-8, что совпадает с порядком кодпоинтов
        records.sort_by(|a, b| a.title.cmp(&b.title));

        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[WindowRecord] {
        &self.records
    }

    pub fn get(&self, id: i32) -> Option<&WindowRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowRecord> {
        self.records.iter()
    }
}
