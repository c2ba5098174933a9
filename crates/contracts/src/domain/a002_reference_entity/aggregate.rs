use serde::{Deserialize, Serialize};

/// Тип справочника удаленного каталога.
///
/// Оба справочника обрабатываются одинаково: поиск по ключевому слову,
/// затем создание при отсутствии точного совпадения.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Unit,
    Category,
}

impl ReferenceKind {
    /// Сегмент пути в API каталога
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            ReferenceKind::Unit => "units",
            ReferenceKind::Category => "categories",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReferenceKind::Unit => "Единицы измерения",
            ReferenceKind::Category => "Категории",
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceKind::Unit => write!(f, "unit"),
            ReferenceKind::Category => write!(f, "category"),
        }
    }
}

/// Элемент справочника, как его возвращает поиск каталога.
/// Поиск по ключевому слову нестрогий, поэтому совпадением считается
/// только точное равенство имени после trim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceEntity {
    pub id: i64,
    pub name: String,
}
