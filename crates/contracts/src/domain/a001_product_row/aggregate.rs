use serde::{Deserialize, Serialize};

// ============================================================================
// Record Kind
// ============================================================================

/// Вид записи в исходном датасете.
///
/// Дискриминатор приходит из колонки `product_type`: `1` — базовый товар,
/// `5` — вариант, ссылающийся на базовый. Остальные коды датасет не несет,
/// поэтому они отклоняются на этапе загрузки, а не молча пропускаются.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Base,
    Variant,
}

impl RecordKind {
    /// Создать из кода колонки `product_type`
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(RecordKind::Base),
            5 => Some(RecordKind::Variant),
            _ => None,
        }
    }

    /// Код, в котором вид записи уходит в каталог
    pub fn code(&self) -> i64 {
        match self {
            RecordKind::Base => 1,
            RecordKind::Variant => 5,
        }
    }

    pub fn is_base(&self) -> bool {
        matches!(self, RecordKind::Base)
    }

    pub fn is_variant(&self) -> bool {
        matches!(self, RecordKind::Variant)
    }
}

// ============================================================================
// Product Row
// ============================================================================

/// Строка исходного датасета: один товар либо один его вариант.
///
/// Имя может повторяться между строками — это не дубль, а пара
/// "базовый товар + варианты". Имя и текстовые ссылки на справочники
/// нормализуются (trim) при загрузке.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRow {
    pub name: String,

    pub kind: RecordKind,

    /// Текстовая ссылка на единицу измерения
    pub unit: String,

    /// Текстовая ссылка на категорию
    pub category: String,

    /// Внешний штрихкод; дедупликацию по нему делает удаленный каталог
    pub barcode: Option<String>,

    #[serde(rename = "buyPrice")]
    pub buy_price: f64,

    #[serde(rename = "salePrice")]
    pub sale_price: f64,

    /// Начальный остаток, по умолчанию 0
    #[serde(rename = "firstQuantity")]
    pub first_quantity: f64,

    /// Коэффициент пересчета варианта к базовому товару, по умолчанию 1
    #[serde(rename = "conversionRate")]
    pub conversion_rate: f64,
}
