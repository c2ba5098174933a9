use contracts::domain::a001_product_row::ProductRow;

/// Ключ сортировки, производный от имени: нижний регистр, без пробельных
/// символов. Сводит "Cola Can" и "cola  can" в одну группу.
fn normalized_name(name: &str) -> String {
    name.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect()
}

/// Детерминированная сортировка датасета: (нормализованное имя, код вида).
///
/// Базовая запись (1) оказывается раньше вариантов (5) того же товара,
/// поэтому при прямом проходе зависимость варианта обычно уже создана.
/// Контрольная точка привязана к этому порядку.
pub fn sort_rows(mut rows: Vec<ProductRow>) -> Vec<ProductRow> {
    rows.sort_by_cached_key(|row| (normalized_name(&row.name), row.kind.code()));
    rows
}
