use crate::shared::config::UploadConfig;
use crate::shared::stores::mapping_store::ReferenceMapping;
use contracts::domain::a001_product_row::ProductRow;

/// Параметры формирования формы товара, не зависящие от строки
#[derive(Debug, Clone)]
pub struct UploadParams {
    pub stock_id: i64,
    pub tax_id: i64,
    /// Ставка для salePriceWithTax (0.15 = 15%)
    pub tax_rate: f64,
    /// Единица измерения, когда имени нет в таблице
    pub default_unit_id: i64,
    /// Категория, когда имени нет в таблице
    pub default_category_id: i64,
}

impl From<&UploadConfig> for UploadParams {
    fn from(config: &UploadConfig) -> Self {
        Self {
            stock_id: config.stock_id,
            tax_id: config.tax_id,
            tax_rate: config.tax_rate,
            default_unit_id: config.default_unit_id,
            default_category_id: config.default_category_id,
        }
    }
}

/// Собрать form-body создания товара.
///
/// Имена полей и константы повторяют форму веб-интерфейса каталога —
/// endpoint другой не принимает. Для варианта (`base_id` задан)
/// добавляется блок `complex_products[0]` со ссылкой на базовый товар.
pub fn build_product_form(
    row: &ProductRow,
    units: &ReferenceMapping,
    categories: &ReferenceMapping,
    params: &UploadParams,
    base_id: Option<i64>,
) -> Vec<(String, String)> {
    let unit_id = units
        .get(row.unit.trim())
        .copied()
        .unwrap_or(params.default_unit_id);
    let category_id = categories
        .get(row.category.trim())
        .copied()
        .unwrap_or(params.default_category_id);

    let barcode = row.barcode.as_deref().unwrap_or("").trim().to_string();
    let sale_with_tax = row.sale_price * (1.0 + params.tax_rate);

    let mut form: Vec<(String, String)> = vec![
        ("name".into(), row.name.clone()),
        ("buyPrice".into(), fmt_number(row.buy_price)),
        ("salePrice".into(), fmt_number(row.sale_price)),
        ("defaultParCode".into(), barcode),
        ("type".into(), "1".into()),
        ("unit_id".into(), unit_id.to_string()),
        ("stock_id".into(), params.stock_id.to_string()),
        ("first_quantity".into(), fmt_number(row.first_quantity)),
        ("main_cat_id".into(), category_id.to_string()),
        ("product_type".into(), row.kind.code().to_string()),
        ("is_active".into(), "1".into()),
        ("is_unique".into(), "0".into()),
        ("standard_barcode_type".into(), "gs1".into()),
        ("tag_id".into(), "1".into()),
        ("status".into(), "1".into()),
        ("is_online".into(), "1".into()),
        ("salePriceWithTax".into(), fmt_number(sale_with_tax)),
        ("price_including_tax".into(), "0".into()),
        ("unifiedBarcodeType".into(), "1212".into()),
        ("tax[0][type]".into(), "main".into()),
        ("tax[0][id]".into(), params.tax_id.to_string()),
    ];

    if let Some(base_id) = base_id {
        form.push((
            "complex_products[0][quantity]".into(),
            fmt_number(row.conversion_rate),
        ));
        form.push(("complex_products[0][unique_id]".into(), base_id.to_string()));
        form.push(("complex_products[0][discount]".into(), "0".into()));
    }

    form
}

/// Числа в форме — строками, целые без дробной части
fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
