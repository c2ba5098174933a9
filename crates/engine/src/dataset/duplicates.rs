use contracts::domain::a001_product_row::ProductRow;
use std::collections::HashMap;
use std::path::Path;

/// Отчет о дублирующихся штрихкодах по сырому входу.
///
/// Считается до загрузки и не зависит от ее результатов: штрихкод,
/// встреченный дважды, попадает в отчет, даже если обе строки каталог
/// принял бы. Возвращает число различных задублированных штрихкодов;
/// при нуле файл не пишется.
pub fn write_report(rows: &[ProductRow], path: &Path) -> anyhow::Result<usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        if let Some(barcode) = row.barcode.as_deref() {
            let barcode = barcode.trim();
            if !barcode.is_empty() {
                *counts.entry(barcode).or_insert(0) += 1;
            }
        }
    }

    let mut duplicated: Vec<(&str, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .collect();

    if duplicated.is_empty() {
        tracing::info!("No duplicate barcodes found");
        return Ok(0);
    }

    // самые частые — первыми
    duplicated.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "bar_code",
        "duplicate_count",
        "name",
        "product_type",
        "sale_price",
        "buy_price",
    ])?;

    for (barcode, count) in &duplicated {
        for row in rows {
            if row.barcode.as_deref().map(str::trim) != Some(*barcode) {
                continue;
            }
            writer.write_record([
                barcode.to_string(),
                count.to_string(),
                row.name.clone(),
                row.kind.code().to_string(),
                row.sale_price.to_string(),
                row.buy_price.to_string(),
            ])?;
        }
    }

    writer.flush()?;
    tracing::warn!(
        "Found {} duplicate barcodes, report saved to {}",
        duplicated.len(),
        path.display()
    );

    Ok(duplicated.len())
}
