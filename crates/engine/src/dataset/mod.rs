pub mod duplicates;
pub mod loader;
pub mod sort;

pub use loader::load_dataset;

use contracts::domain::a001_product_row::ProductRow;
use contracts::domain::a002_reference_entity::ReferenceKind;
use std::collections::HashSet;

/// Различные имена справочника в порядке первого появления в датасете.
/// Дедупликация точная, с учетом регистра; пустые после trim имена отбрасываются.
pub fn distinct_reference_names(rows: &[ProductRow], kind: ReferenceKind) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for row in rows {
        let raw = match kind {
            ReferenceKind::Unit => &row.unit,
            ReferenceKind::Category => &row.category,
        };

        let name = raw.trim();
        if name.is_empty() {
            continue;
        }

        if seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }

    names
}
