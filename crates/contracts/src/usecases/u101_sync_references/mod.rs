pub mod progress;

pub use progress::SyncReferencesSummary;

use crate::usecases::common::UseCaseMetadata;

pub struct SyncReferences;

impl UseCaseMetadata for SyncReferences {
    fn usecase_index() -> &'static str {
        "u101"
    }

    fn usecase_name() -> &'static str {
        "sync_references"
    }

    fn display_name() -> &'static str {
        "Синхронизация справочников"
    }

    fn description() -> &'static str {
        "Поиск или создание единиц измерения и категорий в удаленном каталоге"
    }
}
