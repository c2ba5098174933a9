pub mod outcome;

pub use outcome::{UploadOutcome, UploadSummary};

use crate::usecases::common::UseCaseMetadata;

pub struct UploadProducts;

impl UseCaseMetadata for UploadProducts {
    fn usecase_index() -> &'static str {
        "u102"
    }

    fn usecase_name() -> &'static str {
        "upload_products"
    }

    fn display_name() -> &'static str {
        "Загрузка товаров"
    }

    fn description() -> &'static str {
        "Отправка товаров и вариантов в удаленный каталог с контрольной точкой"
    }
}
