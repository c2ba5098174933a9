use crate::shared::catalog::{CatalogError, CreateResponse};
use contracts::usecases::u102_upload_products::UploadOutcome;
use once_cell::sync::Lazy;

/// Фразы, по которым в сообщении каталога распознается занятый штрихкод.
/// Каталог отвечает то по-английски, то по-арабски; кода ошибки нет,
/// только текст.
static DUPLICATE_BARCODE_PHRASES: Lazy<Vec<&str>> =
    Lazy::new(|| vec!["default par code", "taken", "بالفعل"]);

pub fn is_duplicate_barcode_message(message: &str) -> bool {
    DUPLICATE_BARCODE_PHRASES
        .iter()
        .any(|phrase| message.contains(phrase))
}

/// Свести ответ каталога на создание товара к исходу строки.
///
/// Отказ с фразой о штрихкоде терминален; любой другой неуспех — повторяемый,
/// включая аномальный успех без идентификатора.
pub fn classify_create(result: Result<CreateResponse, CatalogError>) -> UploadOutcome {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            return UploadOutcome::TransientFailure {
                detail: e.to_string(),
            }
        }
    };

    if response.status == 0 && is_duplicate_barcode_message(&response.message) {
        return UploadOutcome::RejectedDuplicate;
    }

    if response.is_success() {
        return match response.created_id() {
            Some(id) => UploadOutcome::Created { id },
            None => UploadOutcome::TransientFailure {
                detail: "success response without id".to_string(),
            },
        };
    }

    UploadOutcome::TransientFailure {
        detail: format!("status {}: {}", response.status, response.message),
    }
}
