pub mod client;

pub use client::CatalogClient;

use async_trait::async_trait;
use contracts::domain::a002_reference_entity::{ReferenceEntity, ReferenceKind};
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Ошибки обращения к удаленному каталогу.
///
/// Все три варианта восстановимы на уровне элемента: имя или строка
/// не фиксируются как обработанные и будут повторены в следующем проходе.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("failed to parse catalog response: {detail}")]
    Parse { detail: String },
}

// ============================================================================
// Response envelope
// ============================================================================

/// Конверт ответа каталога на создание: `{status: 0|1, message, data: {id}}`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateResponse {
    pub status: i64,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub data: Option<CreatedEntity>,
}

/// Тело `data` успешного создания. Идентификатор может отсутствовать —
/// это аномалия каталога, а не ошибка разбора.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedEntity {
    #[serde(default)]
    pub id: Option<i64>,
}

impl CreateResponse {
    /// Идентификатор созданной записи, если каталог его вернул
    pub fn created_id(&self) -> Option<i64> {
        self.data.as_ref().and_then(|d| d.id)
    }

    pub fn is_success(&self) -> bool {
        self.status == 1
    }
}

// ============================================================================
// Client trait
// ============================================================================

/// Интерфейс удаленного каталога.
///
/// Вынесен в трейт, чтобы executors тестировались с подставным каталогом
/// без сети.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Поиск по ключевому слову: первая страница, до 10 совпадений.
    /// Поиск нестрогий — точность совпадения проверяет вызывающая сторона.
    async fn search_references(
        &self,
        kind: ReferenceKind,
        keyword: &str,
    ) -> Result<Vec<ReferenceEntity>, CatalogError>;

    /// Создать элемент справочника (JSON-body)
    async fn create_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<CreateResponse, CatalogError>;

    /// Создать товар (form-body)
    async fn create_product(
        &self,
        form: &[(String, String)],
    ) -> Result<CreateResponse, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_id_absent_is_not_a_parse_error() {
        let resp: CreateResponse =
            serde_json::from_str(r#"{"status": 1, "message": "ok", "data": {}}"#).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.created_id(), None);
    }

    #[test]
    fn test_envelope_with_id() {
        let resp: CreateResponse =
            serde_json::from_str(r#"{"status": 1, "data": {"id": 4411, "name": "x"}}"#).unwrap();
        assert_eq!(resp.created_id(), Some(4411));
    }

    #[test]
    fn test_failure_envelope_without_data() {
        let resp: CreateResponse =
            serde_json::from_str(r#"{"status": 0, "message": "already taken"}"#).unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.created_id(), None);
    }
}
