use crate::shared::catalog::{CatalogApi, CatalogError};
use crate::shared::rate_limit::RateLimiter;
use crate::shared::stores::mapping_store::ReferenceMapping;
use contracts::domain::a002_reference_entity::ReferenceKind;
use contracts::usecases::u101_sync_references::SyncReferencesSummary;
use std::sync::Arc;

/// Исход закрепления одного имени в каталоге
enum Resolution {
    /// Найден поиском по точному совпадению
    Found(i64),
    /// Создан в этом проходе
    Created(i64),
    /// Каталог отчитался успехом, но идентификатора не вернул
    Unconfirmed,
    /// Каталог отказал в создании
    Rejected(String),
}

/// Синхронизация справочника: каждому различному имени из датасета —
/// идентификатор в каталоге.
///
/// Идемпотентность двухуровневая: сначала локальная таблица (без сетевых
/// вызовов), затем точный поиск в каталоге, и только потом создание.
/// Ошибка по одному имени не прерывает проход.
pub struct SyncReferencesExecutor {
    api: Arc<dyn CatalogApi>,
    rate_limiter: RateLimiter,
}

impl SyncReferencesExecutor {
    pub fn new(api: Arc<dyn CatalogApi>, rate_limiter: RateLimiter) -> Self {
        Self { api, rate_limiter }
    }

    /// Провести имена через таблицу и каталог. Таблица пополняется на месте;
    /// сохранение на диск — забота вызывающего.
    pub async fn run(
        &self,
        kind: ReferenceKind,
        names: &[String],
        mapping: &mut ReferenceMapping,
    ) -> SyncReferencesSummary {
        let mut summary = SyncReferencesSummary::new(kind, names.len());

        tracing::info!(
            "Syncing {} {} names ({} already mapped)",
            names.len(),
            kind,
            mapping.len()
        );

        for name in names {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }

            if mapping.contains_key(name) {
                summary.already_mapped += 1;
                continue;
            }

            match self.resolve_or_create(kind, name).await {
                Ok(Resolution::Found(id)) => {
                    tracing::info!("Found existing {} '{}' with id {}", kind, name, id);
                    mapping.insert(name.to_string(), id);
                    summary.found += 1;
                }
                Ok(Resolution::Created(id)) => {
                    tracing::info!("Created {} '{}' with id {}", kind, name, id);
                    mapping.insert(name.to_string(), id);
                    summary.created += 1;
                }
                Ok(Resolution::Unconfirmed) => {
                    // без идентификатора имя не фиксируем: повторный проход
                    // найдет запись поиском
                    tracing::warn!("Created {} '{}' but no id returned", kind, name);
                    summary.unconfirmed += 1;
                }
                Ok(Resolution::Rejected(message)) => {
                    tracing::warn!("Catalog rejected {} '{}': {}", kind, name, message);
                    summary.failed += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to resolve {} '{}': {}", kind, name, e);
                    summary.failed += 1;
                }
            }

            self.rate_limiter.wait().await;
        }

        summary.finish();
        tracing::info!(
            "{} sync done: {} found, {} created, {} unconfirmed, {} failed",
            kind,
            summary.found,
            summary.created,
            summary.unconfirmed,
            summary.failed
        );

        summary
    }

    /// Точный поиск, затем создание. Совпадение строгое: trim с обеих
    /// сторон, регистр значим — поиск каталога нестрогий и вернуть может
    /// что угодно.
    async fn resolve_or_create(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<Resolution, CatalogError> {
        let matches = self.api.search_references(kind, name).await?;

        if let Some(entity) = matches.iter().find(|e| e.name.trim() == name) {
            return Ok(Resolution::Found(entity.id));
        }

        let response = self.api.create_reference(kind, name).await?;

        if !response.is_success() {
            return Ok(Resolution::Rejected(response.message));
        }

        match response.created_id() {
            Some(id) => Ok(Resolution::Created(id)),
            None => Ok(Resolution::Unconfirmed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::catalog::CreateResponse;
    use async_trait::async_trait;
    use contracts::domain::a002_reference_entity::ReferenceEntity;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeCatalog {
        search_results: Mutex<VecDeque<Result<Vec<ReferenceEntity>, CatalogError>>>,
        create_results: Mutex<VecDeque<Result<CreateResponse, CatalogError>>>,
        search_calls: Mutex<Vec<String>>,
        create_calls: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        fn push_search(&self, result: Result<Vec<ReferenceEntity>, CatalogError>) {
            self.search_results.lock().unwrap().push_back(result);
        }

        fn push_create(&self, result: Result<CreateResponse, CatalogError>) {
            self.create_results.lock().unwrap().push_back(result);
        }

        fn create_calls(&self) -> Vec<String> {
            self.create_calls.lock().unwrap().clone()
        }

        fn search_calls(&self) -> Vec<String> {
            self.search_calls.lock().unwrap().clone()
        }
    }

    fn create_response(json: &str) -> CreateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        async fn search_references(
            &self,
            _kind: ReferenceKind,
            keyword: &str,
        ) -> Result<Vec<ReferenceEntity>, CatalogError> {
            self.search_calls.lock().unwrap().push(keyword.to_string());
            self.search_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(Vec::new()))
        }

        async fn create_reference(
            &self,
            _kind: ReferenceKind,
            name: &str,
        ) -> Result<CreateResponse, CatalogError> {
            self.create_calls.lock().unwrap().push(name.to_string());
            self.create_results
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected create_reference call")
        }

        async fn create_product(
            &self,
            _form: &[(String, String)],
        ) -> Result<CreateResponse, CatalogError> {
            panic!("create_product is not used by reference sync");
        }
    }

    fn executor(api: Arc<FakeCatalog>) -> SyncReferencesExecutor {
        SyncReferencesExecutor::new(api, RateLimiter::new(0))
    }

    #[tokio::test]
    async fn test_exact_match_short_circuits_create() {
        let api = Arc::new(FakeCatalog::default());
        api.push_search(Ok(vec![ReferenceEntity {
            id: 42,
            name: "Liter ".to_string(),
        }]));

        let mut mapping = ReferenceMapping::new();
        let summary = executor(api.clone())
            .run(ReferenceKind::Unit, &["Liter".to_string()], &mut mapping)
            .await;

        assert_eq!(summary.found, 1);
        assert_eq!(mapping.get("Liter"), Some(&42));
        assert!(api.create_calls().is_empty());
    }

    #[tokio::test]
    async fn test_case_differing_hit_is_not_a_match() {
        let api = Arc::new(FakeCatalog::default());
        api.push_search(Ok(vec![ReferenceEntity {
            id: 42,
            name: "liter".to_string(),
        }]));
        api.push_create(Ok(create_response(r#"{"status": 1, "data": {"id": 77}}"#)));

        let mut mapping = ReferenceMapping::new();
        let summary = executor(api.clone())
            .run(ReferenceKind::Unit, &["Liter".to_string()], &mut mapping)
            .await;

        assert_eq!(summary.found, 0);
        assert_eq!(summary.created, 1);
        assert_eq!(mapping.get("Liter"), Some(&77));
        assert_eq!(api.create_calls(), vec!["Liter"]);
    }

    #[tokio::test]
    async fn test_create_without_id_leaves_name_unmapped() {
        let api = Arc::new(FakeCatalog::default());
        api.push_search(Ok(Vec::new()));
        api.push_create(Ok(create_response(r#"{"status": 1, "data": {}}"#)));

        let mut mapping = ReferenceMapping::new();
        let summary = executor(api)
            .run(ReferenceKind::Category, &["Drinks".to_string()], &mut mapping)
            .await;

        assert_eq!(summary.unconfirmed, 1);
        assert!(mapping.is_empty());
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_the_pass() {
        let api = Arc::new(FakeCatalog::default());
        api.push_search(Err(CatalogError::Http {
            status: 500,
            body: "boom".to_string(),
        }));
        api.push_search(Ok(Vec::new()));
        api.push_create(Ok(create_response(r#"{"status": 1, "data": {"id": 5}}"#)));

        let mut mapping = ReferenceMapping::new();
        let summary = executor(api)
            .run(
                ReferenceKind::Unit,
                &["Box".to_string(), "Piece".to_string()],
                &mut mapping,
            )
            .await;

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(mapping.get("Piece"), Some(&5));
        assert_eq!(mapping.get("Box"), None);
    }

    #[tokio::test]
    async fn test_already_mapped_makes_no_remote_calls() {
        let api = Arc::new(FakeCatalog::default());

        let mut mapping = ReferenceMapping::new();
        mapping.insert("Liter".to_string(), 42);

        let summary = executor(api.clone())
            .run(ReferenceKind::Unit, &["Liter".to_string()], &mut mapping)
            .await;

        assert_eq!(summary.already_mapped, 1);
        assert!(api.search_calls().is_empty());
        assert!(api.create_calls().is_empty());
    }

    #[tokio::test]
    async fn test_rejection_counts_as_failed() {
        let api = Arc::new(FakeCatalog::default());
        api.push_search(Ok(Vec::new()));
        api.push_create(Ok(create_response(
            r#"{"status": 0, "message": "name already taken"}"#,
        )));

        let mut mapping = ReferenceMapping::new();
        let summary = executor(api)
            .run(ReferenceKind::Unit, &["Box".to_string()], &mut mapping)
            .await;

        assert_eq!(summary.failed, 1);
        assert!(mapping.is_empty());
    }
}
