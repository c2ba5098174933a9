use super::classify::classify_create;
use super::payload::{build_product_form, UploadParams};
use crate::shared::catalog::CatalogApi;
use crate::shared::rate_limit::RateLimiter;
use crate::shared::stores::checkpoint_store::CheckpointStore;
use crate::shared::stores::mapping_store::ReferenceMapping;
use contracts::domain::a001_product_row::ProductRow;
use contracts::usecases::u102_upload_products::{UploadOutcome, UploadSummary};
use std::sync::Arc;

/// Загрузка товаров в каталог с контрольной точкой.
///
/// Проход строго последовательный по отсортированному датасету. Строка
/// фиксируется в контрольной точке только при терминальном исходе;
/// повторяемые исходы оставляют ее следующему запуску.
pub struct UploadExecutor {
    api: Arc<dyn CatalogApi>,
    params: UploadParams,
    rate_limiter: RateLimiter,
}

impl UploadExecutor {
    pub fn new(api: Arc<dyn CatalogApi>, params: UploadParams, rate_limiter: RateLimiter) -> Self {
        Self {
            api,
            params,
            rate_limiter,
        }
    }

    pub async fn run(
        &self,
        rows: &[ProductRow],
        units: &ReferenceMapping,
        categories: &ReferenceMapping,
        checkpoint: &mut CheckpointStore,
    ) -> anyhow::Result<UploadSummary> {
        let mut summary = UploadSummary::new(rows.len());

        tracing::info!(
            "Uploading {} rows ({} already processed)",
            rows.len(),
            checkpoint.processed_len()
        );

        for (index, row) in rows.iter().enumerate() {
            if checkpoint.is_processed(index) {
                summary.skipped += 1;
                continue;
            }

            let outcome = self.dispatch_row(index, row, units, categories, checkpoint).await;

            let dispatched = !matches!(outcome, UploadOutcome::MissingDependency);

            match &outcome {
                UploadOutcome::Created { id } => {
                    tracing::info!("[{}] Created '{}' with id {}", index, row.name, id);
                    if row.kind.is_base() {
                        checkpoint.record_base_id(&row.name, *id);
                    }
                    checkpoint.mark_processed(index)?;
                }
                UploadOutcome::RejectedDuplicate => {
                    // повторная отправка даст тот же отказ: фиксируем
                    tracing::warn!("[{}] Duplicate barcode for '{}'", index, row.name);
                    checkpoint.mark_processed(index)?;
                }
                UploadOutcome::MissingDependency => {
                    tracing::warn!(
                        "[{}] Base product for variant '{}' not created yet",
                        index,
                        row.name
                    );
                }
                UploadOutcome::TransientFailure { detail } => {
                    tracing::error!("[{}] Failed to create '{}': {}", index, row.name, detail);
                }
            }

            summary.record(&outcome);

            // пауза только после строк, дошедших до каталога
            if dispatched {
                self.rate_limiter.wait().await;
            }
        }

        summary.finish();
        tracing::info!(
            "Upload done: {} created, {} skipped, {} duplicates, {} missing base, {} transient",
            summary.created,
            summary.skipped,
            summary.rejected_duplicates,
            summary.missing_dependency,
            summary.transient_failures
        );

        Ok(summary)
    }

    async fn dispatch_row(
        &self,
        index: usize,
        row: &ProductRow,
        units: &ReferenceMapping,
        categories: &ReferenceMapping,
        checkpoint: &CheckpointStore,
    ) -> UploadOutcome {
        // вариант без базового товара не отправляется вовсе
        let base_id = if row.kind.is_variant() {
            match checkpoint.base_id(&row.name) {
                Some(id) => Some(id),
                None => return UploadOutcome::MissingDependency,
            }
        } else {
            None
        };

        tracing::debug!("[{}] Sending type {}: {}", index, row.kind.code(), row.name);

        let form = build_product_form(row, units, categories, &self.params, base_id);
        classify_create(self.api.create_product(&form).await)
    }
}
