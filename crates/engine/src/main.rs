pub mod dataset;
pub mod shared;
pub mod usecases;

use contracts::domain::a002_reference_entity::ReferenceKind;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::{u101_sync_references, u102_upload_products};
use shared::catalog::{CatalogApi, CatalogClient};
use shared::config::{load_config, resolve_path};
use shared::rate_limit::RateLimiter;
use shared::stores::checkpoint_store::CheckpointStore;
use shared::stores::mapping_store::MappingStore;
use std::sync::Arc;
use usecases::u101_sync_references::SyncReferencesExecutor;
use usecases::u102_upload_products::{UploadExecutor, UploadParams};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Создаем директорию для логов
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("engine.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    let config = load_config()?;
    if config.api.token.trim().is_empty() {
        anyhow::bail!("catalog API token is not set (config.toml [api].token or CATALOG_API_TOKEN)");
    }

    // ========================================================================
    // Датасет: чтение, сортировка, отчет о дублях
    // ========================================================================

    let products_path = resolve_path(&config.paths.products_file);
    tracing::info!("Loading dataset from {}", products_path.display());

    let rows = dataset::load_dataset(&products_path)?;
    let rows = dataset::sort::sort_rows(rows);
    tracing::info!("Loaded {} product rows", rows.len());

    let report_path = resolve_path(&config.paths.duplicates_report);
    dataset::duplicates::write_report(&rows, &report_path)?;

    let api: Arc<dyn CatalogApi> = Arc::new(CatalogClient::new(&config.api)?);

    // ========================================================================
    // Синхронизация справочников
    // ========================================================================

    tracing::info!(
        "Starting: {}",
        u101_sync_references::SyncReferences::display_name()
    );
    let sync_executor =
        SyncReferencesExecutor::new(api.clone(), RateLimiter::new(config.sync.request_delay_ms));

    for kind in [ReferenceKind::Unit, ReferenceKind::Category] {
        let names = dataset::distinct_reference_names(&rows, kind);
        let store = MappingStore::new(resolve_path(config.paths.mapping_for(kind)));

        let mut mapping = store.load()?;
        let summary = sync_executor.run(kind, &names, &mut mapping).await;
        store.save(&mapping)?;

        tracing::info!(
            "{}: {} of {} names resolved",
            kind.display_name(),
            summary.resolved() + summary.already_mapped,
            summary.total_names
        );
    }

    // ========================================================================
    // Загрузка товаров
    // ========================================================================

    tracing::info!(
        "Starting: {}",
        u102_upload_products::UploadProducts::display_name()
    );

    // перечитываем таблицы: загрузке нужен их итоговый вид
    let units = MappingStore::new(resolve_path(config.paths.mapping_for(ReferenceKind::Unit))).load()?;
    let categories =
        MappingStore::new(resolve_path(config.paths.mapping_for(ReferenceKind::Category))).load()?;

    let mut checkpoint = CheckpointStore::load(resolve_path(&config.paths.checkpoint))?;

    let upload_executor = UploadExecutor::new(
        api,
        UploadParams::from(&config.upload),
        RateLimiter::new(config.upload.request_delay_ms),
    );
    let summary = upload_executor
        .run(&rows, &units, &categories, &mut checkpoint)
        .await?;

    tracing::info!(
        "Finished: {} created, {} skipped, {} failed of {} rows",
        summary.created,
        summary.skipped,
        summary.failed(),
        summary.total_rows
    );

    Ok(())
}
