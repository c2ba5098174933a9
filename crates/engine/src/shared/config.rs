use contracts::domain::a002_reference_entity::ReferenceKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    pub upload: UploadConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Базовый URL каталога, без завершающего слеша
    pub base_url: String,

    /// Bearer-токен; можно переопределить переменной CATALOG_API_TOKEN
    #[serde(default)]
    pub token: String,

    /// Таймаут транспорта задается явно, а не по умолчанию клиента
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    /// Пауза между обращениями при синхронизации справочников
    #[serde(default = "default_sync_delay_ms")]
    pub request_delay_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_sync_delay_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    pub stock_id: i64,

    pub tax_id: i64,

    /// Ставка налога для salePriceWithTax (0.15 = 15%)
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,

    /// Идентификатор единицы измерения, если имя не найдено в таблице
    pub default_unit_id: i64,

    /// Идентификатор категории, если имя не найдено в таблице
    pub default_category_id: i64,

    /// Пауза между отправками товаров
    #[serde(default = "default_upload_delay_ms")]
    pub request_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    #[serde(default = "default_products_file")]
    pub products_file: String,
    #[serde(default = "default_units_mapping")]
    pub units_mapping: String,
    #[serde(default = "default_categories_mapping")]
    pub categories_mapping: String,
    #[serde(default = "default_checkpoint")]
    pub checkpoint: String,
    #[serde(default = "default_duplicates_report")]
    pub duplicates_report: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            products_file: default_products_file(),
            units_mapping: default_units_mapping(),
            categories_mapping: default_categories_mapping(),
            checkpoint: default_checkpoint(),
            duplicates_report: default_duplicates_report(),
        }
    }
}

impl PathsConfig {
    /// Файл таблицы соответствий для справочника данного типа
    pub fn mapping_for(&self, kind: ReferenceKind) -> &str {
        match kind {
            ReferenceKind::Unit => &self.units_mapping,
            ReferenceKind::Category => &self.categories_mapping,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_sync_delay_ms() -> u64 {
    500
}

fn default_upload_delay_ms() -> u64 {
    100
}

fn default_tax_rate() -> f64 {
    0.15
}

fn default_products_file() -> String {
    "products.xlsx".to_string()
}

fn default_units_mapping() -> String {
    "units_mapping.json".to_string()
}

fn default_categories_mapping() -> String {
    "categories_mapping.json".to_string()
}

fn default_checkpoint() -> String {
    "upload_checkpoint.json".to_string()
}

fn default_duplicates_report() -> String {
    "duplicate_barcodes.csv".to_string()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "https://api.catalog.example/v2"
token = ""
timeout_secs = 30

[sync]
request_delay_ms = 500

[upload]
stock_id = 1
tax_id = 1
tax_rate = 0.15
default_unit_id = 14656
default_category_id = 4470
request_delay_ms = 100

[paths]
products_file = "products.xlsx"
units_mapping = "units_mapping.json"
categories_mapping = "categories_mapping.json"
checkpoint = "upload_checkpoint.json"
duplicates_report = "duplicate_barcodes.csv"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// `CATALOG_API_TOKEN` always wins over the configured token.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = read_config_file()?;

    if let Ok(token) = std::env::var("CATALOG_API_TOKEN") {
        if !token.trim().is_empty() {
            config.api.token = token.trim().to_string();
        }
    }

    Ok(config)
}

fn read_config_file() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Resolves relative paths relative to the executable directory
pub fn resolve_path(path_str: &str) -> PathBuf {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    // Fallback: use relative to current directory
    PathBuf::from(path_str)
}
