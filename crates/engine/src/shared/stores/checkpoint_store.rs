use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Содержимое контрольной точки загрузки.
///
/// `processed_indices` — порядковые номера строк в отсортированном датасете.
/// Контрольная точка валидна только против того же файла данных: детерминированная
/// сортировка выполняется перед каждым проходом, но замена или фильтрация
/// исходного файла между запусками делает номера бессмысленными.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckpointState {
    #[serde(default)]
    pub processed_indices: BTreeSet<usize>,

    /// Идентификаторы, присвоенные каталогом базовым товарам, по имени.
    /// Нужны вариантам, обрабатываемым позже — возможно, в другом запуске.
    #[serde(default)]
    pub base_ids: BTreeMap<String, i64>,
}

/// Журнал прогресса загрузки с синхронной записью.
///
/// Каждая мутация уходит на диск атомарно до обработки следующей строки,
/// так что обрыв процесса теряет максимум строку в полете.
pub struct CheckpointStore {
    path: PathBuf,
    state: CheckpointState,
}

impl CheckpointStore {
    /// Загрузить контрольную точку; отсутствующий файл — чистый старт
    pub fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();

        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read checkpoint {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("failed to parse checkpoint {}", path.display()))?
        } else {
            CheckpointState::default()
        };

        Ok(Self { path, state })
    }

    pub fn is_processed(&self, index: usize) -> bool {
        self.state.processed_indices.contains(&index)
    }

    pub fn processed_len(&self) -> usize {
        self.state.processed_indices.len()
    }

    pub fn base_id(&self, name: &str) -> Option<i64> {
        self.state.base_ids.get(name).copied()
    }

    /// Запомнить идентификатор базового товара. На диск уходит вместе
    /// с отметкой строки в `mark_processed` — одной атомарной записью.
    pub fn record_base_id(&mut self, name: &str, id: i64) {
        self.state.base_ids.insert(name.to_string(), id);
    }

    /// Отметить строку обработанной и немедленно сохранить на диск
    pub fn mark_processed(&mut self, index: usize) -> anyhow::Result<()> {
        self.state.processed_indices.insert(index);
        self.persist()
    }

    fn persist(&self) -> anyhow::Result<()> {
        super::write_json_atomic(&self.path, &self.state)
    }
}
