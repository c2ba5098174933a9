use crate::domain::a002_reference_entity::ReferenceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Итоги одного прохода синхронизации справочника.
///
/// Каждое различное имя попадает ровно в один счетчик; сумма счетчиков
/// равна `total_names`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReferencesSummary {
    pub kind: ReferenceKind,

    /// Сколько различных имен пришло на вход прохода
    #[serde(rename = "totalNames")]
    pub total_names: usize,

    /// Уже были в сохраненной таблице — удаленных вызовов не было
    #[serde(rename = "alreadyMapped")]
    pub already_mapped: usize,

    /// Найдены поиском по точному совпадению имени
    pub found: usize,

    /// Созданы в каталоге в этом проходе
    pub created: usize,

    /// Создание отчиталось успехом без идентификатора — имя не записано,
    /// будет повторено в следующем проходе
    pub unconfirmed: usize,

    /// Ошибка транспорта/разбора или отказ каталога; проход продолжен
    pub failed: usize,

    #[serde(rename = "startedAt")]
    pub started_at: DateTime<Utc>,

    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl SyncReferencesSummary {
    pub fn new(kind: ReferenceKind, total_names: usize) -> Self {
        Self {
            kind,
            total_names,
            already_mapped: 0,
            found: 0,
            created: 0,
            unconfirmed: 0,
            failed: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Имена, закрепленные в таблице в этом проходе
    pub fn resolved(&self) -> usize {
        self.found + self.created
    }
}
