use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Per-row outcome
// ============================================================================

/// Исход отправки одной строки датасета.
///
/// Каждая неотфильтрованная строка завершается ровно одним из вариантов;
/// оркестратор разбирает тег, а не ловит исключения.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// Каталог создал запись и вернул идентификатор
    Created { id: i64 },

    /// Бизнес-отказ каталога: штрихкод уже занят. Терминально —
    /// повторная отправка даст тот же ответ.
    RejectedDuplicate,

    /// Вариант без созданного базового товара; строка остается
    /// доступной для повтора, как только базовый появится.
    MissingDependency,

    /// Ошибка транспорта/разбора либо ответ без идентификатора;
    /// строка доступна для повтора в следующем запуске.
    TransientFailure { detail: String },
}

impl UploadOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, UploadOutcome::Created { .. })
    }

    /// Терминальный исход фиксируется в контрольной точке
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadOutcome::Created { .. } | UploadOutcome::RejectedDuplicate
        )
    }
}

// ============================================================================
// Pass summary
// ============================================================================

/// Итоги прохода загрузки
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSummary {
    #[serde(rename = "totalRows")]
    pub total_rows: usize,

    /// Строки, уже отмеченные в контрольной точке — без удаленных вызовов
    pub skipped: usize,

    pub created: usize,

    #[serde(rename = "rejectedDuplicates")]
    pub rejected_duplicates: usize,

    #[serde(rename = "missingDependency")]
    pub missing_dependency: usize,

    #[serde(rename = "transientFailures")]
    pub transient_failures: usize,

    #[serde(rename = "startedAt")]
    pub started_at: DateTime<Utc>,

    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl UploadSummary {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            skipped: 0,
            created: 0,
            rejected_duplicates: 0,
            missing_dependency: 0,
            transient_failures: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record(&mut self, outcome: &UploadOutcome) {
        match outcome {
            UploadOutcome::Created { .. } => self.created += 1,
            UploadOutcome::RejectedDuplicate => self.rejected_duplicates += 1,
            UploadOutcome::MissingDependency => self.missing_dependency += 1,
            UploadOutcome::TransientFailure { .. } => self.transient_failures += 1,
        }
    }

    /// Все неуспешные исходы вместе, как их считал бы оператор
    pub fn failed(&self) -> usize {
        self.rejected_duplicates + self.missing_dependency + self.transient_failures
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}
