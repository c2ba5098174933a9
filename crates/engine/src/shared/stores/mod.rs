pub mod checkpoint_store;
pub mod mapping_store;

use anyhow::Context;
use serde::Serialize;
use std::path::Path;

/// Атомарная запись JSON: временный файл рядом + rename.
/// Обрыв процесса посреди записи не оставляет усеченного файла.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace {}", path.display()))?;

    Ok(())
}
