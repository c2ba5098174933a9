use anyhow::Context;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Таблица "имя → идентификатор" одного справочника.
/// Ключи уникальны после trim; регистр не сворачивается.
pub type ReferenceMapping = BTreeMap<String, i64>;

/// Файловое хранилище таблицы соответствий.
///
/// JSON-объект имя → id, человекочитаемый, не-ASCII имена без экранирования.
/// Один писатель (этот процесс): чтение при старте прохода, запись в конце.
pub struct MappingStore {
    path: PathBuf,
}

impl MappingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Загрузить таблицу; отсутствующий файл — пустая таблица.
    /// Ключи нормализуются (trim) при загрузке.
    pub fn load(&self) -> anyhow::Result<ReferenceMapping> {
        if !self.path.exists() {
            return Ok(ReferenceMapping::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read mapping file {}", self.path.display()))?;

        let raw: BTreeMap<String, i64> = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse mapping file {}", self.path.display()))?;

        Ok(raw
            .into_iter()
            .map(|(name, id)| (name.trim().to_string(), id))
            .collect())
    }

    /// Сохранить таблицу, дописав ее к ранее сохраненным записям.
    /// Частичная таблица из прерванного прохода никогда не затирает
    /// накопленное целиком.
    pub fn save(&self, mapping: &ReferenceMapping) -> anyhow::Result<()> {
        let mut merged = self.load()?;
        for (name, id) in mapping {
            merged.insert(name.clone(), *id);
        }

        super::write_json_atomic(&self.path, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty_mapping() {
        let dir = tempdir().unwrap();
        let store = MappingStore::new(dir.path().join("units_mapping.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_preserves_non_ascii_names() {
        let dir = tempdir().unwrap();
        let store = MappingStore::new(dir.path().join("units_mapping.json"));

        let mut mapping = ReferenceMapping::new();
        mapping.insert("Liter".to_string(), 10);
        mapping.insert("كرتونة".to_string(), 11);
        mapping.insert("Упаковка".to_string(), 12);
        store.save(&mapping).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, mapping);

        // не-ASCII имена лежат в файле как есть, без \u-экранирования
        let raw = std::fs::read_to_string(dir.path().join("units_mapping.json")).unwrap();
        assert!(raw.contains("كرتونة"));
        assert!(raw.contains("Упаковка"));
    }

    #[test]
    fn test_save_merges_with_previously_persisted() {
        let dir = tempdir().unwrap();
        let store = MappingStore::new(dir.path().join("m.json"));

        let mut first = ReferenceMapping::new();
        first.insert("Box".to_string(), 1);
        store.save(&first).unwrap();

        // второй проход знает только свои имена
        let mut second = ReferenceMapping::new();
        second.insert("Piece".to_string(), 2);
        store.save(&second).unwrap();

        let merged = store.load().unwrap();
        assert_eq!(merged.get("Box"), Some(&1));
        assert_eq!(merged.get("Piece"), Some(&2));
    }

    #[test]
    fn test_load_trims_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.json");
        std::fs::write(&path, r#"{" Liter ": 7}"#).unwrap();

        let store = MappingStore::new(&path);
        let mapping = store.load().unwrap();
        assert_eq!(mapping.get("Liter"), Some(&7));
    }

    #[test]
    fn test_no_stale_temp_file_left_behind() {
        let dir = tempdir().unwrap();
        let store = MappingStore::new(dir.path().join("m.json"));

        let mut mapping = ReferenceMapping::new();
        mapping.insert("Box".to_string(), 1);
        store.save(&mapping).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("m.json")]);
    }
}
