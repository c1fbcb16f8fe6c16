use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DuesError, Result};

/// Load a whole-document JSON store. A missing file is a valid empty store;
/// a present-but-unreadable file is an error so a corrupt store is never
/// silently replaced by an empty one on the next save.
pub fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| DuesError::Store(format!("{}: {e}", path.display())))
}

/// Overwrite a whole-document JSON store.
///
/// Writes to a temporary file in the same directory and renames it over the
/// target so a crash mid-save never leaves a half-written store behind.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| DuesError::Store(e.to_string()))?;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, format!("{json}\n"))?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Doc {
        entries: BTreeMap<String, i64>,
    }

    #[test]
    fn test_load_missing_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let doc: Doc = load_json(&dir.path().join("absent.json")).unwrap();
        assert_eq!(doc, Doc::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let mut doc = Doc::default();
        doc.entries.insert("a".into(), 1);
        doc.entries.insert("b".into(), 2);
        save_json(&path, &doc).unwrap();
        let loaded: Doc = load_json(&path).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        save_json(&path, &Doc::default()).unwrap();
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["doc.json".to_string()]);
    }

    #[test]
    fn test_corrupt_store_is_an_error_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, "{not json").unwrap();
        let result: Result<Doc> = load_json(&path);
        assert!(matches!(result, Err(DuesError::Store(_))));
    }
}
