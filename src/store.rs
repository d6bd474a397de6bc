use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use tempfile::Builder;

use crate::domain::{PdbId, StructureRecord};
use crate::error::PdbError;

/// On-disk cache of structure records and assembly images. One `<id>.json`
/// and one `<id>.jpeg` per structure, both named by the lowercased id.
/// Entries are created on first successful lookup and never expired.
#[derive(Debug, Clone)]
pub struct Store {
    root: Utf8PathBuf,
}

impl Store {
    pub fn new() -> Result<Self, PdbError> {
        let root = BaseDirs::new()
            .and_then(|dirs| {
                Utf8PathBuf::from_path_buf(dirs.data_dir().join("pdb-scout")).ok()
            })
            .ok_or_else(|| PdbError::Filesystem("unable to resolve data directory".to_string()))?;
        Ok(Self { root })
    }

    pub fn new_with_root(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Path of the cached JSON record. Derivation only, no I/O.
    pub fn record_path(&self, id: &PdbId) -> Utf8PathBuf {
        self.root.join(format!("{id}.json"))
    }

    /// Path of the cached assembly image. Derivation only, no I/O.
    pub fn image_path(&self, id: &PdbId) -> Utf8PathBuf {
        self.root.join(format!("{id}.jpeg"))
    }

    pub fn has_image(&self, id: &PdbId) -> bool {
        self.image_path(id).as_std_path().exists()
    }

    /// Reads the cached record for `id`. A missing file is `Ok(None)`; a file
    /// that exists but does not parse is a `CorruptCache` error.
    pub fn load_record(&self, id: &PdbId) -> Result<Option<StructureRecord>, PdbError> {
        let path = self.record_path(id);
        let content = match fs::read_to_string(path.as_std_path()) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(PdbError::Filesystem(err.to_string())),
        };
        let record = serde_json::from_str(&content).map_err(|err| PdbError::CorruptCache {
            path: path.to_string(),
            message: err.to_string(),
        })?;
        Ok(Some(record))
    }

    /// Writes the record as pretty JSON, overwriting any prior entry. The
    /// write goes through a temp file and rename so readers never observe a
    /// partial record.
    pub fn save_record(&self, id: &PdbId, record: &StructureRecord) -> Result<(), PdbError> {
        fs::create_dir_all(self.root.as_std_path())
            .map_err(|err| PdbError::Filesystem(err.to_string()))?;
        let path = self.record_path(id);
        let tmp_path = path.with_extension("json.tmp");
        let content = serde_json::to_vec_pretty(record)
            .map_err(|err| PdbError::Filesystem(err.to_string()))?;
        fs::write(tmp_path.as_std_path(), &content)
            .map_err(|err| PdbError::Filesystem(err.to_string()))?;
        fs::rename(tmp_path.as_std_path(), path.as_std_path())
            .map_err(|err| PdbError::Filesystem(err.to_string()))?;
        Ok(())
    }

    /// Persists the image bytes atomically next to the record.
    pub fn write_image(&self, id: &PdbId, content: &[u8]) -> Result<(), PdbError> {
        fs::create_dir_all(self.root.as_std_path())
            .map_err(|err| PdbError::Filesystem(err.to_string()))?;
        let dest = self.image_path(id);
        let temp = Builder::new()
            .prefix("pdb-scout-img")
            .tempfile_in(self.root.as_std_path())
            .map_err(|err| PdbError::Filesystem(err.to_string()))?;
        fs::write(temp.path(), content).map_err(|err| PdbError::Filesystem(err.to_string()))?;
        temp.persist(dest.as_std_path())
            .map_err(|err| PdbError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let temp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().join("cache")).unwrap();
        (temp, Store::new_with_root(root))
    }

    #[test]
    fn layout_paths() {
        let (_temp, store) = temp_store();
        let id: PdbId = "1tup".parse().unwrap();
        assert!(store.record_path(&id).ends_with("1tup.json"));
        assert!(store.image_path(&id).ends_with("1tup.jpeg"));
    }

    #[test]
    fn load_missing_record_is_none() {
        let (_temp, store) = temp_store();
        let id: PdbId = "1tup".parse().unwrap();
        assert!(store.load_record(&id).unwrap().is_none());
        assert!(!store.has_image(&id));
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_temp, store) = temp_store();
        let id: PdbId = "1tup".parse().unwrap();
        let mut record = StructureRecord::empty(&id);
        record.title = Some("Tumor suppressor p53".to_string());
        record.authors = vec!["Cho, Y.".to_string()];

        store.save_record(&id, &record).unwrap();
        let loaded = store.load_record(&id).unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn saved_record_is_indented_utf8() {
        let (_temp, store) = temp_store();
        let id: PdbId = "1tup".parse().unwrap();
        let mut record = StructureRecord::empty(&id);
        record.organism = Some("Homo sapiens — ヒト".to_string());
        store.save_record(&id, &record).unwrap();

        let raw = fs::read_to_string(store.record_path(&id).as_std_path()).unwrap();
        assert!(raw.contains("\n  \"pdbid\""));
        assert!(raw.contains("ヒト"));
        assert!(!raw.contains("\\u"));
    }

    #[test]
    fn corrupt_record_is_an_error() {
        let (_temp, store) = temp_store();
        let id: PdbId = "1tup".parse().unwrap();
        fs::create_dir_all(store.root().as_std_path()).unwrap();
        fs::write(store.record_path(&id).as_std_path(), b"not json").unwrap();

        let err = store.load_record(&id).unwrap_err();
        assert_matches!(err, PdbError::CorruptCache { .. });
    }

    #[test]
    fn write_image_then_has_image() {
        let (_temp, store) = temp_store();
        let id: PdbId = "1tup".parse().unwrap();
        store.write_image(&id, b"\xff\xd8jpeg").unwrap();
        assert!(store.has_image(&id));
        assert_eq!(
            fs::read(store.image_path(&id).as_std_path()).unwrap(),
            b"\xff\xd8jpeg"
        );
    }

    #[test]
    fn save_overwrites_previous_record() {
        let (_temp, store) = temp_store();
        let id: PdbId = "1tup".parse().unwrap();
        let mut record = StructureRecord::empty(&id);
        record.title = Some("first".to_string());
        store.save_record(&id, &record).unwrap();
        record.title = Some("second".to_string());
        store.save_record(&id, &record).unwrap();

        let loaded = store.load_record(&id).unwrap().unwrap();
        assert_eq!(loaded.title.as_deref(), Some("second"));
    }
}
