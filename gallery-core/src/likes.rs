use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{GalleryError, Result};

/// Filename to like-count mapping persisted as a flat JSON object.
///
/// Keys do not have to match the images of the current build; a missing key
/// reads as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikeStore(BTreeMap<String, u64>);

impl LikeStore {
    /// Every known filename mapped to zero.
    pub fn zeroed<'a>(filenames: impl IntoIterator<Item = &'a str>) -> Self {
        Self(
            filenames
                .into_iter()
                .map(|name| (name.to_string(), 0))
                .collect(),
        )
    }

    /// Build-time load: a missing or malformed file falls back to a zeroed
    /// store for `filenames` and is never reported as an error.
    pub fn load<'a>(path: &Path, filenames: impl IntoIterator<Item = &'a str>) -> Self {
        if !path.exists() {
            tracing::debug!("No like store at {}, starting from zero", path.display());
            return Self::zeroed(filenames);
        }

        match Self::read(path) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("Ignoring unreadable like store: {}", e);
                Self::zeroed(filenames)
            }
        }
    }

    /// Serve-time read: failures surface to the caller.
    pub fn read(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(GalleryError::io(path))?;
        serde_json::from_str(&json).map_err(GalleryError::parse(path))
    }

    /// Overwrites each key present in `incoming`; other keys keep their value.
    pub fn merge(&mut self, incoming: LikeStore) {
        self.0.extend(incoming.0);
    }

    /// Writes the full mapping to a sibling temp file and renames it over
    /// `path`, so readers see either the old or the new document.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(GalleryError::parse(path))?;

        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, json).map_err(GalleryError::io(&tmp_path))?;
        fs::rename(&tmp_path, path).map_err(GalleryError::io(path))?;

        tracing::debug!("Persisted {} like counts to {}", self.0.len(), path.display());
        Ok(())
    }

    pub fn count(&self, filename: &str) -> u64 {
        self.0.get(filename).copied().unwrap_or(0)
    }

    pub fn set(&mut self, filename: impl Into<String>, count: u64) {
        self.0.insert(filename.into(), count);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, u64)> for LikeStore {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(entries: &[(&str, u64)]) -> LikeStore {
        entries
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect()
    }

    #[test]
    fn load_falls_back_to_zero_when_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("likes.json");

        let likes = LikeStore::load(&path, ["a.jpg", "b.png"]);

        assert_eq!(likes, store(&[("a.jpg", 0), ("b.png", 0)]));
    }

    #[test]
    fn load_treats_malformed_file_as_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("likes.json");

        for garbage in ["{not json", r#"{"a.jpg": -3}"#, r#"{"a.jpg": "many"}"#, "[1, 2]"] {
            fs::write(&path, garbage).unwrap();
            let likes = LikeStore::load(&path, ["a.jpg"]);
            assert_eq!(likes, store(&[("a.jpg", 0)]), "input: {garbage}");
        }
    }

    #[test]
    fn load_keeps_existing_counts_and_stale_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("likes.json");
        fs::write(&path, r#"{"a.jpg": 4, "gone.jpg": 2}"#).unwrap();

        let likes = LikeStore::load(&path, ["a.jpg", "b.jpg"]);

        assert_eq!(likes.count("a.jpg"), 4);
        assert_eq!(likes.count("gone.jpg"), 2);
        assert_eq!(likes.count("b.jpg"), 0);
    }

    #[test]
    fn read_surfaces_missing_and_malformed_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("likes.json");

        assert!(matches!(
            LikeStore::read(&path),
            Err(GalleryError::Io { .. })
        ));

        fs::write(&path, "{").unwrap();
        assert!(matches!(
            LikeStore::read(&path),
            Err(GalleryError::Parse { .. })
        ));
    }

    #[test]
    fn merge_overwrites_only_incoming_keys() {
        let mut likes = store(&[("a.jpg", 1), ("b.jpg", 7)]);

        likes.merge(store(&[("a.jpg", 5), ("c.jpg", 2)]));

        assert_eq!(likes, store(&[("a.jpg", 5), ("b.jpg", 7), ("c.jpg", 2)]));
    }

    #[test]
    fn merge_overwrites_rather_than_increments() {
        let mut likes = store(&[("a.jpg", 10)]);
        likes.merge(store(&[("a.jpg", 3)]));
        assert_eq!(likes.count("a.jpg"), 3);
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let original = store(&[("a.jpg", 1), ("b.jpg", 0)]);
        let mut likes = original.clone();

        likes.merge(LikeStore::default());

        assert_eq!(likes, original);
    }

    #[test]
    fn persist_then_read_reproduces_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("likes.json");
        let likes = store(&[("a.jpg", 5), ("b c.png", 0), ("ü.gif", 12)]);

        likes.persist(&path).unwrap();

        assert_eq!(LikeStore::read(&path).unwrap(), likes);
        assert_eq!(LikeStore::load(&path, ["other.jpg"]), likes);
        assert!(!dir.path().join("likes.json.tmp").exists());
    }

    #[test]
    fn persists_a_flat_json_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("likes.json");
        store(&[("a.jpg", 2)]).persist(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(value, serde_json::json!({ "a.jpg": 2 }));
    }
}
