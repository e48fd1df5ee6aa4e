use super::{PersistenceError, SnapshotStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Snapshot entries kept in a single JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileSnapshotStore {
    /// Opens the store at `path`. A missing file starts empty; an unreadable
    /// one is logged and replaced on the next write.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "snapshot file unreadable, starting empty");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "snapshot file unavailable, starting empty");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let encoded = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, encoded)?;
        debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn write_all(&mut self, entries: Vec<(&'static str, String)>) -> Result<(), PersistenceError> {
        for (key, value) in entries {
            self.entries.insert(key.to_string(), value);
        }
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("duty-roster-{}-{name}", std::process::id()))
            .join("state.json")
    }

    #[test]
    fn entries_persist_across_reopen() {
        let path = scratch_path("reopen");
        let _ = std::fs::remove_file(&path);

        let mut store = FileSnapshotStore::open(&path);
        assert!(store.read("selected_year").is_none());
        store
            .write("selected_year", "2025".to_string())
            .expect("write succeeds");

        let reopened = FileSnapshotStore::open(&path);
        assert_eq!(reopened.read("selected_year").as_deref(), Some("2025"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unreadable_file_starts_empty() {
        let path = scratch_path("corrupt");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("dir");
        std::fs::write(&path, "][").expect("write garbage");

        let store = FileSnapshotStore::open(&path);
        assert!(store.read("duty_assignments").is_none());
        let _ = std::fs::remove_file(&path);
    }
}
