//! Storage backends for style records

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use crate::constants::store;
use crate::error::StoreError;

/// Raw key-value persistence for encoded style records
pub trait StyleBackend {
    /// `Ok(None)` when nothing has been saved under `key`
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Resolve the store directory.
/// Priority: explicit override > `BINARY_TIME_STORE_DIR` > platform config dir > `.`
pub fn resolve_store_dir(override_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }
    if let Ok(dir) = std::env::var(store::DIR_ENV)
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(store::APP_DIR);
    path.push(store::STYLES_DIR);
    path
}

/// One JSON document per key inside a directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{}", store::RECORD_EXTENSION))
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        if self.dir.exists() && !self.dir.is_dir() {
            return Err(StoreError::Unavailable(format!(
                "{} exists but is not a directory",
                self.dir.display()
            )));
        }
        fs::create_dir_all(&self.dir).map_err(|e| {
            StoreError::Unavailable(format!("cannot create {}: {e}", self.dir.display()))
        })
    }
}

impl StyleBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if self.dir.exists() && !self.dir.is_dir() {
            return Err(StoreError::Unavailable(format!(
                "{} exists but is not a directory",
                self.dir.display()
            )));
        }
        let path = self.record_path(key);
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes = bytes.len(), "Read style record");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { key: key.to_string(), source }),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let path = self.record_path(key);
        // Write beside the target then rename so readers never see a partial record
        let tmp = path.with_extension(format!("{}.tmp", store::RECORD_EXTENSION));
        let io_err = |source| StoreError::Io { key: key.to_string(), source };
        fs::write(&tmp, bytes).map_err(io_err)?;
        if let Err(source) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_err(source));
        }
        info!(path = %path.display(), "Saved style record");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.record_path(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "Removed style record");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { key: key.to_string(), source }),
        }
    }
}

/// In-process backend for tests and dry runs
#[derive(Debug)]
pub struct MemoryBackend {
    records: Mutex<HashMap<String, Vec<u8>>>,
    available: AtomicBool,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a missing storage namespace
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Store raw bytes, bypassing encoding
    pub fn insert_raw(&self, key: &str, bytes: impl Into<Vec<u8>>) {
        self.lock().insert(key.to_string(), bytes.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A poisoned map is still a valid map
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory backend disabled".to_string()))
        }
    }
}

impl StyleBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_available()?;
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.check_available()?;
        self.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_available()?;
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("binary-time-test-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_resolve_store_dir_prefers_override() {
        let dir = resolve_store_dir(Some(PathBuf::from("/tmp/custom-styles")));
        assert_eq!(dir, PathBuf::from("/tmp/custom-styles"));
    }

    #[test]
    fn test_file_backend_missing_record() {
        let backend = FileBackend::new(temp_dir("missing"));
        assert!(backend.read("widgetStyle_systemSmall").unwrap().is_none());
    }

    #[test]
    fn test_file_backend_write_read_remove() {
        let dir = temp_dir("write-read");
        let backend = FileBackend::new(&dir);

        backend.write("widgetStyle_systemLarge", b"{\"a\":1}").unwrap();
        assert!(backend.record_path("widgetStyle_systemLarge").exists());
        assert_eq!(
            backend.read("widgetStyle_systemLarge").unwrap().as_deref(),
            Some(&b"{\"a\":1}"[..])
        );

        backend.remove("widgetStyle_systemLarge").unwrap();
        assert!(backend.read("widgetStyle_systemLarge").unwrap().is_none());
        // Second remove is a no-op
        backend.remove("widgetStyle_systemLarge").unwrap();

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_backend_unavailable_when_dir_is_a_file() {
        let dir = temp_dir("not-a-dir");
        fs::write(&dir, b"occupied").unwrap();
        let backend = FileBackend::new(&dir);

        assert!(matches!(backend.read("k"), Err(StoreError::Unavailable(_))));
        assert!(matches!(backend.write("k", b"x"), Err(StoreError::Unavailable(_))));

        let _ = fs::remove_file(dir);
    }

    #[test]
    fn test_file_backend_failed_rename_cleans_up_temp_file() {
        let dir = temp_dir("rename-fails");
        let backend = FileBackend::new(&dir);
        // A directory squatting on the record path makes the rename fail
        fs::create_dir_all(backend.record_path("k")).unwrap();

        assert!(matches!(backend.write("k", b"x"), Err(StoreError::Io { .. })));
        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_memory_backend_unavailable() {
        let backend = MemoryBackend::new();
        backend.write("k", b"v").unwrap();
        backend.set_available(false);
        assert!(matches!(backend.read("k"), Err(StoreError::Unavailable(_))));
        assert!(matches!(backend.write("k", b"w"), Err(StoreError::Unavailable(_))));
        backend.set_available(true);
        assert_eq!(backend.read("k").unwrap(), Some(b"v".to_vec()));
    }
}
