//! Durable session storage backends.

use super::Session;
use crate::error::StorageError;

use std::sync::Mutex;

/// Where the session survives restarts. Implementations are synchronous so the
/// initial auth state can be resolved before anything is rendered.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<Session>, StorageError>;
    fn save(&self, session: &Session) -> Result<(), StorageError>;
    /// Remove every stored key. Must succeed when nothing is stored.
    fn clear(&self) -> Result<(), StorageError>;
}

/// In-process storage. Useful for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<Session>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Session>, StorageError> {
        Ok(self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, session: &Session) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(feature = "file-storage")]
pub use file::FileStorage;

#[cfg(feature = "file-storage")]
mod file {
    use super::*;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    /// JSON file storage. Writes go to a sibling temp file that is renamed
    /// into place, so readers in other processes never see a partial file.
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut name = self
                .path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "session.json".into());
            name.push(".tmp");
            self.path.with_file_name(name)
        }
    }

    impl SessionStorage for FileStorage {
        fn load(&self) -> Result<Option<Session>, StorageError> {
            match fs::read(&self.path) {
                Ok(bytes) if bytes.iter().all(|b| b.is_ascii_whitespace()) => Ok(None),
                Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn save(&self, session: &Session) -> Result<(), StorageError> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let tmp = self.temp_path();
            fs::write(&tmp, serde_json::to_vec_pretty(session)?)?;
            fs::rename(&tmp, &self.path)?;
            Ok(())
        }

        fn clear(&self) -> Result<(), StorageError> {
            match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}
