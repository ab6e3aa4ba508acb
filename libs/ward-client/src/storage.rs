//! Durable session persistence

use crate::error::Result;
use crate::session::Session;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Fixed key the session is stored under.
pub const SESSION_KEY: &str = "userInfo";

/// Storage backend for the signed-in session.
pub trait SessionStore: Send + Sync {
    /// Load the persisted session, if any.
    fn load(&self) -> Result<Option<Session>>;

    /// Persist the session, replacing whatever was stored.
    fn save(&self, session: &Session) -> Result<()>;

    /// Delete the persisted session. Deleting nothing is not an error.
    fn clear(&self) -> Result<()>;
}

/// Session store backed by a JSON file on disk.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store in `dir`, or in the platform data directory when `None`.
    pub fn new(dir: Option<PathBuf>) -> Self {
        let dir = dir.unwrap_or_else(default_session_dir);
        Self {
            path: dir.join(format!("{SESSION_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Session>(&content) {
            Ok(session) => {
                tracing::debug!(path = %self.path.display(), user_id = %session.id, "Loaded persisted session");
                Ok(Some(session))
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable persisted session"
                );
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        let mut file = open_private(&self.path)?;
        file.write_all(json.as_bytes())?;
        tracing::debug!(path = %self.path.display(), "Persisted session");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Removed persisted session");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

/// Open for writing, truncating. The file holds a bearer token, so on unix it
/// is created owner-only and an existing file is narrowed to owner-only.
fn open_private(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        let file = options.open(path)?;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        Ok(file)
    }

    #[cfg(not(unix))]
    {
        options.open(path)
    }
}

fn default_session_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ward")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;
    use serde_json::Map;

    fn sample() -> Session {
        Session {
            id: "u1".to_string(),
            name: "Grace".to_string(),
            email: "grace@example.org".to_string(),
            role: Role::Doctor,
            token: "secret".to_string(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(Some(dir.path().to_path_buf()));
        assert!(store.path().ends_with("userInfo.json"));
        assert!(store.load().unwrap().is_none());

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileSessionStore::new(Some(nested));
        store.save(&sample()).unwrap();
        assert!(store.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_session_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(Some(dir.path().to_path_buf()));
        fs::write(store.path(), "{}").unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&sample()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap(), Some(sample()));
    }

    #[test]
    fn test_corrupt_file_loads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(Some(dir.path().to_path_buf()));
        fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::default();
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap().map(|s| s.id), Some("u1".to_string()));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
