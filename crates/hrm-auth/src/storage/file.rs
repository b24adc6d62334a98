use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::TokenStore;
use crate::error::AuthError;
use crate::token::TokenPair;

/// Directory under the home directory holding client state.
pub const STATE_DIR: &str = ".hrm";

/// Token store backed by a JSON file.
///
/// The file holds the two fixed keys `hrm_access_token` and
/// `hrm_refresh_token`. Saves go through a temporary file and a rename.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.hrm/session.<profile>.json`.
    pub fn for_profile(profile: &str) -> Result<Self, AuthError> {
        let dir = dirs::home_dir()
            .ok_or_else(|| AuthError::storage("Cannot determine home directory"))?
            .join(STATE_DIR);
        Ok(Self::new(dir.join(format!("session.{profile}.json"))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<TokenPair>, AuthError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<TokenPair>(&content) {
            Ok(tokens) if tokens.is_complete() => Ok(Some(tokens)),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable session file"
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(tokens)
            .map_err(|e| AuthError::storage(format!("Failed to serialize tokens: {e}")))?;
        let temp = self.temp_path();
        fs::write(&temp, content).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp, std::fs::Permissions::from_mode(0o600)).await?;
        }

        fs::rename(&temp, &self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

    fn store_in(dir: &tempfile::TempDir) -> FileTokenStore {
        FileTokenStore::new(dir.path().join("nested").join("session.default.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&TokenPair::new("access-1", "refresh-1")).await.unwrap();
        assert_eq!(
            store.load().await.unwrap(),
            Some(TokenPair::new("access-1", "refresh-1"))
        );

        store.save(&TokenPair::new("access-2", "refresh-2")).await.unwrap();
        assert_eq!(
            store.load().await.unwrap(),
            Some(TokenPair::new("access-2", "refresh-2"))
        );
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_file_uses_fixed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&TokenPair::new("a", "r")).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[ACCESS_TOKEN_KEY], "a");
        assert_eq!(json[REFRESH_TOKEN_KEY], "r");
    }

    #[tokio::test]
    async fn test_clear_removes_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&TokenPair::new("a", "r")).await.unwrap();

        store.clear().await.unwrap();
        assert!(!store.path().exists());
        assert!(store.load().await.unwrap().is_none());
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_key_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"hrm_access_token":"a"}"#).unwrap();
        let store = FileTokenStore::new(&path);
        assert!(store.load().await.unwrap().is_none());

        std::fs::write(&path, r#"{"hrm_access_token":"a","hrm_refresh_token":""}"#).unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileTokenStore::new(&path);
        assert!(store.load().await.unwrap().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&TokenPair::new("a", "r")).await.unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
