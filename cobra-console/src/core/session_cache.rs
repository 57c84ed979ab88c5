//! SessionCache - 当前会话持久化
//!
//! The persisted slot holds exactly one record: access token, refresh
//! token, user identity and expiry. Token and identity are written in the
//! same record, so a reader sees either both or neither.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use shared::client::UserInfo;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 持久化的会话
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PersistedSession {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: UserInfo,
    /// Unix seconds; `None` when the token carries no readable expiry
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub saved_at: i64,
}

impl PersistedSession {
    /// Expired against the local clock. Advisory only: the server still
    /// has the final word through a 401.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at
            .or_else(|| parse_jwt_exp(&self.token))
            .is_some_and(|exp| now >= exp)
    }
}

/// Storage slot for the current session
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<PersistedSession>, StorageError>;
    fn save(&self, session: &PersistedSession) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// Process-scoped slot, gone when the process exits.
///
/// Clones share the same slot, the way two tabs of one browser session
/// share `sessionStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<PersistedSession>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, session: &PersistedSession) -> Result<(), StorageError> {
        *self.slot.lock() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot.lock() = None;
        Ok(())
    }
}

/// File slot: `{dir}/auth/current_session.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    file_path: PathBuf,
}

impl FileStorage {
    pub fn new(dir: &Path) -> Self {
        Self {
            file_path: dir.join("auth").join("current_session.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn dir(&self) -> &Path {
        self.file_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        let content = match std::fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<PersistedSession>(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(path = %self.file_path.display(), error = %e, "Corrupt session file, removing");
                std::fs::remove_file(&self.file_path)?;
                Ok(None)
            }
        }
    }

    fn save(&self, session: &PersistedSession) -> Result<(), StorageError> {
        // 确保 auth 目录存在
        std::fs::create_dir_all(self.dir())?;

        // Each writer gets its own temp file in the same directory; the
        // rename is atomic, so concurrent saves end with one whole record.
        let content = serde_json::to_string_pretty(session)?;
        let mut tmp = tempfile::NamedTempFile::new_in(self.dir())?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.file_path).map_err(|e| e.error)?;

        tracing::debug!(user = %session.user.id, "Current session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.file_path) {
            Ok(()) => {
                tracing::debug!("Current session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// 从 token 中解析过期时间 (Unix timestamp)
///
/// Reads the `exp` claim of a JWT. Tokens that are a single base64 JSON
/// document (issued by the console's demo backend) are read the same way.
pub fn parse_jwt_exp(token: &str) -> Option<i64> {
    use base64::{
        Engine,
        engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    };

    let parts: Vec<&str> = token.split('.').collect();
    let payload_bytes = match parts.as_slice() {
        // JWT 格式: header.payload.signature
        [_, payload, _] => URL_SAFE_NO_PAD.decode(payload).ok()?,
        [whole] => STANDARD.decode(whole).ok()?,
        _ => return None,
    };

    let payload: serde_json::Value = serde_json::from_slice(&payload_bytes).ok()?;
    payload.get("exp")?.as_i64()
}
