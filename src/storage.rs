use crate::errors::StoreError;
use crate::models::SessionRecord;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, warn};

pub const AUTH_KEY: &str = "auth";
pub const USER_ID_KEY: &str = "user_id";

const STORE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            updated_at: None,
            entries: BTreeMap::new(),
        }
    }
}

/// Durable string slots kept in one JSON file. Each write replaces a whole
/// slot; reads never fail, a missing or unreadable file is simply empty.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        load_file(&self.path).await.entries.remove(key)
    }

    pub async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut file = load_file(&self.path).await;
        file.entries.insert(key.to_owned(), value);
        persist_file(&self.path, &mut file).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut file = load_file(&self.path).await;
        if file.entries.remove(key).is_none() {
            return Ok(());
        }
        persist_file(&self.path, &mut file).await
    }
}

async fn load_file(path: &Path) -> StoreFile {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<StoreFile>(&bytes) {
            Ok(file) if file.version <= STORE_VERSION => file,
            Ok(file) => {
                warn!(
                    "ignoring session storage written by newer version {}",
                    file.version
                );
                StoreFile::default()
            }
            Err(err) => {
                error!("failed to parse session storage: {err}");
                StoreFile::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoreFile::default(),
        Err(err) => {
            error!("failed to read session storage: {err}");
            StoreFile::default()
        }
    }
}

async fn persist_file(path: &Path, file: &mut StoreFile) -> Result<(), StoreError> {
    file.version = STORE_VERSION;
    file.updated_at = Some(Utc::now().to_rfc3339());
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let payload = serde_json::to_vec_pretty(file)?;
    fs::write(path, payload).await?;
    Ok(())
}

/// The current session: the auth record from the last login or register, plus
/// an optional raw user id used when no record carries one.
#[derive(Debug, Clone)]
pub struct SessionStore {
    store: LocalStore,
}

impl SessionStore {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::new(LocalStore::new(path))
    }

    pub async fn save(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let raw = serde_json::to_string(record)?;
        self.store.set(AUTH_KEY, raw).await?;
        debug!("session record saved");
        Ok(())
    }

    pub async fn load_record(&self) -> Option<SessionRecord> {
        let raw = self.store.get(AUTH_KEY).await?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("stored session record is unreadable: {err}");
                None
            }
        }
    }

    pub async fn load_identifier(&self) -> Option<String> {
        let raw = self.store.get(AUTH_KEY).await?;
        extract_user_id(&raw)
    }

    pub async fn fallback_identifier(&self) -> Option<String> {
        self.store
            .get(USER_ID_KEY)
            .await
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty())
    }

    pub async fn remember_user_id(&self, user_id: &str) -> Result<(), StoreError> {
        self.store.set(USER_ID_KEY, user_id.trim().to_owned()).await
    }

    /// Identifier from the auth record, else the raw fallback slot.
    pub async fn resolve_identifier(&self) -> Option<String> {
        match self.load_identifier().await {
            Some(id) => Some(id),
            None => self.fallback_identifier().await,
        }
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(AUTH_KEY).await?;
        self.store.remove(USER_ID_KEY).await
    }
}

/// Finds the user id in a serialized auth record. Probing order:
///
/// 1. top-level `user_id`
/// 2. `user.user_id`
/// 3. `user.id`
/// 4. `user.mongodb_id`
///
/// Only string values count. Anything unparsable yields `None`.
pub fn extract_user_id(raw: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(raw).ok()?;
    let record = parsed.as_object()?;

    if let Some(Value::String(id)) = record.get("user_id") {
        return Some(id.clone());
    }

    let user = record.get("user")?.as_object()?;
    ["user_id", "id", "mongodb_id"]
        .iter()
        .find_map(|key| user.get(*key).and_then(Value::as_str))
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_store_path(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("blopa_store_{tag}_{}_{}.json", std::process::id(), nanos));
        path
    }

    #[test]
    fn top_level_id_wins() {
        let raw = r#"{"user_id":"top","user":{"user_id":"nested","id":"plain"}}"#;
        assert_eq!(extract_user_id(raw).as_deref(), Some("top"));
    }

    #[test]
    fn nested_keys_are_read_in_order() {
        assert_eq!(
            extract_user_id(r#"{"user":{"user_id":"a","id":"b","mongodb_id":"c"}}"#).as_deref(),
            Some("a")
        );
        assert_eq!(
            extract_user_id(r#"{"user":{"id":"b","mongodb_id":"c"}}"#).as_deref(),
            Some("b")
        );
        assert_eq!(
            extract_user_id(r#"{"user":{"mongodb_id":"c"}}"#).as_deref(),
            Some("c")
        );
    }

    #[test]
    fn non_string_ids_are_skipped() {
        assert_eq!(
            extract_user_id(r#"{"user_id":42,"user":{"id":7,"mongodb_id":"m"}}"#).as_deref(),
            Some("m")
        );
        assert_eq!(extract_user_id(r#"{"user_id":null}"#), None);
    }

    #[test]
    fn malformed_content_is_absent() {
        assert_eq!(extract_user_id(""), None);
        assert_eq!(extract_user_id("{not json"), None);
        assert_eq!(extract_user_id("[1,2,3]"), None);
        assert_eq!(extract_user_id("\"just a string\""), None);
        assert_eq!(extract_user_id(r#"{"user":"someone"}"#), None);
        assert_eq!(extract_user_id(r#"{"message":"ok"}"#), None);
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let session = SessionStore::at(unique_store_path("missing"));
        assert_eq!(session.load_identifier().await, None);
        assert_eq!(session.load_record().await, None);
        assert_eq!(session.resolve_identifier().await, None);
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_empty() {
        let path = unique_store_path("corrupt");
        fs::write(&path, b"{{{ definitely not json").await.unwrap();
        let session = SessionStore::at(&path);
        assert_eq!(session.load_identifier().await, None);
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn unreadable_record_slot_is_absent() {
        let path = unique_store_path("slot");
        let store = LocalStore::new(&path);
        store.set(AUTH_KEY, "<html>".to_owned()).await.unwrap();
        let session = SessionStore::new(store);
        assert_eq!(session.load_identifier().await, None);
        assert_eq!(session.load_record().await, None);
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn save_replaces_whole_record() {
        let path = unique_store_path("replace");
        let session = SessionStore::at(&path);

        let first: SessionRecord =
            serde_json::from_str(r#"{"token":"t-1","user":{"id":"first"}}"#).unwrap();
        session.save(&first).await.unwrap();
        assert_eq!(session.load_identifier().await.as_deref(), Some("first"));

        let second: SessionRecord =
            serde_json::from_str(r#"{"message":"User created","user_id":"second"}"#).unwrap();
        session.save(&second).await.unwrap();

        let stored = session.load_record().await.unwrap();
        assert_eq!(stored, second);
        assert_eq!(stored.token(), None);
        assert_eq!(session.load_identifier().await.as_deref(), Some("second"));
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn fallback_slot_is_used_when_record_has_no_id() {
        let path = unique_store_path("fallback");
        let session = SessionStore::at(&path);
        session.remember_user_id("  raw-id  ").await.unwrap();
        assert_eq!(session.load_identifier().await, None);
        assert_eq!(session.resolve_identifier().await.as_deref(), Some("raw-id"));

        session.clear().await.unwrap();
        assert_eq!(session.resolve_identifier().await, None);
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn newer_envelope_is_ignored() {
        let path = unique_store_path("version");
        fs::write(
            &path,
            br#"{"version":99,"entries":{"auth":"{\"user_id\":\"x\"}"}}"#,
        )
        .await
        .unwrap();
        let session = SessionStore::at(&path);
        assert_eq!(session.load_identifier().await, None);
        let _ = fs::remove_file(&path).await;
    }
}
