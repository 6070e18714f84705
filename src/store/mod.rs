//! Collection-file storage
//!
//! All application state lives in a data directory holding one JSON
//! file per named collection. Collections are read and written whole;
//! there is no locking and no transaction, the last write wins. Writes
//! go through a temp file with fsync followed by an atomic rename so a
//! crash never leaves a half-written collection behind.

pub mod models;
pub mod repos;
pub mod seed;
pub mod session;

use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::Result;

pub use seed::initialize_store;
pub use session::SessionStore;

/// Collection names, one JSON file each under the data directory.
pub mod collections {
    pub const USERS: &str = "qedge_users";
    pub const COURSES: &str = "qedge_courses";
    pub const MEETINGS: &str = "qedge_meetings";
    pub const NOTIFICATIONS: &str = "qedge_notifications";
    pub const EMAILS: &str = "qedge_emails";
    pub const COURSE_STATS: &str = "qedge_course_stats";
    pub const ATTENDANCE: &str = "qedge_attendance";
    pub const ACTIVITIES: &str = "qedge_activities";

    /// Single-value slot holding the logged-in user
    pub const CURRENT_USER: &str = "qedge_current_user";
}

/// Handle on the data directory. Cheap to clone; every repository
/// holds one.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    root: PathBuf,
}

impl CollectionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the data directory if needed.
    pub async fn initialize(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).await?;
            tracing::info!("Created data directory at {:?}", self.root);
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.json", name))
    }

    /// Reads every record of a collection. A missing file is an empty
    /// collection; an unparseable file is logged and treated as empty.
    pub async fn read_collection<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let path = self.collection_path(name);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&path).await?;
        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!("Failed to parse collection '{}', starting empty: {}", name, e);
                Ok(Vec::new())
            }
        }
    }

    /// Replaces the full contents of a collection.
    pub async fn write_collection<T: Serialize>(&self, name: &str, records: &[T]) -> Result<()> {
        let json = serde_json::to_vec(records)?;
        self.write_atomic(&self.collection_path(name), &json).await
    }

    /// Reads a single-value slot. Missing or unparseable slots read as
    /// empty.
    pub async fn read_slot<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.collection_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Failed to parse slot '{}', treating as empty: {}", name, e);
                Ok(None)
            }
        }
    }

    pub async fn write_slot<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let json = serde_json::to_vec(value)?;
        self.write_atomic(&self.collection_path(name), &json).await
    }

    /// Removes a slot. Clearing an absent slot is a no-op.
    pub async fn clear_slot(&self, name: &str) -> Result<()> {
        let path = self.collection_path(name);
        if path.exists() {
            fs::remove_file(&path).await?;
        }
        Ok(())
    }

    /// Write to a temp file, fsync, then rename over the target.
    async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let temp_path = path.with_extension("tmp");

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, path).await?;
        Ok(())
    }
}

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a collection record id: the current Unix millisecond
/// timestamp in base36 plus a random 8-character suffix. Sortable by
/// creation time and unique enough for a single-writer store.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..8)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", base36(millis), suffix)
}

fn base36(mut n: u128) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ID_ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashSet;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Record {
        id: String,
        label: String,
    }

    fn record(id: &str, label: &str) -> Record {
        Record {
            id: id.to_string(),
            label: label.to_string(),
        }
    }

    async fn create_test_store() -> (CollectionStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = CollectionStore::new(dir.path());
        store.initialize().await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn missing_collection_reads_as_empty() {
        let (store, _dir) = create_test_store().await;

        let records: Vec<Record> = store.read_collection("qedge_missing").await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn write_then_read_preserves_records_and_order() {
        let (store, _dir) = create_test_store().await;

        let records = vec![record("a", "first"), record("b", "second"), record("c", "third")];
        store.write_collection("qedge_test", &records).await.unwrap();

        let loaded: Vec<Record> = store.read_collection("qedge_test").await.unwrap();
        assert_eq!(loaded, records);
    }

    #[tokio::test]
    async fn rewrite_replaces_previous_contents() {
        let (store, _dir) = create_test_store().await;

        store
            .write_collection("qedge_test", &[record("a", "old")])
            .await
            .unwrap();
        store
            .write_collection("qedge_test", &[record("b", "new")])
            .await
            .unwrap();

        let loaded: Vec<Record> = store.read_collection("qedge_test").await.unwrap();
        assert_eq!(loaded, vec![record("b", "new")]);
    }

    #[tokio::test]
    async fn corrupted_collection_reads_as_empty() {
        let (store, dir) = create_test_store().await;

        std::fs::write(dir.path().join("qedge_test.json"), b"{not json!").unwrap();

        let loaded: Vec<Record> = store.read_collection("qedge_test").await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn slot_round_trip_and_clear() {
        let (store, _dir) = create_test_store().await;

        let empty: Option<Record> = store.read_slot("qedge_slot").await.unwrap();
        assert!(empty.is_none());

        store
            .write_slot("qedge_slot", &record("x", "held"))
            .await
            .unwrap();
        let held: Option<Record> = store.read_slot("qedge_slot").await.unwrap();
        assert_eq!(held, Some(record("x", "held")));

        store.clear_slot("qedge_slot").await.unwrap();
        let cleared: Option<Record> = store.read_slot("qedge_slot").await.unwrap();
        assert!(cleared.is_none());

        // clearing twice is fine
        store.clear_slot("qedge_slot").await.unwrap();
    }

    #[tokio::test]
    async fn no_temp_file_remains_after_write() {
        let (store, dir) = create_test_store().await;

        store
            .write_collection("qedge_test", &[record("a", "one")])
            .await
            .unwrap();

        assert!(dir.path().join("qedge_test.json").exists());
        assert!(!dir.path().join("qedge_test.tmp").exists());
    }

    #[test]
    fn generated_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn generated_ids_have_timestamp_prefix_and_suffix() {
        let id = generate_id();
        let (prefix, suffix) = id.split_once('-').unwrap();
        assert!(!prefix.is_empty());
        assert_eq!(suffix.len(), 8);
        assert!(id
            .chars()
            .all(|c| c == '-' || c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn generated_id_prefixes_order_by_creation_time() {
        let earlier = generate_id();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let later = generate_id();

        let earlier_prefix = earlier.split_once('-').unwrap().0;
        let later_prefix = later.split_once('-').unwrap().0;
        assert!(earlier_prefix <= later_prefix);
    }

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(36 * 36 + 1), "101");
    }
}
