//! On-disk form of the record store.
//!
//! The whole store is one JSON document. Field names match the files written
//! by earlier releases, so existing databases keep loading.

use super::StoreError;
use crate::models::{Account, AccountId, Post, PostId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "nextuid", default = "first_id")]
    pub next_account_id: AccountId,
    #[serde(rename = "nextcid", default = "first_id")]
    pub next_post_id: PostId,
    #[serde(rename = "users", default)]
    pub accounts: BTreeMap<AccountId, Account>,
    #[serde(rename = "chirps", default)]
    pub posts: BTreeMap<PostId, Post>,
    #[serde(default, with = "hash_bytes")]
    pub hashes: BTreeMap<AccountId, Vec<u8>>,
    /// Refresh tokens that are still honoured. Absence means revoked or never issued.
    #[serde(rename = "refresh_tokens", default, with = "live_tokens")]
    pub live_tokens: BTreeSet<String>,
}

fn first_id() -> u64 {
    1
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            next_account_id: first_id(),
            next_post_id: first_id(),
            accounts: BTreeMap::new(),
            posts: BTreeMap::new(),
            hashes: BTreeMap::new(),
            live_tokens: BTreeSet::new(),
        }
    }
}

impl Snapshot {
    pub fn decode(bytes: &[u8]) -> Result<Self, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn encode(&self) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Reads and parses the snapshot at `path`.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }
}

/// Replaces the file at `path` with `bytes` via a sibling temp file and a rename,
/// so readers see either the old document or the new one.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Hash digests are stored base64 encoded.
mod hash_bytes {
    use crate::models::AccountId;
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        hashes: &BTreeMap<AccountId, Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(hashes.iter().map(|(id, digest)| (id, STANDARD.encode(digest))))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<AccountId, Vec<u8>>, D::Error> {
        BTreeMap::<AccountId, String>::deserialize(deserializer)?
            .into_iter()
            .map(|(id, encoded)| {
                STANDARD
                    .decode(encoded)
                    .map(|digest| (id, digest))
                    .map_err(D::Error::custom)
            })
            .collect()
    }
}

/// The live set is persisted as `{"<token>": true}`; only key presence matters.
mod live_tokens {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::{BTreeMap, BTreeSet};

    pub fn serialize<S: Serializer>(
        tokens: &BTreeSet<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(tokens.iter().map(|token| (token, true)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeSet<String>, D::Error> {
        Ok(BTreeMap::<String, bool>::deserialize(deserializer)?
            .into_keys()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_legacy_document() {
        let json = r#"{
            "nextuid": 3,
            "nextcid": 2,
            "chirps": {"1": {"body": "hello", "id": 1, "author_id": 2}},
            "users": {
                "1": {"email": "a@x.com", "id": 1, "is_chirpy_red": false},
                "2": {"email": "b@x.com", "id": 2, "is_chirpy_red": true}
            },
            "refresh_tokens": {"tok-a": true},
            "hashes": {"1": "JDJhJDA0JGFiYw=="}
        }"#;

        let snapshot = Snapshot::decode(json.as_bytes()).unwrap();

        assert_eq!(snapshot.next_account_id, 3);
        assert_eq!(snapshot.next_post_id, 2);
        assert_eq!(snapshot.posts[&1].author_id, 2);
        assert!(snapshot.accounts[&2].is_upgraded);
        assert_eq!(snapshot.hashes[&1], b"$2a$04$abc".to_vec());
        assert!(snapshot.live_tokens.contains("tok-a"));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let snapshot = Snapshot::decode(b"{}").unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn encodes_with_stable_field_names() {
        let mut snapshot = Snapshot::default();
        snapshot.live_tokens.insert("tok".into());
        snapshot.hashes.insert(1, b"digest".to_vec());

        let value: serde_json::Value = serde_json::from_slice(&snapshot.encode().unwrap()).unwrap();

        assert_eq!(value["nextuid"], 1);
        assert_eq!(value["nextcid"], 1);
        assert_eq!(value["refresh_tokens"]["tok"], true);
        assert_eq!(value["hashes"]["1"], "ZGlnZXN0");
        assert!(value["users"].is_object());
        assert!(value["chirps"].is_object());
    }

    #[tokio::test]
    async fn atomic_write_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        std::fs::write(&path, b"old").unwrap();

        write_atomic(&path, b"{}").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
        assert!(!tmp_path(&path).exists());
    }
}
