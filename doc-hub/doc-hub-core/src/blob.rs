//! Local key-value storage that receives the encoded bytes of uploaded
//! files. The hub writes to it but never reads the objects back.

use anyhow::{anyhow, Result};
use base64::Engine;
use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::upload::FileMetadata;

/// String key-value store in the manner of browser local storage.
pub trait LocalStorage: Send + Sync {
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn get_item(&self, key: &str) -> Result<Option<String>>;
}

/// Storage kept in memory for the lifetime of the process.
#[derive(Default)]
pub struct InMemoryStorage {
    data: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }
}

impl LocalStorage for InMemoryStorage {
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.data.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.lock().get(key).cloned())
    }
}

/// Storage writing one `<key>.json` file per item under a directory.
pub struct DirStorage {
    dir: PathBuf,
}

impl DirStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn item_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(anyhow!("invalid storage key: {key:?}"));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl LocalStorage for DirStorage {
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.item_path(key)?, value)?;
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }
}

/// Object written for each stored upload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub id: String,
    pub file_data: String,
    pub metadata: FileMetadata,
}

/// `<unix millis>-<random base36>` key for a stored upload.
pub fn generate_key() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..13)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", chrono::Utc::now().timestamp_millis(), suffix)
}

/// Encode bytes as a `data:` URL.
pub fn data_url(media_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        media_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}
